//! Capability interface between the pipeline and a map surface.
//!
//! The pipeline never reaches into a map widget or a global map-library
//! handle. A host passes a [`MapAdapter`] that knows how to project points at
//! the current zoom and what the current viewport is.

use geo::Point;
use geoveil_types::{BoundingBox, ScreenPoint};
use std::f64::consts::PI;

/// Latitude limit of the Web Mercator projection.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Tile edge in pixels used by slippy-map libraries.
pub const DEFAULT_TILE_SIZE: f64 = 256.0;

/// Spatial primitives a map surface supplies to the pipeline.
pub trait MapAdapter {
    /// Project a lng/lat point (x = longitude, y = latitude) to screen pixels
    /// at the current zoom.
    fn project(&self, point: &Point) -> ScreenPoint;

    /// The visible region, or `None` before the surface has been measured.
    fn current_bounds(&self) -> Option<BoundingBox>;

    fn zoom(&self) -> f64;
}

/// Spherical Web Mercator projection, as used by Leaflet and OpenLayers.
///
/// # Examples
///
/// ```
/// use geoveil::adapter::{MapAdapter, WebMercatorAdapter};
/// use geo::Point;
///
/// let map = WebMercatorAdapter::new(0.0);
/// let origin = map.project(&Point::new(0.0, 0.0));
/// assert_eq!((origin.x, origin.y), (128.0, 128.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WebMercatorAdapter {
    zoom: f64,
    tile_size: f64,
    bounds: Option<BoundingBox>,
}

impl WebMercatorAdapter {
    pub fn new(zoom: f64) -> Self {
        Self {
            zoom,
            tile_size: DEFAULT_TILE_SIZE,
            bounds: None,
        }
    }

    pub fn with_tile_size(mut self, tile_size: f64) -> Self {
        assert!(tile_size > 0.0, "Tile size must be greater than zero");
        self.tile_size = tile_size;
        self
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn set_bounds(&mut self, bounds: Option<BoundingBox>) {
        self.bounds = bounds;
    }

    /// World width in pixels at the current zoom.
    pub fn world_size(&self) -> f64 {
        self.tile_size * 2f64.powf(self.zoom)
    }
}

impl MapAdapter for WebMercatorAdapter {
    fn project(&self, point: &Point) -> ScreenPoint {
        let scale = self.world_size();
        let lat = point
            .y()
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
            .to_radians();

        let x = (point.x() + 180.0) / 360.0 * scale;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale;

        ScreenPoint::new(x, y)
    }

    fn current_bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }
}
