use geo::Point;
use serde::{Deserialize, Serialize};

/// The rectangular lat/lng region currently visible on a map surface.
///
/// Bounds are replaced wholesale on every view change and never patched
/// field by field. Longitudes are taken as reported: slippy maps give edges
/// past ±180 when zoomed out or panned across the antimeridian, so a span of
/// 360° or more covers every longitude and narrower boxes are wrapped into
/// [-180, 180] before testing. A wrapped `west` edge east of the `east` edge
/// spans the antimeridian.
///
/// # Examples
///
/// ```
/// use geoveil_types::bbox::BoundingBox;
///
/// let iran = BoundingBox::new(40.0, 25.0, 63.5, 44.0);
/// assert!(iran.contains(35.69, 51.39));
/// assert!(!iran.contains(40.4, -3.7));
///
/// let world = BoundingBox::new(80.0, -80.0, 270.0, -270.0);
/// assert!(world.contains(40.4, -3.7));
///
/// let pacific = BoundingBox::new(10.0, -10.0, 190.0, 170.0);
/// assert!(pacific.crosses_antimeridian());
/// assert!(pacific.contains(0.0, -175.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Wrap a longitude into [-180, 180], leaving in-range values untouched.
fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

impl BoundingBox {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Whether the box spans every longitude.
    #[inline]
    pub fn spans_all_longitudes(&self) -> bool {
        self.east - self.west >= 360.0
    }

    #[inline]
    pub fn crosses_antimeridian(&self) -> bool {
        !self.spans_all_longitudes() && wrap_longitude(self.west) > wrap_longitude(self.east)
    }

    /// Inclusive containment test on all four edges.
    #[inline]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        if !(lat >= self.south && lat <= self.north) {
            return false;
        }
        if !lng.is_finite() {
            return false;
        }
        if self.spans_all_longitudes() {
            return true;
        }

        let (west, east) = (wrap_longitude(self.west), wrap_longitude(self.east));
        if west > east {
            lng >= west || lng <= east
        } else {
            lng >= west && lng <= east
        }
    }

    /// Containment for a `geo::Point` (x = longitude, y = latitude).
    #[inline]
    pub fn contains_point(&self, point: &Point) -> bool {
        self.contains(point.y(), point.x())
    }

    /// Check that every edge is finite and that `south <= north`.
    ///
    /// Longitudes outside [-180, 180] are accepted, since map surfaces
    /// report them for zoomed-out and wrapped views.
    pub fn validate(&self) -> Result<(), String> {
        let edges = [
            ("north", self.north),
            ("south", self.south),
            ("east", self.east),
            ("west", self.west),
        ];
        for (name, value) in edges {
            if !value.is_finite() {
                return Err(format!("Bounding box {} edge must be finite, got: {}", name, value));
            }
        }

        if self.south > self.north {
            return Err(format!(
                "Bounding box south ({}) must be <= north ({})",
                self.south, self.north
            ));
        }

        Ok(())
    }
}
