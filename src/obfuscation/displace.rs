//! Coordinate displacement primitives used by the obfuscation engine.

use crate::error::Result;
use geo::{Distance, Euclidean, Point};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use std::f64::consts::TAU;
use std::hash::{Hash, Hasher};

/// Finest geohash precision supported by the `geohash` crate.
pub const MAX_GEOHASH_PRECISION: usize = 12;

/// Deterministic RNG for one record: the same `(seed, id)` always yields the
/// same stream, so a user's displayed position survives re-renders and
/// dataset refreshes.
pub(crate) fn record_rng(seed: u64, id: &str) -> ChaCha8Rng {
    let mut hasher = FxHasher::default();
    id.hash(&mut hasher);
    ChaCha8Rng::seed_from_u64(seed ^ hasher.finish())
}

/// Displace `origin` by a random offset inside a disc of `max_radius` degrees.
///
/// The bearing is uniform over 360° and the radius is `max_radius * sqrt(u)`,
/// which spreads offsets uniformly over the disc area. The mean offset over
/// many points tends to zero.
///
/// # Examples
///
/// ```
/// use geoveil::obfuscation::{jitter, offset_degrees};
/// use geo::Point;
/// use rand::SeedableRng;
///
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
/// let tehran = Point::new(51.3890, 35.6892);
/// let shown = jitter(tehran, 0.1, &mut rng);
/// assert!(offset_degrees(&tehran, &shown) <= 0.1);
/// ```
pub fn jitter<R: Rng>(origin: Point, max_radius: f64, rng: &mut R) -> Point {
    let bearing = rng.random_range(0.0..TAU);
    let radius = max_radius * rng.random::<f64>().sqrt();

    clamp_to_world(Point::new(
        origin.x() + radius * bearing.cos(),
        origin.y() + radius * bearing.sin(),
    ))
}

/// Width and height in degrees of a geohash cell at `precision`.
pub fn cell_size(precision: usize) -> (f64, f64) {
    let bits = 5 * precision as i32;
    let lng_bits = (bits + 1) / 2;
    let lat_bits = bits / 2;
    (
        360.0 / 2f64.powi(lng_bits),
        180.0 / 2f64.powi(lat_bits),
    )
}

/// Coarsest geohash precision whose cell centre is never more than
/// `max_radius` degrees from any point in the cell.
///
/// # Examples
///
/// ```
/// use geoveil::obfuscation::snap_precision;
///
/// assert_eq!(snap_precision(0.1), Some(5));
/// assert_eq!(snap_precision(1e-12), None);
/// ```
pub fn snap_precision(max_radius: f64) -> Option<usize> {
    (1..=MAX_GEOHASH_PRECISION).find(|&precision| {
        let (w, h) = cell_size(precision);
        w.hypot(h) / 2.0 <= max_radius
    })
}

/// Snap `origin` to the centre of its geohash cell.
pub fn snap_to_cell(origin: Point, precision: usize) -> Result<Point> {
    let hash = geohash::encode(origin.0, precision)?;
    let cell = geohash::decode_bbox(&hash)?;
    Ok(Point::from(cell.center()))
}

/// Planar distance in degrees between two lng/lat points.
#[inline]
pub fn offset_degrees(a: &Point, b: &Point) -> f64 {
    Euclidean.distance(*a, *b)
}

/// Pull a point back into valid lat/lng ranges. Never moves a point further
/// from any position already inside those ranges.
#[inline]
pub(crate) fn clamp_to_world(p: Point) -> Point {
    Point::new(p.x().clamp(-180.0, 180.0), p.y().clamp(-90.0, 90.0))
}
