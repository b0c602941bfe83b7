//! Validation for geographic coordinates and viewport bounds.

use crate::error::{GeoveilError, Result};
use geoveil_types::{BoundingBox, LocationRecord};

/// Validates a latitude/longitude pair.
///
/// Latitude: [-90.0, 90.0], Longitude: [-180.0, 180.0]. Returns the reason
/// as a plain message so callers can attach their own context.
///
/// # Examples
///
/// ```
/// use geoveil::validation::validate_coordinate;
///
/// assert!(validate_coordinate(35.6892, 51.3890).is_ok());
/// assert!(validate_coordinate(95.0, 51.0).is_err());
/// assert!(validate_coordinate(f64::NAN, 51.0).is_err());
/// ```
pub fn validate_coordinate(lat: f64, lng: f64) -> std::result::Result<(), String> {
    if !lat.is_finite() {
        return Err(format!("Latitude must be finite, got: {}", lat));
    }

    if !lng.is_finite() {
        return Err(format!("Longitude must be finite, got: {}", lng));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("Latitude out of range [-90.0, 90.0]: {}", lat));
    }

    if !(-180.0..=180.0).contains(&lng) {
        return Err(format!("Longitude out of range [-180.0, 180.0]: {}", lng));
    }

    Ok(())
}

/// Validates the coordinates of a single record.
///
/// # Examples
///
/// ```
/// use geoveil::validation::validate_record;
/// use geoveil_types::LocationRecord;
///
/// let ok = LocationRecord::new("a", 35.70, 51.39);
/// assert!(validate_record(&ok).is_ok());
///
/// let bad = LocationRecord::new("b", 35.70, 200.0);
/// assert!(validate_record(&bad).is_err());
/// ```
pub fn validate_record(record: &LocationRecord) -> Result<()> {
    validate_coordinate(record.lat, record.lng).map_err(|reason| {
        GeoveilError::InvalidCoordinate {
            id: record.id.clone(),
            reason,
        }
    })
}

/// Validates a viewport bounding box reported by a map surface.
///
/// Wrapped longitudes (past ±180) are valid; non-finite edges and an
/// inverted latitude span are not.
pub fn validate_bounds(bounds: &BoundingBox) -> Result<()> {
    bounds.validate().map_err(GeoveilError::InvalidBounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        assert!(validate_coordinate(35.6892, 51.3890).is_ok());
        assert!(validate_coordinate(40.4168, -3.7038).is_ok());

        // Edge cases
        assert!(validate_coordinate(90.0, 0.0).is_ok());
        assert!(validate_coordinate(-90.0, 0.0).is_ok());
        assert!(validate_coordinate(0.0, 180.0).is_ok());
        assert!(validate_coordinate(0.0, -180.0).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        assert!(validate_coordinate(90.1, 0.0).is_err());
        assert!(validate_coordinate(-90.1, 0.0).is_err());
        assert!(validate_coordinate(0.0, 180.1).is_err());
        assert!(validate_coordinate(0.0, -200.0).is_err());
    }

    #[test]
    fn test_non_finite() {
        assert!(validate_coordinate(f64::NAN, 0.0).is_err());
        assert!(validate_coordinate(0.0, f64::NAN).is_err());
        assert!(validate_coordinate(f64::INFINITY, 0.0).is_err());
        assert!(validate_coordinate(0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_record_error_carries_id() {
        let bad = LocationRecord::new("user-42", f64::NAN, 51.0);
        match validate_record(&bad) {
            Err(GeoveilError::InvalidCoordinate { id, reason }) => {
                assert_eq!(id, "user-42");
                assert!(reason.contains("Latitude"));
            }
            other => panic!("expected InvalidCoordinate, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_bounds() {
        assert!(validate_bounds(&BoundingBox::new(36.0, 35.0, 52.0, 51.0)).is_ok());
        assert!(matches!(
            validate_bounds(&BoundingBox::new(35.0, 36.0, 52.0, 51.0)),
            Err(GeoveilError::InvalidBounds(_))
        ));
        assert!(validate_bounds(&BoundingBox::new(80.0, -80.0, 270.0, -270.0)).is_ok());
    }
}
