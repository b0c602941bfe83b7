use geo::Point;
use serde::{Deserialize, Deserializer, Serialize};

/// A user's exact location as delivered by the data source.
///
/// Records are immutable once loaded. Coordinates are kept as raw `f64`
/// because the source is only validated at its boundary: a missing, `null`
/// or non-numeric `lat`/`lng` deserializes to NaN and is rejected later by
/// the obfuscation stage, one record at a time, instead of failing the whole
/// payload.
///
/// # Examples
///
/// ```
/// use geoveil_types::location::LocationRecord;
///
/// let json = r#"{"id":"u-7","lat":null,"lng":51.39,"fullName":"Sara","capital":10}"#;
/// let record: LocationRecord = serde_json::from_str(json).unwrap();
/// assert!(record.lat.is_nan());
/// assert_eq!(record.capital, 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: String,
    #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
    pub lat: f64,
    #[serde(default = "missing_coordinate", deserialize_with = "lenient_coordinate")]
    pub lng: f64,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub join_date: String,
    #[serde(default)]
    pub subordinates: u64,
    #[serde(default)]
    pub capital: f64,
}

impl LocationRecord {
    /// Create a record with the given coordinates and empty profile fields.
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
            full_name: String::new(),
            join_date: String::new(),
            subordinates: 0,
            capital: 0.0,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn with_join_date(mut self, join_date: impl Into<String>) -> Self {
        self.join_date = join_date.into();
        self
    }

    pub fn with_subordinates(mut self, subordinates: u64) -> Self {
        self.subordinates = subordinates;
        self
    }

    pub fn with_capital(mut self, capital: f64) -> Self {
        self.capital = capital;
        self
    }

    /// The exact position as a `geo::Point` (x = longitude, y = latitude).
    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.lng, self.lat)
    }
}

/// A location that is safe to show: profile fields plus displaced coordinates.
///
/// There is deliberately no field holding the exact position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObfuscatedLocation {
    pub id: String,
    pub obf_lat: f64,
    pub obf_lng: f64,
    pub full_name: String,
    pub join_date: String,
    pub subordinates: u64,
    pub capital: f64,
}

impl ObfuscatedLocation {
    /// Copy the profile fields of `record` and attach the displaced position.
    pub fn new(record: &LocationRecord, obfuscated: Point) -> Self {
        Self {
            id: record.id.clone(),
            obf_lat: obfuscated.y(),
            obf_lng: obfuscated.x(),
            full_name: record.full_name.clone(),
            join_date: record.join_date.clone(),
            subordinates: record.subordinates,
            capital: record.capital,
        }
    }

    /// The displaced position as a `geo::Point` (x = longitude, y = latitude).
    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.obf_lng, self.obf_lat)
    }
}

const fn missing_coordinate() -> f64 {
    f64::NAN
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawCoordinate::deserialize(deserializer)? {
        RawCoordinate::Number(v) => v,
        RawCoordinate::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        RawCoordinate::Other(_) => f64::NAN,
    };
    Ok(value)
}
