//! Configuration for the obfuscation, clustering and feed stages.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//!
//! ```rust
//! use geoveil::Config;
//!
//! let json = r#"{
//!     "obfuscation": { "max_radius_deg": 0.05, "mode": "grid_snap" },
//!     "feed": { "page_size": 25 }
//! }"#;
//! let config = Config::from_json(json).unwrap();
//! assert_eq!(config.feed.page_size, 25);
//! assert_eq!(config.clustering.max_cluster_radius_px, 80.0);
//! ```

use crate::cluster::TierTable;
use crate::error::Result;
use crate::obfuscation::snap_precision;
use crate::viewport::SortSpec;
use serde::de::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How exact coordinates are turned into displayed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObfuscationMode {
    /// Bounded random displacement, uniform over a disc of `max_radius_deg`.
    #[default]
    Jitter,
    /// Snap to the centre of the coarsest geohash cell that fits inside
    /// `max_radius_deg`. Everyone in a cell shares one position.
    GridSnap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObfuscationConfig {
    /// Upper bound, in degrees, on the distance between a record's exact and
    /// displayed position. 0.1° is roughly 11 km, a city-level blur.
    #[serde(default = "ObfuscationConfig::default_max_radius_deg")]
    pub max_radius_deg: f64,

    #[serde(default)]
    pub mode: ObfuscationMode,

    /// Fixed seed for jitter offsets. `None` draws one per engine.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ObfuscationConfig {
    const fn default_max_radius_deg() -> f64 {
        0.1
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.max_radius_deg.is_finite() || self.max_radius_deg <= 0.0 {
            return Err(format!(
                "Obfuscation radius must be a positive number of degrees, got: {}",
                self.max_radius_deg
            ));
        }

        if self.max_radius_deg > 10.0 {
            log::warn!(
                "Obfuscation radius of {}° blurs locations beyond country scale",
                self.max_radius_deg
            );
        }

        if self.mode == ObfuscationMode::GridSnap && snap_precision(self.max_radius_deg).is_none()
        {
            return Err(format!(
                "Obfuscation radius {}° is smaller than the finest geohash cell",
                self.max_radius_deg
            ));
        }

        Ok(())
    }
}

impl Default for ObfuscationConfig {
    fn default() -> Self {
        Self {
            max_radius_deg: Self::default_max_radius_deg(),
            mode: ObfuscationMode::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// Screen-space merge distance in pixels.
    #[serde(default = "ClusterConfig::default_max_cluster_radius_px")]
    pub max_cluster_radius_px: f64,

    /// At or above this zoom level every point is drawn as its own marker.
    #[serde(default)]
    pub disable_clustering_at_zoom: Option<f64>,

    #[serde(default)]
    pub tiers: TierTable,
}

impl ClusterConfig {
    const fn default_max_cluster_radius_px() -> f64 {
        80.0
    }

    /// Merge radius in pixels for the given zoom; `None` when clustering is off.
    pub fn radius_for_zoom(&self, zoom: f64) -> Option<f64> {
        match self.disable_clustering_at_zoom {
            Some(limit) if zoom >= limit => None,
            _ => Some(self.max_cluster_radius_px),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.max_cluster_radius_px.is_finite() || self.max_cluster_radius_px < 0.0 {
            return Err(format!(
                "Cluster radius must be a non-negative number of pixels, got: {}",
                self.max_cluster_radius_px
            ));
        }

        if let Some(zoom) = self.disable_clustering_at_zoom
            && !zoom.is_finite()
        {
            return Err("Clustering cut-off zoom must be finite".to_string());
        }

        self.tiers.validate()
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_cluster_radius_px: Self::default_max_cluster_radius_px(),
            disable_clustering_at_zoom: None,
            tiers: TierTable::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    #[serde(default = "FeedConfig::default_page_size")]
    pub page_size: usize,

    /// Page sizes offered by the table's size selector.
    #[serde(default = "FeedConfig::default_page_size_options")]
    pub page_size_options: Vec<usize>,

    #[serde(default)]
    pub sort: SortSpec,
}

impl FeedConfig {
    const fn default_page_size() -> usize {
        10
    }

    fn default_page_size_options() -> Vec<usize> {
        vec![5, 10, 25]
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.page_size == 0 {
            return Err("Page size must be greater than zero".to_string());
        }
        if self.page_size_options.contains(&0) {
            return Err("Page size options must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
            page_size_options: Self::default_page_size_options(),
            sort: SortSpec::default(),
        }
    }
}

/// Top-level configuration for a user-distribution map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub obfuscation: ObfuscationConfig,

    #[serde(default)]
    pub clustering: ClusterConfig,

    #[serde(default)]
    pub feed: FeedConfig,
}

impl Config {
    pub fn with_max_radius(mut self, degrees: f64) -> Self {
        self.obfuscation.max_radius_deg = degrees;
        self
    }

    pub fn with_mode(mut self, mode: ObfuscationMode) -> Self {
        self.obfuscation.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.obfuscation.seed = Some(seed);
        self
    }

    pub fn with_cluster_radius(mut self, pixels: f64) -> Self {
        self.clustering.max_cluster_radius_px = pixels;
        self
    }

    pub fn with_tiers(mut self, tiers: TierTable) -> Self {
        self.clustering.tiers = tiers;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        assert!(page_size > 0, "Page size must be greater than zero");
        self.feed.page_size = page_size;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.feed.sort = sort;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        self.obfuscation.validate()?;
        self.clustering.validate()?;
        self.feed.validate()?;
        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read a config file, choosing the format by extension (`.toml` needs
    /// the `toml` feature; anything else is parsed as JSON).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            #[cfg(feature = "toml")]
            {
                return Ok(Self::from_toml(&contents)?);
            }
            #[cfg(not(feature = "toml"))]
            {
                return Err(crate::error::GeoveilError::InvalidConfig(format!(
                    "{} is TOML but the `toml` feature is disabled",
                    path.display()
                )));
            }
        }

        Ok(Self::from_json(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{SortKey, SortOrder};

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.obfuscation.max_radius_deg, 0.1);
        assert_eq!(config.obfuscation.mode, ObfuscationMode::Jitter);
        assert!(config.obfuscation.seed.is_none());
        assert_eq!(config.clustering.max_cluster_radius_px, 80.0);
        assert_eq!(config.feed.page_size, 10);
        assert_eq!(config.feed.sort.key, SortKey::Capital);
        assert_eq!(config.feed.sort.order, SortOrder::Descending);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.obfuscation.max_radius_deg, 0.1);
        assert_eq!(config.feed.page_size_options, vec![5, 10, 25]);
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        assert!(Config::from_json(r#"{"obfuscation":{"radius":1.0}}"#).is_err());
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        assert!(Config::from_json(r#"{"obfuscation":{"max_radius_deg":-1.0}}"#).is_err());
        assert!(Config::from_json(r#"{"feed":{"page_size":0}}"#).is_err());
        assert!(Config::from_json(r#"{"clustering":{"max_cluster_radius_px":-5.0}}"#).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = Config::default()
            .with_seed(7)
            .with_mode(ObfuscationMode::GridSnap)
            .with_page_size(25);
        let json = config.to_json().unwrap();
        let parsed = Config::from_json(&json).unwrap();
        assert_eq!(parsed.obfuscation.seed, Some(7));
        assert_eq!(parsed.obfuscation.mode, ObfuscationMode::GridSnap);
        assert_eq!(parsed.feed.page_size, 25);
    }

    #[test]
    fn test_radius_for_zoom() {
        let mut clustering = ClusterConfig::default();
        assert_eq!(clustering.radius_for_zoom(3.0), Some(80.0));

        clustering.disable_clustering_at_zoom = Some(15.0);
        assert_eq!(clustering.radius_for_zoom(14.9), Some(80.0));
        assert_eq!(clustering.radius_for_zoom(15.0), None);
    }

    #[test]
    fn test_grid_snap_needs_representable_radius() {
        let config = Config::default()
            .with_mode(ObfuscationMode::GridSnap)
            .with_max_radius(1e-12);
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_roundtrip() {
        let toml_str = r#"
            [obfuscation]
            max_radius_deg = 0.2
            seed = 99

            [feed]
            page_size = 5
        "#;
        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.obfuscation.max_radius_deg, 0.2);
        assert_eq!(config.obfuscation.seed, Some(99));
        assert_eq!(config.feed.page_size, 5);

        let out = config.to_toml().unwrap();
        assert!(out.contains("max_radius_deg"));
    }
}
