//! Builder for [`UserMap`] with a config file or inline overrides.

use crate::config::{Config, ObfuscationMode};
use crate::error::Result;
use crate::map::UserMap;
use crate::viewport::SortSpec;
use geoveil_types::LocationRecord;
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for a configured [`UserMap`], optionally preloaded with a dataset.
#[derive(Debug, Default)]
pub struct UserMapBuilder {
    config_path: Option<PathBuf>,
    config: Config,
    seed: Option<u64>,
    max_radius: Option<f64>,
    mode: Option<ObfuscationMode>,
    cluster_radius: Option<f64>,
    page_size: Option<usize>,
    sort: Option<SortSpec>,
    dataset: Option<Arc<[LocationRecord]>>,
}

impl UserMapBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` as the base that the other setters override.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Load the base configuration from a JSON or TOML file at build time.
    pub fn config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Fix the jitter seed so offsets are reproducible across runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Largest allowed displacement in degrees.
    pub fn max_radius(mut self, degrees: f64) -> Self {
        self.max_radius = Some(degrees);
        self
    }

    pub fn mode(mut self, mode: ObfuscationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Cluster merge radius in screen pixels.
    pub fn cluster_radius(mut self, pixels: f64) -> Self {
        self.cluster_radius = Some(pixels);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Load this dataset as soon as the map is built.
    pub fn dataset(mut self, records: Arc<[LocationRecord]>) -> Self {
        self.dataset = Some(records);
        self
    }

    /// Resolve the configuration and build the map. Fails on an unreadable
    /// config file or an invalid resulting configuration.
    pub fn build(self) -> Result<UserMap> {
        let mut config = match &self.config_path {
            Some(path) => Config::load(path)?,
            None => self.config,
        };

        if let Some(seed) = self.seed {
            config.obfuscation.seed = Some(seed);
        }
        if let Some(degrees) = self.max_radius {
            config.obfuscation.max_radius_deg = degrees;
        }
        if let Some(mode) = self.mode {
            config.obfuscation.mode = mode;
        }
        if let Some(pixels) = self.cluster_radius {
            config.clustering.max_cluster_radius_px = pixels;
        }
        if let Some(page_size) = self.page_size {
            config.feed.page_size = page_size;
        }
        if let Some(sort) = self.sort {
            config.feed.sort = sort;
        }

        let mut map = UserMap::new(config)?;
        if let Some(records) = self.dataset {
            map.load_dataset(records);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoveilError;
    use crate::viewport::{SortKey, SortOrder};
    use std::io::Write;

    #[test]
    fn test_builder_defaults() {
        let map = UserMapBuilder::new().build().unwrap();
        assert_eq!(map.engine().max_radius(), 0.1);
        assert_eq!(map.page().page_size, 10);
    }

    #[test]
    fn test_overrides() {
        let map = UserMapBuilder::new()
            .seed(42)
            .max_radius(0.05)
            .page_size(25)
            .sort(SortSpec::new(SortKey::FullName, SortOrder::Ascending))
            .build()
            .unwrap();

        assert_eq!(map.engine().seed(), 42);
        assert_eq!(map.engine().max_radius(), 0.05);
        assert_eq!(map.page().page_size, 25);
    }

    #[test]
    fn test_preloaded_dataset() {
        let records: Arc<[LocationRecord]> = Arc::from(vec![
            LocationRecord::new("a", 35.7, 51.4),
            LocationRecord::new("b", 35.8, 51.5),
        ]);
        let map = UserMapBuilder::new().dataset(records).build().unwrap();
        assert_eq!(map.locations().len(), 2);
    }

    #[test]
    fn test_config_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"obfuscation": {{"max_radius_deg": 0.02, "seed": 9}}}}"#).unwrap();

        let map = UserMapBuilder::new()
            .config_path(file.path())
            .page_size(5)
            .build()
            .unwrap();
        assert_eq!(map.engine().max_radius(), 0.02);
        assert_eq!(map.engine().seed(), 9);
        assert_eq!(map.page().page_size, 5);
    }

    #[test]
    fn test_invalid_override_fails() {
        let result = UserMapBuilder::new().page_size(0).build();
        assert!(matches!(result, Err(GeoveilError::InvalidConfig(_))));

        let result = UserMapBuilder::new().max_radius(f64::NAN).build();
        assert!(matches!(result, Err(GeoveilError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = UserMapBuilder::new()
            .config_path("/nonexistent/geoveil.json")
            .build();
        assert!(matches!(result, Err(GeoveilError::Io(_))));
    }
}
