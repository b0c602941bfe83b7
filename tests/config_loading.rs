use geoveil::config::ObfuscationMode;
use geoveil::viewport::{SortKey, SortOrder};
use geoveil::{Config, GeoveilError, UserMapBuilder};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_json_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("map.json");
    fs::write(
        &path,
        r#"{
            "obfuscation": { "max_radius_deg": 0.05, "mode": "grid_snap" },
            "clustering": { "max_cluster_radius_px": 60, "disable_clustering_at_zoom": 15 },
            "feed": { "page_size": 25, "sort": { "key": "subordinates", "order": "ascending" } }
        }"#,
    )
    .unwrap();

    let config = Config::load(&path).expect("Failed to load config");
    assert_eq!(config.obfuscation.max_radius_deg, 0.05);
    assert_eq!(config.obfuscation.mode, ObfuscationMode::GridSnap);
    assert_eq!(config.clustering.max_cluster_radius_px, 60.0);
    assert_eq!(config.clustering.disable_clustering_at_zoom, Some(15.0));
    assert_eq!(config.feed.page_size, 25);
    assert_eq!(config.feed.sort.key, SortKey::Subordinates);
    assert_eq!(config.feed.sort.order, SortOrder::Ascending);
}

#[test]
fn test_load_rejects_invalid_json_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{ "feed": { "page_size": 0 } }"#).unwrap();

    assert!(matches!(Config::load(&path), Err(GeoveilError::Json(_))));
}

#[test]
fn test_saved_config_builds_same_map() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.json");

    let config = Config::default().with_seed(1234).with_page_size(5);
    fs::write(&path, config.to_json().unwrap()).unwrap();

    let map = UserMapBuilder::new().config_path(&path).build().unwrap();
    assert_eq!(map.engine().seed(), 1234);
    assert_eq!(map.page().page_size, 5);
}

#[cfg(feature = "toml")]
#[test]
fn test_load_toml_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map.toml");
    fs::write(
        &path,
        r#"
[obfuscation]
max_radius_deg = 0.08
seed = 77

[feed]
page_size = 5
page_size_options = [5, 20]

[feed.sort]
key = "full_name"
order = "ascending"
"#,
    )
    .unwrap();

    let config = Config::load(&path).expect("Failed to load TOML config");
    assert_eq!(config.obfuscation.seed, Some(77));
    assert_eq!(config.feed.page_size_options, vec![5, 20]);
    assert_eq!(config.feed.sort.key, SortKey::FullName);
}

#[cfg(not(feature = "toml"))]
#[test]
fn test_toml_without_feature_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map.toml");
    fs::write(&path, "[feed]\npage_size = 5\n").unwrap();

    assert!(matches!(Config::load(&path), Err(GeoveilError::InvalidConfig(_))));
}
