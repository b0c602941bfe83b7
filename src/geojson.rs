//! GeoJSON export of map markers.
//!
//! Only cluster centroids are written, and those are built from obfuscated
//! coordinates, so an export can be handed to any map library without
//! leaking exact positions.

use crate::cluster::Cluster;
use crate::error::Result;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

fn cluster_to_feature(cluster: &Cluster) -> Feature {
    let geom = Geometry::new(Value::Point(vec![cluster.centroid.x(), cluster.centroid.y()]));

    let mut props = JsonObject::new();
    props.insert("memberCount".to_string(), cluster.member_count.into());
    props.insert(
        "kind".to_string(),
        if cluster.is_marker() { "marker" } else { "cluster" }.into(),
    );
    props.insert(
        "tier".to_string(),
        match cluster.tier {
            Some(tier) => tier.as_str().into(),
            None => serde_json::Value::Null,
        },
    );

    Feature {
        bbox: None,
        geometry: Some(geom),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

/// One Point feature per cluster, with `memberCount`, `tier` and `kind`
/// (`"marker"` or `"cluster"`) properties.
pub fn markers_to_geojson(clusters: &[Cluster]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: clusters.iter().map(cluster_to_feature).collect(),
        foreign_members: None,
    }
}

/// [`markers_to_geojson`] serialized to a JSON string.
pub fn markers_to_geojson_string(clusters: &[Cluster]) -> Result<String> {
    Ok(serde_json::to_string(&markers_to_geojson(clusters))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusterTier;
    use geo::Point;

    fn cluster(n: usize, tier: Option<ClusterTier>) -> Cluster {
        Cluster {
            centroid: Point::new(51.4, 35.7),
            members: (0..n).collect(),
            member_count: n,
            tier,
        }
    }

    #[test]
    fn test_marker_and_cluster_features() {
        let collection =
            markers_to_geojson(&[cluster(1, None), cluster(12, Some(ClusterTier::Medium))]);
        assert_eq!(collection.features.len(), 2);

        let marker = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(marker["kind"], "marker");
        assert_eq!(marker["memberCount"], 1);
        assert!(marker["tier"].is_null());

        let bubble = collection.features[1].properties.as_ref().unwrap();
        assert_eq!(bubble["kind"], "cluster");
        assert_eq!(bubble["tier"], "medium");
        assert_eq!(bubble["memberCount"], 12);
    }

    #[test]
    fn test_geometry_is_lng_lat() {
        let collection = markers_to_geojson(&[cluster(1, None)]);
        let geometry = collection.features[0].geometry.as_ref().unwrap();
        assert_eq!(geometry.value, Value::Point(vec![51.4, 35.7]));
    }

    #[test]
    fn test_string_export() {
        let json = markers_to_geojson_string(&[cluster(3, Some(ClusterTier::Small))]).unwrap();
        assert!(json.contains("FeatureCollection"));
        assert!(json.contains("memberCount"));
        assert!(json.contains("small"));
    }

    #[test]
    fn test_empty() {
        assert!(markers_to_geojson(&[]).features.is_empty());
    }
}
