//! Screen-space clustering of obfuscated locations.
//!
//! Points are projected through the host's [`MapAdapter`]; any two points no
//! more than the merge radius apart (in pixels, at the current zoom) end up in
//! the same cluster, transitively. The output is a partition of the input:
//! every point appears in exactly one cluster.
//!
//! Neighbour lookups go through a per-call R-tree over the projected points,
//! so a full recluster on every zoom-end stays cheap for a few thousand users.
//!
//! ```rust
//! use geoveil::adapter::WebMercatorAdapter;
//! use geoveil::cluster::ClusterAggregator;
//! use geoveil::config::ClusterConfig;
//! use geo::Point;
//! use geoveil_types::{LocationRecord, ObfuscatedLocation};
//!
//! let points: Vec<_> = (0..3)
//!     .map(|i| {
//!         let r = LocationRecord::new(format!("u{i}"), 35.7, 51.4);
//!         ObfuscatedLocation::new(&r, Point::new(51.4 + i as f64 * 0.001, 35.7))
//!     })
//!     .collect();
//!
//! let aggregator = ClusterAggregator::new(ClusterConfig::default());
//! let clusters = aggregator.cluster(&points, &WebMercatorAdapter::new(5.0));
//! assert_eq!(clusters.len(), 1);
//! assert_eq!(clusters[0].member_count, 3);
//! ```

mod index;
mod tier;

pub use tier::{ClusterTier, TierBand, TierStyle, TierTable};

use crate::adapter::MapAdapter;
use crate::config::ClusterConfig;
use geo::Point;
use geoveil_types::ObfuscatedLocation;
use index::{DisjointSet, ProjectedPoint, ScreenIndex};
use rustc_hash::FxHashMap;

/// A group of nearby obfuscated locations drawn as one map symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Mean of the members' obfuscated coordinates.
    pub centroid: Point,
    /// Indices into the clustered slice, ascending.
    pub members: Vec<usize>,
    pub member_count: usize,
    /// `None` for a single-member cluster, which is drawn as a plain marker.
    pub tier: Option<ClusterTier>,
}

impl Cluster {
    fn from_members(points: &[ObfuscatedLocation], members: Vec<usize>, tiers: &TierTable) -> Self {
        let n = members.len();
        let (sum_lng, sum_lat) = members.iter().fold((0.0, 0.0), |(x, y), &i| {
            (x + points[i].obf_lng, y + points[i].obf_lat)
        });

        Self {
            centroid: Point::new(sum_lng / n as f64, sum_lat / n as f64),
            member_count: n,
            tier: tiers.classify(n),
            members,
        }
    }

    /// Single-member clusters are plain markers, never bubbles.
    #[inline]
    pub fn is_marker(&self) -> bool {
        self.member_count == 1
    }

    pub fn style<'a>(&self, tiers: &'a TierTable) -> Option<&'a TierStyle> {
        self.tier.and_then(|tier| tiers.style(tier))
    }

    /// Borrow the member locations from the slice that was clustered.
    pub fn member_locations<'a>(
        &'a self,
        points: &'a [ObfuscatedLocation],
    ) -> impl Iterator<Item = &'a ObfuscatedLocation> + 'a {
        self.members.iter().map(move |&i| &points[i])
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClusterAggregator {
    config: ClusterConfig,
}

impl ClusterAggregator {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn tiers(&self) -> &TierTable {
        &self.config.tiers
    }

    /// Cluster at the adapter's zoom with the configured radius policy.
    pub fn cluster(&self, points: &[ObfuscatedLocation], adapter: &dyn MapAdapter) -> Vec<Cluster> {
        match self.config.radius_for_zoom(adapter.zoom()) {
            Some(radius) => self.cluster_with_radius(points, adapter, radius),
            None => self.singletons(points),
        }
    }

    /// Cluster with an explicit merge radius in pixels.
    ///
    /// Clusters are ordered by their smallest member index and members are
    /// ascending, so the same input and zoom always give the same output.
    pub fn cluster_with_radius(
        &self,
        points: &[ObfuscatedLocation],
        adapter: &dyn MapAdapter,
        radius_px: f64,
    ) -> Vec<Cluster> {
        if points.is_empty() {
            return Vec::new();
        }

        let projected: Vec<ProjectedPoint> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, adapter.project(&p.point())))
            .filter(|(_, screen)| screen.is_finite())
            .map(|(i, screen)| ProjectedPoint::new(i, screen))
            .collect();

        if projected.len() < points.len() {
            log::warn!(
                "{} points projected to non-finite screen positions; drawing them unclustered",
                points.len() - projected.len()
            );
        }

        let mut sets = DisjointSet::new(points.len());
        if radius_px.is_finite() && radius_px >= 0.0 {
            let index = ScreenIndex::build(projected.clone());
            for p in &projected {
                for neighbour in index.within(p.position, radius_px) {
                    if neighbour > p.index {
                        sets.union(p.index, neighbour);
                    }
                }
            }
        } else {
            log::warn!("Ignoring invalid cluster radius {}", radius_px);
        }

        let mut groups: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        let mut roots = Vec::new();
        for i in 0..points.len() {
            let root = sets.find(i);
            groups
                .entry(root)
                .or_insert_with(|| {
                    roots.push(root);
                    Vec::new()
                })
                .push(i);
        }

        let clusters: Vec<Cluster> = roots
            .into_iter()
            .filter_map(|root| groups.remove(&root))
            .map(|members| Cluster::from_members(points, members, &self.config.tiers))
            .collect();

        log::debug!(
            "Clustered {} points into {} groups at zoom {} (radius {}px)",
            points.len(),
            clusters.len(),
            adapter.zoom(),
            radius_px
        );

        clusters
    }

    fn singletons(&self, points: &[ObfuscatedLocation]) -> Vec<Cluster> {
        (0..points.len())
            .map(|i| Cluster::from_members(points, vec![i], &self.config.tiers))
            .collect()
    }
}
