//! The user-distribution map: obfuscation, clustering and the viewport table
//! wired together the way a dashboard drives them.

use crate::adapter::MapAdapter;
use crate::cluster::{Cluster, ClusterAggregator, TierTable};
use crate::config::Config;
use crate::error::{GeoveilError, Result};
use crate::obfuscation::{Obfuscated, ObfuscationEngine, Rejection};
use crate::viewport::{
    BoundsReceiver, BoundsTracker, FeedPage, FeedState, SortSpec, TrackerStats, ViewChange,
    ViewportFeed, VisibleSummary,
};
use geoveil_types::{BoundingBox, LocationRecord, ObfuscatedLocation};
use std::sync::Arc;

/// Owns one map's pipeline state.
///
/// Exact coordinates go in through [`load_dataset`](Self::load_dataset) and
/// never come back out: markers, table rows and exports are all built from
/// the obfuscated set.
///
/// ```rust
/// use geoveil::{UserMap, Config};
/// use geoveil::adapter::WebMercatorAdapter;
/// use geoveil::viewport::{ViewChange, ViewChangeKind};
/// use geoveil_types::{BoundingBox, LocationRecord};
/// use std::sync::Arc;
///
/// let mut map = UserMap::new(Config::default().with_seed(7))?;
/// map.load_dataset(Arc::from(vec![
///     LocationRecord::new("a", 35.70, 51.39).with_capital(100.0),
///     LocationRecord::new("b", 40.00, -3.00).with_capital(50.0),
/// ]));
///
/// let tehran = BoundingBox::new(36.5, 35.0, 52.0, 51.0);
/// map.on_view_change(ViewChange::new(ViewChangeKind::PanEnd, tehran));
/// assert_eq!(map.page().rows.len(), 1);
///
/// let markers = map.markers(&WebMercatorAdapter::new(4.0));
/// assert_eq!(markers.len(), 2);
/// # Ok::<(), geoveil::GeoveilError>(())
/// ```
#[derive(Debug)]
pub struct UserMap {
    engine: ObfuscationEngine,
    aggregator: ClusterAggregator,
    tracker: BoundsTracker,
    bounds: BoundsReceiver,
    feed: ViewportFeed,
    records: Arc<[LocationRecord]>,
    obfuscated: Obfuscated,
}

impl UserMap {
    pub fn new(config: Config) -> Result<Self> {
        config.validate().map_err(GeoveilError::InvalidConfig)?;

        let engine = ObfuscationEngine::new(config.obfuscation)?;
        let tracker = BoundsTracker::new();
        let bounds = tracker.subscribe();

        Ok(Self {
            engine,
            aggregator: ClusterAggregator::new(config.clustering),
            tracker,
            bounds,
            feed: ViewportFeed::new(&config.feed),
            records: Arc::from(Vec::new()),
            obfuscated: Obfuscated::empty(),
        })
    }

    /// Replace the dataset. Reloading the same `Arc` reuses the previous
    /// obfuscation, so markers stay put.
    pub fn load_dataset(&mut self, records: Arc<[LocationRecord]>) {
        self.records = records;
        self.refresh();
    }

    /// Re-run the pipeline for the current dataset and bounds.
    pub fn refresh(&mut self) {
        self.obfuscated = self.engine.obfuscate(&self.records);
        self.feed.set_dataset(Arc::clone(self.obfuscated.locations()));
        self.feed.sync(&mut self.bounds);
    }

    /// Drop the memoized obfuscation and recompute it for the current dataset.
    pub fn invalidate(&mut self) {
        self.engine.invalidate();
        self.refresh();
    }

    /// Forward a map-surface notification. Returns whether the table changed
    /// bounds.
    pub fn on_view_change(&mut self, change: ViewChange) -> bool {
        self.tracker.on_view_change(change) && self.feed.sync(&mut self.bounds)
    }

    /// Take the initial viewport from the adapter once the surface is laid
    /// out.
    pub fn mount(&mut self, adapter: &dyn MapAdapter) -> bool {
        self.tracker.mount(adapter) && self.feed.sync(&mut self.bounds)
    }

    /// Clusters for the adapter's current zoom over the whole obfuscated set.
    pub fn markers(&self, adapter: &dyn MapAdapter) -> Vec<Cluster> {
        self.aggregator.cluster(self.obfuscated.locations(), adapter)
    }

    /// Markers as a GeoJSON feature collection.
    #[cfg(feature = "geojson")]
    pub fn markers_geojson(&self, adapter: &dyn MapAdapter) -> geojson::FeatureCollection {
        crate::geojson::markers_to_geojson(&self.markers(adapter))
    }

    pub fn tiers(&self) -> &TierTable {
        self.aggregator.tiers()
    }

    pub fn page(&self) -> FeedPage<'_> {
        self.feed.page()
    }

    pub fn set_page(&mut self, page: usize) {
        self.feed.set_page(page);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.feed.set_page_size(page_size);
    }

    pub fn page_size_options(&self) -> &[usize] {
        self.feed.page_size_options()
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.feed.set_sort(sort);
    }

    pub fn summary(&self) -> VisibleSummary {
        self.feed.summary()
    }

    pub fn feed_state(&self) -> FeedState {
        self.feed.state()
    }

    /// Records left off the map because their coordinates were unusable.
    pub fn rejected(&self) -> &[Rejection] {
        self.obfuscated.rejected()
    }

    pub fn locations(&self) -> &Arc<[ObfuscatedLocation]> {
        self.obfuscated.locations()
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.tracker.current()
    }

    /// An extra subscription for collaborators that track the viewport
    /// themselves.
    pub fn subscribe_bounds(&self) -> BoundsReceiver {
        self.tracker.subscribe()
    }

    pub fn tracker_stats(&self) -> TrackerStats {
        self.tracker.stats()
    }

    pub fn engine(&self) -> &ObfuscationEngine {
        &self.engine
    }
}
