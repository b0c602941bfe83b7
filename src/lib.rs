//! Privacy-preserving location pipeline for user-distribution maps.
//!
//! Exact user coordinates are displaced by a bounded random offset before
//! anything is drawn, grouped into screen-space clusters for the current
//! zoom, and filtered to the visible viewport for a sorted, paginated table.
//!
//! ```rust
//! use geoveil::prelude::*;
//! use std::sync::Arc;
//!
//! let mut map = UserMapBuilder::new().seed(42).build()?;
//! map.load_dataset(Arc::from(vec![
//!     LocationRecord::new("a", 35.6892, 51.3890).with_capital(100.0),
//!     LocationRecord::new("b", 40.4168, -3.7038).with_capital(50.0),
//! ]));
//!
//! let adapter = WebMercatorAdapter::new(5.0).with_bounds(BoundingBox::new(36.0, 35.0, 52.0, 51.0));
//! map.mount(&adapter);
//!
//! assert_eq!(map.page().rows.len(), 1);
//! assert_eq!(map.markers(&adapter).len(), 2);
//! # Ok::<(), geoveil::GeoveilError>(())
//! ```

pub mod adapter;
pub mod builder;
pub mod cluster;
pub mod config;
pub mod error;
pub mod map;
pub mod obfuscation;
pub mod validation;
pub mod viewport;

#[cfg(feature = "geojson")]
pub mod geojson;

pub use builder::UserMapBuilder;
pub use config::Config;
pub use error::{GeoveilError, Result};
pub use map::UserMap;

pub use geoveil_types::{BoundingBox, LocationRecord, ObfuscatedLocation, ScreenPoint};

pub use adapter::{MapAdapter, WebMercatorAdapter};
pub use cluster::{Cluster, ClusterAggregator, ClusterTier, TierTable};
pub use obfuscation::{Obfuscated, ObfuscationEngine, Rejection};
pub use viewport::{BoundsTracker, FeedPage, SortKey, SortOrder, SortSpec, ViewportFeed};

#[cfg(feature = "geojson")]
pub use crate::geojson::markers_to_geojson;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Config, GeoveilError, Result, UserMap, UserMapBuilder};

    pub use crate::{BoundingBox, LocationRecord, ObfuscatedLocation};

    pub use crate::{MapAdapter, WebMercatorAdapter};

    pub use crate::{Cluster, ClusterTier};

    pub use crate::viewport::{SortKey, SortOrder, SortSpec, ViewChange, ViewChangeKind};

    pub use geo::Point;
}
