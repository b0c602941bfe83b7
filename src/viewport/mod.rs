//! Viewport tracking and the bounds-filtered user table.
//!
//! The map surface reports its visible rectangle to a [`BoundsTracker`];
//! consumers hold a [`BoundsReceiver`] and pull the newest bounds when they
//! are ready. [`ViewportFeed`] turns those bounds plus the obfuscated
//! dataset into a sorted, paginated table.

mod feed;
mod mailbox;
mod tracker;

pub use feed::{
    FeedPage, FeedState, SortKey, SortOrder, SortSpec, ViewportFeed, VisibleSummary,
    filter_by_bounds,
};
pub use mailbox::{LatestReceiver, LatestSender, latest_slot};
pub use tracker::{BoundsReceiver, BoundsTracker, TrackerStats, ViewChange, ViewChangeKind};
