//! Latest-viewport tracking for a map surface.

use super::mailbox::{LatestReceiver, LatestSender};
use crate::adapter::MapAdapter;
use crate::validation::validate_bounds;
use geoveil_types::BoundingBox;

pub type BoundsReceiver = LatestReceiver<BoundingBox>;

/// What kind of map interaction produced a bounds notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChangeKind {
    /// The map was laid out and measured for the first time.
    Mount,
    PanEnd,
    ZoomEnd,
    /// An intermediate animation frame during a drag or zoom.
    Frame,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewChange {
    pub kind: ViewChangeKind,
    pub bounds: BoundingBox,
}

impl ViewChange {
    pub fn new(kind: ViewChangeKind, bounds: BoundingBox) -> Self {
        Self { kind, bounds }
    }
}

/// Counters for notifications seen by a [`BoundsTracker`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    pub published: u64,
    pub skipped_frames: u64,
    pub rejected: u64,
}

/// Holds the single most recent viewport reported by the map surface.
///
/// Only gesture-end notifications (mount, pan end, zoom end) are published;
/// animation frames are skipped. Consumers read through a
/// [`BoundsReceiver`], which sees only the newest bounds however many
/// notifications arrived since it last looked. Until the first notification
/// there are no bounds, and consumers must show nothing rather than
/// everything.
///
/// # Examples
///
/// ```
/// use geoveil::viewport::{BoundsTracker, ViewChange, ViewChangeKind};
/// use geoveil_types::BoundingBox;
///
/// let mut tracker = BoundsTracker::new();
/// let mut rx = tracker.subscribe();
/// assert!(rx.latest().is_none());
///
/// let a = BoundingBox::new(36.0, 35.0, 52.0, 51.0);
/// let b = BoundingBox::new(37.0, 35.0, 53.0, 51.0);
/// tracker.on_view_change(ViewChange::new(ViewChangeKind::PanEnd, a));
/// tracker.on_view_change(ViewChange::new(ViewChangeKind::ZoomEnd, b));
/// assert_eq!(rx.take_changed(), Some(b));
/// ```
#[derive(Debug, Default)]
pub struct BoundsTracker {
    sender: LatestSender<BoundingBox>,
    stats: TrackerStats,
}

impl BoundsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> BoundsReceiver {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// The most recent bounds, or `None` before the map has reported any.
    pub fn current(&self) -> Option<BoundingBox> {
        self.sender.latest()
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    /// Handle a notification from the map surface. Returns whether the bounds
    /// were published.
    pub fn on_view_change(&mut self, change: ViewChange) -> bool {
        if change.kind == ViewChangeKind::Frame {
            self.stats.skipped_frames += 1;
            log::trace!("Skipping intermediate frame bounds {:?}", change.bounds);
            return false;
        }

        if let Err(e) = validate_bounds(&change.bounds) {
            self.stats.rejected += 1;
            log::warn!("Ignoring {:?} notification: {}", change.kind, e);
            return false;
        }

        let version = self.sender.publish(change.bounds);
        self.stats.published += 1;
        log::trace!(
            "Published {:?} bounds {:?} (version {})",
            change.kind,
            change.bounds,
            version
        );
        true
    }

    /// Publish the adapter's current bounds as the initial viewport. Does
    /// nothing if the surface has not been measured yet.
    pub fn mount(&mut self, adapter: &dyn MapAdapter) -> bool {
        match adapter.current_bounds() {
            Some(bounds) => self.on_view_change(ViewChange::new(ViewChangeKind::Mount, bounds)),
            None => {
                log::debug!("Map surface has no bounds yet; waiting for the first view change");
                false
            }
        }
    }
}
