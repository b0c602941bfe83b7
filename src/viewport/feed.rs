//! Bounds-filtered, sorted and paginated table of visible users.

use super::tracker::BoundsReceiver;
use crate::config::FeedConfig;
use geoveil_types::{BoundingBox, ObfuscatedLocation};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// Indices of the points inside `bounds`, in input order.
///
/// No bounds means the map has not reported a viewport yet, which yields an
/// empty set rather than every point.
///
/// # Examples
///
/// ```
/// use geoveil::viewport::filter_by_bounds;
/// use geoveil_types::{BoundingBox, LocationRecord, ObfuscatedLocation};
/// use geo::Point;
///
/// let a = ObfuscatedLocation::new(&LocationRecord::new("a", 0.0, 0.0), Point::new(51.39, 35.70));
/// let b = ObfuscatedLocation::new(&LocationRecord::new("b", 0.0, 0.0), Point::new(-3.0, 40.0));
/// let points = [a, b];
///
/// let bbox = BoundingBox::new(36.0, 35.0, 52.0, 51.0);
/// assert_eq!(filter_by_bounds(&points, Some(&bbox)), vec![0]);
/// assert!(filter_by_bounds(&points, None).is_empty());
/// ```
pub fn filter_by_bounds(points: &[ObfuscatedLocation], bounds: Option<&BoundingBox>) -> Vec<usize> {
    let Some(bounds) = bounds else {
        return Vec::new();
    };

    points
        .iter()
        .enumerate()
        .filter(|(_, p)| bounds.contains_point(&p.point()))
        .map(|(i, _)| i)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Capital,
    Subordinates,
    JoinDate,
    FullName,
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Column and direction for the visible-users table. Defaults to capital,
/// highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortSpec {
    #[serde(default)]
    pub key: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    fn compare(&self, a: &ObfuscatedLocation, b: &ObfuscatedLocation) -> Ordering {
        let ord = match self.key {
            SortKey::Capital => a.capital.total_cmp(&b.capital),
            SortKey::Subordinates => a.subordinates.cmp(&b.subordinates),
            SortKey::JoinDate => a.join_date.cmp(&b.join_date),
            SortKey::FullName => a.full_name.cmp(&b.full_name),
            SortKey::Id => a.id.cmp(&b.id),
        };
        match self.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

/// Lifecycle of a [`ViewportFeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// Neither bounds nor a dataset have arrived.
    Uninitialized,
    /// The visible set is being rebuilt.
    Computing,
    /// The visible set matches the current bounds and dataset.
    Ready,
}

/// One page of the visible-users table.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage<'a> {
    pub rows: Vec<&'a ObfuscatedLocation>,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total_visible: usize,
    pub total_all: usize,
}

/// Totals for the "N of M visible" indicator and the table footer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct VisibleSummary {
    pub total_visible: usize,
    pub total_all: usize,
    pub capital: f64,
    pub subordinates: u64,
}

/// Sorted, paginated view of the obfuscated locations inside the viewport.
///
/// The visible set is rebuilt synchronously on every bounds or dataset
/// change. The current page goes back to 0 whenever the bounds change or the
/// set of visible users changes, so the table never points past its end
/// after the map moves.
#[derive(Debug)]
pub struct ViewportFeed {
    dataset: Arc<[ObfuscatedLocation]>,
    bounds: Option<BoundingBox>,
    sort: SortSpec,
    /// Visible indices in display order.
    visible: Vec<usize>,
    /// Ids of the visible set, sorted, for membership comparison.
    membership: Vec<String>,
    page: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
    state: FeedState,
    generation: u64,
}

impl ViewportFeed {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            dataset: Arc::from(Vec::new()),
            bounds: None,
            sort: config.sort,
            visible: Vec::new(),
            membership: Vec::new(),
            page: 0,
            page_size: config.page_size.max(1),
            page_size_options: config.page_size_options.clone(),
            state: FeedState::Uninitialized,
            generation: 0,
        }
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    /// Number of completed recomputations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref()
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Replace the dataset. Keeps the page unless visible membership changed.
    pub fn set_dataset(&mut self, dataset: Arc<[ObfuscatedLocation]>) {
        if Arc::ptr_eq(&self.dataset, &dataset) && self.state != FeedState::Uninitialized {
            return;
        }
        self.dataset = dataset;
        if self.recompute() {
            self.page = 0;
        } else {
            self.clamp_page();
        }
    }

    /// Replace the bounds. Any distinct value resets to page 0.
    pub fn set_bounds(&mut self, bounds: Option<BoundingBox>) {
        if self.bounds == bounds && self.state != FeedState::Uninitialized {
            return;
        }
        self.bounds = bounds;
        self.recompute();
        self.page = 0;
    }

    /// Pull the newest bounds from a tracker subscription, if any arrived.
    pub fn sync(&mut self, receiver: &mut BoundsReceiver) -> bool {
        match receiver.take_changed() {
            Some(bounds) => {
                self.set_bounds(Some(bounds));
                true
            }
            None => false,
        }
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        if self.sort == sort {
            return;
        }
        self.sort = sort;
        self.sort_visible();
    }

    /// Jump to `page`, clamped to the last page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
    }

    /// Change rows per page and go back to the first page. Zero is ignored.
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size == 0 {
            log::warn!("Ignoring page size of zero");
            return;
        }
        self.page_size = page_size;
        self.page = 0;
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible(&self) -> impl Iterator<Item = &ObfuscatedLocation> + '_ {
        self.visible.iter().map(|&i| &self.dataset[i])
    }

    pub fn total_visible(&self) -> usize {
        self.visible.len()
    }

    pub fn total_all(&self) -> usize {
        self.dataset.len()
    }

    pub fn page_count(&self) -> usize {
        self.visible.len().div_ceil(self.page_size)
    }

    pub fn page(&self) -> FeedPage<'_> {
        let start = (self.page * self.page_size).min(self.visible.len());
        let end = (start + self.page_size).min(self.visible.len());

        FeedPage {
            rows: self.visible[start..end]
                .iter()
                .map(|&i| &self.dataset[i])
                .collect(),
            page: self.page,
            page_size: self.page_size,
            page_count: self.page_count(),
            total_visible: self.visible.len(),
            total_all: self.dataset.len(),
        }
    }

    pub fn summary(&self) -> VisibleSummary {
        self.visible().fold(
            VisibleSummary {
                total_all: self.dataset.len(),
                ..VisibleSummary::default()
            },
            |mut acc, loc| {
                acc.total_visible += 1;
                acc.capital += loc.capital;
                acc.subordinates += loc.subordinates;
                acc
            },
        )
    }

    /// Rebuild the visible set. Returns whether its membership changed.
    fn recompute(&mut self) -> bool {
        let previous = self.state;
        self.state = FeedState::Computing;
        log::trace!("Feed {:?} -> {:?}", previous, self.state);

        self.visible = filter_by_bounds(&self.dataset, self.bounds.as_ref());
        self.sort_visible();

        let mut membership: Vec<String> = self
            .visible
            .iter()
            .map(|&i| self.dataset[i].id.clone())
            .collect();
        membership.sort_unstable();
        let changed = membership != self.membership;
        self.membership = membership;

        self.generation += 1;
        self.state = FeedState::Ready;
        log::debug!(
            "Feed recomputed: {} of {} visible (membership changed: {})",
            self.visible.len(),
            self.dataset.len(),
            changed
        );
        changed
    }

    fn sort_visible(&mut self) {
        let dataset = &self.dataset;
        let sort = self.sort;
        self.visible.sort_by(|&a, &b| {
            sort.compare(&dataset[a], &dataset[b])
                .then_with(|| a.cmp(&b))
        });
    }

    fn clamp_page(&mut self) {
        let last = self.page_count().saturating_sub(1);
        self.page = self.page.min(last);
    }
}
