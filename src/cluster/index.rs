//! Screen-space R-tree used for cluster neighbour search.

use geoveil_types::ScreenPoint;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// A projected point tagged with its position in the input slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProjectedPoint {
    pub index: usize,
    pub position: [f64; 2],
}

impl ProjectedPoint {
    pub fn new(index: usize, screen: ScreenPoint) -> Self {
        Self {
            index,
            position: screen.into(),
        }
    }
}

impl RTreeObject for ProjectedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for ProjectedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Bulk-loaded index over one projection of the point set.
pub(crate) struct ScreenIndex {
    tree: RTree<ProjectedPoint>,
}

impl ScreenIndex {
    pub fn build(points: Vec<ProjectedPoint>) -> Self {
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Indices of all points within `radius` pixels of `center`, inclusive.
    pub fn within(&self, center: [f64; 2], radius: f64) -> impl Iterator<Item = usize> + '_ {
        self.tree
            .locate_within_distance(center, radius * radius)
            .map(|p| p.index)
    }
}

/// Union-find over input indices. The representative of a set is always its
/// smallest index, which keeps cluster ordering deterministic.
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    pub fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high] = low;
        }
    }
}
