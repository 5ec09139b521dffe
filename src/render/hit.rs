//! Marker hit-testing with an R-tree.
//!
//! Click and hover events arrive as screen coordinates; [`MarkerIndex`]
//! maps them back to the marker under the pointer. Rebuilt alongside the
//! scene on every pass.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use super::scene::Scene;
use crate::core::PlanarPoint;

/// An indexed marker for R-tree storage.
#[derive(Clone, Debug)]
struct IndexedMarker {
    /// Marker center in screen space.
    position: [f64; 2],
    /// Marker circle radius in pixels.
    radius: f64,
    /// Index of this marker in the scene's marker list.
    index: usize,
}

impl RTreeObject for IndexedMarker {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedMarker {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over a scene's markers.
#[derive(Clone)]
pub struct MarkerIndex {
    tree: RTree<IndexedMarker>,
}

impl MarkerIndex {
    /// Index every marker of a scene.
    pub fn build(scene: &Scene) -> Self {
        let indexed: Vec<IndexedMarker> = scene
            .markers
            .iter()
            .enumerate()
            .filter(|(_, marker)| marker.position.is_finite())
            .map(|(index, marker)| IndexedMarker {
                position: [marker.position.x, marker.position.y],
                radius: marker.style.radius,
                index,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(indexed),
        }
    }

    /// An index with no markers.
    pub fn empty() -> Self {
        Self { tree: RTree::new() }
    }

    /// Number of indexed markers.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The marker under a screen point, if any.
    ///
    /// A marker is hit when the point falls within its circle radius plus
    /// `slop` pixels. Among overlapping markers the nearest center wins.
    /// Non-finite points hit nothing.
    pub fn pick(&self, at: PlanarPoint, slop: f64) -> Option<usize> {
        if !at.is_finite() {
            return None;
        }
        let query = [at.x, at.y];
        self.tree
            .nearest_neighbor_iter(&query)
            .find(|marker| {
                let reach = marker.radius + slop;
                marker.distance_2(&query) <= reach * reach
            })
            .map(|marker| marker.index)
    }
}

impl Default for MarkerIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for MarkerIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerIndex")
            .field("size", &self.tree.size())
            .finish()
    }
}
