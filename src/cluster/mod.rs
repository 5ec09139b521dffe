//! Spatial clustering of entities into visual markers.
//!
//! Two strategies, selected by zoom level:
//!
//! - **Administrative aggregation** (overview): one cluster per non-empty
//!   department, centered at the arithmetic mean of member coordinates.
//! - **Proximity clustering** (detail): greedy single-pass grouping with a
//!   zoom-adjusted radius, so clusters split into finer groups as the view
//!   zooms in.
//!
//! The mode switch is a hard threshold, not a blend: zoom levels strictly
//! below `zoom_threshold` aggregate by department; at or above it, proximity
//! clustering runs. Crossing the threshold recomputes all clusters and the
//! layout visibly changes — intended behavior, deterministic on both sides
//! of the boundary.
//!
//! Entities with non-finite coordinates are skipped and reported as a
//! data-quality warning; they never abort the pass.

mod department;
mod proximity;

pub use department::aggregate_by_department;
pub use proximity::cluster_by_proximity;

use crate::core::{Entity, EntityKind, GeoPoint, PlanarPoint};
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};

/// Tunable clustering parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Zoom level at which the strategy switches from departmental
    /// aggregation (below) to proximity clustering (at or above).
    pub zoom_threshold: f64,

    /// Proximity radius at zoom 0, in world-plane degrees. The effective
    /// radius shrinks as `base_radius / 2^zoom`.
    pub base_radius: f64,

    /// Floor for the effective radius, preventing clusters from vanishing
    /// to zero width at extreme zoom.
    pub min_radius: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            zoom_threshold: 8.0,
            base_radius: 16.0,
            min_radius: 5e-4,
        }
    }
}

impl ClusterConfig {
    /// Zoom-adjusted proximity radius: `max(base_radius / 2^zoom, min_radius)`.
    #[inline]
    pub fn effective_radius(&self, zoom: f64) -> f64 {
        (self.base_radius / zoom.exp2()).max(self.min_radius)
    }
}

/// A derived grouping of entities rendered as one visual marker.
///
/// Ephemeral: recomputed on every render pass. Every valid entity belongs to
/// exactly one cluster per pass; membership never splits an entity across
/// clusters, though markers may visually overlap on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    /// Screen position under the viewport the pass ran with.
    pub center: PlanarPoint,
    /// Mean of member geographic coordinates.
    pub anchor: GeoPoint,
    /// Member entity ids, in the order they were admitted.
    pub members: Vec<u32>,
    /// Number of member schools.
    pub school_count: usize,
    /// Number of member learning centers.
    pub learning_center_count: usize,
    /// The department this cluster aggregates, when produced by
    /// administrative aggregation. `None` for proximity clusters.
    pub department_id: Option<u32>,
}

impl Cluster {
    /// Number of member entities (always at least one).
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the cluster stands for a single entity.
    #[inline]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

/// Cluster entities under the current viewport, dispatching on zoom.
///
/// Below `config.zoom_threshold` entities aggregate by department; at or
/// above it they cluster by proximity with the zoom-adjusted radius.
pub fn cluster_entities(
    entities: &[Entity],
    viewport: &Viewport,
    config: &ClusterConfig,
) -> Vec<Cluster> {
    if viewport.zoom() < config.zoom_threshold {
        aggregate_by_department(entities, viewport)
    } else {
        cluster_by_proximity(entities, viewport, config.effective_radius(viewport.zoom()))
    }
}

/// Report an entity skipped for having unusable coordinates.
pub(crate) fn warn_invalid_position(entity: &Entity) {
    log::warn!(
        "entity {} ({:?}) has non-finite coordinates, skipping",
        entity.id,
        entity.name
    );
}

/// Count members of each kind.
pub(crate) fn kind_counts<'a, I>(members: I) -> (usize, usize)
where
    I: IntoIterator<Item = &'a Entity>,
{
    let mut schools = 0;
    let mut centers = 0;
    for entity in members {
        match entity.kind {
            EntityKind::School => schools += 1,
            EntityKind::LearningCenter => centers += 1,
        }
    }
    (schools, centers)
}

/// Mean of member geographic coordinates.
pub(crate) fn geo_centroid<'a, I>(members: I) -> GeoPoint
where
    I: IntoIterator<Item = &'a Entity>,
{
    let mut lat = 0.0;
    let mut lng = 0.0;
    let mut n = 0usize;
    for entity in members {
        lat += entity.coordinates.lat;
        lng += entity.coordinates.lng;
        n += 1;
    }
    if n == 0 {
        return GeoPoint::default();
    }
    GeoPoint::new(lat / n as f64, lng / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConnectionKind;

    pub(super) fn entity(id: u32, lat: f64, lng: f64, department_id: u32) -> Entity {
        Entity {
            id,
            name: format!("Escuela {}", id),
            kind: if id % 2 == 0 {
                EntityKind::LearningCenter
            } else {
                EntityKind::School
            },
            coordinates: GeoPoint::new(lat, lng),
            description: String::new(),
            department_id,
            connection_type: ConnectionKind::Fiber,
        }
    }

    #[test]
    fn test_effective_radius_shrinks_with_zoom() {
        let config = ClusterConfig::default();
        assert!(config.effective_radius(8.0) > config.effective_radius(12.0));
        // Floor kicks in at extreme zoom.
        assert_eq!(config.effective_radius(19.0), config.min_radius.max(16.0 / 19f64.exp2()));
        assert!(config.effective_radius(30.0) >= config.min_radius);
    }

    #[test]
    fn test_mode_switch_below_threshold_aggregates() {
        let entities = vec![entity(1, -31.0, -64.0, 1), entity(2, -31.2, -64.2, 2)];
        let config = ClusterConfig::default();

        let viewport = Viewport::new(GeoPoint::new(-31.5, -64.5), config.zoom_threshold - 1.0);
        let clusters = cluster_entities(&entities, &viewport, &config);
        assert!(clusters.iter().all(|c| c.department_id.is_some()));
    }

    #[test]
    fn test_mode_switch_at_threshold_is_proximity() {
        // Exactly at the threshold the boundary policy picks proximity mode,
        // deterministically.
        let entities = vec![entity(1, -31.0, -64.0, 1), entity(2, -31.2, -64.2, 2)];
        let config = ClusterConfig::default();

        let viewport = Viewport::new(GeoPoint::new(-31.5, -64.5), config.zoom_threshold);
        let clusters = cluster_entities(&entities, &viewport, &config);
        assert!(clusters.iter().all(|c| c.department_id.is_none()));
    }

    #[test]
    fn test_empty_input_yields_no_clusters() {
        let config = ClusterConfig::default();
        let viewport = Viewport::default();
        assert!(cluster_entities(&[], &viewport, &config).is_empty());
    }
}
