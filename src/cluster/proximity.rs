//! Greedy proximity clustering with a zoom-adjusted radius.

use super::{geo_centroid, kind_counts, warn_invalid_position, Cluster};
use crate::core::{Entity, PlanarPoint};
use crate::viewport::Viewport;

/// Single-pass greedy clustering in the zoom-independent world plane.
///
/// Entities are processed in input order. Each not-yet-assigned entity seeds
/// a new cluster; every later unassigned entity within `radius` of the
/// cluster's running centroid joins it, and the centroid is recomputed
/// incrementally after each admission.
///
/// The first entity in input order claims its neighbors (first-seen-wins).
/// The resulting partition therefore depends on input ordering and is not
/// globally optimal — accepted behavior for a visualization, kept stable
/// and covered by tests rather than replaced with a spatial-sort scheme.
/// For a fixed input order and radius the partition is deterministic.
pub fn cluster_by_proximity(
    entities: &[Entity],
    viewport: &Viewport,
    radius: f64,
) -> Vec<Cluster> {
    let mut valid: Vec<(&Entity, PlanarPoint)> = Vec::with_capacity(entities.len());
    for entity in entities {
        if entity.has_valid_position() {
            valid.push((entity, viewport.world_position(entity.coordinates)));
        } else {
            warn_invalid_position(entity);
        }
    }

    let mut assigned = vec![false; valid.len()];
    let mut clusters = Vec::new();

    for seed in 0..valid.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;

        let mut members = vec![valid[seed].0];
        let mut centroid = valid[seed].1;

        for candidate in (seed + 1)..valid.len() {
            if assigned[candidate] {
                continue;
            }
            if valid[candidate].1.distance(&centroid) <= radius {
                assigned[candidate] = true;
                members.push(valid[candidate].0);
                // Incremental mean: c += (p - c) / n
                let n = members.len() as f64;
                centroid = centroid + (valid[candidate].1 - centroid) * (1.0 / n);
            }
        }

        let anchor = geo_centroid(members.iter().copied());
        let (school_count, learning_center_count) = kind_counts(members.iter().copied());
        clusters.push(Cluster {
            center: viewport.project_raw(anchor),
            anchor,
            members: members.iter().map(|e| e.id).collect(),
            school_count,
            learning_center_count,
            department_id: None,
        });
    }

    clusters
}
