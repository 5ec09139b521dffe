//! Administrative aggregation: one cluster per non-empty department.

use std::collections::BTreeMap;

use super::{geo_centroid, kind_counts, warn_invalid_position, Cluster};
use crate::core::Entity;
use crate::viewport::Viewport;

/// Partition entities by their department foreign key.
///
/// Every valid entity lands in exactly one cluster, keyed by
/// `department_id` — including entities whose department id does not appear
/// in the department reference list (the list names departments, it does not
/// define the partition). Each cluster's anchor is the arithmetic mean of
/// member coordinates. Output is ordered by department id, so repeated
/// passes over the same input are identical.
pub fn aggregate_by_department(entities: &[Entity], viewport: &Viewport) -> Vec<Cluster> {
    let mut groups: BTreeMap<u32, Vec<&Entity>> = BTreeMap::new();
    for entity in entities {
        if !entity.has_valid_position() {
            warn_invalid_position(entity);
            continue;
        }
        groups.entry(entity.department_id).or_default().push(entity);
    }

    groups
        .into_iter()
        .map(|(department_id, members)| {
            let anchor = geo_centroid(members.iter().copied());
            let (school_count, learning_center_count) = kind_counts(members.iter().copied());
            Cluster {
                center: viewport.project_raw(anchor),
                anchor,
                members: members.iter().map(|e| e.id).collect(),
                school_count,
                learning_center_count,
                department_id: Some(department_id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::tests::entity;
    use super::*;
    use crate::core::GeoPoint;
    use approx::assert_relative_eq;
    use std::collections::BTreeSet;

    #[test]
    fn test_one_cluster_per_nonempty_department() {
        let entities = vec![
            entity(1, -31.0, -64.0, 1),
            entity(2, -31.1, -64.1, 1),
            entity(3, -31.5, -64.9, 2),
            entity(4, -30.9, -63.8, 5),
        ];
        let clusters = aggregate_by_department(&entities, &Viewport::default());

        assert_eq!(clusters.len(), 3);
        let departments: Vec<u32> = clusters.iter().filter_map(|c| c.department_id).collect();
        assert_eq!(departments, vec![1, 2, 5]);

        // Union of members is the input set, exactly once each.
        let members: BTreeSet<u32> = clusters.iter().flat_map(|c| c.members.clone()).collect();
        assert_eq!(members, BTreeSet::from([1, 2, 3, 4]));
        assert_eq!(clusters.iter().map(Cluster::len).sum::<usize>(), 4);
    }

    #[test]
    fn test_centroid_is_member_mean() {
        let entities = vec![
            entity(1, -31.0, -64.0, 3),
            entity(2, -31.01, -64.01, 3),
            entity(3, -31.5, -64.9, 3),
        ];
        let clusters = aggregate_by_department(&entities, &Viewport::default());

        assert_eq!(clusters.len(), 1);
        let anchor = clusters[0].anchor;
        assert_relative_eq!(anchor.lat, (-31.0 + -31.01 + -31.5) / 3.0, max_relative = 1e-12);
        assert_relative_eq!(anchor.lng, (-64.0 + -64.01 + -64.9) / 3.0, max_relative = 1e-12);
    }

    #[test]
    fn test_unknown_department_id_still_clusters() {
        // Department 999 is in no reference list; the entity must not be lost.
        let entities = vec![entity(1, -31.0, -64.0, 999)];
        let clusters = aggregate_by_department(&entities, &Viewport::default());

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].department_id, Some(999));
        assert_eq!(clusters[0].members, vec![1]);
    }

    #[test]
    fn test_non_finite_positions_skipped() {
        let mut bad = entity(9, f64::NAN, -64.0, 1);
        bad.coordinates = GeoPoint::new(f64::NAN, -64.0);
        let entities = vec![entity(1, -31.0, -64.0, 1), bad];

        let clusters = aggregate_by_department(&entities, &Viewport::default());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members, vec![1]);
    }

    #[test]
    fn test_kind_counts() {
        // Odd ids are schools, even ids learning centers (see test helper).
        let entities = vec![
            entity(1, -31.0, -64.0, 1),
            entity(2, -31.1, -64.1, 1),
            entity(3, -31.2, -64.2, 1),
        ];
        let clusters = aggregate_by_department(&entities, &Viewport::default());
        assert_eq!(clusters[0].school_count, 2);
        assert_eq!(clusters[0].learning_center_count, 1);
    }
}
