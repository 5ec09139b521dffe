//! End-to-end tests of the map engine: catalog in, scene out.
//!
//! These drive the public API the way an interactive shell would — load a
//! wire-format catalog, move the viewport, toggle the overlay — and check
//! the derived state against the engine's documented guarantees.

use aula_map::cluster::cluster_by_proximity;
use aula_map::contour::extract;
use aula_map::io::{boundaries_from_json, departments_from_json, entities_from_json};
use aula_map::{
    DensityConfig, DensityGrid, FilterCriteria, GeoBounds, GeoPoint, MapConfig, MapView, Viewport,
};
use approx::assert_relative_eq;
use std::collections::BTreeSet;

const ENTITIES: &str = r#"[
    {
        "id": 1,
        "name": "Escuela Primaria José de San Martín",
        "type": "SCHOOL",
        "coordinates": { "lat": -31.4201, "lng": -64.1888 },
        "description": "Escuela primaria pública en el centro de Córdoba",
        "departmentId": 1,
        "connectionType": "Fibra Optica"
    },
    {
        "id": 2,
        "name": "Colegio Nacional de Monserrat",
        "type": "SCHOOL",
        "coordinates": { "lat": -31.4180, "lng": -64.1850 },
        "description": "Colegio preuniversitario dependiente de la UNC",
        "departmentId": 1,
        "connectionType": "Fibra Optica"
    },
    {
        "id": 3,
        "name": "Espacio ABC Güemes",
        "type": "LEARNING_CENTER",
        "coordinates": { "lat": -31.4290, "lng": -64.1945 },
        "description": "Centro de aprendizaje barrial",
        "departmentId": 1,
        "connectionType": "Starlink"
    },
    {
        "id": 7,
        "name": "Escuela Primaria Mariano Moreno",
        "type": "SCHOOL",
        "coordinates": { "lat": -31.2510, "lng": -64.3850 },
        "description": "Escuela primaria rural",
        "departmentId": 7,
        "connectionType": "Starlink"
    },
    {
        "id": 8,
        "name": "Espacio ABC Villa Allende",
        "type": "LEARNING_CENTER",
        "coordinates": { "lat": -31.2945, "lng": -64.2950 },
        "description": "Centro comunitario",
        "departmentId": 7,
        "connectionType": "Proveedor externo"
    }
]"#;

const DEPARTMENTS: &str = r#"[
    { "id": 1, "name": "Capital" },
    { "id": 7, "name": "Colón" }
]"#;

const BOUNDARIES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": { "departamento": "Capital" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-64.35, -31.55], [-64.05, -31.55],
                    [-64.05, -31.30], [-64.35, -31.30],
                    [-64.35, -31.55]
                ]]
            }
        }
    ]
}"#;

fn loaded_view() -> MapView {
    let mut view = MapView::new(MapConfig::default(), 800.0, 600.0).unwrap();
    view.load_catalog(
        entities_from_json(ENTITIES).unwrap(),
        departments_from_json(DEPARTMENTS).unwrap(),
    );
    view
}

#[test]
fn overview_groups_by_department_and_partitions_exactly() {
    let view = loaded_view();

    // One cluster per non-empty department.
    let departments: Vec<u32> = view
        .clusters()
        .iter()
        .filter_map(|c| c.department_id)
        .collect();
    assert_eq!(departments, vec![1, 7]);

    // Union of members is the input set, each entity exactly once.
    let members: BTreeSet<u32> = view
        .clusters()
        .iter()
        .flat_map(|c| c.members.clone())
        .collect();
    assert_eq!(members, BTreeSet::from([1, 2, 3, 7, 8]));
    let total: usize = view.clusters().iter().map(|c| c.len()).sum();
    assert_eq!(total, 5);

    // Marker tooltips carry the department names and per-kind counts.
    let capital = &view.scene().markers[0];
    assert_eq!(capital.tooltip, "Capital\n2 Escuelas\n1 Centros de Aprendizaje");
}

#[test]
fn spec_scenario_same_department_three_entities() {
    // Administrative mode groups all three into one cluster at their mean;
    // proximity mode with a radius excluding the far point gives two.
    let json = r#"[
        { "id": 1, "name": "A", "type": "SCHOOL",
          "coordinates": { "lat": -31.0, "lng": -64.0 },
          "departmentId": 4, "connectionType": "Starlink" },
        { "id": 2, "name": "B", "type": "SCHOOL",
          "coordinates": { "lat": -31.01, "lng": -64.01 },
          "departmentId": 4, "connectionType": "Starlink" },
        { "id": 3, "name": "C", "type": "SCHOOL",
          "coordinates": { "lat": -31.5, "lng": -64.9 },
          "departmentId": 4, "connectionType": "Starlink" }
    ]"#;
    let entities = entities_from_json(json).unwrap();

    let mut view = MapView::new(MapConfig::default(), 800.0, 600.0).unwrap();
    view.load_catalog(entities.clone(), Vec::new());

    assert_eq!(view.clusters().len(), 1);
    let anchor = view.clusters()[0].anchor;
    assert_relative_eq!(anchor.lat, (-31.0 + -31.01 + -31.5) / 3.0, max_relative = 1e-12);
    assert_relative_eq!(anchor.lng, (-64.0 + -64.01 + -64.9) / 3.0, max_relative = 1e-12);

    let clusters = cluster_by_proximity(&entities, &Viewport::default(), 0.05);
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].members, vec![1, 2]);
    assert_eq!(clusters[1].members, vec![3]);
}

#[test]
fn spec_scenario_single_entity_density_and_contours() {
    let bounds = GeoBounds::new(GeoPoint::new(-32.0, -65.0), GeoPoint::new(-31.0, -64.0));
    let config = DensityConfig::default();
    // Coordinates off the cell lattice, so exactly one cell holds the
    // strict maximum.
    let entities = entities_from_json(
        r#"[{ "id": 1, "name": "Sola", "type": "SCHOOL",
              "coordinates": { "lat": -31.497, "lng": -64.493 },
              "departmentId": 1, "connectionType": "Fibra Optica" }]"#,
    )
    .unwrap();

    let grid = DensityGrid::build(&entities, bounds, &config);
    let peak = grid.peak().expect("one local maximum");
    let projected = grid.geo_to_grid(entities[0].coordinates);
    assert_eq!(peak.x, projected.x.floor() as i32);
    assert_eq!(peak.y, projected.y.floor() as i32);

    // Any threshold at or below the maximum yields a contour around the
    // peak cell; above it, nothing.
    let max = grid.max_value();
    for level in [max * 0.25, max * 0.5, max * 0.99] {
        let rings = extract(&grid, level);
        assert!(!rings.is_empty(), "level {} should produce rings", level);
        let center = peak.center();
        assert!(rings.iter().any(|ring| {
            let min_x = ring.points.iter().fold(f64::INFINITY, |m, p| m.min(p.x));
            let max_x = ring.points.iter().fold(f64::NEG_INFINITY, |m, p| m.max(p.x));
            let min_y = ring.points.iter().fold(f64::INFINITY, |m, p| m.min(p.y));
            let max_y = ring.points.iter().fold(f64::NEG_INFINITY, |m, p| m.max(p.y));
            min_x < center.x && center.x < max_x && min_y < center.y && center.y < max_y
        }));
    }
    assert!(extract(&grid, max * 1.01).is_empty());
}

#[test]
fn spec_scenario_empty_catalog() {
    let mut view = MapView::new(MapConfig::default(), 800.0, 600.0).unwrap();
    view.load_catalog(Vec::new(), Vec::new());
    view.set_overlay(true);

    assert!(view.clusters().is_empty());
    assert!(view.density().expect("grid still built").is_zero());
    assert!(view.contours().is_empty());
    assert!(view.scene().markers.is_empty());
}

#[test]
fn zooming_in_refines_clusters_monotonically() {
    let mut view = loaded_view();
    let mut previous_count = 0;
    let mut previous_largest = usize::MAX;

    for zoom in [8.0, 10.0, 12.0, 14.0] {
        view.set_zoom(zoom);
        let count = view.clusters().len();
        let largest = view.clusters().iter().map(|c| c.len()).max().unwrap();

        assert!(count >= previous_count, "cluster count dropped at zoom {}", zoom);
        assert!(largest <= previous_largest, "a cluster grew at zoom {}", zoom);
        previous_count = count;
        previous_largest = largest;
    }
}

#[test]
fn filter_and_selection_flow() {
    let mut view = loaded_view();

    view.set_filter(FilterCriteria {
        connection: Some(aula_map::ConnectionKind::Starlink),
        ..FilterCriteria::default()
    });
    let members: BTreeSet<u32> = view
        .clusters()
        .iter()
        .flat_map(|c| c.members.clone())
        .collect();
    assert_eq!(members, BTreeSet::from([3, 7]));

    // Select an entity at detail zoom by clicking its marker.
    view.set_filter(FilterCriteria::default());
    view.set_zoom(14.0);
    let target = view
        .clusters()
        .iter()
        .find(|c| c.members == vec![7])
        .unwrap()
        .center;
    view.click(target);
    assert_eq!(view.selection(), Some(7));

    let selected = view
        .scene()
        .markers
        .iter()
        .find(|m| m.target == aula_map::render::MarkerTarget::Entity(7))
        .unwrap();
    assert_eq!(selected.style.radius, 8.0);
}

#[test]
fn overlay_follows_viewport_and_filter() {
    let mut view = loaded_view();
    view.set_overlay(true);

    let full_mass = view.density().unwrap().total_mass();
    assert!(full_mass > 0.0);
    assert!(!view.contours().is_empty());

    // Filtering down to one department reduces the accumulated mass.
    view.set_filter(FilterCriteria {
        department_id: Some(7),
        ..FilterCriteria::default()
    });
    let filtered_mass = view.density().unwrap().total_mass();
    assert!(filtered_mass > 0.0);
    assert!(filtered_mass < full_mass);

    // Panning far away from the data empties the grid without error.
    view.set_filter(FilterCriteria::default());
    view.pan(1.0e6, 1.0e6);
    assert!(view.density().unwrap().is_zero());
    assert!(view.contours().is_empty());
}

#[test]
fn contour_rings_project_back_exactly() {
    let mut view = loaded_view();
    view.set_overlay(true);

    let grid = view.density().unwrap();
    for contour in view.contours() {
        for ring in &contour.rings {
            let geo = ring.to_geo(grid);
            for (original, g) in ring.points.iter().zip(&geo) {
                let back = grid.geo_to_grid(*g);
                assert_relative_eq!(back.x, original.x, max_relative = 1e-9);
                assert_relative_eq!(back.y, original.y, max_relative = 1e-9);
            }
        }
    }
}

#[test]
fn boundary_layer_is_optional() {
    let mut view = loaded_view();

    view.set_boundaries(boundaries_from_json(BOUNDARIES).unwrap());
    assert_eq!(view.scene().boundaries.len(), 1);
    assert_eq!(view.scene().boundaries[0].name, "Capital");

    // A failed asset load degrades to a map without outlines; clustering
    // is untouched.
    assert!(boundaries_from_json("{broken").is_err());
    view.set_boundaries(Vec::new());
    assert!(view.scene().boundaries.is_empty());
    assert_eq!(view.clusters().len(), 2);
}

#[test]
fn dirty_catalog_is_sanitized_not_fatal() {
    let mut entities = entities_from_json(
        r#"[{ "id": 1, "name": "Buena", "type": "SCHOOL",
              "coordinates": { "lat": -31.4, "lng": -64.2 },
              "departmentId": 1, "connectionType": "Fibra Optica" }]"#,
    )
    .unwrap();
    // JSON cannot carry NaN, but an upstream source can still hand the
    // engine a poisoned record.
    entities.push(aula_map::Entity {
        id: 2,
        name: "Rota".to_string(),
        kind: aula_map::EntityKind::School,
        coordinates: GeoPoint::new(f64::NAN, -64.2),
        description: String::new(),
        department_id: 1,
        connection_type: aula_map::ConnectionKind::Fiber,
    });

    let mut view = MapView::new(MapConfig::default(), 800.0, 600.0).unwrap();
    view.load_catalog(entities, departments_from_json(DEPARTMENTS).unwrap());

    // The non-finite record is dropped; the rest of the pipeline proceeds.
    assert_eq!(view.clusters().len(), 1);
    assert_eq!(view.clusters()[0].members, vec![1]);
}

#[test]
fn department_dive_lands_in_proximity_mode() {
    let mut view = loaded_view();
    let capital = view.scene().markers[0].clone();

    view.click(capital.position);

    let threshold = view.config().cluster.zoom_threshold;
    assert_eq!(view.viewport().zoom(), threshold + 1.0);
    assert!(view.clusters().iter().all(|c| c.department_id.is_none()));

    // The dived-into department's entities are still all present.
    let members: BTreeSet<u32> = view
        .clusters()
        .iter()
        .flat_map(|c| c.members.clone())
        .collect();
    assert_eq!(members, BTreeSet::from([1, 2, 3, 7, 8]));
}
