//! Scene construction: turning derived state into drawable primitives.
//!
//! A [`Scene`] is a complete description of one render pass — boundary
//! outlines, contour overlays, and markers with resolved styles and tooltip
//! text. It is rebuilt from scratch every pass and handed to a
//! [`Renderer`](super::Renderer) whole; nothing in it is mutated in place.

use crate::cluster::Cluster;
use crate::contour::Contour;
use crate::core::{Department, Entity, EntityKind, PlanarPoint};
use crate::density::DensityGrid;
use crate::io::DepartmentBoundary;
use crate::viewport::Viewport;
use std::collections::HashMap;

/// Fill color for aggregated (department or proximity) cluster markers.
pub const CLUSTER_FILL: &str = "#2196f3";
/// Fill color for individual school markers.
pub const SCHOOL_FILL: &str = "#ff6b6b";
/// Fill color for individual learning-center markers.
pub const LEARNING_CENTER_FILL: &str = "#4ecdc4";
/// Stroke color for all markers.
pub const MARKER_STROKE: &str = "#fff";
/// Stroke color for department boundary outlines.
pub const BOUNDARY_STROKE: &str = "#2196f3";
/// Fill color for department boundary polygons.
pub const BOUNDARY_FILL: &str = "#e3f2fd";

/// Resolved visual style of one marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    /// Circle radius in pixels.
    pub radius: f64,
    /// Fill color (CSS hex).
    pub fill: &'static str,
    /// Stroke color (CSS hex).
    pub stroke: &'static str,
    /// Stroke width in pixels.
    pub stroke_weight: f64,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
}

/// What a marker stands for, used for hit-testing and hover identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerTarget {
    /// A single entity, by id.
    Entity(u32),
    /// A department aggregation, by department id.
    Department(u32),
    /// A proximity cluster, by index into the cluster list of the pass.
    Group(usize),
}

/// One drawable circle marker.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    /// Screen position.
    pub position: PlanarPoint,
    /// Resolved style.
    pub style: MarkerStyle,
    /// Tooltip text, newline-separated lines.
    pub tooltip: String,
    /// What clicking or hovering this marker refers to.
    pub target: MarkerTarget,
    /// Index of the source cluster in the pass's cluster list.
    pub cluster_index: usize,
}

/// One contour ring projected to screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourOverlay {
    /// Iso-value of the source contour.
    pub level: f64,
    /// Level normalized by the grid maximum, for opacity ramps.
    pub intensity: f64,
    /// Ring vertices in screen space.
    pub points: Vec<PlanarPoint>,
    /// Whether the ring closes on itself.
    pub closed: bool,
}

/// One department outline projected to screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryOutline {
    /// Department name.
    pub name: String,
    /// Polygon rings in screen space.
    pub rings: Vec<Vec<PlanarPoint>>,
}

/// A complete render pass: everything the renderer needs, nothing it must
/// look up elsewhere.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Department outlines, drawn underneath everything.
    pub boundaries: Vec<BoundaryOutline>,
    /// Density contour overlays, drawn above boundaries.
    pub overlays: Vec<ContourOverlay>,
    /// Cluster/entity markers, drawn on top.
    pub markers: Vec<Marker>,
}

impl Scene {
    fn empty() -> Self {
        Self::default()
    }
}

/// Everything a scene is built from.
pub struct SceneInputs<'a> {
    /// Entities of the pass (already filtered).
    pub entities: &'a [Entity],
    /// Department reference list, for naming.
    pub departments: &'a [Department],
    /// Clusters of the pass.
    pub clusters: &'a [Cluster],
    /// Contours of the pass (empty when the overlay is off).
    pub contours: &'a [Contour],
    /// The density grid the contours were extracted from.
    pub density: Option<&'a DensityGrid>,
    /// Boundary outlines (empty when the asset failed to load).
    pub boundaries: &'a [DepartmentBoundary],
    /// Currently selected entity.
    pub selection: Option<u32>,
    /// Currently hovered marker.
    pub hover: Option<MarkerTarget>,
}

/// Build the scene for one render pass.
pub fn build_scene(inputs: &SceneInputs<'_>, viewport: &Viewport) -> Scene {
    let mut scene = Scene::empty();

    for boundary in inputs.boundaries {
        scene.boundaries.push(BoundaryOutline {
            name: boundary.name.clone(),
            rings: boundary
                .rings
                .iter()
                .map(|ring| ring.iter().map(|&p| viewport.project_raw(p)).collect())
                .collect(),
        });
    }

    if let Some(grid) = inputs.density {
        let max = grid.max_value();
        for contour in inputs.contours {
            let intensity = if max > 0.0 { contour.level / max } else { 0.0 };
            for ring in &contour.rings {
                scene.overlays.push(ContourOverlay {
                    level: contour.level,
                    intensity,
                    points: ring
                        .to_geo(grid)
                        .iter()
                        .map(|&p| viewport.project_raw(p))
                        .collect(),
                    closed: ring.closed,
                });
            }
        }
    }

    let by_id: HashMap<u32, &Entity> = inputs.entities.iter().map(|e| (e.id, e)).collect();
    let department_names: HashMap<u32, &str> = inputs
        .departments
        .iter()
        .map(|d| (d.id, d.name.as_str()))
        .collect();

    for (index, cluster) in inputs.clusters.iter().enumerate() {
        let marker = if let Some(department_id) = cluster.department_id {
            department_marker(cluster, index, department_id, &department_names, inputs.hover)
        } else if cluster.is_singleton() {
            match by_id.get(&cluster.members[0]) {
                Some(&entity) => {
                    entity_marker(cluster, index, entity, &department_names, inputs)
                }
                // Cluster member missing from the entity list; nothing to draw.
                None => continue,
            }
        } else {
            group_marker(cluster, index, inputs.hover)
        };
        scene.markers.push(marker);
    }

    scene
}

/// Marker radius for an aggregated cluster of `n` entities.
fn aggregate_radius(n: usize) -> f64 {
    ((n as f64).sqrt() * 4.0).clamp(12.0, 25.0)
}

fn department_marker(
    cluster: &Cluster,
    index: usize,
    department_id: u32,
    department_names: &HashMap<u32, &str>,
    hover: Option<MarkerTarget>,
) -> Marker {
    let target = MarkerTarget::Department(department_id);
    let name = department_names
        .get(&department_id)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Departamento {}", department_id));
    Marker {
        position: cluster.center,
        style: MarkerStyle {
            radius: aggregate_radius(cluster.len()),
            fill: CLUSTER_FILL,
            stroke: MARKER_STROKE,
            stroke_weight: 2.0,
            fill_opacity: if hover == Some(target) { 0.9 } else { 0.7 },
        },
        tooltip: format!(
            "{}\n{} Escuelas\n{} Centros de Aprendizaje",
            name, cluster.school_count, cluster.learning_center_count
        ),
        target,
        cluster_index: index,
    }
}

fn group_marker(cluster: &Cluster, index: usize, hover: Option<MarkerTarget>) -> Marker {
    let target = MarkerTarget::Group(index);
    Marker {
        position: cluster.center,
        style: MarkerStyle {
            radius: aggregate_radius(cluster.len()),
            fill: CLUSTER_FILL,
            stroke: MARKER_STROKE,
            stroke_weight: 2.0,
            fill_opacity: if hover == Some(target) { 0.9 } else { 0.7 },
        },
        tooltip: format!(
            "{} instituciones\n{} Escuelas\n{} Centros de Aprendizaje",
            cluster.len(),
            cluster.school_count,
            cluster.learning_center_count
        ),
        target,
        cluster_index: index,
    }
}

fn entity_marker(
    cluster: &Cluster,
    index: usize,
    entity: &Entity,
    department_names: &HashMap<u32, &str>,
    inputs: &SceneInputs<'_>,
) -> Marker {
    let target = MarkerTarget::Entity(entity.id);
    let hovered = inputs.hover == Some(target);
    let highlighted = hovered || inputs.selection == Some(entity.id);
    let department = department_names
        .get(&entity.department_id)
        .copied()
        .unwrap_or("");
    Marker {
        position: cluster.center,
        style: MarkerStyle {
            radius: if highlighted { 8.0 } else { 6.0 },
            fill: match entity.kind {
                EntityKind::School => SCHOOL_FILL,
                EntityKind::LearningCenter => LEARNING_CENTER_FILL,
            },
            stroke: MARKER_STROKE,
            stroke_weight: 1.0,
            fill_opacity: if hovered { 1.0 } else { 0.8 },
        },
        tooltip: format!(
            "{}\n{}\n{}\nConexión: {}",
            entity.name,
            entity.kind.label(),
            department,
            entity.connection_type.label()
        ),
        target,
        cluster_index: index,
    }
}
