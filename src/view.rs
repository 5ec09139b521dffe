//! Session state and the derived-state pipeline.
//!
//! [`MapView`] owns everything a viewing session holds: the immutable
//! catalog, the boundary asset, filter criteria, selection, hover, overlay
//! toggle, and the viewport. Every input event runs one [`recompute`] pass
//! that rebuilds all derived state — clusters, density grid, contours,
//! scene, hit index — from scratch and swaps it in wholesale. Callers never
//! observe a partially-updated frame, and no rendered element is mutated in
//! place between passes.
//!
//! All computation is synchronous on the caller's thread; each pass is
//! bounded by the catalog size and grid resolution, both of which are
//! configuration inputs.
//!
//! [`recompute`]: MapView::recompute

use crate::cluster::{cluster_entities, Cluster};
use crate::config::{ConfigError, MapConfig};
use crate::contour::{extract_levels, level_steps, Contour};
use crate::core::{Department, Entity, PlanarPoint};
use crate::density::DensityGrid;
use crate::filter::FilterCriteria;
use crate::io::{sanitize_entities, DepartmentBoundary};
use crate::render::{build_scene, MarkerIndex, MarkerTarget, Scene, SceneInputs};
use crate::viewport::Viewport;

/// Derived state of one pass. Replaced as a unit, never patched.
#[derive(Clone, Debug, Default)]
struct Derived {
    filtered: Vec<Entity>,
    clusters: Vec<Cluster>,
    density: Option<DensityGrid>,
    contours: Vec<Contour>,
    scene: Scene,
    marker_index: MarkerIndex,
}

/// The map viewing session: inputs on one side, a ready-to-draw scene on
/// the other.
#[derive(Debug)]
pub struct MapView {
    config: MapConfig,
    screen_width: f64,
    screen_height: f64,

    entities: Vec<Entity>,
    departments: Vec<Department>,
    boundaries: Vec<DepartmentBoundary>,

    filter: FilterCriteria,
    selection: Option<u32>,
    hover: Option<MarkerTarget>,
    overlay_enabled: bool,
    viewport: Viewport,

    derived: Derived,
}

impl MapView {
    /// Create a session with a validated configuration and screen size.
    ///
    /// The view opens centered on the configured initial location.
    pub fn new(config: MapConfig, screen_width: f64, screen_height: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut viewport = Viewport::new(config.view.center, config.view.zoom);
        viewport.center_on(
            config.view.center,
            PlanarPoint::new(screen_width / 2.0, screen_height / 2.0),
        );
        let mut view = Self {
            config,
            screen_width,
            screen_height,
            entities: Vec::new(),
            departments: Vec::new(),
            boundaries: Vec::new(),
            filter: FilterCriteria::default(),
            selection: None,
            hover: None,
            overlay_enabled: false,
            viewport,
            derived: Derived::default(),
        };
        view.recompute();
        Ok(view)
    }

    /// Install the fetched catalog. Entities are sanitized on the way in;
    /// both lists are then held read-only for the session.
    pub fn load_catalog(&mut self, entities: Vec<Entity>, departments: Vec<Department>) {
        self.entities = sanitize_entities(entities);
        self.departments = departments;
        log::info!(
            "catalog loaded: {} entities, {} departments",
            self.entities.len(),
            self.departments.len()
        );
        self.recompute();
    }

    /// Install the boundary asset. Passing an empty list (after a failed
    /// load) simply renders without the boundary layer.
    pub fn set_boundaries(&mut self, boundaries: Vec<DepartmentBoundary>) {
        self.boundaries = boundaries;
        self.recompute();
    }

    /// Replace the filter criteria.
    pub fn set_filter(&mut self, filter: FilterCriteria) {
        self.filter = filter;
        self.recompute();
    }

    /// Toggle the density/contour overlay.
    pub fn set_overlay(&mut self, enabled: bool) {
        self.overlay_enabled = enabled;
        self.recompute();
    }

    /// Set or clear the selected entity.
    pub fn select(&mut self, entity_id: Option<u32>) {
        self.selection = entity_id;
        self.recompute();
    }

    /// Pan the view by a pixel delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.viewport.pan(dx, dy);
        self.recompute();
    }

    /// Jump to a zoom level.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
        self.recompute();
    }

    /// Zoom in one step.
    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.recompute();
    }

    /// Zoom out one step.
    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.recompute();
    }

    /// Adopt a new screen size.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.screen_width = width;
            self.screen_height = height;
            self.recompute();
        }
    }

    /// Handle a click at a screen position.
    ///
    /// Clicking an entity marker selects that entity; clicking an
    /// aggregated marker dives into it (department clusters jump past the
    /// clustering threshold, proximity groups zoom one step); clicking
    /// empty map clears the selection.
    pub fn click(&mut self, at: PlanarPoint) {
        match self.pick(at) {
            Some(MarkerTarget::Entity(id)) => self.select(Some(id)),
            Some(target) => {
                if let Some(anchor) = self.cluster_for_target(target).map(|c| c.anchor) {
                    let zoom = match target {
                        MarkerTarget::Department(_) => self.config.cluster.zoom_threshold + 1.0,
                        _ => self.viewport.zoom() + 1.0,
                    };
                    self.viewport.center_on(
                        anchor,
                        PlanarPoint::new(self.screen_width / 2.0, self.screen_height / 2.0),
                    );
                    self.viewport.set_zoom(zoom);
                    self.recompute();
                }
            }
            None => self.select(None),
        }
    }

    /// Handle the pointer moving to a screen position (or leaving the map).
    pub fn hover_at(&mut self, at: Option<PlanarPoint>) {
        let target = at.and_then(|p| self.pick(p));
        if target != self.hover {
            self.hover = target;
            self.recompute();
        }
    }

    /// The marker target under a screen position, if any.
    pub fn pick(&self, at: PlanarPoint) -> Option<MarkerTarget> {
        self.derived
            .marker_index
            .pick(at, self.config.render.pick_slop)
            .map(|index| self.derived.scene.markers[index].target)
    }

    /// Clusters of the current pass.
    pub fn clusters(&self) -> &[Cluster] {
        &self.derived.clusters
    }

    /// Contours of the current pass (empty when the overlay is off).
    pub fn contours(&self) -> &[Contour] {
        &self.derived.contours
    }

    /// Density grid of the current pass, when the overlay is on.
    pub fn density(&self) -> Option<&DensityGrid> {
        self.derived.density.as_ref()
    }

    /// The ready-to-draw scene of the current pass.
    pub fn scene(&self) -> &Scene {
        &self.derived.scene
    }

    /// Entities passing the current filter.
    pub fn filtered_entities(&self) -> &[Entity] {
        &self.derived.filtered
    }

    /// Currently selected entity id.
    pub fn selection(&self) -> Option<u32> {
        self.selection
    }

    /// Current filter criteria.
    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    /// Current viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Engine configuration.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    fn cluster_for_target(&self, target: MarkerTarget) -> Option<&Cluster> {
        match target {
            MarkerTarget::Department(id) => self
                .derived
                .clusters
                .iter()
                .find(|c| c.department_id == Some(id)),
            MarkerTarget::Group(index) => self.derived.clusters.get(index),
            MarkerTarget::Entity(_) => None,
        }
    }

    /// One full derived-state pass.
    ///
    /// Builds every derived structure from the current inputs and swaps
    /// them in together.
    fn recompute(&mut self) {
        let filtered = self.filter.apply(&self.entities);
        let clusters = cluster_entities(&filtered, &self.viewport, &self.config.cluster);

        let (density, contours) = if self.overlay_enabled {
            match self.viewport.visible_bounds(self.screen_width, self.screen_height) {
                Ok(bounds) => {
                    let grid = DensityGrid::build(&filtered, bounds, &self.config.density);
                    let levels = level_steps(grid.max_value(), &self.config.contour);
                    let contours = extract_levels(&grid, &levels);
                    (Some(grid), contours)
                }
                Err(err) => {
                    log::warn!("density overlay skipped: {}", err);
                    (None, Vec::new())
                }
            }
        } else {
            (None, Vec::new())
        };

        let scene = build_scene(
            &SceneInputs {
                entities: &filtered,
                departments: &self.departments,
                clusters: &clusters,
                contours: &contours,
                density: density.as_ref(),
                boundaries: &self.boundaries,
                selection: self.selection,
                hover: self.hover,
            },
            &self.viewport,
        );
        let marker_index = MarkerIndex::build(&scene);

        log::debug!(
            "pass: {} entities -> {} clusters, {} contour levels, {} markers",
            filtered.len(),
            clusters.len(),
            contours.len(),
            scene.markers.len()
        );

        self.derived = Derived {
            filtered,
            clusters,
            density,
            contours,
            scene,
            marker_index,
        };
    }
}
