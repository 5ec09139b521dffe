//! # Aula-Map: Province Education Map Engine
//!
//! A map-viewer engine that plots educational institutions (schools and
//! learning centers) across a province, grouped by administrative
//! department, with filtering and two density-visualization strategies:
//! zoom-dependent marker clustering and smoothed contour density overlays.
//!
//! ## Features
//!
//! - **Two clustering modes**: departmental aggregation at overview zoom,
//!   greedy proximity clustering with a zoom-adjusted radius at detail zoom
//! - **Density overlay**: gaussian-kernel density grid over the viewport
//!   with marching-squares iso-contours at configurable levels
//! - **Pure derived state**: every input event triggers one recompute pass
//!   that replaces clusters, grids, contours, and the scene wholesale
//! - **Renderer-agnostic**: drawing happens behind a small trait consuming
//!   a fully-built [`Scene`](render::Scene)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aula_map::{MapConfig, MapView};
//! use aula_map::io::{departments_from_json, entities_from_json};
//!
//! let mut view = MapView::new(MapConfig::default(), 800.0, 600.0)?;
//!
//! let entities = entities_from_json(r#"[]"#)?;
//! let departments = departments_from_json(r#"[]"#)?;
//! view.load_catalog(entities, departments);
//! view.set_overlay(true);
//!
//! for marker in &view.scene().markers {
//!     println!("marker at ({:.1}, {:.1})", marker.position.x, marker.position.y);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: fundamental types (points, bounds, the entity data model)
//! - [`viewport`]: geographic/screen projection under pan and zoom
//! - [`cluster`]: departmental aggregation and proximity clustering
//! - [`density`]: gaussian-kernel density grid estimation
//! - [`contour`]: marching-squares iso-contour extraction
//! - [`filter`]: entity filter criteria
//! - [`render`]: scene building, marker styles, hit-testing
//! - [`io`]: catalog decoding and boundary-asset parsing
//! - [`config`]: all tunables, YAML-loadable
//! - [`view`]: session state and the recompute pipeline
//!
//! ## Data Flow
//!
//! ```text
//! catalog + filter ──► filtered entities ──┬──► clusterer ──► clusters ─┐
//!                                          │    (by zoom)               │
//!                                          └──► density grid            ├──► scene ──► renderer
//!                                               └──► contours ──────────┘
//! ```

pub mod cluster;
pub mod config;
pub mod contour;
pub mod core;
pub mod density;
pub mod filter;
pub mod io;
pub mod render;
pub mod view;
pub mod viewport;

// Re-export main types at crate root
pub use crate::core::{
    ConnectionKind, Department, Entity, EntityKind, GeoBounds, GeoPoint, PlanarPoint,
};
pub use cluster::{cluster_entities, Cluster, ClusterConfig};
pub use config::{ConfigError, MapConfig};
pub use contour::{Contour, ContourConfig};
pub use density::{DensityConfig, DensityGrid};
pub use filter::FilterCriteria;
pub use render::{Renderer, Scene};
pub use view::MapView;
pub use viewport::{ProjectionError, Viewport};
