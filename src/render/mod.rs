//! Scene building, marker styling, and hit-testing.
//!
//! The render layer is a consumer: it reads clusters, contours, and
//! boundaries produced upstream and describes one complete frame as a
//! [`Scene`]. Actual drawing happens behind the [`Renderer`] trait.

mod hit;
mod scene;

pub use hit::MarkerIndex;
pub use scene::{
    build_scene, BoundaryOutline, ContourOverlay, Marker, MarkerStyle, MarkerTarget, Scene,
    SceneInputs, BOUNDARY_FILL, BOUNDARY_STROKE, CLUSTER_FILL, LEARNING_CENTER_FILL,
    MARKER_STROKE, SCHOOL_FILL,
};

/// Draws a fully-built scene.
///
/// Implementations own the drawing surface (canvas, SVG, test buffer); the
/// engine hands them a complete [`Scene`] per pass and expects no feedback.
pub trait Renderer {
    /// Draw one pass.
    fn render(&mut self, scene: &Scene);
}
