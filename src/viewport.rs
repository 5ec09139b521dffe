//! Viewport transform: geographic to screen coordinates under pan/zoom.
//!
//! The projection is an equirectangular mapping about a reference point,
//! composed with the viewport's zoom scale and pixel offset:
//!
//! ```text
//! x = (lng - ref.lng) * scale + offset.x
//! y = (ref.lat - lat) * scale + offset.y     (screen y grows downward)
//! scale = 2^zoom
//! ```
//!
//! The reference point always projects to `offset`, so centering the view on
//! a location is a matter of re-anchoring the reference. The transform is
//! exactly invertible, which the render layer relies on for hit-testing and
//! the density estimator relies on for bounds computation.

use crate::core::{GeoBounds, GeoPoint, PlanarPoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum zoom level (whole province overview).
pub const MIN_ZOOM: f64 = 0.0;

/// Maximum zoom level (street detail).
pub const MAX_ZOOM: f64 = 19.0;

/// Error raised when a projection input is not a finite number.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// A geographic coordinate contained NaN or infinity.
    NonFiniteGeographic {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lng: f64,
    },
    /// A screen coordinate contained NaN or infinity.
    NonFiniteScreen {
        /// Offending x value.
        x: f64,
        /// Offending y value.
        y: f64,
    },
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionError::NonFiniteGeographic { lat, lng } => {
                write!(f, "non-finite geographic coordinate ({}, {})", lat, lng)
            }
            ProjectionError::NonFiniteScreen { x, y } => {
                write!(f, "non-finite screen coordinate ({}, {})", x, y)
            }
        }
    }
}

impl std::error::Error for ProjectionError {}

/// The current pan/zoom state mapping geographic space to screen space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Projection reference point; always projects to `offset`.
    reference: GeoPoint,
    /// Zoom level; scale factor is `2^zoom` pixels per degree.
    zoom: f64,
    /// Screen position of the reference point.
    offset: PlanarPoint,
}

impl Viewport {
    /// Create a viewport anchored at `reference` with the given zoom.
    ///
    /// The reference initially projects to the screen origin; call
    /// [`Viewport::center_on`] to place it elsewhere.
    pub fn new(reference: GeoPoint, zoom: f64) -> Self {
        Self {
            reference,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            offset: PlanarPoint::ZERO,
        }
    }

    /// Current zoom level.
    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Scale factor in pixels per degree of longitude.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.zoom.exp2()
    }

    /// Projection reference point.
    #[inline]
    pub fn reference(&self) -> GeoPoint {
        self.reference
    }

    /// Screen position of the reference point.
    #[inline]
    pub fn offset(&self) -> PlanarPoint {
        self.offset
    }

    /// Project a geographic point to screen coordinates.
    ///
    /// Always succeeds for finite input; non-finite input is rejected.
    pub fn project(&self, p: GeoPoint) -> Result<PlanarPoint, ProjectionError> {
        if !p.is_finite() {
            return Err(ProjectionError::NonFiniteGeographic { lat: p.lat, lng: p.lng });
        }
        Ok(self.project_raw(p))
    }

    /// Project without validating the input.
    ///
    /// Callers must ensure `p` is finite; non-finite input propagates into
    /// the output.
    #[inline]
    pub fn project_raw(&self, p: GeoPoint) -> PlanarPoint {
        let scale = self.scale();
        PlanarPoint::new(
            (p.lng - self.reference.lng) * scale + self.offset.x,
            (self.reference.lat - p.lat) * scale + self.offset.y,
        )
    }

    /// Invert the projection: screen coordinates back to geographic.
    ///
    /// Exact inverse of [`Viewport::project`] up to floating-point precision.
    pub fn unproject(&self, p: PlanarPoint) -> Result<GeoPoint, ProjectionError> {
        if !p.is_finite() {
            return Err(ProjectionError::NonFiniteScreen { x: p.x, y: p.y });
        }
        let scale = self.scale();
        Ok(GeoPoint::new(
            self.reference.lat - (p.y - self.offset.y) / scale,
            self.reference.lng + (p.x - self.offset.x) / scale,
        ))
    }

    /// Zoom-independent planar position (unit scale, zero offset).
    ///
    /// Proximity clustering measures distances in this plane so its radius
    /// contract `max(base_radius / scale, min_radius)` can shrink with zoom
    /// while the point layout stays fixed.
    #[inline]
    pub fn world_position(&self, p: GeoPoint) -> PlanarPoint {
        PlanarPoint::new(p.lng - self.reference.lng, self.reference.lat - p.lat)
    }

    /// Geographic bounds of a `width x height` pixel screen.
    pub fn visible_bounds(&self, width: f64, height: f64) -> Result<GeoBounds, ProjectionError> {
        let top_left = self.unproject(PlanarPoint::ZERO)?;
        let bottom_right = self.unproject(PlanarPoint::new(width, height))?;
        Ok(GeoBounds::new(
            GeoPoint::new(bottom_right.lat, top_left.lng),
            GeoPoint::new(top_left.lat, bottom_right.lng),
        ))
    }

    /// Re-anchor the view so `target` appears at screen position `at`.
    ///
    /// Non-finite targets are ignored.
    pub fn center_on(&mut self, target: GeoPoint, at: PlanarPoint) {
        if target.is_finite() && at.is_finite() {
            self.reference = target;
            self.offset = at;
        }
    }

    /// Translate the view by a pixel delta. Non-finite deltas are ignored.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.offset = PlanarPoint::new(self.offset.x + dx, self.offset.y + dy);
        }
    }

    /// Set the zoom level, clamped to `[MIN_ZOOM, MAX_ZOOM]`. NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_nan() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Increase the zoom level by one step.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + 1.0);
    }

    /// Decrease the zoom level by one step.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - 1.0);
    }
}

impl Default for Viewport {
    /// Province overview: Córdoba at zoom 7.
    fn default() -> Self {
        Self::new(GeoPoint::new(-31.5, -64.5), 7.0)
    }
}
