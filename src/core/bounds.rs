//! Axis-aligned geographic bounding box.
//!
//! [`GeoBounds`] represents a rectangular window in latitude/longitude space,
//! used for:
//! - Density grid windowing (which geographic area the grid covers)
//! - Viewport culling (what's visible on screen)
//! - Extent tracking over entity sets

use super::point::GeoPoint;
use serde::{Deserialize, Serialize};

/// Axis-aligned geographic bounding box.
///
/// `min` holds the smallest latitude and longitude, `max` the largest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// South-west corner (smallest lat and lng).
    pub min: GeoPoint,
    /// North-east corner (largest lat and lng).
    pub max: GeoPoint,
}

impl GeoBounds {
    /// Create a new bounding box from min and max corners.
    #[inline]
    pub const fn new(min: GeoPoint, max: GeoPoint) -> Self {
        Self { min, max }
    }

    /// Create an empty (invalid) bounding box.
    ///
    /// The empty bounds has min > max, so it will expand to fit any point.
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: GeoPoint::new(f64::INFINITY, f64::INFINITY),
            max: GeoPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Check if the bounds are empty (invalid).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.lat > self.max.lat || self.min.lng > self.max.lng
    }

    /// Smallest bounds containing all the given points.
    ///
    /// Non-finite points are ignored; returns empty bounds if none remain.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut bounds = Self::empty();
        for p in points {
            if p.is_finite() {
                bounds.expand_to_include(p);
            }
        }
        bounds
    }

    /// Grow the bounds to include a point.
    #[inline]
    pub fn expand_to_include(&mut self, p: GeoPoint) {
        self.min.lat = self.min.lat.min(p.lat);
        self.min.lng = self.min.lng.min(p.lng);
        self.max.lat = self.max.lat.max(p.lat);
        self.max.lng = self.max.lng.max(p.lng);
    }

    /// Check if a point lies inside the bounds (edges inclusive).
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.min.lat
            && p.lat <= self.max.lat
            && p.lng >= self.min.lng
            && p.lng <= self.max.lng
    }

    /// Latitude extent in degrees.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.max.lat - self.min.lat
    }

    /// Longitude extent in degrees.
    #[inline]
    pub fn lng_span(&self) -> f64 {
        self.max.lng - self.min.lng
    }

    /// Center of the bounds.
    #[inline]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min.lat + self.max.lat) * 0.5,
            (self.min.lng + self.max.lng) * 0.5,
        )
    }

    /// Smallest bounds containing both this and another.
    #[inline]
    pub fn union(&self, other: &GeoBounds) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: GeoPoint::new(self.min.lat.min(other.min.lat), self.min.lng.min(other.min.lng)),
            max: GeoPoint::new(self.max.lat.max(other.max.lat), self.max.lng.max(other.max.lng)),
        }
    }
}
