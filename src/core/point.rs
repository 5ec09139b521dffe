//! Point and coordinate types for the map engine.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Geographic coordinate in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (positive north).
    pub lat: f64,
    /// Longitude in degrees (positive east).
    pub lng: f64,
}

impl GeoPoint {
    /// Create a new geographic point.
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check that both components are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Planar coordinate (projected screen or grid space).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanarPoint {
    /// X coordinate (grows rightward).
    pub x: f64,
    /// Y coordinate (grows downward in screen space).
    pub y: f64,
}

impl PlanarPoint {
    /// Create a new planar point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point.
    pub const ZERO: PlanarPoint = PlanarPoint { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &PlanarPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Squared distance (faster, avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &PlanarPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Check that both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for PlanarPoint {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        PlanarPoint::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for PlanarPoint {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        PlanarPoint::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for PlanarPoint {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        PlanarPoint::new(self.x * scalar, self.y * scalar)
    }
}

/// Grid coordinates (integer cell indices).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Center of this cell in fractional grid space.
    #[inline]
    pub fn center(&self) -> PlanarPoint {
        PlanarPoint::new(self.x as f64 + 0.5, self.y as f64 + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_distance() {
        let a = PlanarPoint::new(0.0, 0.0);
        let b = PlanarPoint::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((a.distance_squared(&b) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_geo_finite() {
        assert!(GeoPoint::new(-31.5, -64.5).is_finite());
        assert!(!GeoPoint::new(f64::NAN, -64.5).is_finite());
        assert!(!GeoPoint::new(-31.5, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_cell_center() {
        let c = GridCoord::new(2, 7);
        assert_eq!(c.center(), PlanarPoint::new(2.5, 7.5));
    }
}
