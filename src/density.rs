//! Gaussian-kernel density estimation over a geographic grid.
//!
//! A [`DensityGrid`] covers the current viewport bounds with a fixed-size
//! lattice of accumulation cells. Each entity contributes a gaussian kernel
//! `exp(-d^2 / 2)` to every cell within `kernel_radius` cells of its
//! fractional grid position, where `d` is measured in cell units from the
//! entity to the cell center. Contributions are additive: overlapping
//! kernels sum, never overwrite, so the result is independent of insertion
//! order up to floating-point tolerance.
//!
//! Edge policy: contributions falling outside the grid are discarded — no
//! wraparound and no clamping of entities to the border. An entity outside
//! the window still feeds the edge cells its kernel reaches.
//!
//! The grid is pure derived state: recomputed wholesale on every relevant
//! viewport or data change, never mutated incrementally.

use crate::cluster::warn_invalid_position;
use crate::core::{Entity, GeoBounds, GeoPoint, GridCoord, PlanarPoint};
use serde::{Deserialize, Serialize};

/// Tunable density-estimation parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DensityConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Kernel reach in cells around each entity's fractional position.
    pub kernel_radius: usize,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            kernel_radius: 3,
        }
    }
}

/// A smoothed 2D density field over a rectangular geographic window.
///
/// Row 0 is the northern edge, matching screen orientation. Cell `(x, y)`
/// covers fractional grid coordinates `[x, x+1) x [y, y+1)` with its center
/// at `(x + 0.5, y + 0.5)`.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityGrid {
    values: Vec<f64>,
    width: usize,
    height: usize,
    bounds: GeoBounds,
    cell_width: f64,
    cell_height: f64,
}

impl DensityGrid {
    /// Build a density grid from entity positions over the given window.
    ///
    /// Entities with non-finite coordinates are skipped with a data-quality
    /// warning. Degenerate windows (empty bounds, zero span) and empty
    /// entity sets produce a valid all-zero grid.
    pub fn build(entities: &[Entity], bounds: GeoBounds, config: &DensityConfig) -> Self {
        let mut grid = Self::zeroed(bounds, config);
        if grid.is_degenerate() {
            return grid;
        }
        for entity in entities {
            if !entity.has_valid_position() {
                warn_invalid_position(entity);
                continue;
            }
            grid.accumulate(entity.coordinates, config.kernel_radius);
        }
        grid
    }

    /// An all-zero grid with the mapping of the given window.
    pub fn zeroed(bounds: GeoBounds, config: &DensityConfig) -> Self {
        let (cell_width, cell_height) = if config.width == 0 || config.height == 0 || bounds.is_empty()
        {
            (0.0, 0.0)
        } else {
            (
                bounds.lng_span() / config.width as f64,
                bounds.lat_span() / config.height as f64,
            )
        };
        Self {
            values: vec![0.0; config.width * config.height],
            width: config.width,
            height: config.height,
            bounds,
            cell_width,
            cell_height,
        }
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The geographic window this grid covers.
    #[inline]
    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    /// Accumulated value at cell `(x, y)`.
    #[inline]
    pub fn value(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    /// Raw row-major cell values.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Largest accumulated value (0.0 for an empty or all-zero grid).
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Sum of all cell values.
    pub fn total_mass(&self) -> f64 {
        self.values.iter().sum()
    }

    /// True when no cell holds any density.
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    /// Cell with the largest value, if any value is positive.
    pub fn peak(&self) -> Option<GridCoord> {
        let mut best = None;
        let mut best_value = 0.0;
        for y in 0..self.height {
            for x in 0..self.width {
                let v = self.value(x, y);
                if v > best_value {
                    best_value = v;
                    best = Some(GridCoord::new(x as i32, y as i32));
                }
            }
        }
        best
    }

    /// Map a geographic point to fractional grid coordinates.
    ///
    /// The inverse of [`DensityGrid::grid_to_geo`]; the round trip is exact
    /// up to floating-point precision. Degenerate grids map everything to
    /// the origin.
    #[inline]
    pub fn geo_to_grid(&self, p: GeoPoint) -> PlanarPoint {
        if self.is_degenerate() {
            return PlanarPoint::ZERO;
        }
        PlanarPoint::new(
            (p.lng - self.bounds.min.lng) / self.cell_width,
            (self.bounds.max.lat - p.lat) / self.cell_height,
        )
    }

    /// Map fractional grid coordinates back to geographic space.
    ///
    /// Uses the same cell size and origin the grid was built with, so
    /// contour polygons extracted in grid space land exactly where their
    /// source density lies.
    #[inline]
    pub fn grid_to_geo(&self, p: PlanarPoint) -> GeoPoint {
        GeoPoint::new(
            self.bounds.max.lat - p.y * self.cell_height,
            self.bounds.min.lng + p.x * self.cell_width,
        )
    }

    fn is_degenerate(&self) -> bool {
        self.width == 0
            || self.height == 0
            || !(self.cell_width > 0.0)
            || !(self.cell_height > 0.0)
            || !self.cell_width.is_finite()
            || !self.cell_height.is_finite()
    }

    /// Add one entity's kernel into the grid.
    fn accumulate(&mut self, p: GeoPoint, kernel_radius: usize) {
        let pos = self.geo_to_grid(p);
        if !pos.is_finite() {
            return;
        }
        let radius = kernel_radius as i64;
        let cx = pos.x.floor() as i64;
        let cy = pos.y.floor() as i64;

        let y_lo = (cy - radius).max(0);
        let y_hi = (cy + radius).min(self.height as i64 - 1);
        let x_lo = (cx - radius).max(0);
        let x_hi = (cx + radius).min(self.width as i64 - 1);

        for gy in y_lo..=y_hi {
            for gx in x_lo..=x_hi {
                let dx = pos.x - (gx as f64 + 0.5);
                let dy = pos.y - (gy as f64 + 0.5);
                let weight = (-(dx * dx + dy * dy) / 2.0).exp();
                self.values[gy as usize * self.width + gx as usize] += weight;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConnectionKind, EntityKind};
    use approx::assert_relative_eq;

    fn entity(id: u32, lat: f64, lng: f64) -> Entity {
        Entity {
            id,
            name: format!("Escuela {}", id),
            kind: EntityKind::School,
            coordinates: GeoPoint::new(lat, lng),
            description: String::new(),
            department_id: 1,
            connection_type: ConnectionKind::Starlink,
        }
    }

    fn window() -> GeoBounds {
        GeoBounds::new(GeoPoint::new(-32.0, -65.0), GeoPoint::new(-31.0, -64.0))
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let grid = DensityGrid::build(&[], window(), &DensityConfig::default());
        assert!(grid.is_zero());
        assert_eq!(grid.max_value(), 0.0);
        assert_eq!(grid.peak(), None);
    }

    #[test]
    fn test_single_entity_peaks_at_its_cell() {
        let config = DensityConfig {
            width: 20,
            height: 20,
            kernel_radius: 3,
        };
        // Off the cell lattice, so a single cell holds the strict maximum.
        let e = entity(1, -31.47, -64.47);
        let grid = DensityGrid::build(&[e.clone()], window(), &config);

        let pos = grid.geo_to_grid(e.coordinates);
        let expected = GridCoord::new(pos.x.floor() as i32, pos.y.floor() as i32);
        assert_eq!(grid.peak(), Some(expected));
        assert!(grid.max_value() > 0.0);
    }

    #[test]
    fn test_accumulation_is_additive() {
        let config = DensityConfig::default();
        let a = entity(1, -31.4, -64.4);
        let b = entity(2, -31.45, -64.42);

        let combined = DensityGrid::build(&[a.clone(), b.clone()], window(), &config);
        let only_a = DensityGrid::build(&[a], window(), &config);
        let only_b = DensityGrid::build(&[b], window(), &config);

        assert_relative_eq!(
            combined.total_mass(),
            only_a.total_mass() + only_b.total_mass(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_mass_independent_of_insertion_order() {
        let config = DensityConfig::default();
        let entities: Vec<_> = (0..10)
            .map(|i| entity(i, -31.2 - 0.05 * f64::from(i), -64.3 - 0.04 * f64::from(i)))
            .collect();
        let reversed: Vec<_> = entities.iter().rev().cloned().collect();

        let forward = DensityGrid::build(&entities, window(), &config);
        let backward = DensityGrid::build(&reversed, window(), &config);

        assert_relative_eq!(forward.total_mass(), backward.total_mass(), max_relative = 1e-9);
        for (a, b) in forward.values().iter().zip(backward.values()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_far_outside_entity_contributes_nothing() {
        let grid = DensityGrid::build(
            &[entity(1, 40.0, 10.0)],
            window(),
            &DensityConfig::default(),
        );
        assert!(grid.is_zero());
    }

    #[test]
    fn test_just_outside_entity_feeds_edge_cells() {
        // One cell west of the window: the kernel reaches in, without the
        // entity being clamped to the border.
        let config = DensityConfig {
            width: 50,
            height: 50,
            kernel_radius: 3,
        };
        let cell = 1.0 / 50.0;
        let grid = DensityGrid::build(
            &[entity(1, -31.5, -65.0 - cell)],
            window(),
            &config,
        );
        assert!(!grid.is_zero());
        // The border column holds less than a centered kernel would give it.
        let centered = DensityGrid::build(&[entity(1, -31.5, -64.5)], window(), &config);
        assert!(grid.total_mass() < centered.total_mass());
    }

    #[test]
    fn test_non_finite_positions_skipped() {
        let grid = DensityGrid::build(
            &[entity(1, f64::NAN, -64.5)],
            window(),
            &DensityConfig::default(),
        );
        assert!(grid.is_zero());
    }

    #[test]
    fn test_degenerate_windows_do_not_panic() {
        let config = DensityConfig::default();

        let empty = DensityGrid::build(&[entity(1, -31.5, -64.5)], GeoBounds::empty(), &config);
        assert!(empty.is_zero());

        // Zero-area window (all-identical points would produce this).
        let point_bounds = GeoBounds::new(GeoPoint::new(-31.5, -64.5), GeoPoint::new(-31.5, -64.5));
        let flat = DensityGrid::build(&[entity(1, -31.5, -64.5)], point_bounds, &config);
        assert!(flat.is_zero());
    }

    #[test]
    fn test_geo_grid_round_trip() {
        let grid = DensityGrid::zeroed(window(), &DensityConfig::default());
        let p = GeoPoint::new(-31.37, -64.21);
        let back = grid.grid_to_geo(grid.geo_to_grid(p));
        assert_relative_eq!(back.lat, p.lat, max_relative = 1e-12);
        assert_relative_eq!(back.lng, p.lng, max_relative = 1e-12);
    }
}
