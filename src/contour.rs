//! Iso-contour extraction from density grids (marching squares).
//!
//! Produces polygon rings in fractional grid space at caller-chosen
//! threshold levels; the extractor itself is agnostic of level count and
//! maximum value. [`level_steps`] builds the conventional ladder of evenly
//! spaced thresholds (default 8 levels spanning 10%–80% of the maximum).
//!
//! Grid values are treated as point samples at cell centers, so ring
//! vertices come out in the same fractional coordinate system
//! [`DensityGrid::geo_to_grid`] uses — [`Ring::to_geo`] maps them back to
//! geographic space exactly, up to floating-point precision.
//!
//! An all-zero grid, or any level above the grid maximum, yields zero
//! contours rather than an error.

use crate::core::{GeoPoint, PlanarPoint};
use crate::density::DensityGrid;
use serde::{Deserialize, Serialize};

/// Tunable contour-ladder parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ContourConfig {
    /// Number of threshold levels to extract.
    pub level_count: usize,
    /// Lowest level as a fraction of the grid maximum.
    pub low_fraction: f64,
    /// Highest level as a fraction of the grid maximum.
    pub high_fraction: f64,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            level_count: 8,
            low_fraction: 0.1,
            high_fraction: 0.8,
        }
    }
}

/// One polyline of a contour, in fractional grid coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    /// Vertices in traversal order.
    pub points: Vec<PlanarPoint>,
    /// Whether the last vertex joins back to the first.
    pub closed: bool,
}

impl Ring {
    /// Map the ring's vertices back to geographic space using the grid's
    /// own inverse mapping.
    pub fn to_geo(&self, grid: &DensityGrid) -> Vec<GeoPoint> {
        self.points.iter().map(|&p| grid.grid_to_geo(p)).collect()
    }
}

/// All rings extracted at one iso-value level.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    /// The iso-value this contour traces.
    pub level: f64,
    /// Polygon rings at this level.
    pub rings: Vec<Ring>,
}

/// Evenly spaced threshold levels spanning a fraction band of `max_value`.
///
/// Returns `level_count` levels from `low_fraction * max_value` to
/// `high_fraction * max_value` inclusive. Empty when the maximum is not a
/// positive finite number or the count is zero.
pub fn level_steps(max_value: f64, config: &ContourConfig) -> Vec<f64> {
    if !(max_value > 0.0) || !max_value.is_finite() || config.level_count == 0 {
        return Vec::new();
    }
    let lo = config.low_fraction * max_value;
    if config.level_count == 1 {
        return vec![lo];
    }
    let hi = config.high_fraction * max_value;
    let step = (hi - lo) / (config.level_count - 1) as f64;
    (0..config.level_count).map(|i| lo + step * i as f64).collect()
}

/// Extract contour rings at a single level.
pub fn extract(grid: &DensityGrid, level: f64) -> Vec<Ring> {
    chain_segments(march_squares(grid, level))
}

/// Extract contours at each of the given levels.
///
/// Levels producing no rings are dropped from the output.
pub fn extract_levels(grid: &DensityGrid, levels: &[f64]) -> Vec<Contour> {
    levels
        .iter()
        .filter_map(|&level| {
            let rings = extract(grid, level);
            if rings.is_empty() {
                None
            } else {
                Some(Contour { level, rings })
            }
        })
        .collect()
}

/// An unordered contour crossing of one grid square.
#[derive(Clone, Copy, Debug)]
struct Segment {
    start: PlanarPoint,
    end: PlanarPoint,
}

/// Walk every 2x2 sample square and emit its contour crossings.
fn march_squares(grid: &DensityGrid, level: f64) -> Vec<Segment> {
    let (width, height) = (grid.width(), grid.height());
    if width < 2 || height < 2 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    for y in 0..height - 1 {
        for x in 0..width - 1 {
            let tl = grid.value(x, y);
            let tr = grid.value(x + 1, y);
            let bl = grid.value(x, y + 1);
            let br = grid.value(x + 1, y + 1);

            let mut index = 0u8;
            if tl >= level {
                index |= 1;
            }
            if tr >= level {
                index |= 2;
            }
            if br >= level {
                index |= 4;
            }
            if bl >= level {
                index |= 8;
            }
            if index == 0 || index == 15 {
                continue;
            }

            // Sample positions are cell centers.
            let px = x as f64 + 0.5;
            let py = y as f64 + 0.5;
            let p_tl = PlanarPoint::new(px, py);
            let p_tr = PlanarPoint::new(px + 1.0, py);
            let p_bl = PlanarPoint::new(px, py + 1.0);
            let p_br = PlanarPoint::new(px + 1.0, py + 1.0);

            let top = interpolate(p_tl, p_tr, tl, tr, level);
            let right = interpolate(p_tr, p_br, tr, br, level);
            let bottom = interpolate(p_bl, p_br, bl, br, level);
            let left = interpolate(p_tl, p_bl, tl, bl, level);

            match index {
                1 | 14 => segments.push(Segment { start: left, end: top }),
                2 | 13 => segments.push(Segment { start: top, end: right }),
                3 | 12 => segments.push(Segment { start: left, end: right }),
                4 | 11 => segments.push(Segment { start: right, end: bottom }),
                6 | 9 => segments.push(Segment { start: top, end: bottom }),
                7 | 8 => segments.push(Segment { start: left, end: bottom }),
                // Saddles: two independent crossings.
                5 => {
                    segments.push(Segment { start: left, end: top });
                    segments.push(Segment { start: right, end: bottom });
                }
                10 => {
                    segments.push(Segment { start: top, end: right });
                    segments.push(Segment { start: left, end: bottom });
                }
                _ => unreachable!("cases 0 and 15 are filtered above"),
            }
        }
    }
    segments
}

/// Where the iso-value crosses the edge between two samples.
fn interpolate(a: PlanarPoint, b: PlanarPoint, va: f64, vb: f64, level: f64) -> PlanarPoint {
    if (vb - va).abs() < 1e-12 {
        return PlanarPoint::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
    }
    let t = ((level - va) / (vb - va)).clamp(0.0, 1.0);
    PlanarPoint::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
}

/// Tolerance for joining segment endpoints, in grid units.
const JOIN_EPSILON: f64 = 1e-6;

/// Stitch unordered segments into continuous polylines.
fn chain_segments(segments: Vec<Segment>) -> Vec<Ring> {
    let mut rings = Vec::new();
    let mut used = vec![false; segments.len()];

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut points = vec![segments[start].start, segments[start].end];

        let mut extended = true;
        while extended {
            extended = false;
            let tail = points[points.len() - 1];
            for (i, segment) in segments.iter().enumerate() {
                if used[i] {
                    continue;
                }
                if segment.start.distance(&tail) < JOIN_EPSILON {
                    points.push(segment.end);
                    used[i] = true;
                    extended = true;
                    break;
                }
                if segment.end.distance(&tail) < JOIN_EPSILON {
                    points.push(segment.start);
                    used[i] = true;
                    extended = true;
                    break;
                }
            }
        }

        let closed = points.len() > 2
            && points[0].distance(&points[points.len() - 1]) < JOIN_EPSILON;
        rings.push(Ring { points, closed });
    }
    rings
}
