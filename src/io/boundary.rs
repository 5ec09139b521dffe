//! Department boundary parsing from the static GeoJSON asset.
//!
//! The asset is a FeatureCollection of department polygons, each feature
//! carrying the department name in a `departamento` property. Boundaries
//! are used only for rendering outlines — never for clustering — so parsing
//! is tolerant: malformed features are skipped, and a failed load degrades
//! to a map without the boundary layer.

use std::fmt;
use std::path::Path;

use crate::core::GeoPoint;

/// One department's outline: a name plus one or more polygon rings.
#[derive(Clone, Debug, PartialEq)]
pub struct DepartmentBoundary {
    /// Department name from the feature's `departamento` property.
    pub name: String,
    /// Polygon rings; points are (lat, lng). GeoJSON stores positions as
    /// `[lng, lat]` and the order is swapped during parsing.
    pub rings: Vec<Vec<GeoPoint>>,
}

/// Error type for boundary-asset loading.
#[derive(Debug, Clone)]
pub enum BoundaryError {
    /// File I/O error.
    Io(String),
    /// Not valid JSON, or not a FeatureCollection.
    Parse(String),
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryError::Io(msg) => write!(f, "I/O error: {}", msg),
            BoundaryError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for BoundaryError {}

/// Parse department boundaries from a GeoJSON string.
///
/// Features without a usable name or geometry are skipped with a warning;
/// only a structurally invalid document is an error.
pub fn boundaries_from_json(json: &str) -> Result<Vec<DepartmentBoundary>, BoundaryError> {
    let doc: serde_json::Value =
        serde_json::from_str(json).map_err(|e| BoundaryError::Parse(e.to_string()))?;
    let features = doc["features"]
        .as_array()
        .ok_or_else(|| BoundaryError::Parse("missing features array".to_string()))?;

    let mut boundaries = Vec::new();
    let mut skipped = 0usize;
    for feature in features {
        match parse_feature(feature) {
            Some(boundary) => boundaries.push(boundary),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        log::warn!(
            "boundary asset: skipped {} malformed feature(s), kept {}",
            skipped,
            boundaries.len()
        );
    }
    Ok(boundaries)
}

/// Load department boundaries from a GeoJSON file.
pub fn load_boundaries(path: &Path) -> Result<Vec<DepartmentBoundary>, BoundaryError> {
    let contents = std::fs::read_to_string(path).map_err(|e| BoundaryError::Io(e.to_string()))?;
    boundaries_from_json(&contents)
}

fn parse_feature(feature: &serde_json::Value) -> Option<DepartmentBoundary> {
    let name = feature["properties"]["departamento"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let geometry = &feature["geometry"];
    let rings = match geometry["type"].as_str()? {
        "Polygon" => parse_polygon(&geometry["coordinates"])?,
        "MultiPolygon" => {
            let polygons = geometry["coordinates"].as_array()?;
            let mut rings = Vec::new();
            for polygon in polygons {
                rings.extend(parse_polygon(polygon)?);
            }
            rings
        }
        _ => return None,
    };

    if rings.is_empty() {
        return None;
    }
    Some(DepartmentBoundary { name, rings })
}

fn parse_polygon(coordinates: &serde_json::Value) -> Option<Vec<Vec<GeoPoint>>> {
    let rings = coordinates.as_array()?;
    let parsed: Vec<Vec<GeoPoint>> = rings.iter().filter_map(parse_ring).collect();
    if parsed.is_empty() {
        None
    } else {
        Some(parsed)
    }
}

fn parse_ring(ring: &serde_json::Value) -> Option<Vec<GeoPoint>> {
    let positions = ring.as_array()?;
    let points: Vec<GeoPoint> = positions
        .iter()
        .filter_map(|position| {
            let pair = position.as_array()?;
            let lng = pair.first()?.as_f64()?;
            let lat = pair.get(1)?.as_f64()?;
            let p = GeoPoint::new(lat, lng);
            p.is_finite().then_some(p)
        })
        .collect();
    if points.len() < 3 {
        None
    } else {
        Some(points)
    }
}
