//! Decoding and validation of the entity/department catalog payloads.
//!
//! The data source serves two JSON arrays (`/api/entities`,
//! `/api/departments`); this module decodes either from a string, reader,
//! or file, and sanitizes the entity list before it enters the pipeline.
//! Transport is the caller's concern — a fetch failure simply never reaches
//! these functions, and the caller surfaces its own retryable error state.

use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::core::{Department, Entity};

/// Error type for catalog decoding.
#[derive(Debug, Clone)]
pub enum CatalogError {
    /// File or stream I/O error.
    Io(String),
    /// Malformed JSON payload.
    Parse(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(msg) => write!(f, "I/O error: {}", msg),
            CatalogError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Decode an entity array from a JSON string.
pub fn entities_from_json(json: &str) -> Result<Vec<Entity>, CatalogError> {
    serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))
}

/// Decode an entity array from a reader.
pub fn entities_from_reader<R: Read>(reader: R) -> Result<Vec<Entity>, CatalogError> {
    serde_json::from_reader(reader).map_err(|e| CatalogError::Parse(e.to_string()))
}

/// Load an entity array from a JSON file.
pub fn load_entities(path: &Path) -> Result<Vec<Entity>, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Io(e.to_string()))?;
    entities_from_json(&contents)
}

/// Decode a department array from a JSON string.
pub fn departments_from_json(json: &str) -> Result<Vec<Department>, CatalogError> {
    serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))
}

/// Decode a department array from a reader.
pub fn departments_from_reader<R: Read>(reader: R) -> Result<Vec<Department>, CatalogError> {
    serde_json::from_reader(reader).map_err(|e| CatalogError::Parse(e.to_string()))
}

/// Load a department array from a JSON file.
pub fn load_departments(path: &Path) -> Result<Vec<Department>, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Io(e.to_string()))?;
    departments_from_json(&contents)
}

/// Drop records the pipeline cannot use, keeping the rest.
///
/// Removes entities with non-finite coordinates and duplicate ids (first
/// occurrence wins). Each removal is reported as a data-quality warning;
/// the sanitized list preserves input order.
pub fn sanitize_entities(entities: Vec<Entity>) -> Vec<Entity> {
    let total = entities.len();
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(total);

    for entity in entities {
        if !entity.has_valid_position() {
            log::warn!(
                "entity {} ({:?}) dropped: non-finite coordinates",
                entity.id,
                entity.name
            );
            continue;
        }
        if !seen.insert(entity.id) {
            log::warn!("entity {} ({:?}) dropped: duplicate id", entity.id, entity.name);
            continue;
        }
        kept.push(entity);
    }

    if kept.len() < total {
        log::info!("catalog sanitized: kept {} of {} entities", kept.len(), total);
    }
    kept
}
