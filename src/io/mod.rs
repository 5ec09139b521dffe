//! Catalog and boundary-asset loading.

mod boundary;
mod catalog;

pub use boundary::{boundaries_from_json, load_boundaries, BoundaryError, DepartmentBoundary};
pub use catalog::{
    departments_from_json, departments_from_reader, entities_from_json, entities_from_reader,
    load_departments, load_entities, sanitize_entities, CatalogError,
};
