//! Entity and department reference data.
//!
//! These types mirror the JSON payloads served by the data source
//! (`/api/entities` and `/api/departments`): camelCase field names,
//! `SCREAMING_SNAKE_CASE` entity kinds, and Spanish connection-type strings.
//! Both are fetched once at startup and held read-only for the session.

use super::point::GeoPoint;
use serde::{Deserialize, Serialize};

/// Kind of educational institution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// A school ("Escuela").
    School,
    /// A community learning center ("Espacio ABC").
    LearningCenter,
}

impl EntityKind {
    /// Singular display label, as shown in marker tooltips.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::School => "Escuela",
            EntityKind::LearningCenter => "Espacio ABC",
        }
    }

    /// Plural display label, as shown in department tooltips.
    pub fn plural_label(&self) -> &'static str {
        match self {
            EntityKind::School => "Escuelas",
            EntityKind::LearningCenter => "Centros de Aprendizaje",
        }
    }
}

/// How the institution is connected to the internet.
///
/// Wire names are the Spanish strings the data source emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Commercial ISP link.
    #[serde(rename = "Proveedor externo")]
    ExternalProvider,
    /// Satellite link.
    #[serde(rename = "Starlink")]
    Starlink,
    /// Fiber-optic link.
    #[serde(rename = "Fibra Optica")]
    Fiber,
    /// More than one connection type.
    #[serde(rename = "Múltiple")]
    Multiple,
}

impl ConnectionKind {
    /// Display label (same as the wire name).
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionKind::ExternalProvider => "Proveedor externo",
            ConnectionKind::Starlink => "Starlink",
            ConnectionKind::Fiber => "Fibra Optica",
            ConnectionKind::Multiple => "Múltiple",
        }
    }
}

/// A point-of-interest record: a school or learning center with a
/// geographic location and connectivity metadata.
///
/// Immutable once fetched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Unique identity.
    pub id: u32,
    /// Institution name.
    pub name: String,
    /// School or learning center.
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Geographic location in decimal degrees.
    pub coordinates: GeoPoint,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Foreign key into the department list.
    pub department_id: u32,
    /// Connection type.
    pub connection_type: ConnectionKind,
}

impl Entity {
    /// Whether the entity's coordinates are usable for spatial computation.
    ///
    /// Entities failing this check are skipped by clustering and density
    /// estimation and reported as a data-quality warning.
    #[inline]
    pub fn has_valid_position(&self) -> bool {
        self.coordinates.is_finite()
    }
}

/// An administrative department of the province.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Unique identity.
    pub id: u32,
    /// Department name.
    pub name: String,
}
