//! Entity filter criteria.

use crate::core::{ConnectionKind, Entity, EntityKind};
use serde::{Deserialize, Serialize};

/// User-selected filter criteria. Criteria compose with AND; empty criteria
/// match everything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring match against the entity name. Empty
    /// matches all names.
    pub name: String,
    /// Restrict to one institution kind.
    pub kind: Option<EntityKind>,
    /// Restrict to one department.
    pub department_id: Option<u32>,
    /// Restrict to one connection type.
    pub connection: Option<ConnectionKind>,
}

impl FilterCriteria {
    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.kind.is_none()
            && self.department_id.is_none()
            && self.connection.is_none()
    }

    /// Whether an entity passes every set criterion.
    pub fn matches(&self, entity: &Entity) -> bool {
        if !self.name.is_empty()
            && !entity.name.to_lowercase().contains(&self.name.to_lowercase())
        {
            return false;
        }
        if self.kind.is_some_and(|kind| entity.kind != kind) {
            return false;
        }
        if self.department_id.is_some_and(|id| entity.department_id != id) {
            return false;
        }
        if self.connection.is_some_and(|c| entity.connection_type != c) {
            return false;
        }
        true
    }

    /// Entities passing the filter, preserving input order.
    pub fn apply(&self, entities: &[Entity]) -> Vec<Entity> {
        entities.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}
