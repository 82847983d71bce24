//! Core traits for map relations.
//!
//! These traits define what the checks need from the host data store.
//! Implementations can be in-memory, database-backed, or remote.

use std::sync::Arc;

use crate::identifiers::*;
use crate::models::types::*;

/// A relation (route, route master, or anything else) with its members
pub trait Relation: Send + Sync {
    fn id(&self) -> RelationIdentifier;

    fn tag(&self, key: &str) -> Option<&str>;

    /// Members in stored order
    fn members(&self) -> &[RelationMember];

    /// Kind of relation, derived from the `type` tag
    fn relation_type(&self) -> RelationType {
        RelationType::from_tag(self.tag("type"))
    }
}

/// Provider of all relations with lookup methods
pub trait RelationProvider: Send + Sync {
    fn get_relation(&self, id: RelationIdentifier) -> Option<Arc<dyn Relation>>;

    fn all_relations(&self) -> Vec<Arc<dyn Relation>>;

    /// Route masters that list `id` among their relation members
    fn groups_containing(&self, id: RelationIdentifier) -> Vec<Arc<dyn Relation>>;

    fn require_relation(&self, id: RelationIdentifier) -> Result<Arc<dyn Relation>> {
        self.get_relation(id).ok_or(RouteError::RelationNotFound(id))
    }
}
