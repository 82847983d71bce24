//! In-memory relation provider.
//!
//! Stores all relations in memory with lookup maps for id access and for
//! finding the route masters that contain a given route.

use std::collections::HashMap;
use std::sync::Arc;

use crate::identifiers::*;
use crate::models::{traits::*, types::*};

// ============================================================================
// Concrete Implementation of Relation
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationImpl {
    pub id: RelationIdentifier,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: HashMap<String, String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<RelationMember>,
}

impl RelationImpl {
    pub fn new(id: RelationIdentifier) -> Self {
        Self {
            id,
            tags: HashMap::new(),
            members: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_member(mut self, role: impl Into<String>, entity: MemberEntity) -> Self {
        self.members.push(RelationMember::new(role, entity));
        self
    }
}

impl Relation for RelationImpl {
    fn id(&self) -> RelationIdentifier {
        self.id
    }

    fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    fn members(&self) -> &[RelationMember] {
        &self.members
    }
}

// ============================================================================
// Static Provider
// ============================================================================

/// In-memory relation provider
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone, Default)]
pub struct StaticRelationProvider {
    relations: Vec<Arc<RelationImpl>>,
    relation_map: HashMap<RelationIdentifier, Arc<RelationImpl>>,
    // Member relation id -> route masters listing it
    group_map: HashMap<RelationIdentifier, Vec<Arc<RelationImpl>>>,
}

impl StaticRelationProvider {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Build provider from raw data. Later duplicates of an id are dropped.
    pub fn from_data(relations: Vec<RelationImpl>) -> Self {
        let mut relation_map = HashMap::with_capacity(relations.len());
        let mut stored = Vec::with_capacity(relations.len());

        for relation in relations {
            let relation = Arc::new(relation);
            if relation_map.contains_key(&relation.id) {
                log::warn!("Duplicate relation {} ignored", relation.id);
                continue;
            }
            relation_map.insert(relation.id, relation.clone());
            stored.push(relation);
        }

        let mut group_map: HashMap<RelationIdentifier, Vec<Arc<RelationImpl>>> = HashMap::new();
        for group in stored
            .iter()
            .filter(|r| r.relation_type() == RelationType::RouteMaster)
        {
            for member in &group.members {
                if let MemberEntity::Relation { id } = member.entity {
                    group_map.entry(id).or_default().push(group.clone());
                }
            }
        }

        Self {
            relations: stored,
            relation_map,
            group_map,
        }
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

impl RelationProvider for StaticRelationProvider {
    fn get_relation(&self, id: RelationIdentifier) -> Option<Arc<dyn Relation>> {
        self.relation_map
            .get(&id)
            .map(|r| r.clone() as Arc<dyn Relation>)
    }

    fn all_relations(&self) -> Vec<Arc<dyn Relation>> {
        self.relations
            .iter()
            .map(|r| r.clone() as Arc<dyn Relation>)
            .collect()
    }

    fn groups_containing(&self, id: RelationIdentifier) -> Vec<Arc<dyn Relation>> {
        self.group_map
            .get(&id)
            .map(|groups| {
                groups
                    .iter()
                    .map(|g| g.clone() as Arc<dyn Relation>)
                    .collect()
            })
            .unwrap_or_default()
    }
}
