//! Route master membership and tag consistency.

use std::collections::HashSet;
use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::identifiers::RelationIdentifier;
use crate::models::traits::{Relation, RelationProvider};
use crate::models::types::{MemberEntity, RelationType};

/// Tags a route master and its routes are expected to share
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::AsRefStr, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum GroupTag {
    Network,
    Operator,
    Ref,
    Colour,
}

/// Member relations of `group` that resolve to `type=route` relations.
///
/// A route listed twice is returned once.
pub fn route_members(
    group: &dyn Relation,
    provider: &dyn RelationProvider,
) -> Vec<Arc<dyn Relation>> {
    let mut seen: HashSet<RelationIdentifier> = HashSet::new();

    group
        .members()
        .iter()
        .filter_map(|member| match member.entity {
            MemberEntity::Relation { id } => provider.get_relation(id),
            _ => None,
        })
        .filter(|relation| relation.relation_type() == RelationType::Route)
        .filter(|relation| seen.insert(relation.id()))
        .collect()
}

/// Members of `group` that are not resolvable route relations
pub fn non_route_member_count(group: &dyn Relation, provider: &dyn RelationProvider) -> usize {
    group
        .members()
        .iter()
        .filter(|member| match member.entity {
            MemberEntity::Relation { id } => provider
                .get_relation(id)
                .map_or(true, |r| r.relation_type() != RelationType::Route),
            _ => true,
        })
        .count()
}

pub fn missing_tags(relation: &dyn Relation) -> Vec<GroupTag> {
    GroupTag::iter()
        .filter(|tag| relation.tag(tag.as_ref()).is_none())
        .collect()
}

/// Tags present on both relations with different values
pub fn inconsistent_tags(group: &dyn Relation, route: &dyn Relation) -> Vec<GroupTag> {
    GroupTag::iter()
        .filter(|tag| match (group.tag(tag.as_ref()), route.tag(tag.as_ref())) {
            (Some(expected), Some(actual)) => expected != actual,
            _ => false,
        })
        .collect()
}
