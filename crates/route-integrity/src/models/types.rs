//! Relation member types, enums and errors.

use std::str::FromStr;

use crate::identifiers::*;
use crate::models::geometry::{Location, Segment};

// ============================================================================
// Enums
// ============================================================================

/// Relation kind, from the `type` tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum RelationType {
    Route,
    RouteMaster,
    #[strum(disabled)]
    Other,
}

impl RelationType {
    pub fn from_tag(value: Option<&str>) -> Self {
        value
            .and_then(|v| Self::from_str(v).ok())
            .unwrap_or(Self::Other)
    }
}

// ============================================================================
// Members
// ============================================================================

/// The entity a relation member points at.
///
/// Track members carry their polyline, point-like members their location.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum MemberEntity {
    /// Directed road edge. Bidirectional ways yield a main edge plus a
    /// reversed duplicate with `main == false`.
    Edge {
        id: MemberIdentifier,
        #[cfg_attr(feature = "serde", serde(default = "main_edge_default"))]
        main: bool,
        geometry: Segment,
    },
    /// Non-navigable linear feature (rail, ferry line)
    Line { id: MemberIdentifier, geometry: Segment },
    Node { id: MemberIdentifier, location: Location },
    Point { id: MemberIdentifier, location: Location },
    Area { id: MemberIdentifier },
    Relation { id: RelationIdentifier },
}

#[cfg(feature = "serde")]
fn main_edge_default() -> bool {
    true
}

impl MemberEntity {
    /// Location of a member that resolves to a single point
    pub fn point_location(&self) -> Option<Location> {
        match self {
            Self::Node { location, .. } | Self::Point { location, .. } => Some(*location),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Edge { .. } => "edge",
            Self::Line { .. } => "line",
            Self::Node { .. } => "node",
            Self::Point { .. } => "point",
            Self::Area { .. } => "area",
            Self::Relation { .. } => "relation",
        }
    }
}

/// A member of a relation with its role (e.g. "stop", "platform", "")
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationMember {
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub entity: MemberEntity,
}

impl RelationMember {
    pub fn new(role: impl Into<String>, entity: MemberEntity) -> Self {
        Self {
            role: role.into(),
            entity,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Segment needs at least 2 locations, got {points}")]
    InvalidSegment { points: usize },

    #[error("Invalid location: lat {lat}, lon {lon}")]
    InvalidLocation { lat: f64, lon: f64 },

    #[error("Relation not found: {0}")]
    RelationNotFound(RelationIdentifier),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_type_from_tag() {
        assert_eq!(RelationType::from_tag(Some("route")), RelationType::Route);
        assert_eq!(
            RelationType::from_tag(Some("route_master")),
            RelationType::RouteMaster
        );
        assert_eq!(
            RelationType::from_tag(Some("multipolygon")),
            RelationType::Other
        );
        assert_eq!(RelationType::from_tag(Some("other")), RelationType::Other);
        assert_eq!(RelationType::from_tag(None), RelationType::Other);
    }

    #[test]
    fn test_point_location() {
        let location = Location::from_degrees(1.0, 2.0).unwrap();
        let node = MemberEntity::Node {
            id: MemberIdentifier::new(1),
            location,
        };
        let area = MemberEntity::Area {
            id: MemberIdentifier::new(2),
        };

        assert_eq!(node.point_location(), Some(location));
        assert_eq!(area.point_location(), None);
        assert_eq!(area.kind(), "area");
    }

    #[test]
    fn test_error_messages() {
        let err = RouteError::InvalidSegment { points: 1 };
        assert_eq!(err.to_string(), "Segment needs at least 2 locations, got 1");

        let err = RouteError::RelationNotFound(RelationIdentifier::new(7));
        assert_eq!(err.to_string(), "Relation not found: 7");
    }
}
