//! Findings produced by the route relation check.

use std::fmt;

use crate::identifiers::RelationIdentifier;
use crate::models::geometry::{Distance, Location};
use crate::validation::group::GroupTag;

/// One problem found on a route or route master
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Finding {
    /// No main edges and no lines
    EmptyRoute { route: RelationIdentifier },
    /// Both main edges and lines
    MixedRoute { route: RelationIdentifier },
    TrackGap {
        route: RelationIdentifier,
        chained: usize,
        segments: usize,
    },
    StopsTooFar {
        route: RelationIdentifier,
        location: Location,
        distance: Distance,
    },
    PlatformsTooFar {
        route: RelationIdentifier,
        location: Location,
        distance: Distance,
    },
    /// Public transport route not listed by any route master
    NotInRouteGroup {
        route: RelationIdentifier,
        route_type: String,
    },
    NonRouteMember {
        group: RelationIdentifier,
        count: usize,
    },
    MissingGroupTags {
        relation: RelationIdentifier,
        missing: Vec<GroupTag>,
    },
    InconsistentTag {
        group: RelationIdentifier,
        route: RelationIdentifier,
        tag: GroupTag,
    },
}

impl Finding {
    /// Relation the finding is about
    pub fn relation(&self) -> RelationIdentifier {
        match self {
            Self::EmptyRoute { route }
            | Self::MixedRoute { route }
            | Self::TrackGap { route, .. }
            | Self::StopsTooFar { route, .. }
            | Self::PlatformsTooFar { route, .. }
            | Self::NotInRouteGroup { route, .. }
            | Self::InconsistentTag { route, .. } => *route,
            Self::NonRouteMember { group, .. } => *group,
            Self::MissingGroupTags { relation, .. } => *relation,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRoute { route } => write!(
                f,
                "The route in relation with ID = {} is empty. Please add road segments (edges) or lines.",
                route
            ),
            Self::MixedRoute { route } => write!(
                f,
                "The route in relation with ID = {} contains both lines and edges, should be either lines or edges.",
                route
            ),
            Self::TrackGap {
                route,
                chained,
                segments,
            } => write!(
                f,
                "The route in relation with ID = {} has gaps in the track ({} of {} segments connected).",
                route, chained, segments
            ),
            Self::StopsTooFar {
                route,
                location,
                distance,
            } => write!(
                f,
                "The stops in the route relation with ID = {} are too far from the track (stop at {} is {} away).",
                route, location, distance
            ),
            Self::PlatformsTooFar {
                route,
                location,
                distance,
            } => write!(
                f,
                "The platforms in the route relation with ID = {} are too far from the track (platform at {} is {} away).",
                route, location, distance
            ),
            Self::NotInRouteGroup { route, route_type } => write!(
                f,
                "The relation with ID = {} is a public transport route of type {}. It should be contained in a route master relation.",
                route, route_type
            ),
            Self::NonRouteMember { group, count } => write!(
                f,
                "The route master relation with ID = {} contains {} non route member(s).",
                group, count
            ),
            Self::MissingGroupTags { relation, missing } => {
                let names: Vec<&str> = missing.iter().map(|t| t.as_ref()).collect();
                write!(
                    f,
                    "The relation with ID = {} is missing tags: {}.",
                    relation,
                    names.join(", ")
                )
            }
            Self::InconsistentTag { group, route, tag } => write!(
                f,
                "The relation with ID = {} has a {} tag inconsistent with its route master {}.",
                route, tag, group
            ),
        }
    }
}

/// All findings for one evaluated relation
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CheckFlag {
    pub relation: RelationIdentifier,
    pub findings: Vec<Finding>,
}

impl CheckFlag {
    /// Human-readable instructions, one per finding
    pub fn instructions(&self) -> Vec<String> {
        self.findings.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_relation() {
        let group = RelationIdentifier::new(10);
        let route = RelationIdentifier::new(1);

        assert_eq!(Finding::EmptyRoute { route }.relation(), route);
        assert_eq!(Finding::NonRouteMember { group, count: 2 }.relation(), group);
        assert_eq!(
            Finding::InconsistentTag {
                group,
                route,
                tag: GroupTag::Network
            }
            .relation(),
            route
        );
    }

    #[test]
    fn test_finding_display() {
        let finding = Finding::TrackGap {
            route: RelationIdentifier::new(5_317_705),
            chained: 3,
            segments: 7,
        };
        assert_eq!(
            finding.to_string(),
            "The route in relation with ID = 5317705 has gaps in the track (3 of 7 segments connected)."
        );

        let finding = Finding::MissingGroupTags {
            relation: RelationIdentifier::new(1),
            missing: vec![GroupTag::Operator, GroupTag::Colour],
        };
        assert_eq!(
            finding.to_string(),
            "The relation with ID = 1 is missing tags: operator, colour."
        );
    }

    #[test]
    fn test_flag_instructions() {
        let flag = CheckFlag {
            relation: RelationIdentifier::new(1),
            findings: vec![Finding::MixedRoute {
                route: RelationIdentifier::new(1),
            }],
        };
        assert_eq!(flag.instructions().len(), 1);
        assert!(flag.instructions()[0].contains("both lines and edges"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_finding_serializes_with_kind() {
        let finding = Finding::InconsistentTag {
            group: RelationIdentifier::new(10),
            route: RelationIdentifier::new(1),
            tag: GroupTag::Ref,
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "kind": "inconsistent_tag", "group": 10, "route": 1, "tag": "ref" })
        );
    }
}
