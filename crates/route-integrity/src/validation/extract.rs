//! Partition a route's members into track geometry and stop/platform points.

use crate::models::geometry::{LocationSet, SegmentSet};
use crate::models::types::{MemberEntity, RelationMember};

pub const STOP_ROLE: &str = "stop";
pub const PLATFORM_ROLE: &str = "platform";

/// Geometry of one route, ready for the chain builder and proximity checks
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteGeometry {
    /// Main edges and lines, in member order
    pub track: SegmentSet,
    pub stops: LocationSet,
    pub platforms: LocationSet,
    pub main_edge_count: usize,
    pub line_count: usize,
}

impl RouteGeometry {
    /// Neither main edges nor lines
    pub fn is_empty_track(&self) -> bool {
        self.main_edge_count == 0 && self.line_count == 0
    }

    /// Both main edges and lines
    pub fn is_mixed_track(&self) -> bool {
        self.main_edge_count > 0 && self.line_count > 0
    }
}

/// Extract track segments and role-tagged point locations.
///
/// Reverse duplicates of bidirectional edges (`main == false`) are skipped.
/// Members that resolve to neither a polyline nor a single point are ignored.
pub fn extract_geometry(members: &[RelationMember]) -> RouteGeometry {
    let mut geometry = RouteGeometry::default();

    for member in members {
        match &member.entity {
            MemberEntity::Edge {
                main: true,
                geometry: segment,
                ..
            } => {
                geometry.main_edge_count += 1;
                geometry.track.insert(segment.clone());
            }
            MemberEntity::Line {
                geometry: segment, ..
            } => {
                geometry.line_count += 1;
                geometry.track.insert(segment.clone());
            }
            entity => {
                let Some(location) = entity.point_location() else {
                    continue;
                };
                match member.role.as_str() {
                    STOP_ROLE => {
                        geometry.stops.insert(location);
                    }
                    PLATFORM_ROLE => {
                        geometry.platforms.insert(location);
                    }
                    _ => {}
                }
            }
        }
    }

    geometry
}
