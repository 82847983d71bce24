//! Spatial query utilities for distance calculations.
//!
//! Projection onto a segment is planar in degree space; the resulting
//! distance uses the Haversine formula for meters on Earth's surface.

use std::cmp::Ordering;

use geo::{Closest, ClosestPoint, HaversineDistance, Point};

use crate::models::geometry::{Distance, Location, Segment};

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

/// Nearest point on one segment to a query location
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapResult {
    pub distance: Distance,
    pub snapped: Point,
}

impl PartialOrd for SnapResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.distance.partial_cmp(&other.distance)
    }
}

/// Snap `location` onto `segment`.
///
/// A segment whose points all coincide snaps to its first point.
pub fn snap_to(location: Location, segment: &Segment) -> SnapResult {
    let point = location.to_point();

    let snapped = match segment.to_line_string().closest_point(&point) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => p,
        Closest::Indeterminate => segment.first().to_point(),
    };

    SnapResult {
        distance: Distance::meters(haversine_distance(point, snapped)),
        snapped,
    }
}
