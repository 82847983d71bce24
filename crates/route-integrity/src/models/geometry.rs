//! Geometric primitives for route validation.
//!
//! Locations are stored as fixed-point integers (dm7, 7 decimal degrees) so
//! that endpoint matching is exact and hashable.

use std::collections::HashSet;
use std::fmt;

use geo::{Coord, LineString, Point};

use crate::models::types::{Result, RouteError};

/// Fixed-point units per degree of latitude or longitude
pub const DM7_PER_DEGREE: f64 = 10_000_000.0;

// ============================================================================
// Location
// ============================================================================

/// An immutable WGS84 position at dm7 precision.
///
/// Two locations are equal iff their dm7 coordinates are identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "[f64; 2]", into = "[f64; 2]")
)]
pub struct Location {
    lat_dm7: i32,
    lon_dm7: i32,
}

impl Location {
    /// Build a location from decimal degrees, rounding to dm7
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(RouteError::InvalidLocation {
                lat: latitude,
                lon: longitude,
            });
        }

        Ok(Self {
            lat_dm7: (latitude * DM7_PER_DEGREE).round() as i32,
            lon_dm7: (longitude * DM7_PER_DEGREE).round() as i32,
        })
    }

    pub fn latitude(&self) -> f64 {
        f64::from(self.lat_dm7) / DM7_PER_DEGREE
    }

    pub fn longitude(&self) -> f64 {
        f64::from(self.lon_dm7) / DM7_PER_DEGREE
    }

    /// Planar coordinate with x = longitude, y = latitude
    pub fn to_coord(&self) -> Coord {
        Coord {
            x: self.longitude(),
            y: self.latitude(),
        }
    }

    pub fn to_point(&self) -> Point {
        Point::from(self.to_coord())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.latitude(), self.longitude())
    }
}

impl TryFrom<[f64; 2]> for Location {
    type Error = RouteError;

    fn try_from([lat, lon]: [f64; 2]) -> Result<Self> {
        Self::from_degrees(lat, lon)
    }
}

impl From<Location> for [f64; 2] {
    fn from(location: Location) -> Self {
        [location.latitude(), location.longitude()]
    }
}

// ============================================================================
// Segment
// ============================================================================

/// One contiguous piece of track: an ordered polyline of at least two locations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Location>", into = "Vec<Location>")
)]
pub struct Segment {
    points: Vec<Location>,
}

impl Segment {
    /// Returns `Err` if fewer than two locations are given.
    pub fn new(points: Vec<Location>) -> Result<Self> {
        if points.len() < 2 {
            return Err(RouteError::InvalidSegment {
                points: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn first(&self) -> Location {
        self.points[0]
    }

    pub fn last(&self) -> Location {
        self.points[self.points.len() - 1]
    }

    pub fn points(&self) -> &[Location] {
        &self.points
    }

    pub fn to_line_string(&self) -> LineString {
        self.points.iter().map(Location::to_coord).collect()
    }
}

impl TryFrom<Vec<Location>> for Segment {
    type Error = RouteError;

    fn try_from(points: Vec<Location>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<Segment> for Vec<Location> {
    fn from(segment: Segment) -> Self {
        segment.points
    }
}

// ============================================================================
// Sets
// ============================================================================

/// Track segments of one route, without duplicates.
///
/// Iteration follows first-insertion order. Route segment counts are small,
/// so duplicates are detected with a linear scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentSet {
    segments: Vec<Segment>,
}

impl SegmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if an equal segment was already present
    pub fn insert(&mut self, segment: Segment) -> bool {
        if self.segments.contains(&segment) {
            return false;
        }
        self.segments.push(segment);
        true
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }
}

impl FromIterator<Segment> for SegmentSet {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        let mut set = Self::new();
        for segment in iter {
            set.insert(segment);
        }
        set
    }
}

impl<'a> IntoIterator for &'a SegmentSet {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Stop or platform locations of one route, without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationSet {
    locations: Vec<Location>,
    seen: HashSet<Location>,
}

impl LocationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: Location) -> bool {
        if !self.seen.insert(location) {
            return false;
        }
        self.locations.push(location);
        true
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.locations.iter()
    }
}

impl FromIterator<Location> for LocationSet {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        let mut set = Self::new();
        for location in iter {
            set.insert(location);
        }
        set
    }
}

impl<'a> IntoIterator for &'a LocationSet {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

// ============================================================================
// Distance
// ============================================================================

/// A length on the Earth's surface, in meters
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Distance(f64);

impl Distance {
    pub const fn meters(meters: f64) -> Self {
        Self(meters)
    }

    pub const fn as_meters(self) -> f64 {
        self.0
    }

    pub fn is_less_than(self, other: Distance) -> bool {
        self.0 < other.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m", self.0)
    }
}
