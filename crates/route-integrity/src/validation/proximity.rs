//! Decide whether stops or platforms are detached from the route track.

use crate::models::geometry::{Distance, Location, LocationSet, SegmentSet};
use crate::spatial::queries::{snap_to, SnapResult};

/// Closest segment to one location
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestSegment {
    /// Position of the segment in the `SegmentSet`
    pub segment: usize,
    pub snap: SnapResult,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProximityVerdict {
    /// Every point is closer than the threshold to some segment
    Within,
    /// First point (in set order) whose nearest segment is at or beyond the threshold
    TooFar {
        location: Location,
        nearest: NearestSegment,
    },
}

impl ProximityVerdict {
    pub fn is_too_far(&self) -> bool {
        matches!(self, Self::TooFar { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityEvaluator {
    threshold: Distance,
}

impl ProximityEvaluator {
    pub fn new(threshold: Distance) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Distance {
        self.threshold
    }

    /// Check every point against the track.
    ///
    /// A point passes as soon as one segment is strictly closer than the
    /// threshold. Empty points or an empty track never fail.
    pub fn evaluate(&self, points: &LocationSet, segments: &SegmentSet) -> ProximityVerdict {
        if points.is_empty() || segments.is_empty() {
            return ProximityVerdict::Within;
        }

        for &location in points {
            let mut best: Option<NearestSegment> = None;

            for (idx, segment) in segments.iter().enumerate() {
                let snap = snap_to(location, segment);
                if best.map_or(true, |b| snap.distance < b.snap.distance) {
                    best = Some(NearestSegment { segment: idx, snap });
                }
                if snap.distance.is_less_than(self.threshold) {
                    break;
                }
            }

            if let Some(nearest) = best {
                if !nearest.snap.distance.is_less_than(self.threshold) {
                    log::debug!(
                        "Location {} is {} from the track (threshold {})",
                        location,
                        nearest.snap.distance,
                        self.threshold
                    );
                    return ProximityVerdict::TooFar { location, nearest };
                }
            }
        }

        ProximityVerdict::Within
    }

    pub fn too_far(&self, points: &LocationSet, segments: &SegmentSet) -> bool {
        self.evaluate(points, segments).is_too_far()
    }

    /// Nearest segment over the whole set; ties keep the earlier segment
    pub fn nearest(&self, location: Location, segments: &SegmentSet) -> Option<NearestSegment> {
        segments
            .iter()
            .enumerate()
            .map(|(idx, segment)| NearestSegment {
                segment: idx,
                snap: snap_to(location, segment),
            })
            .fold(None, |best: Option<NearestSegment>, candidate| match best {
                Some(b) if b.snap.distance <= candidate.snap.distance => Some(b),
                _ => Some(candidate),
            })
    }
}

/// `true` iff some point's minimum snap distance is `>= threshold`
pub fn too_far(points: &LocationSet, segments: &SegmentSet, threshold: Distance) -> bool {
    ProximityEvaluator::new(threshold).too_far(points, segments)
}
