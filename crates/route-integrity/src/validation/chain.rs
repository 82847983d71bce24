//! Reconstruct one continuous route path from unordered track segments.
//!
//! ## Algorithm
//!
//! Greedy endpoint chaining with bounded rotation retry:
//!
//! 1. Seed the chain with the first segment of the working order.
//! 2. Scan pass: visit every other segment once, in working order. Append it
//!    if it starts where the chain ends, else prepend it if it ends where the
//!    chain starts.
//! 3. If the pass placed every segment the route has no gap.
//! 4. Otherwise rotate the working order by one and retry, at most once per
//!    segment. Running out of retries is the gap signal.
//!
//! Each pass is linear in the number of segments, so the whole build is
//! quadratic at worst.

use std::collections::VecDeque;

use crate::models::geometry::{Location, Segment, SegmentSet};

/// Ordered track produced by [`RouteChainBuilder`].
///
/// Consecutive segments share an endpoint: `chain[i].last() == chain[i + 1].first()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteChain<'a> {
    segments: &'a SegmentSet,
    order: VecDeque<usize>,
}

impl<'a> RouteChain<'a> {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Every segment of the input was placed
    pub fn is_complete(&self) -> bool {
        self.order.len() == self.segments.len()
    }

    pub fn has_gap(&self) -> bool {
        !self.is_complete()
    }

    /// Positions of the chained segments in the input set
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Segment> + '_ {
        let segments = self.segments.as_slice();
        self.order.iter().map(move |&idx| &segments[idx])
    }

    pub fn start(&self) -> Option<Location> {
        self.iter().next().map(Segment::first)
    }

    pub fn end(&self) -> Option<Location> {
        self.iter().last().map(Segment::last)
    }
}

/// Orders a [`SegmentSet`] into a [`RouteChain`].
pub struct RouteChainBuilder<'a> {
    segments: &'a SegmentSet,
}

impl<'a> RouteChainBuilder<'a> {
    pub fn new(segments: &'a SegmentSet) -> Self {
        Self { segments }
    }

    /// Build the chain. `RouteChain::has_gap` reports whether it stalled.
    pub fn build(&self) -> RouteChain<'a> {
        let n = self.segments.len();

        if n <= 1 {
            return RouteChain {
                segments: self.segments,
                order: (0..n).collect(),
            };
        }

        let mut working: Vec<usize> = (0..n).collect();
        let mut chain = VecDeque::new();

        for attempt in 0..n {
            chain = self.scan_pass(&working);
            log::trace!(
                "Chain attempt {} seeded at segment {}: placed {}/{}",
                attempt,
                working[0],
                chain.len(),
                n
            );

            if chain.len() == n {
                log::debug!("Chained {} segments after {} rotations", n, attempt);
                break;
            }

            working.rotate_left(1);
        }

        if chain.len() < n {
            log::debug!(
                "Track has a gap: last attempt placed {} of {} segments",
                chain.len(),
                n
            );
        }

        RouteChain {
            segments: self.segments,
            order: chain,
        }
    }

    /// One ordered pass over `working`, seeded with its first segment.
    ///
    /// The append test runs before the prepend test, and each segment is
    /// tested once, so a segment closing a loop is placed at the tail only.
    fn scan_pass(&self, working: &[usize]) -> VecDeque<usize> {
        let segments = self.segments.as_slice();
        let mut chain = VecDeque::with_capacity(segments.len());

        let seed = working[0];
        chain.push_back(seed);
        let mut head = segments[seed].first();
        let mut tail = segments[seed].last();

        for &idx in &working[1..] {
            let segment = &segments[idx];
            if segment.first() == tail {
                chain.push_back(idx);
                tail = segment.last();
            } else if segment.last() == head {
                chain.push_front(idx);
                head = segment.first();
            }
        }

        chain
    }
}

/// Convenience wrapper around [`RouteChainBuilder`]
pub fn build_chain(segments: &SegmentSet) -> RouteChain<'_> {
    RouteChainBuilder::new(segments).build()
}
