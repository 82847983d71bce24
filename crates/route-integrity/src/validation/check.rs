//! Route and route master integrity check.
//!
//! A [`Check`] decides which relations it applies to and evaluates them into
//! [`Finding`]s. [`RouteRelationCheck`] is the implementation for
//! `type=route` and `type=route_master` relations.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::CheckConfig;
use crate::identifiers::RelationIdentifier;
use crate::models::traits::{Relation, RelationProvider};
use crate::models::types::{RelationType, Result};
use crate::validation::chain::build_chain;
use crate::validation::extract::extract_geometry;
use crate::validation::finding::{CheckFlag, Finding};
use crate::validation::group::{
    inconsistent_tags, missing_tags, non_route_member_count, route_members,
};
use crate::validation::proximity::{ProximityEvaluator, ProximityVerdict};

/// A validation applied to relations
pub trait Check: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether `relation` should be evaluated by this check
    fn in_scope(&self, relation: &dyn Relation) -> bool;

    /// Evaluate `relation`, producing zero or more findings
    fn evaluate(&self, relation: &dyn Relation) -> Vec<Finding>;
}

/// Relations already evaluated in this run.
///
/// Shared between checks and threads; `claim` serializes marks per id.
#[derive(Debug, Default)]
pub struct ProcessedRelations {
    ids: Mutex<HashSet<RelationIdentifier>>,
}

impl ProcessedRelations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as processed. Returns `true` only for the first caller.
    pub fn claim(&self, id: RelationIdentifier) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id)
    }

    pub fn contains(&self, id: RelationIdentifier) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct RouteRelationCheck {
    config: CheckConfig,
    provider: Arc<dyn RelationProvider>,
    processed: Arc<ProcessedRelations>,
    proximity: ProximityEvaluator,
}

impl RouteRelationCheck {
    /// Returns `Err` if the configuration is invalid
    pub fn new(config: CheckConfig, provider: Arc<dyn RelationProvider>) -> Result<Self> {
        config.validate()?;
        let proximity = ProximityEvaluator::new(config.proximity_threshold());

        Ok(Self {
            config,
            provider,
            processed: Arc::new(ProcessedRelations::new()),
            proximity,
        })
    }

    /// Share a processed set with other checks or threads
    pub fn with_processed(mut self, processed: Arc<ProcessedRelations>) -> Self {
        self.processed = processed;
        self
    }

    pub fn processed(&self) -> &Arc<ProcessedRelations> {
        &self.processed
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Track and proximity findings for one route
    pub fn check_route_geometry(&self, route: &dyn Relation) -> Vec<Finding> {
        let id = route.id();
        let geometry = extract_geometry(route.members());
        let mut findings = Vec::new();

        if geometry.is_empty_track() {
            findings.push(Finding::EmptyRoute { route: id });
        } else if geometry.is_mixed_track() {
            findings.push(Finding::MixedRoute { route: id });
        }

        let chain = build_chain(&geometry.track);
        if chain.has_gap() {
            findings.push(Finding::TrackGap {
                route: id,
                chained: chain.len(),
                segments: geometry.track.len(),
            });
        }

        if let ProximityVerdict::TooFar { location, nearest } =
            self.proximity.evaluate(&geometry.stops, &geometry.track)
        {
            findings.push(Finding::StopsTooFar {
                route: id,
                location,
                distance: nearest.snap.distance,
            });
        }

        if let ProximityVerdict::TooFar { location, nearest } =
            self.proximity.evaluate(&geometry.platforms, &geometry.track)
        {
            findings.push(Finding::PlatformsTooFar {
                route: id,
                location,
                distance: nearest.snap.distance,
            });
        }

        log::debug!(
            "Route {}: {} segments, {} stops, {} platforms, {} findings",
            id,
            geometry.track.len(),
            geometry.stops.len(),
            geometry.platforms.len(),
            findings.len()
        );

        findings
    }

    fn check_route(&self, route: &dyn Relation) -> Vec<Finding> {
        let mut findings = self.check_route_geometry(route);

        if let Some(route_type) = route.tag("route") {
            if self.config.is_public_transport(route_type)
                && self.provider.groups_containing(route.id()).is_empty()
            {
                findings.push(Finding::NotInRouteGroup {
                    route: route.id(),
                    route_type: route_type.to_string(),
                });
            }
        }

        findings
    }

    fn check_group(&self, group: &dyn Relation) -> Vec<Finding> {
        let group_id = group.id();
        let routes = route_members(group, self.provider.as_ref());
        let mut findings = Vec::new();

        log::debug!("Route master {} has {} routes", group_id, routes.len());

        for route in &routes {
            if self.processed.claim(route.id()) {
                findings.extend(self.check_route_geometry(route.as_ref()));
            } else {
                log::debug!("Route {} already processed, skipping", route.id());
            }
        }

        let count = non_route_member_count(group, self.provider.as_ref());
        if count > 0 {
            findings.push(Finding::NonRouteMember {
                group: group_id,
                count,
            });
        }

        let missing = missing_tags(group);
        if !missing.is_empty() {
            findings.push(Finding::MissingGroupTags {
                relation: group_id,
                missing,
            });
        }

        for route in &routes {
            let missing = missing_tags(route.as_ref());
            if !missing.is_empty() {
                findings.push(Finding::MissingGroupTags {
                    relation: route.id(),
                    missing,
                });
            }

            for tag in inconsistent_tags(group, route.as_ref()) {
                findings.push(Finding::InconsistentTag {
                    group: group_id,
                    route: route.id(),
                    tag,
                });
            }
        }

        findings
    }

    /// Evaluate one relation if in scope, grouping non-empty results
    pub fn flag(&self, relation: &dyn Relation) -> Option<CheckFlag> {
        if !self.in_scope(relation) {
            return None;
        }

        let findings = self.evaluate(relation);
        if findings.is_empty() {
            return None;
        }

        Some(CheckFlag {
            relation: relation.id(),
            findings,
        })
    }

    /// Run over every relation of the provider, in provider order
    pub fn run(&self) -> Vec<CheckFlag> {
        let flags: Vec<CheckFlag> = self
            .provider
            .all_relations()
            .iter()
            .filter_map(|relation| self.flag(relation.as_ref()))
            .collect();

        log::info!(
            "{}: {} relations processed, {} flagged",
            self.name(),
            self.processed.len(),
            flags.len()
        );

        flags
    }
}

impl Check for RouteRelationCheck {
    fn name(&self) -> &'static str {
        "RouteRelationCheck"
    }

    fn in_scope(&self, relation: &dyn Relation) -> bool {
        matches!(
            relation.relation_type(),
            RelationType::Route | RelationType::RouteMaster
        ) && !self.processed.contains(relation.id())
    }

    fn evaluate(&self, relation: &dyn Relation) -> Vec<Finding> {
        let relation_type = relation.relation_type();
        if !matches!(relation_type, RelationType::Route | RelationType::RouteMaster) {
            return Vec::new();
        }

        if !self.processed.claim(relation.id()) {
            log::debug!("Relation {} already processed, skipping", relation.id());
            return Vec::new();
        }

        match relation_type {
            RelationType::Route => self.check_route(relation),
            RelationType::RouteMaster => self.check_group(relation),
            RelationType::Other => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::MemberIdentifier;
    use crate::models::geometry::{Location, Segment};
    use crate::models::types::MemberEntity;
    use crate::provider::{RelationImpl, StaticRelationProvider};
    use crate::validation::group::GroupTag;

    fn loc(lat: f64, lon: f64) -> Location {
        Location::from_degrees(lat, lon).unwrap()
    }

    fn seg(a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(vec![loc(a.0, a.1), loc(b.0, b.1)]).unwrap()
    }

    fn edge(id: i64, segment: Segment) -> MemberEntity {
        MemberEntity::Edge {
            id: MemberIdentifier::new(id),
            main: true,
            geometry: segment,
        }
    }

    fn line(id: i64, segment: Segment) -> MemberEntity {
        MemberEntity::Line {
            id: MemberIdentifier::new(id),
            geometry: segment,
        }
    }

    fn node(id: i64, location: Location) -> MemberEntity {
        MemberEntity::Node {
            id: MemberIdentifier::new(id),
            location,
        }
    }

    fn rel(id: i64) -> MemberEntity {
        MemberEntity::Relation {
            id: RelationIdentifier::new(id),
        }
    }

    fn route(id: i64) -> RelationImpl {
        RelationImpl::new(RelationIdentifier::new(id)).with_tag("type", "route")
    }

    /// Two connected edges with a stop on the track
    fn connected_route(id: i64) -> RelationImpl {
        route(id)
            .with_member("", edge(id * 10, seg((0.0, 0.0), (1.0, 0.0))))
            .with_member("", edge(id * 10 + 1, seg((1.0, 0.0), (2.0, 0.0))))
            .with_member("stop", node(id * 10 + 2, loc(0.5, 0.0)))
    }

    fn checker(relations: Vec<RelationImpl>) -> RouteRelationCheck {
        let provider = Arc::new(StaticRelationProvider::from_data(relations));
        RouteRelationCheck::new(CheckConfig::default(), provider).unwrap()
    }

    fn kinds(findings: &[Finding]) -> Vec<&'static str> {
        findings
            .iter()
            .map(|f| match f {
                Finding::EmptyRoute { .. } => "empty",
                Finding::MixedRoute { .. } => "mixed",
                Finding::TrackGap { .. } => "gap",
                Finding::StopsTooFar { .. } => "stops",
                Finding::PlatformsTooFar { .. } => "platforms",
                Finding::NotInRouteGroup { .. } => "not_in_group",
                Finding::NonRouteMember { .. } => "non_route",
                Finding::MissingGroupTags { .. } => "missing_tags",
                Finding::InconsistentTag { .. } => "inconsistent",
            })
            .collect()
    }

    #[test]
    fn test_route_with_far_stop() {
        let relation = connected_route(1).with_member("stop", node(13, loc(5.0, 5.0)));
        let check = checker(vec![relation.clone()]);

        let findings = check.evaluate(&relation);
        assert_eq!(kinds(&findings), vec!["stops"]);
        match &findings[0] {
            Finding::StopsTooFar { location, .. } => assert_eq!(*location, loc(5.0, 5.0)),
            other => panic!("unexpected finding {:?}", other),
        }
    }

    #[test]
    fn test_clean_route_has_no_findings() {
        let relation = connected_route(1);
        let check = checker(vec![relation.clone()]);

        assert!(check.evaluate(&relation).is_empty());
        assert!(check.flag(&relation).is_none());
    }

    #[test]
    fn test_empty_route() {
        let relation = route(1).with_member("stop", node(1, loc(0.0, 0.0)));
        let check = checker(vec![relation.clone()]);

        assert_eq!(kinds(&check.evaluate(&relation)), vec!["empty"]);
    }

    #[test]
    fn test_mixed_route_with_gap() {
        let relation = route(1)
            .with_member("", edge(1, seg((0.0, 0.0), (1.0, 0.0))))
            .with_member("", line(2, seg((3.0, 0.0), (4.0, 0.0))));
        let check = checker(vec![relation.clone()]);

        let findings = check.evaluate(&relation);
        assert_eq!(kinds(&findings), vec!["mixed", "gap"]);
        assert!(matches!(
            findings[1],
            Finding::TrackGap {
                chained: 1,
                segments: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_stops_and_platforms_are_independent() {
        let relation = connected_route(1).with_member(
            "platform",
            MemberEntity::Point {
                id: MemberIdentifier::new(99),
                location: loc(1.5, 0.01),
            },
        );
        let check = checker(vec![relation.clone()]);

        assert_eq!(kinds(&check.evaluate(&relation)), vec!["platforms"]);
    }

    #[test]
    fn test_public_transport_route_outside_group() {
        let relation = connected_route(1).with_tag("route", "bus");
        let hiking = connected_route(2).with_tag("route", "hiking");
        let check = checker(vec![relation.clone(), hiking.clone()]);

        let findings = check.evaluate(&relation);
        assert_eq!(
            findings,
            vec![Finding::NotInRouteGroup {
                route: RelationIdentifier::new(1),
                route_type: "bus".to_string(),
            }]
        );
        assert!(check.evaluate(&hiking).is_empty());
    }

    #[test]
    fn test_route_master_evaluates_members_once() {
        let tags = [("network", "VBB"), ("operator", "BVG"), ("ref", "M10"), ("colour", "red")];
        let mut master = RelationImpl::new(RelationIdentifier::new(100))
            .with_tag("type", "route_master")
            .with_member("", rel(1))
            .with_member("", rel(2))
            .with_member("", node(7, loc(0.0, 0.0)));
        let mut forward = connected_route(1).with_tag("route", "tram");
        let mut backward = route(2)
            .with_tag("route", "tram")
            .with_member("", edge(20, seg((0.0, 0.0), (1.0, 0.0))))
            .with_member("", edge(21, seg((5.0, 0.0), (6.0, 0.0))));
        for (k, v) in tags {
            master = master.with_tag(k, v);
            forward = forward.with_tag(k, v);
            backward = backward.with_tag(k, if k == "colour" { "blue" } else { v });
        }

        let check = checker(vec![forward.clone(), backward.clone(), master.clone()]);
        assert!(check.in_scope(&master));

        let findings = check.evaluate(&master);
        assert_eq!(kinds(&findings), vec!["gap", "non_route", "inconsistent"]);
        assert!(findings.contains(&Finding::InconsistentTag {
            group: RelationIdentifier::new(100),
            route: RelationIdentifier::new(2),
            tag: GroupTag::Colour,
        }));

        // Members were claimed by the group evaluation
        assert!(!check.in_scope(&forward));
        assert!(!check.in_scope(&master));
        assert!(check.evaluate(&backward).is_empty());
    }

    #[test]
    fn test_route_master_missing_tags() {
        let master = RelationImpl::new(RelationIdentifier::new(100))
            .with_tag("type", "route_master")
            .with_tag("ref", "1")
            .with_member("", rel(1));
        let member = connected_route(1)
            .with_tag("network", "N")
            .with_tag("operator", "O")
            .with_tag("ref", "1")
            .with_tag("colour", "c");
        let check = checker(vec![member, master.clone()]);

        let findings = check.evaluate(&master);
        assert_eq!(
            findings,
            vec![Finding::MissingGroupTags {
                relation: RelationIdentifier::new(100),
                missing: vec![GroupTag::Network, GroupTag::Operator, GroupTag::Colour],
            }]
        );
    }

    #[test]
    fn test_out_of_scope_relations() {
        let multipolygon =
            RelationImpl::new(RelationIdentifier::new(5)).with_tag("type", "multipolygon");
        let check = checker(vec![multipolygon.clone()]);

        assert!(!check.in_scope(&multipolygon));
        assert!(check.evaluate(&multipolygon).is_empty());
        assert!(check.processed().is_empty());
    }

    #[test]
    fn test_run_flags_each_route_once() {
        let far = connected_route(1)
            .with_tag("route", "bus")
            .with_member("stop", node(13, loc(5.0, 5.0)));
        let master = RelationImpl::new(RelationIdentifier::new(100))
            .with_tag("type", "route_master")
            .with_tag("network", "N")
            .with_tag("operator", "O")
            .with_tag("ref", "1")
            .with_tag("colour", "c")
            .with_member("", rel(1));
        let far = far
            .with_tag("network", "N")
            .with_tag("operator", "O")
            .with_tag("ref", "1")
            .with_tag("colour", "c");
        let clean = connected_route(2);
        let check = checker(vec![far, master, clean]);

        let flags = check.run();
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].relation, RelationIdentifier::new(1));
        assert_eq!(kinds(&flags[0].findings), vec!["stops"]);
        assert_eq!(check.processed().len(), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let provider = Arc::new(StaticRelationProvider::new());
        let config = CheckConfig {
            proximity_threshold_meters: -1.0,
            ..CheckConfig::default()
        };
        assert!(RouteRelationCheck::new(config, provider).is_err());
    }

    #[test]
    fn test_concurrent_claims_mark_once() {
        let processed = ProcessedRelations::new();
        let id = RelationIdentifier::new(42);

        let winners: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| processed.claim(id)))
                .collect();
            handles
                .into_iter()
                .map(|h| usize::from(h.join().unwrap()))
                .sum()
        });

        assert_eq!(winners, 1);
        assert!(processed.contains(id));
    }

    #[test]
    fn test_shared_processed_set() {
        let relation = connected_route(1).with_member("stop", node(13, loc(5.0, 5.0)));
        let provider: Arc<dyn RelationProvider> =
            Arc::new(StaticRelationProvider::from_data(vec![relation.clone()]));
        let processed = Arc::new(ProcessedRelations::new());

        let first = RouteRelationCheck::new(CheckConfig::default(), provider.clone())
            .unwrap()
            .with_processed(processed.clone());
        let second = RouteRelationCheck::new(CheckConfig::default(), provider)
            .unwrap()
            .with_processed(processed);

        assert!(first.flag(&relation).is_some());
        assert!(second.flag(&relation).is_none());
    }
}
