//! # route-integrity
//!
//! Topological and spatial validation of transit route relations.
//!
//! ## Features
//!
//! - **Gap detection**: orders unordered track segments into one continuous
//!   chain and reports whether any segment could not be connected
//! - **Stop/platform proximity**: flags stops or platforms whose nearest
//!   track point is at or beyond a distance threshold (1.5 m by default)
//! - **Route masters**: membership and tag consistency between a route
//!   master and its routes
//! - **Pluggable data**: implement [`RelationProvider`] over your own store
//!
//! ## Example
//!
//! ```
//! use route_integrity::prelude::*;
//! use std::sync::Arc;
//!
//! let loc = |lat, lon| Location::from_degrees(lat, lon).unwrap();
//! let edge = |id, a, b| MemberEntity::Edge {
//!     id: MemberIdentifier::new(id),
//!     main: true,
//!     geometry: Segment::new(vec![a, b]).unwrap(),
//! };
//!
//! let route = RelationImpl::new(RelationIdentifier::new(1))
//!     .with_tag("type", "route")
//!     .with_member("", edge(10, loc(0.0, 0.0), loc(1.0, 0.0)))
//!     .with_member("", edge(11, loc(1.0, 0.0), loc(2.0, 0.0)))
//!     .with_member("stop", MemberEntity::Node {
//!         id: MemberIdentifier::new(12),
//!         location: loc(5.0, 5.0),
//!     });
//!
//! let provider = Arc::new(StaticRelationProvider::from_data(vec![route]));
//! let check = RouteRelationCheck::new(CheckConfig::default(), provider).unwrap();
//!
//! let flags = check.run();
//! assert_eq!(flags.len(), 1);
//! assert!(matches!(flags[0].findings[0], Finding::StopsTooFar { .. }));
//! ```

pub mod config;
pub mod identifiers;
pub mod models;
pub mod provider;
pub mod spatial;
pub mod validation;

// Re-exports for convenience
pub mod prelude {
    pub use crate::config::CheckConfig;
    pub use crate::identifiers::*;
    pub use crate::models::{
        Distance, Location, LocationSet, MemberEntity, Relation, RelationMember, RelationProvider,
        RelationType, RouteError, Segment, SegmentSet,
    };
    pub use crate::provider::{RelationImpl, StaticRelationProvider};
    pub use crate::spatial::{snap_to, SnapResult};
    pub use crate::validation::{
        build_chain, extract_geometry, too_far, Check, CheckFlag, Finding, GroupTag,
        ProcessedRelations, ProximityEvaluator, ProximityVerdict, RouteChain,
        RouteChainBuilder, RouteGeometry, RouteRelationCheck,
    };
}

pub use prelude::*;
