//! Route integrity validation: geometry extraction, track chaining,
//! stop/platform proximity and route master consistency.

pub mod chain;
pub mod check;
pub mod extract;
pub mod finding;
pub mod group;
pub mod proximity;

pub use chain::{build_chain, RouteChain, RouteChainBuilder};
pub use check::{Check, ProcessedRelations, RouteRelationCheck};
pub use extract::{extract_geometry, RouteGeometry};
pub use finding::{CheckFlag, Finding};
pub use group::GroupTag;
pub use proximity::{too_far, NearestSegment, ProximityEvaluator, ProximityVerdict};
