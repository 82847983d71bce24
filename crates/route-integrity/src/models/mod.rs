//! Route data models, types, and traits.

pub mod geometry;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use geometry::{Distance, Location, LocationSet, Segment, SegmentSet, DM7_PER_DEGREE};
pub use traits::{Relation, RelationProvider};
pub use types::{MemberEntity, RelationMember, RelationType, Result, RouteError};
