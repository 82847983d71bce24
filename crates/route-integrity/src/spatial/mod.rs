//! Distance and snapping utilities.

pub mod queries;

pub use queries::{haversine_distance, snap_to, SnapResult};
