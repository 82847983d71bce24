//! Check configuration.

use crate::models::geometry::Distance;
use crate::models::types::{Result, RouteError};

/// Stops and platforms at or beyond this distance from the track are flagged
pub const DEFAULT_PROXIMITY_THRESHOLD_METERS: f64 = 1.5;

/// `route=*` values that must belong to a route master
pub const DEFAULT_PUBLIC_TRANSPORT_TYPES: &[&str] =
    &["train", "bus", "railway", "rail", "tram", "aircraft", "ferry"];

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CheckConfig {
    pub proximity_threshold_meters: f64,
    pub public_transport_types: Vec<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            proximity_threshold_meters: DEFAULT_PROXIMITY_THRESHOLD_METERS,
            public_transport_types: DEFAULT_PUBLIC_TRANSPORT_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl CheckConfig {
    pub fn validate(&self) -> Result<()> {
        let threshold = self.proximity_threshold_meters;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(RouteError::InvalidConfig(format!(
                "proximity_threshold_meters must be a positive number, got {}",
                threshold
            )));
        }
        Ok(())
    }

    pub fn proximity_threshold(&self) -> Distance {
        Distance::meters(self.proximity_threshold_meters)
    }

    pub fn is_public_transport(&self, route_type: &str) -> bool {
        self.public_transport_types.iter().any(|t| t == route_type)
    }
}
