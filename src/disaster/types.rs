//! Disaster-mode entities: monitored substations, recovery resources, and
//! the error taxonomy of recovery actions.

use std::fmt;

use serde::Serialize;

use crate::grid::Position;

/// A monitored regional substation.
///
/// A deliberately separate, simplified entity set from the player-built
/// grid assets; identity is the catalog site id.
#[derive(Debug, Clone, Serialize)]
pub struct Substation {
    /// Catalog site id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Map position.
    pub position: Position,
    /// Rated capacity in megawatts.
    pub capacity_mw: f32,
    /// Customers served.
    pub customers: u32,
    /// Last rolled effective risk, in `[0, 5]`; overwritten every weather
    /// cycle, never decayed.
    pub risk: f32,
    /// Whether the station currently delivers power.
    pub operational: bool,
    /// Load factor in `[0, 1]`, sampled once at construction.
    pub load: f32,
}

impl Substation {
    /// Returns `true` when the station's risk exceeds `threshold`.
    pub fn is_at_risk(&self, threshold: f32) -> bool {
        self.risk > threshold
    }
}

/// Finite recovery resource pools.
///
/// Mutated only by recovery actions and scheduled crew returns. The
/// budget is rejected-before-spend and can never go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourcePool {
    /// Repair crews ready for deployment.
    pub repair_crews: u32,
    /// Remaining budget.
    pub budget: u32,
    /// Emergency power reserve; consumable, never replenished.
    pub emergency_power: u32,
}

/// Recoverable failure of a recovery action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisasterError {
    /// No monitored station with the given id.
    UnknownStation(String),
    /// Repair was requested for a station that is already operational.
    StationOperational(String),
    /// A resource pool is below the required amount.
    InsufficientResource {
        /// Which pool fell short: `"repair crews"`, `"emergency power"`,
        /// or `"budget"`.
        resource: &'static str,
    },
}

impl fmt::Display for DisasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisasterError::UnknownStation(id) => write!(f, "unknown station \"{id}\""),
            DisasterError::StationOperational(id) => {
                write!(f, "station \"{id}\" is already operational")
            }
            DisasterError::InsufficientResource { resource } => {
                write!(f, "insufficient {resource}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_risk_is_strict_threshold() {
        let station = Substation {
            id: "s".into(),
            name: "S".into(),
            position: Position::new(0.0, 0.0),
            capacity_mw: 100.0,
            customers: 1000,
            risk: 2.0,
            operational: true,
            load: 0.5,
        };
        assert!(!station.is_at_risk(2.0));
        let hot = Substation {
            risk: 2.1,
            ..station
        };
        assert!(hot.is_at_risk(2.0));
    }

    #[test]
    fn error_display_does_not_panic() {
        let errors = [
            DisasterError::UnknownStation("nowhere".into()),
            DisasterError::StationOperational("changwon".into()),
            DisasterError::InsufficientResource {
                resource: "repair crews",
            },
        ];
        for e in errors {
            assert!(!format!("{e}").is_empty());
        }
    }
}
