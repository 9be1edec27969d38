//! API response and query types.
//!
//! Field names follow the CSV schema v1 conventions for consistency across
//! export formats; the weather enum is flattened to its label.

use serde::{Deserialize, Serialize};

use crate::config::SimulationSettings;
use crate::disaster::{DisasterReport, TickRecord};

/// Combined state response: settings, report, and latest tick record.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    /// Simulation settings.
    pub settings: SimulationSettings,
    /// Aggregate disaster report.
    pub report: DisasterReport,
    /// Most recent tick record, if any tick has run.
    pub latest_tick: Option<TimelineRecord>,
}

/// Single tick record using CSV schema v1 field names.
#[derive(Debug, Serialize)]
pub struct TimelineRecord {
    /// Seconds elapsed, 1-based.
    pub elapsed_s: u64,
    /// Weather label, e.g. `"heavy rain"`.
    pub weather: &'static str,
    /// Whether this tick performed a weather transition.
    pub weather_changed: bool,
    /// Cosmetic countdown to the next transition.
    pub time_to_next_change_s: u32,
    /// Stations currently delivering power.
    pub operational: usize,
    /// Stations currently dark.
    pub failed: usize,
    /// Mean station risk.
    pub mean_risk: f32,
    /// Customers currently without power.
    pub blackout_customers: u64,
    /// Cumulative outage count.
    pub outages_total: u32,
    /// Repair crews ready for deployment.
    pub repair_crews: u32,
    /// Crews deployed and awaiting return.
    pub crews_in_cooldown: u32,
    /// Emergency power reserve.
    pub emergency_power: u32,
    /// Remaining budget.
    pub budget: u32,
}

impl From<&TickRecord> for TimelineRecord {
    fn from(r: &TickRecord) -> Self {
        Self {
            elapsed_s: r.elapsed_s,
            weather: r.weather.label(),
            weather_changed: r.weather_changed,
            time_to_next_change_s: r.time_to_next_change_s,
            operational: r.operational,
            failed: r.failed,
            mean_risk: r.mean_risk,
            blackout_customers: r.blackout_customers,
            outages_total: r.outages_total,
            repair_crews: r.repair_crews,
            crews_in_cooldown: r.crews_in_cooldown,
            emergency_power: r.emergency_power,
            budget: r.budget,
        }
    }
}

/// Optional range query parameters for the timeline endpoint.
#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    /// Start second (inclusive).
    pub from: Option<u64>,
    /// End second (inclusive).
    pub to: Option<u64>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
