//! Post-hoc summary report computed from a complete disaster run.

use std::fmt;

use serde::Serialize;

use super::engine::TickRecord;

/// Aggregate indicators derived from the full tick record vector.
///
/// Computed post-hoc to keep the per-tick data and the reported numbers
/// consistent.
#[derive(Debug, Clone, Serialize)]
pub struct DisasterReport {
    /// Simulated seconds covered.
    pub duration_s: u64,
    /// Weather transitions performed.
    pub weather_transitions: usize,
    /// Total outages over the run.
    pub outages_total: u32,
    /// Mean fraction of operational stations, as a percentage.
    pub availability_pct: f32,
    /// Fewest simultaneously operational stations.
    pub min_operational: usize,
    /// Largest blackout customer count observed.
    pub peak_blackout_customers: u64,
    /// Customers still dark at the end of the run.
    pub final_blackout_customers: u64,
    /// Mean of per-tick mean station risk.
    pub mean_risk: f32,
    /// Budget consumed by recovery actions.
    pub budget_spent: u32,
}

impl DisasterReport {
    /// Computes the report from the complete tick records.
    ///
    /// # Arguments
    ///
    /// * `records` - Every tick of the run, in order
    /// * `initial_budget` - Budget at engine construction
    pub fn from_records(records: &[TickRecord], initial_budget: u32) -> Self {
        if records.is_empty() {
            return Self {
                duration_s: 0,
                weather_transitions: 0,
                outages_total: 0,
                availability_pct: 100.0,
                min_operational: 0,
                peak_blackout_customers: 0,
                final_blackout_customers: 0,
                mean_risk: 0.0,
                budget_spent: 0,
            };
        }

        let n = records.len() as f32;
        let mut availability_sum = 0.0_f32;
        let mut risk_sum = 0.0_f32;
        let mut peak_blackout = 0_u64;
        let mut min_operational = usize::MAX;
        let mut transitions = 0_usize;

        for r in records {
            let total = r.operational + r.failed;
            if total > 0 {
                availability_sum += r.operational as f32 / total as f32;
            }
            risk_sum += r.mean_risk;
            peak_blackout = peak_blackout.max(r.blackout_customers);
            min_operational = min_operational.min(r.operational);
            if r.weather_changed {
                transitions += 1;
            }
        }

        let last = &records[records.len() - 1];
        Self {
            duration_s: last.elapsed_s,
            weather_transitions: transitions,
            outages_total: last.outages_total,
            availability_pct: 100.0 * availability_sum / n,
            min_operational,
            peak_blackout_customers: peak_blackout,
            final_blackout_customers: last.blackout_customers,
            mean_risk: risk_sum / n,
            budget_spent: initial_budget.saturating_sub(last.budget),
        }
    }
}

impl fmt::Display for DisasterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Disaster Response Report ---")?;
        writeln!(f, "Duration:              {} s", self.duration_s)?;
        writeln!(f, "Weather transitions:   {}", self.weather_transitions)?;
        writeln!(f, "Outages:               {}", self.outages_total)?;
        writeln!(f, "Availability:          {:.1}%", self.availability_pct)?;
        writeln!(f, "Min operational:       {}", self.min_operational)?;
        writeln!(
            f,
            "Peak blackout:         {} customers",
            self.peak_blackout_customers
        )?;
        writeln!(
            f,
            "Final blackout:        {} customers",
            self.final_blackout_customers
        )?;
        writeln!(f, "Mean risk:             {:.2}", self.mean_risk)?;
        write!(f, "Budget spent:          {}", self.budget_spent)
    }
}
