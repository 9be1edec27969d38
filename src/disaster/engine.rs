//! Disaster simulation engine: weather transitions, outage rolls, and
//! recovery resource accounting on a single virtual clock.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::catalog;
use crate::config::{ResourceSettings, WeatherSettings};
use crate::grid::Position;
use crate::log::{EventLog, Severity};

use super::advisor::{self, Recommendation};
use super::types::{DisasterError, ResourcePool, Substation};
use super::weather::{self, WeatherKind};

/// Snapshot of the engine after one simulated second.
#[derive(Debug, Clone, Serialize)]
pub struct TickRecord {
    /// Seconds elapsed, 1-based.
    pub elapsed_s: u64,
    /// Weather in effect after this tick.
    pub weather: WeatherKind,
    /// Whether this tick performed a weather transition.
    pub weather_changed: bool,
    /// Cosmetic countdown to the next transition, floored at 0.
    pub time_to_next_change_s: u32,
    /// Stations currently delivering power.
    pub operational: usize,
    /// Stations currently dark.
    pub failed: usize,
    /// Mean station risk.
    pub mean_risk: f32,
    /// Customers currently without power.
    pub blackout_customers: u64,
    /// Cumulative outage count since construction.
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

impl fmt::Display for TickRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4}s | weather={:<10} (next in {:>2}s) | ops={}/{} risk={:.2} | \
             blackout={:>6} | crews={}(+{} out) emerg={} budget={}",
            self.elapsed_s,
            self.weather.label(),
            self.time_to_next_change_s,
            self.operational,
            self.operational + self.failed,
            self.mean_risk,
            self.blackout_customers,
            self.repair_crews,
            self.crews_in_cooldown,
            self.emergency_power,
            self.budget,
        )
    }
}

/// Disaster-response simulation over the monitored substation sites.
///
/// Single-threaded and stepped by [`tick`](DisasterSim::tick) in one-second
/// increments; the weather interval, the cosmetic countdown, and deferred
/// crew returns are all events on that one virtual clock, so a test can
/// advance time deterministically. Dropping or resetting the engine cancels
/// every pending event.
pub struct DisasterSim {
    weather_cfg: WeatherSettings,
    resource_cfg: ResourceSettings,
    seed: u64,
    stations: Vec<Substation>,
    weather: WeatherKind,
    time_to_next_change: u32,
    next_change_at_s: u64,
    resources: ResourcePool,
    crew_cap: u32,
    blackout_customers: u64,
    outages_total: u32,
    weather_transitions: u64,
    recommendations: Vec<Recommendation>,
    log: EventLog,
    /// Due times (absolute seconds) of deployed crews, unordered.
    pending_returns: Vec<u64>,
    elapsed_s: u64,
    rng: StdRng,
}

impl DisasterSim {
    /// Creates an engine over the catalog substation sites.
    ///
    /// Station load factors are sampled once from the seeded RNG; runs with
    /// the same settings and seed are identical.
    pub fn new(weather_cfg: WeatherSettings, resource_cfg: ResourceSettings, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let stations = catalog::SUBSTATION_SITES
            .iter()
            .map(|site| Substation {
                id: site.id.to_string(),
                name: site.name.to_string(),
                position: Position::new(site.x, site.y),
                capacity_mw: site.capacity_mw,
                customers: site.customers,
                risk: 0.0,
                operational: true,
                load: rng.random_range(0.3..1.0),
            })
            .collect();
        let resources = ResourcePool {
            repair_crews: resource_cfg.repair_crews,
            budget: resource_cfg.budget,
            emergency_power: resource_cfg.emergency_power,
        };
        let log = EventLog::new(weather_cfg.log_capacity);
        let interval = weather_cfg.change_interval_s;
        Self {
            weather_cfg,
            crew_cap: resource_cfg.repair_crews,
            resource_cfg,
            seed,
            stations,
            weather: WeatherKind::Normal,
            time_to_next_change: interval,
            next_change_at_s: u64::from(interval),
            resources,
            blackout_customers: 0,
            outages_total: 0,
            weather_transitions: 0,
            recommendations: Vec::new(),
            log,
            pending_returns: Vec::new(),
            elapsed_s: 0,
            rng,
        }
    }

    /// Advances the simulation by one second and returns the tick snapshot.
    ///
    /// Per-second order: the cosmetic countdown decrements (floored at 0),
    /// due crew returns are credited, then a weather transition fires if
    /// the change interval has elapsed. The countdown itself never triggers
    /// a transition.
    pub fn tick(&mut self) -> TickRecord {
        self.elapsed_s += 1;
        self.time_to_next_change = self.time_to_next_change.saturating_sub(1);

        let now = self.elapsed_s;
        let due = self
            .pending_returns
            .iter()
            .filter(|&&at| at <= now)
            .count();
        if due > 0 {
            self.pending_returns.retain(|&at| at > now);
            self.resources.repair_crews =
                (self.resources.repair_crews + due as u32).min(self.crew_cap);
            self.log.push(
                format!("{due} repair crew(s) back at the depot"),
                Severity::Info,
                now,
            );
        }

        let mut weather_changed = false;
        if now == self.next_change_at_s {
            let next = weather::pick_next(&mut self.rng);
            self.transition_to(next);
            weather_changed = true;
        }

        self.tick_record(weather_changed)
    }

    /// Runs `seconds` ticks and returns every snapshot.
    pub fn run(&mut self, seconds: u64) -> Vec<TickRecord> {
        let mut records = Vec::with_capacity(seconds as usize);
        let mut clock = super::clock::Clock::new(seconds);
        clock.run(|_| records.push(self.tick()));
        records
    }

    /// Forces a weather transition to `kind`, as the scheduled timer would.
    ///
    /// Operator/scenario override: applies the full transition (log entry,
    /// per-station risk sweep, outage rolls, fresh recommendations) and
    /// restarts the change interval.
    pub fn set_weather(&mut self, kind: WeatherKind) {
        self.transition_to(kind);
    }

    fn transition_to(&mut self, kind: WeatherKind) {
        self.weather = kind;
        self.weather_transitions += 1;
        self.time_to_next_change = self.weather_cfg.change_interval_s;
        self.next_change_at_s = self.elapsed_s + u64::from(self.weather_cfg.change_interval_s);

        let at = self.elapsed_s;
        if kind.is_severe() {
            self.log.push(
                format!(
                    "weather alert: {} (risk level {:.0})",
                    kind.label(),
                    kind.risk_score()
                ),
                Severity::Warning,
                at,
            );
        } else {
            self.log
                .push("weather conditions back to normal", Severity::Success, at);
        }

        // Risk sweep: every station gets a fresh roll; at-risk operational
        // stations additionally face the outage roll.
        let threshold = self.weather_cfg.risk_threshold;
        let outage_p = self.weather_cfg.outage_probability;
        for station in self.stations.iter_mut() {
            let risk = weather::effective_risk(kind, &mut self.rng);
            let at_risk = risk > threshold;
            if at_risk && station.operational && self.rng.random::<f32>() < outage_p {
                station.operational = false;
                self.outages_total += 1;
                self.blackout_customers += u64::from(station.customers);
                self.log.push(
                    format!("{} lost power", station.name),
                    Severity::Error,
                    at,
                );
            }
            station.risk = risk;
        }

        let at_risk_count = self
            .stations
            .iter()
            .filter(|s| s.is_at_risk(threshold))
            .count();
        self.recommendations = advisor::generate(kind, at_risk_count);
    }

    /// Deploys a repair crew to a failed station.
    ///
    /// Requires an idle crew and sufficient budget; repairing a station
    /// that is already operational is rejected. On success the station
    /// comes back up with zero risk, its customers leave the blackout
    /// counter, and the crew returns to the pool after the configured
    /// delay — unavailable for redeployment in between.
    pub fn deploy_repair_crew(&mut self, station_id: &str) -> Result<(), DisasterError> {
        let index = self
            .stations
            .iter()
            .position(|s| s.id == station_id)
            .ok_or_else(|| DisasterError::UnknownStation(station_id.to_string()))?;
        if self.stations[index].operational {
            return Err(DisasterError::StationOperational(station_id.to_string()));
        }
        if self.resources.repair_crews == 0 {
            return Err(DisasterError::InsufficientResource {
                resource: "repair crews",
            });
        }
        if self.resources.budget < self.resource_cfg.crew_cost {
            return Err(DisasterError::InsufficientResource { resource: "budget" });
        }

        self.resources.repair_crews -= 1;
        self.resources.budget -= self.resource_cfg.crew_cost;
        self.pending_returns
            .push(self.elapsed_s + u64::from(self.resource_cfg.crew_return_delay_s));

        let station = &mut self.stations[index];
        station.operational = true;
        station.risk = 0.0;
        self.blackout_customers = self
            .blackout_customers
            .saturating_sub(u64::from(station.customers));
        self.log.push(
            format!("{} restored by repair crew", station.name),
            Severity::Success,
            self.elapsed_s,
        );
        Ok(())
    }

    /// Injects emergency power into a station.
    ///
    /// Consumes one unit of the non-regenerating reserve and budget; forces
    /// the station operational and reduces (not zeroes) its risk. Usable on
    /// operational stations as a preventive measure.
    pub fn use_emergency_power(&mut self, station_id: &str) -> Result<(), DisasterError> {
        let index = self
            .stations
            .iter()
            .position(|s| s.id == station_id)
            .ok_or_else(|| DisasterError::UnknownStation(station_id.to_string()))?;
        if self.resources.emergency_power == 0 {
            return Err(DisasterError::InsufficientResource {
                resource: "emergency power",
            });
        }
        if self.resources.budget < self.resource_cfg.emergency_cost {
            return Err(DisasterError::InsufficientResource { resource: "budget" });
        }

        self.resources.emergency_power -= 1;
        self.resources.budget -= self.resource_cfg.emergency_cost;

        let station = &mut self.stations[index];
        let was_dark = !station.operational;
        station.operational = true;
        station.risk = (station.risk - self.resource_cfg.emergency_risk_reduction).max(0.0);
        if was_dark {
            self.blackout_customers = self
                .blackout_customers
                .saturating_sub(u64::from(station.customers));
        }
        self.log.push(
            format!("emergency power injected at {}", station.name),
            Severity::Success,
            self.elapsed_s,
        );
        Ok(())
    }

    /// Cancels all pending events and restores the initial state.
    pub fn reset(&mut self) {
        *self = Self::new(
            self.weather_cfg.clone(),
            self.resource_cfg.clone(),
            self.seed,
        );
    }

    fn tick_record(&self, weather_changed: bool) -> TickRecord {
        let operational = self.stations.iter().filter(|s| s.operational).count();
        let mean_risk = if self.stations.is_empty() {
            0.0
        } else {
            self.stations.iter().map(|s| s.risk).sum::<f32>() / self.stations.len() as f32
        };
        TickRecord {
            elapsed_s: self.elapsed_s,
            weather: self.weather,
            weather_changed,
            time_to_next_change_s: self.time_to_next_change,
            operational,
            failed: self.stations.len() - operational,
            mean_risk,
            blackout_customers: self.blackout_customers,
            outages_total: self.outages_total,
            repair_crews: self.resources.repair_crews,
            crews_in_cooldown: self.crews_in_cooldown(),
            emergency_power: self.resources.emergency_power,
            budget: self.resources.budget,
        }
    }

    /// Current weather condition.
    pub fn weather(&self) -> WeatherKind {
        self.weather
    }

    /// Seconds until the next scheduled transition, cosmetic.
    pub fn time_to_next_change(&self) -> u32 {
        self.time_to_next_change
    }

    /// Monitored stations.
    pub fn stations(&self) -> &[Substation] {
        &self.stations
    }

    /// Current resource pools.
    pub fn resources(&self) -> ResourcePool {
        self.resources
    }

    /// Crews deployed and awaiting their scheduled return.
    pub fn crews_in_cooldown(&self) -> u32 {
        self.pending_returns.len() as u32
    }

    /// Customers currently without power.
    pub fn blackout_customers(&self) -> u64 {
        self.blackout_customers
    }

    /// Cumulative outages since construction.
    pub fn outages_total(&self) -> u32 {
        self.outages_total
    }

    /// Weather transitions performed, scheduled and forced alike.
    pub fn weather_transitions(&self) -> u64 {
        self.weather_transitions
    }

    /// Current recommendation list, newest generation only.
    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    /// Event log, newest first.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Seconds elapsed on the virtual clock.
    pub fn elapsed_s(&self) -> u64 {
        self.elapsed_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;

    fn sim(seed: u64) -> DisasterSim {
        let cfg = ScenarioConfig::baseline();
        DisasterSim::new(cfg.weather, cfg.resources, seed)
    }

    /// Forces an outage at the first station and returns its id.
    fn force_outage(sim: &mut DisasterSim) -> String {
        for attempt in 0.. {
            sim.set_weather(WeatherKind::Wildfire);
            if let Some(dark) = sim.stations().iter().find(|s| !s.operational) {
                return dark.id.clone();
            }
            assert!(attempt < 200, "wildfire should eventually cause an outage");
        }
        unreachable!()
    }

    #[test]
    fn starts_calm_and_fully_operational() {
        let sim = sim(42);
        assert_eq!(sim.weather(), WeatherKind::Normal);
        assert_eq!(sim.stations().len(), 5);
        assert!(sim.stations().iter().all(|s| s.operational));
        assert!(
            sim.stations()
                .iter()
                .all(|s| (0.3..1.0).contains(&s.load))
        );
        assert_eq!(sim.blackout_customers(), 0);
    }

    #[test]
    fn countdown_decrements_without_transitioning() {
        let mut sim = sim(42);
        let interval = sim.time_to_next_change();
        for expected in (1..interval).rev() {
            let record = sim.tick();
            assert_eq!(record.time_to_next_change_s, expected);
            assert!(!record.weather_changed);
        }
        assert_eq!(sim.weather_transitions(), 0);
    }

    #[test]
    fn transition_fires_exactly_on_the_interval() {
        let mut sim = sim(42);
        let interval = u64::from(sim.time_to_next_change());
        let mut changes = 0;
        for second in 1..=interval * 3 {
            let record = sim.tick();
            if record.weather_changed {
                changes += 1;
                assert_eq!(second % interval, 0, "transition off-schedule at {second}");
                // Countdown resets on transition.
                assert_eq!(record.time_to_next_change_s, interval as u32);
            }
        }
        assert_eq!(changes, 3);
        assert_eq!(sim.weather_transitions(), 3);
    }

    #[test]
    fn risk_is_overwritten_every_transition() {
        let mut sim = sim(7);
        sim.set_weather(WeatherKind::Typhoon);
        let risks_before: Vec<f32> = sim.stations().iter().map(|s| s.risk).collect();
        assert!(risks_before.iter().all(|&r| r >= 2.5));

        sim.set_weather(WeatherKind::Normal);
        assert!(sim.stations().iter().all(|s| s.risk == 0.0));
    }

    #[test]
    fn outage_adds_customers_to_blackout_counter() {
        let mut sim = sim(1);
        let dark_id = force_outage(&mut sim);
        let dark_customers: u64 = sim
            .stations()
            .iter()
            .filter(|s| !s.operational)
            .map(|s| u64::from(s.customers))
            .sum();
        assert_eq!(sim.blackout_customers(), dark_customers);
        assert!(sim.outages_total() > 0);
        assert!(!dark_id.is_empty());
    }

    #[test]
    fn repair_rejects_operational_station() {
        let mut sim = sim(42);
        assert_eq!(
            sim.deploy_repair_crew("changwon"),
            Err(DisasterError::StationOperational("changwon".into()))
        );
        // Nothing was consumed.
        assert_eq!(sim.resources().repair_crews, 5);
        assert_eq!(sim.resources().budget, 100_000);
    }

    #[test]
    fn repair_rejects_unknown_station() {
        let mut sim = sim(42);
        assert_eq!(
            sim.deploy_repair_crew("atlantis"),
            Err(DisasterError::UnknownStation("atlantis".into()))
        );
    }

    #[test]
    fn repair_restores_station_and_schedules_crew_return() {
        let mut sim = sim(3);
        let dark_id = force_outage(&mut sim);
        let blackout_before = sim.blackout_customers();
        let customers = u64::from(
            sim.stations()
                .iter()
                .find(|s| s.id == dark_id)
                .expect("station exists")
                .customers,
        );

        sim.deploy_repair_crew(&dark_id).expect("deploy succeeds");
        let station = sim
            .stations()
            .iter()
            .find(|s| s.id == dark_id)
            .expect("station exists");
        assert!(station.operational);
        assert_eq!(station.risk, 0.0);
        assert_eq!(sim.blackout_customers(), blackout_before - customers);
        assert_eq!(sim.resources().repair_crews, 4);
        assert_eq!(sim.crews_in_cooldown(), 1);
        assert_eq!(sim.resources().budget, 95_000);

        // The crew is unavailable during the cooldown window.
        for _ in 0..4 {
            sim.tick();
            assert_eq!(sim.resources().repair_crews, 4);
        }
        sim.tick();
        assert_eq!(sim.resources().repair_crews, 5);
        assert_eq!(sim.crews_in_cooldown(), 0);
    }

    #[test]
    fn crew_conservation_holds_through_a_stormy_run() {
        let cfg = ScenarioConfig::storm_stress();
        let cap = cfg.resources.repair_crews;
        let mut sim = DisasterSim::new(cfg.weather, cfg.resources, 99);

        for _ in 0..300 {
            sim.tick();
            if let Some(dark) = sim.stations().iter().find(|s| !s.operational) {
                let id = dark.id.clone();
                // Deployment may fail on resources; conservation must hold
                // either way.
                let _ = sim.deploy_repair_crew(&id);
            }
            assert_eq!(
                sim.resources().repair_crews + sim.crews_in_cooldown(),
                cap,
                "crew conservation violated at t={}",
                sim.elapsed_s()
            );
        }
    }

    #[test]
    fn emergency_power_is_consumable_and_reduces_risk() {
        let mut sim = sim(5);
        sim.set_weather(WeatherKind::Typhoon);
        let target = sim.stations()[0].id.clone();
        let risk_before = sim.stations()[0].risk;

        sim.use_emergency_power(&target).expect("first use");
        let station = &sim.stations()[0];
        assert!(station.operational);
        assert!((station.risk - (risk_before - 2.0).max(0.0)).abs() < 1e-6);
        assert_eq!(sim.resources().emergency_power, 2);
        assert_eq!(sim.resources().budget, 90_000);

        sim.use_emergency_power(&target).expect("second use");
        sim.use_emergency_power(&target).expect("third use");
        assert_eq!(
            sim.use_emergency_power(&target),
            Err(DisasterError::InsufficientResource {
                resource: "emergency power"
            })
        );

        // No replenishment, ever.
        for _ in 0..60 {
            sim.tick();
        }
        assert_eq!(sim.resources().emergency_power, 0);
    }

    #[test]
    fn budget_is_rejected_before_spend_and_never_negative() {
        let cfg = ScenarioConfig::baseline();
        let lean = crate::config::ResourceSettings {
            budget: 4_000, // below one crew deployment
            ..cfg.resources
        };
        let mut sim = DisasterSim::new(cfg.weather, lean, 3);
        let dark_id = force_outage(&mut sim);

        assert_eq!(
            sim.deploy_repair_crew(&dark_id),
            Err(DisasterError::InsufficientResource { resource: "budget" })
        );
        assert_eq!(sim.resources().budget, 4_000);
        assert_eq!(sim.resources().repair_crews, 5);
        // The station stays dark; the action was not applied.
        assert!(
            sim.stations()
                .iter()
                .any(|s| s.id == dark_id && !s.operational)
        );
    }

    #[test]
    fn blackout_counter_floors_at_zero() {
        let mut sim = sim(8);
        sim.set_weather(WeatherKind::Normal);
        let target = sim.stations()[0].id.clone();
        // Emergency power on an operational station must not underflow the
        // counter.
        sim.use_emergency_power(&target).expect("use");
        assert_eq!(sim.blackout_customers(), 0);
    }

    #[test]
    fn wildfire_outage_rate_is_statistically_near_configured_probability() {
        let mut failures = 0_u32;
        let mut trials = 0_u32;
        for seed in 0..400_u64 {
            let mut sim = sim(seed);
            // All stations are operational and wildfire risk always clears
            // the threshold, so every station faces the outage roll.
            trials += sim.stations().len() as u32;
            sim.set_weather(WeatherKind::Wildfire);
            failures += sim.stations().iter().filter(|s| !s.operational).count() as u32;
        }
        let rate = f64::from(failures) / f64::from(trials);
        assert!(
            (0.25..=0.35).contains(&rate),
            "outage rate {rate:.3} outside [0.25, 0.35] over {trials} trials"
        );
    }

    #[test]
    fn recommendations_replace_wholesale_on_transition() {
        let mut sim = sim(13);
        sim.set_weather(WeatherKind::Wildfire);
        let wildfire_recs = sim.recommendations().to_vec();
        assert!(!wildfire_recs.is_empty());

        sim.set_weather(WeatherKind::Normal);
        // Normal weather zeroes risk, so only an empty list remains.
        assert!(sim.recommendations().is_empty());
    }

    #[test]
    fn fixed_seed_runs_are_identical() {
        let mut a = sim(1234);
        let mut b = sim(1234);
        let ra = a.run(120);
        let rb = b.run(120);
        assert_eq!(ra.len(), rb.len());
        for (x, y) in ra.iter().zip(rb.iter()) {
            assert_eq!(x.weather, y.weather);
            assert_eq!(x.operational, y.operational);
            assert_eq!(x.blackout_customers, y.blackout_customers);
            assert_eq!(x.budget, y.budget);
            assert_eq!(x.mean_risk, y.mean_risk);
        }
    }

    #[test]
    fn reset_cancels_pending_returns_and_restores_pools() {
        let mut sim = sim(3);
        let dark_id = force_outage(&mut sim);
        sim.deploy_repair_crew(&dark_id).expect("deploy");
        assert_eq!(sim.crews_in_cooldown(), 1);

        sim.reset();
        assert_eq!(sim.crews_in_cooldown(), 0);
        assert_eq!(sim.resources().repair_crews, 5);
        assert_eq!(sim.resources().budget, 100_000);
        assert_eq!(sim.elapsed_s(), 0);
        assert_eq!(sim.weather(), WeatherKind::Normal);
        assert!(sim.stations().iter().all(|s| s.operational));
    }

    #[test]
    fn tick_record_display_does_not_panic() {
        let mut sim = sim(42);
        let record = sim.tick();
        assert!(!format!("{record}").is_empty());
    }
}
