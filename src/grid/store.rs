//! Grid state store: owns the mutable placement state and exposes the
//! synchronous operations the UI layer calls.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, BuildingSpec, Era};
use crate::config::{EconomySettings, GridSettings};
use crate::log::{EventLog, Severity};
use crate::snapshot::SnapshotStore;

use super::connect::plan_substation_links;
use super::coverage;
use super::types::{
    Asset, AssetId, Connection, ConnectionId, ConnectionKind, CoverageSummary, DemandPoint,
    GridError, Phase, PlacementReport, Position,
};

/// Complete serializable grid state.
///
/// One value, owned by one [`GridStore`] — there is no ambient global
/// state. Everything needed to resume a session round-trips through the
/// snapshot seam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridState {
    /// Current technology era.
    pub era: Era,
    /// All created assets, placed or not.
    pub assets: Vec<Asset>,
    /// All connection edges.
    pub connections: Vec<Connection>,
    /// Demand points with their current power levels.
    pub demand_points: Vec<DemandPoint>,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Whether the one-time starter allotment was claimed.
    pub starter_pack_claimed: bool,
    /// Experience balance, exchangeable for coins.
    pub exp: u32,
    /// Coin balance, spent on catalog purchases.
    pub coins: u32,
    /// Headline generation total from the last coverage pass.
    pub total_generated_mw: f32,
    /// Delivered total from the last coverage pass.
    pub total_delivered_mw: f32,
    next_asset_id: u32,
    next_connection_id: u32,
}

impl GridState {
    fn fresh(economy: &EconomySettings) -> Self {
        Self {
            era: Era::Dawn,
            assets: Vec::new(),
            connections: Vec::new(),
            demand_points: catalog::DEMAND_POINTS
                .iter()
                .map(|seed| DemandPoint {
                    id: seed.id.to_string(),
                    name: seed.name.to_string(),
                    position: Position::new(seed.x, seed.y),
                    demand_mw: seed.demand_mw,
                    power_mw: 0.0,
                    kind: seed.kind,
                })
                .collect(),
            phase: Phase::Initial,
            starter_pack_claimed: false,
            exp: economy.initial_exp,
            coins: economy.initial_coins,
            total_generated_mw: 0.0,
            total_delivered_mw: 0.0,
            next_asset_id: 1,
            next_connection_id: 1,
        }
    }

    /// Looks up an asset by id.
    pub fn asset(&self, id: AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Looks up a connection by id.
    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }
}

/// Controller owning the grid state and its event log.
///
/// All mutation goes through the methods below; each is synchronous and
/// atomic from the caller's perspective — a failed operation leaves the
/// state untouched.
#[derive(Debug, Clone)]
pub struct GridStore {
    state: GridState,
    grid: GridSettings,
    economy: EconomySettings,
    log: EventLog,
    ops: u64,
}

impl GridStore {
    /// Creates a store with a fresh state seeded from the catalog.
    pub fn new(grid: GridSettings, economy: EconomySettings) -> Self {
        let state = GridState::fresh(&economy);
        let log = EventLog::new(grid.log_capacity);
        Self {
            state,
            grid,
            economy,
            log,
            ops: 0,
        }
    }

    /// Creates a store, restoring state from `snapshots` when a previous
    /// session saved one.
    pub fn with_snapshot(
        grid: GridSettings,
        economy: EconomySettings,
        snapshots: &dyn SnapshotStore,
    ) -> Self {
        let mut store = Self::new(grid, economy);
        if let Some(saved) = snapshots.load() {
            store.state = saved;
            store.record("session restored from snapshot", Severity::Info);
        }
        store
    }

    /// Replaces the seeded demand points, for scenario scripting and tests.
    pub fn with_demand_points(mut self, points: Vec<DemandPoint>) -> Self {
        self.state.demand_points = points;
        self
    }

    /// Read-only view of the full state.
    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// Read-only view of the event log.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Best-effort persistence of the current state.
    ///
    /// Never blocks or fails the simulation; the store implementation
    /// swallows and reports write errors itself.
    pub fn persist_to(&self, snapshots: &dyn SnapshotStore) {
        snapshots.save(&self.state);
    }

    fn record(&mut self, message: impl Into<String>, severity: Severity) {
        self.ops += 1;
        self.log.push(message, severity, self.ops);
    }

    fn create_asset(&mut self, spec: &BuildingSpec) -> AssetId {
        let id = AssetId(self.state.next_asset_id);
        self.state.next_asset_id += 1;
        self.state.assets.push(Asset {
            id,
            spec_id: spec.id.to_string(),
            name: spec.name.to_string(),
            kind: spec.kind,
            position: None,
            placed: false,
            operational: true,
            risk_level: 0.0,
        });
        id
    }

    fn create_connection(&mut self, from: AssetId, to: AssetId) -> ConnectionId {
        let id = ConnectionId(self.state.next_connection_id);
        self.state.next_connection_id += 1;
        self.state.connections.push(Connection {
            id,
            from,
            to,
            kind: ConnectionKind::Ac,
            active: true,
        });
        id
    }

    /// Grants the one-time starter allotment of unplaced buildings.
    ///
    /// Moves the phase from `Initial` to `Building`.
    pub fn claim_starter_pack(&mut self) -> Result<Vec<AssetId>, GridError> {
        if self.state.starter_pack_claimed {
            return Err(GridError::AlreadyClaimed);
        }
        let specs: Vec<&'static BuildingSpec> = catalog::starter_pack_specs().collect();
        let ids: Vec<AssetId> = specs
            .into_iter()
            .map(|spec| self.create_asset(spec))
            .collect();
        self.state.starter_pack_claimed = true;
        self.state.phase = Phase::Building;
        self.record(
            format!("starter pack claimed: {} buildings", ids.len()),
            Severity::Success,
        );
        Ok(ids)
    }

    /// Buys a catalog building, creating it unplaced.
    ///
    /// Gated on the grid's current era and the coin balance.
    pub fn purchase_building(&mut self, spec_id: &str) -> Result<AssetId, GridError> {
        let spec = catalog::building_spec(spec_id)
            .ok_or_else(|| GridError::UnknownSpec(spec_id.to_string()))?;
        if spec.era > self.state.era {
            return Err(GridError::EraLocked {
                spec: spec_id.to_string(),
                required: spec.era,
            });
        }
        if self.state.coins < spec.cost {
            return Err(GridError::InsufficientCoins {
                needed: spec.cost,
                have: self.state.coins,
            });
        }
        self.state.coins -= spec.cost;
        let id = self.create_asset(spec);
        self.record(
            format!("{} purchased for {} coins", spec.name, spec.cost),
            Severity::Success,
        );
        Ok(id)
    }

    /// Exchanges experience for coins at the configured ratio.
    pub fn convert_exp_to_coins(&mut self, exp_amount: u32) -> Result<u32, GridError> {
        if self.state.exp < exp_amount {
            return Err(GridError::InsufficientExp {
                needed: exp_amount,
                have: self.state.exp,
            });
        }
        let coins = exp_amount * self.economy.exp_to_coin_ratio;
        self.state.exp -= exp_amount;
        self.state.coins += coins;
        self.record(
            format!("exchanged {exp_amount} EXP for {coins} coins"),
            Severity::Info,
        );
        Ok(coins)
    }

    /// Advances to the next era; saturates at the last one.
    pub fn advance_era(&mut self) -> Era {
        if let Some(next) = self.state.era.next() {
            self.state.era = next;
            self.record(format!("entered the {next:?} era"), Severity::Success);
        }
        self.state.era
    }

    /// Places an asset on the map.
    ///
    /// Placement happens exactly once per asset; re-placing is an error.
    /// Placing a substation triggers the auto-connector; a substation with
    /// no reachable tower stays placed and the report carries a warning.
    pub fn place_building(
        &mut self,
        id: AssetId,
        position: Position,
    ) -> Result<PlacementReport, GridError> {
        let index = self
            .state
            .assets
            .iter()
            .position(|a| a.id == id)
            .ok_or(GridError::NotFound(id))?;
        if self.state.assets[index].placed {
            return Err(GridError::AlreadyPlaced(id));
        }
        self.state.assets[index].position = Some(position);
        self.state.assets[index].placed = true;
        let name = self.state.assets[index].name.clone();
        self.record(
            format!(
                "{name} placed at ({:.0}, {:.0})",
                position.x, position.y
            ),
            Severity::Success,
        );

        let mut report = PlacementReport {
            asset: id,
            connections: Vec::new(),
            warning: None,
        };
        if self.state.assets[index].kind.is_substation() {
            let placed = self.state.assets[index].clone();
            let plan =
                plan_substation_links(&placed, &self.state.assets, &self.state.connections);
            for (from, to) in &plan.edges {
                report.connections.push(self.create_connection(*from, *to));
            }
            report.warning = plan.warning;
            match plan.warning {
                Some(_) => {
                    self.record(
                        format!("{name}: no transmission tower in range"),
                        Severity::Warning,
                    );
                }
                None => {
                    self.record(
                        format!("{name} auto-wired: {} new lines", report.connections.len()),
                        Severity::Success,
                    );
                }
            }
        }
        self.refresh_coverage();
        Ok(report)
    }

    /// Creates a manual connection between two placed assets.
    pub fn connect_buildings(
        &mut self,
        from: AssetId,
        to: AssetId,
    ) -> Result<ConnectionId, GridError> {
        if from == to {
            return Err(GridError::SelfConnection(from));
        }
        for endpoint in [from, to] {
            let asset = self
                .state
                .asset(endpoint)
                .ok_or(GridError::NotFound(endpoint))?;
            if !asset.placed {
                return Err(GridError::EndpointNotPlaced(endpoint));
            }
        }
        if self.state.connections.iter().any(|c| c.links(from, to)) {
            return Err(GridError::DuplicateConnection(from, to));
        }
        let id = self.create_connection(from, to);
        self.record(format!("line {id} built: {from} ↔ {to}"), Severity::Success);
        self.refresh_coverage();
        Ok(id)
    }

    /// Upgrades a line from AC to HVDC. Idempotent.
    pub fn upgrade_to_hvdc(&mut self, id: ConnectionId) -> Result<(), GridError> {
        let conn = self
            .state
            .connections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(GridError::ConnectionNotFound(id))?;
        conn.kind = ConnectionKind::Hvdc;
        self.record(format!("line {id} upgraded to HVDC"), Severity::Success);
        Ok(())
    }

    /// Re-derives demand-point coverage and generation totals.
    ///
    /// The first pass that energizes a demand point moves the phase to
    /// `Operational`.
    pub fn simulate_power_flow(&mut self) -> CoverageSummary {
        let summary = self.refresh_coverage();
        self.record(
            format!(
                "power flow: {:.0} MW generated, {:.0} MW delivered to {} demand points",
                summary.total_generated_mw,
                summary.total_delivered_mw,
                summary.powered_demand_point_ids.len()
            ),
            Severity::Info,
        );
        summary
    }

    fn refresh_coverage(&mut self) -> CoverageSummary {
        let summary = coverage::evaluate(
            &self.state.assets,
            &self.state.connections,
            &mut self.state.demand_points,
            self.grid.coverage_radius,
        );
        self.state.total_generated_mw = summary.total_generated_mw;
        self.state.total_delivered_mw = summary.total_delivered_mw;
        if summary.total_delivered_mw > 0.0 {
            self.state.phase = Phase::Operational;
        }
        summary
    }

    /// Administrative clear-all: restores the pristine state and wipes the
    /// log. The only path by which a placed asset ceases to exist.
    pub fn reset(&mut self) {
        self.state = GridState::fresh(&self.economy);
        self.log.clear();
        self.ops = 0;
    }
}
