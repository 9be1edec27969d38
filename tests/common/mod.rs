//! Shared test fixtures for integration tests.

use grid_sim::catalog::DemandKind;
use grid_sim::config::ScenarioConfig;
use grid_sim::disaster::DisasterSim;
use grid_sim::grid::{AssetId, DemandPoint, GridStore, Position};

/// Default scenario configuration (baseline preset).
pub fn default_scenario() -> ScenarioConfig {
    ScenarioConfig::baseline()
}

/// Fresh grid store with baseline settings and the catalog demand points.
pub fn default_store() -> GridStore {
    let cfg = default_scenario();
    GridStore::new(cfg.grid, cfg.economy)
}

/// Grid store whose only demand point sits at `pos` with the given demand.
pub fn store_with_demand_point(pos: (f32, f32), demand_mw: f32) -> GridStore {
    let cfg = default_scenario();
    GridStore::new(cfg.grid, cfg.economy).with_demand_points(vec![DemandPoint {
        id: "probe".into(),
        name: "Probe Point".into(),
        position: Position::new(pos.0, pos.1),
        demand_mw,
        power_mw: 0.0,
        kind: DemandKind::Village,
    }])
}

/// Claims the starter pack and returns `(generator, tower, substation)`.
///
/// Relies on the starter allotment order: generator, tower, substation.
pub fn claim_starter_trio(store: &mut GridStore) -> (AssetId, AssetId, AssetId) {
    let ids = store.claim_starter_pack().expect("starter pack claim");
    assert_eq!(ids.len(), 3, "starter pack should hold exactly three assets");
    (ids[0], ids[1], ids[2])
}

/// Disaster engine with baseline settings and the given seed.
pub fn default_disaster(seed: u64) -> DisasterSim {
    let cfg = default_scenario();
    DisasterSim::new(cfg.weather, cfg.resources, seed)
}
