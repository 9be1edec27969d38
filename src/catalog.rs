//! Static entity catalog: building specifications, demand points, and the
//! monitored substation sites used by the disaster simulation.
//!
//! Pure data with no behavior beyond lookup helpers.

use serde::{Deserialize, Serialize};

/// Technology era gating catalog purchases.
///
/// Eras are ordered: a building is purchasable once the grid has reached
/// its era or a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Era {
    /// Coal generation and low-voltage transmission.
    Dawn,
    /// Large thermal plants and high-voltage transmission.
    Growth,
    /// Renewables and sensor-equipped smart grid assets.
    Innovation,
}

impl Era {
    /// The era that follows this one, or `None` at the end of the tree.
    pub fn next(self) -> Option<Era> {
        match self {
            Era::Dawn => Some(Era::Growth),
            Era::Growth => Some(Era::Innovation),
            Era::Innovation => None,
        }
    }
}

/// Kind-specific attribute of a placeable building.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Produces power; `output_mw` feeds the generation total.
    Generator {
        /// Rated output in megawatts.
        output_mw: f32,
    },
    /// Relays power; `range` bounds auto-connect distance.
    Tower {
        /// Maximum link distance in map units.
        range: f32,
    },
    /// Steps power down toward demand points.
    Substation {
        /// Rated capacity in megawatts.
        capacity_mw: f32,
    },
}

impl BuildingKind {
    /// Returns `true` for generator-kind buildings.
    pub fn is_generator(&self) -> bool {
        matches!(self, BuildingKind::Generator { .. })
    }

    /// Returns `true` for tower-kind buildings.
    pub fn is_tower(&self) -> bool {
        matches!(self, BuildingKind::Tower { .. })
    }

    /// Returns `true` for substation-kind buildings.
    pub fn is_substation(&self) -> bool {
        matches!(self, BuildingKind::Substation { .. })
    }
}

/// Catalog definition of a purchasable building.
#[derive(Debug, Clone, Copy)]
pub struct BuildingSpec {
    /// Stable catalog identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Kind and kind-specific attribute.
    pub kind: BuildingKind,
    /// Purchase cost in coins.
    pub cost: u32,
    /// Era in which the building becomes purchasable.
    pub era: Era,
    /// Included in the one-time starter allotment.
    pub starter_pack: bool,
}

/// Full building catalog across all three eras.
pub const BUILDING_SPECS: &[BuildingSpec] = &[
    BuildingSpec {
        id: "coal_gen",
        name: "Coal Generator",
        kind: BuildingKind::Generator { output_mw: 50.0 },
        cost: 100,
        era: Era::Dawn,
        starter_pack: true,
    },
    BuildingSpec {
        id: "oil_gen",
        name: "Oil Power Plant",
        kind: BuildingKind::Generator { output_mw: 150.0 },
        cost: 300,
        era: Era::Growth,
        starter_pack: false,
    },
    BuildingSpec {
        id: "solar_gen",
        name: "Solar Farm",
        kind: BuildingKind::Generator { output_mw: 100.0 },
        cost: 400,
        era: Era::Innovation,
        starter_pack: false,
    },
    BuildingSpec {
        id: "wind_gen",
        name: "Wind Farm",
        kind: BuildingKind::Generator { output_mw: 120.0 },
        cost: 450,
        era: Era::Innovation,
        starter_pack: false,
    },
    BuildingSpec {
        id: "basic_tower",
        name: "Transmission Tower",
        kind: BuildingKind::Tower { range: 150.0 },
        cost: 50,
        era: Era::Dawn,
        starter_pack: true,
    },
    BuildingSpec {
        id: "high_tower",
        name: "High-Voltage Tower",
        kind: BuildingKind::Tower { range: 250.0 },
        cost: 120,
        era: Era::Growth,
        starter_pack: false,
    },
    BuildingSpec {
        id: "smart_tower",
        name: "Smart Tower",
        kind: BuildingKind::Tower { range: 300.0 },
        cost: 200,
        era: Era::Innovation,
        starter_pack: false,
    },
    BuildingSpec {
        id: "basic_sub",
        name: "Basic Substation",
        kind: BuildingKind::Substation { capacity_mw: 100.0 },
        cost: 150,
        era: Era::Dawn,
        starter_pack: true,
    },
    BuildingSpec {
        id: "auto_sub",
        name: "Automated Substation",
        kind: BuildingKind::Substation { capacity_mw: 300.0 },
        cost: 400,
        era: Era::Growth,
        starter_pack: false,
    },
    BuildingSpec {
        id: "ai_sub",
        name: "Predictive Substation",
        kind: BuildingKind::Substation { capacity_mw: 600.0 },
        cost: 800,
        era: Era::Innovation,
        starter_pack: false,
    },
];

/// Looks up a building spec by catalog id.
pub fn building_spec(id: &str) -> Option<&'static BuildingSpec> {
    BUILDING_SPECS.iter().find(|s| s.id == id)
}

/// Specs included in the starter allotment, in catalog order.
pub fn starter_pack_specs() -> impl Iterator<Item = &'static BuildingSpec> {
    BUILDING_SPECS.iter().filter(|s| s.starter_pack)
}

/// Classification of a demand point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandKind {
    Village,
    Industrial,
}

/// Seed definition of a demand point on the map.
#[derive(Debug, Clone, Copy)]
pub struct DemandPointSeed {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Map x coordinate.
    pub x: f32,
    /// Map y coordinate.
    pub y: f32,
    /// Power demand in megawatts.
    pub demand_mw: f32,
    /// Village or industrial complex.
    pub kind: DemandKind,
}

/// Demand points seeded into a fresh grid, all initially dark.
pub const DEMAND_POINTS: &[DemandPointSeed] = &[
    DemandPointSeed {
        id: "village_coast",
        name: "Coastal Village",
        x: 560.0,
        y: 500.0,
        demand_mw: 50.0,
        kind: DemandKind::Village,
    },
    DemandPointSeed {
        id: "village_hill",
        name: "Hillside Village",
        x: 300.0,
        y: 420.0,
        demand_mw: 30.0,
        kind: DemandKind::Village,
    },
    DemandPointSeed {
        id: "village_plain",
        name: "Plains Village",
        x: 380.0,
        y: 350.0,
        demand_mw: 40.0,
        kind: DemandKind::Village,
    },
    DemandPointSeed {
        id: "industrial_changwon",
        name: "Changwon Industrial Complex",
        x: 440.0,
        y: 400.0,
        demand_mw: 200.0,
        kind: DemandKind::Industrial,
    },
    DemandPointSeed {
        id: "industrial_gimhae",
        name: "Gimhae Industrial Complex",
        x: 470.0,
        y: 340.0,
        demand_mw: 150.0,
        kind: DemandKind::Industrial,
    },
];

/// A monitored substation site in the disaster simulation.
///
/// Deliberately a separate entity set from placed grid assets: the
/// disaster engine models the regional transmission network, not the
/// player-built one.
#[derive(Debug, Clone, Copy)]
pub struct SubstationSite {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Map x coordinate.
    pub x: f32,
    /// Map y coordinate.
    pub y: f32,
    /// Rated capacity in megawatts.
    pub capacity_mw: f32,
    /// Customers served.
    pub customers: u32,
}

/// Regional substation sites monitored by the disaster engine.
pub const SUBSTATION_SITES: &[SubstationSite] = &[
    SubstationSite {
        id: "changwon",
        name: "Changwon Substation",
        x: 420.0,
        y: 380.0,
        capacity_mw: 1500.0,
        customers: 50_000,
    },
    SubstationSite {
        id: "jinju",
        name: "Jinju Substation",
        x: 280.0,
        y: 450.0,
        capacity_mw: 1200.0,
        customers: 35_000,
    },
    SubstationSite {
        id: "tongyeong",
        name: "Tongyeong Substation",
        x: 520.0,
        y: 480.0,
        capacity_mw: 800.0,
        customers: 20_000,
    },
    SubstationSite {
        id: "gimhae",
        name: "Gimhae Substation",
        x: 450.0,
        y: 320.0,
        capacity_mw: 1800.0,
        customers: 60_000,
    },
    SubstationSite {
        id: "masan",
        name: "Masan Substation",
        x: 400.0,
        y: 420.0,
        capacity_mw: 1000.0,
        customers: 30_000,
    },
];

/// Looks up a substation site by id.
pub fn substation_site(id: &str) -> Option<&'static SubstationSite> {
    SUBSTATION_SITES.iter().find(|s| s.id == id)
}
