/// Auto-connector for substation placement.
pub mod connect;
/// Demand-point coverage evaluation.
pub mod coverage;
pub mod store;
pub mod types;

pub use store::{GridState, GridStore};
pub use types::{
    Asset, AssetId, Connection, ConnectionId, ConnectionKind, CoverageSummary, DemandPoint,
    GridError, Phase, PlacementReport, PlacementWarning, Position,
};
