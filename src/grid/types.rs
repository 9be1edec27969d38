//! Core grid types: assets, connections, demand points, and the error
//! taxonomy shared by all grid operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{BuildingKind, DemandKind, Era};

/// Stable identifier of a placeable asset, allocated sequentially by the
/// store. Ordering is used as the deterministic tie-break in auto-connect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AssetId(pub u32);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable identifier of a connection edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ConnectionId(pub u32);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A point on the 2-D map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Creates a position from map coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A placeable grid building.
///
/// Created unplaced (starter allotment or catalog purchase), placed exactly
/// once, and never removed except by a full reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Store-allocated identifier.
    pub id: AssetId,
    /// Catalog spec this asset was created from.
    pub spec_id: String,
    /// Display name, copied from the spec.
    pub name: String,
    /// Kind and kind-specific attribute.
    pub kind: BuildingKind,
    /// Map position once placed.
    pub position: Option<Position>,
    /// Whether the asset has been placed on the map.
    pub placed: bool,
    /// Operational status; only the disaster overlay ever clears this.
    pub operational: bool,
    /// Last assessed weather risk, `>= 0`.
    pub risk_level: f32,
}

impl Asset {
    /// Position of a placed asset.
    ///
    /// Returns `None` until the asset is placed.
    pub fn placed_position(&self) -> Option<Position> {
        if self.placed { self.position } else { None }
    }
}

/// Transmission technology of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Alternating-current line, the auto-connect default.
    Ac,
    /// High-voltage direct-current line, reachable only by upgrade.
    Hvdc,
}

/// An edge between two placed assets.
///
/// Undirected for coverage purposes; `from`/`to` record the canonical
/// orientation for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: AssetId,
    pub to: AssetId,
    pub kind: ConnectionKind,
    pub active: bool,
}

impl Connection {
    /// Returns `true` when `asset` is either endpoint.
    pub fn touches(&self, asset: AssetId) -> bool {
        self.from == asset || self.to == asset
    }

    /// Returns `true` when this edge joins `a` and `b` in either direction.
    pub fn links(&self, a: AssetId, b: AssetId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// A consumer location on the map with binary power fulfillment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandPoint {
    pub id: String,
    pub name: String,
    pub position: Position,
    /// Power demand in megawatts.
    pub demand_mw: f32,
    /// Delivered power: `0.0` or exactly `demand_mw`.
    pub power_mw: f32,
    pub kind: DemandKind,
}

impl DemandPoint {
    /// Returns `true` when the point currently receives its full demand.
    pub fn is_powered(&self) -> bool {
        self.power_mw > 0.0
    }
}

/// Lifecycle phase of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing claimed or placed yet.
    Initial,
    /// Starter pack claimed, construction under way.
    Building,
    /// At least one demand point has been energized.
    Operational,
}

/// Result of a coverage evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    /// Ids of demand points receiving power, in seed order.
    pub powered_demand_point_ids: Vec<String>,
    /// Sum of rated output over all placed generators, connected or not.
    pub total_generated_mw: f32,
    /// Sum of demand over powered demand points.
    pub total_delivered_mw: f32,
}

/// Non-fatal shortfall reported alongside a successful placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementWarning {
    /// Auto-connect found no placed tower within range.
    NoEligiblePartner,
}

/// Outcome of placing an asset, including any auto-created wiring.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementReport {
    /// The asset that was placed.
    pub asset: AssetId,
    /// Connections created by the auto-connector, in creation order.
    pub connections: Vec<ConnectionId>,
    /// Shortfall of the auto-connect pass, if any.
    pub warning: Option<PlacementWarning>,
}

/// Recoverable failure of a grid operation.
///
/// None of these are fatal; the operation is simply not applied and the
/// caller may resubmit.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Starter pack requested a second time.
    AlreadyClaimed,
    /// No asset with the given id.
    NotFound(AssetId),
    /// No connection with the given id.
    ConnectionNotFound(ConnectionId),
    /// Attempt to place an already-placed asset.
    AlreadyPlaced(AssetId),
    /// Connection endpoint is not placed.
    EndpointNotPlaced(AssetId),
    /// Connection endpoints are the same asset.
    SelfConnection(AssetId),
    /// An identical edge already joins the two endpoints.
    DuplicateConnection(AssetId, AssetId),
    /// No catalog spec with the given id.
    UnknownSpec(String),
    /// The spec belongs to an era the grid has not reached.
    EraLocked {
        spec: String,
        required: Era,
    },
    /// Not enough coins for the purchase.
    InsufficientCoins {
        needed: u32,
        have: u32,
    },
    /// Not enough experience for the exchange.
    InsufficientExp {
        needed: u32,
        have: u32,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::AlreadyClaimed => write!(f, "starter pack already claimed"),
            GridError::NotFound(id) => write!(f, "no asset {id}"),
            GridError::ConnectionNotFound(id) => write!(f, "no connection {id}"),
            GridError::AlreadyPlaced(id) => write!(f, "asset {id} is already placed"),
            GridError::EndpointNotPlaced(id) => {
                write!(f, "asset {id} must be placed before connecting")
            }
            GridError::SelfConnection(id) => {
                write!(f, "cannot connect asset {id} to itself")
            }
            GridError::DuplicateConnection(a, b) => {
                write!(f, "assets {a} and {b} are already connected")
            }
            GridError::UnknownSpec(id) => write!(f, "unknown building spec \"{id}\""),
            GridError::EraLocked { spec, required } => {
                write!(f, "\"{spec}\" requires the {required:?} era")
            }
            GridError::InsufficientCoins { needed, have } => {
                write!(f, "need {needed} coins, have {have}")
            }
            GridError::InsufficientExp { needed, have } => {
                write!(f, "need {needed} EXP, have {have}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn connection_links_is_undirected() {
        let conn = Connection {
            id: ConnectionId(0),
            from: AssetId(1),
            to: AssetId(2),
            kind: ConnectionKind::Ac,
            active: true,
        };
        assert!(conn.links(AssetId(1), AssetId(2)));
        assert!(conn.links(AssetId(2), AssetId(1)));
        assert!(!conn.links(AssetId(1), AssetId(3)));
        assert!(conn.touches(AssetId(2)));
        assert!(!conn.touches(AssetId(3)));
    }

    #[test]
    fn asset_ids_order_by_allocation() {
        assert!(AssetId(1) < AssetId(2));
    }

    #[test]
    fn error_display_does_not_panic() {
        let errors = [
            GridError::AlreadyClaimed,
            GridError::NotFound(AssetId(9)),
            GridError::AlreadyPlaced(AssetId(1)),
            GridError::EndpointNotPlaced(AssetId(2)),
            GridError::EraLocked {
                spec: "ai_sub".into(),
                required: Era::Innovation,
            },
            GridError::InsufficientCoins {
                needed: 100,
                have: 10,
            },
        ];
        for e in errors {
            assert!(!format!("{e}").is_empty());
        }
    }
}
