//! Player intents
//!
//! Commands are queued by `SimulationWorld::submit` and drained at the start
//! of the next tick, so nothing outside the tick ever mutates world state.

use serde::{Deserialize, Serialize};

use crate::city::building::BuildingType;
use crate::core::types::{BuildingId, GridPos};
use crate::economy::resources::ResourceKind;
use crate::workforce::focus::CollectiveFocus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimCommand {
    SetCollectiveFocus(CollectiveFocus),
    PlaceBuilding {
        building_type: BuildingType,
        position: GridPos,
    },
    Demolish(BuildingId),
    BlackMarketPurchase {
        resource: ResourceKind,
        amount: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    OutOfBounds,
    Unbuildable,
    Occupied,
    InsufficientMaterials,
    UnknownBuilding,
    /// Not for sale, or not enough money
    PurchaseRefused,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandOutcome {
    FocusChanged(CollectiveFocus),
    Placed(BuildingId),
    Demolished { building: BuildingId, released: u32 },
    Purchased { resource: ResourceKind, amount: f64, detected: bool },
    Rejected(RejectReason),
}

impl CommandOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, CommandOutcome::Rejected(_))
    }
}
