//! Structured events published for the narrative layer. The engine never
//! renders text; it reports what happened and where.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::denizen::DenizenId;
use crate::grid::ZoneType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclineCause {
    NoRoad,
    Pollution,
    LongCommute,
    Stagnation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartureReason {
    Decline,
    Unemployment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionReason {
    Overcrowded,
    Bulldozed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    Growth {
        address: Address,
        zone: ZoneType,
    },
    Decline {
        address: Address,
        cause: DeclineCause,
        /// The departing resident, once the ledger knows who it was.
        resident: Option<DenizenId>,
    },
    Bust {
        address: Address,
        zone: ZoneType,
    },
    Hired {
        denizen: DenizenId,
        work: Address,
    },
    Fired {
        denizen: DenizenId,
        work: Address,
    },
    LaidOff {
        denizen: DenizenId,
        work: Address,
    },
    WorkplaceDemolished {
        denizen: DenizenId,
        work: Address,
    },
    Moved {
        denizen: DenizenId,
        from: Address,
        to: Address,
    },
    Arrived {
        denizen: DenizenId,
        home: Address,
        drift: bool,
    },
    Departed {
        denizen: DenizenId,
        home: Option<Address>,
        reason: DepartureReason,
    },
    Evicted {
        denizen: DenizenId,
        home: Address,
        reason: EvictionReason,
    },
    Rezoned {
        address: Address,
        from: ZoneType,
        to: ZoneType,
    },
    Bulldozed {
        address: Address,
        from: ZoneType,
    },
}

impl SimEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SimEvent::Growth { .. } => "growth",
            SimEvent::Decline { .. } => "decline",
            SimEvent::Bust { .. } => "bust",
            SimEvent::Hired { .. } => "hired",
            SimEvent::Fired { .. } => "fired",
            SimEvent::LaidOff { .. } => "laid_off",
            SimEvent::WorkplaceDemolished { .. } => "workplace_demolished",
            SimEvent::Moved { .. } => "moved",
            SimEvent::Arrived { .. } => "arrived",
            SimEvent::Departed { .. } => "departed",
            SimEvent::Evicted { .. } => "evicted",
            SimEvent::Rezoned { .. } => "rezoned",
            SimEvent::Bulldozed { .. } => "bulldozed",
        }
    }
}
