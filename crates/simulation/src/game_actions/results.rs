//! Action outcomes and the reasons they fail.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionError {
    OutOfBounds { r: usize, c: usize },
    CellOccupied { r: usize, c: usize },
    NoTileThere { r: usize, c: usize },
    UnknownBlueprint { id: String },
    BlueprintNotUnlocked { id: String },
    AlreadyPlacedThisTurn,
    InsufficientFunds { needed: i64, have: i64 },
    GameOver,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::OutOfBounds { r, c } => write!(f, "({r}, {c}) is off the board"),
            ActionError::CellOccupied { r, c } => write!(f, "({r}, {c}) is occupied"),
            ActionError::NoTileThere { r, c } => write!(f, "no building at ({r}, {c})"),
            ActionError::UnknownBlueprint { id } => write!(f, "unknown blueprint {id:?}"),
            ActionError::BlueprintNotUnlocked { id } => {
                write!(f, "blueprint {id:?} is not unlocked")
            }
            ActionError::AlreadyPlacedThisTurn => write!(f, "already placed this turn"),
            ActionError::InsufficientFunds { needed, have } => {
                write!(f, "need {needed} money, have {have}")
            }
            ActionError::GameOver => write!(f, "the run is over"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionResult {
    Success { action: String },
    Failed { action: String, error: ActionError },
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success { .. })
    }
}
