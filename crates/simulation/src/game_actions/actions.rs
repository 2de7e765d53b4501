//! Player-facing actions. Queued by the UI layer, drained by the executor.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameAction {
    /// Place the blueprint's building and resolve the turn.
    PlaceBuilding {
        r: usize,
        c: usize,
        blueprint_id: String,
    },
    /// Pick a blueprint for the next placement.
    SelectBlueprint { blueprint_id: String },
    /// Toggle a tile's optional upkeep payment; takes effect next turn.
    SetUpkeep { r: usize, c: usize, paid: bool },
    /// Pay money for one more blueprint roster slot.
    BuyBlueprintSlot,
    /// Throw everything away and start over.
    NewGame,
}

impl GameAction {
    /// Short description for the result log and snapshots.
    pub fn describe(&self) -> String {
        match self {
            GameAction::PlaceBuilding { r, c, blueprint_id } => {
                format!("place {blueprint_id} at ({r}, {c})")
            }
            GameAction::SelectBlueprint { blueprint_id } => {
                format!("select {blueprint_id}")
            }
            GameAction::SetUpkeep { r, c, paid } => {
                let verb = if *paid { "pay" } else { "stop" };
                format!("{verb} upkeep at ({r}, {c})")
            }
            GameAction::BuyBlueprintSlot => "buy blueprint slot".to_string(),
            GameAction::NewGame => "new game".to_string(),
        }
    }
}
