// ---------------------------------------------------------------------------
// Save structs and version constants
// ---------------------------------------------------------------------------

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Current save file version.
/// v1 = initial format (city ledger, blueprint state, grid tiles,
///      run status, turn history)
pub const CURRENT_SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveData {
    pub version: u32,
    /// 0 = playing, 1 = game over; see `save_codec`.
    pub phase: u8,
    pub city: SaveCity,
    pub grid: SaveGrid,
    pub history: Vec<SaveSnapshot>,
}

/// Mirror of `CityState`. Flow fields are kept so a freshly loaded city
/// shows the same dashboard numbers as the one that was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveCity {
    pub money: i64,
    pub population: i64,
    pub raw_goods_available: i64,
    pub products_available: i64,
    pub power_available: i64,
    pub power_capacity: i64,
    pub workforce_available: i64,
    pub jobs_capacity: i64,
    pub unemployed: i64,
    pub happiness: i64,
    pub turn: u32,
    pub service_coverage: i64,
    pub active_status_effects: Vec<String>,
    pub blueprints: SaveBlueprintState,
    pub last_turn: SaveTurnSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveBlueprintState {
    pub unlocked: Vec<String>,
    pub selected: Option<String>,
    pub max_slots: u32,
    pub placed_this_turn: bool,
    pub pending_unlocks: Vec<String>,
    pub slot_upgrade_granted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveTurnSummary {
    pub power_produced: i64,
    pub power_consumed: i64,
    pub power_utilization: i64,
    pub products_demanded: i64,
    pub products_consumed: i64,
    pub jobs_filled: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveGrid {
    pub size: u32,
    /// Occupied cells only; empty cells are implied.
    pub tiles: Vec<SaveTile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveTile {
    pub r: u32,
    pub c: u32,
    pub id: u32,
    pub building: u8,
    pub tier: u8,
    pub stars: u8,
    pub disabled: bool,
    /// 0 = not disabled; see `save_codec`.
    pub disabled_reason: u8,
    pub missing_reqs: Option<String>,
    pub upkeep_paid: bool,
    /// Resource tag / amount pairs, sorted by tag.
    pub storage: Vec<(u8, i64)>,
    pub produced_this_turn: Vec<(u8, i64)>,
}

/// Mirror of one `TurnSnapshot`: the board and ledger right after a turn
/// resolved, plus the diagnostic trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveSnapshot {
    pub turn: u32,
    pub action: String,
    pub grid: SaveGrid,
    pub city: SaveCity,
    pub stats: SaveStats,
    pub phase: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveStats {
    pub power_produced: i64,
    pub power_consumed: i64,
    pub power_utilization: i64,
    pub net_changes: Vec<(u8, i64)>,
    pub breakdown: Vec<SaveChangeEntry>,
    pub building_alerts: Vec<SaveAlert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveChangeEntry {
    pub source: String,
    pub resource: u8,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveAlert {
    pub r: u32,
    pub c: u32,
    pub building: u8,
    pub reason: u8,
    pub message: String,
}
