use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::HAPPINESS_MAX;
use crate::ruleset::Ruleset;

/// Whether the run is still live. Terminal conditions: happiness collapse
/// or a fully occupied board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Playing,
    GameOver,
}

/// Resource wrapper so systems can read the run state.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub phase: GamePhase,
}

/// Unlocked blueprints and placement bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintState {
    /// Blueprint ids the player holds, in unlock order.
    pub unlocked: Vec<String>,
    /// Blueprint currently selected for placement.
    pub selected: Option<String>,
    /// Roster cap; unlocking stops when `unlocked.len()` reaches it.
    pub max_slots: u32,
    /// One placement per turn; reset when the turn resolves.
    pub placed_this_turn: bool,
    /// Unlocks earned this turn, queued for the presentation layer.
    pub pending_unlocks: Vec<String>,
    /// The one-time slot upgrade has already fired.
    pub slot_upgrade_granted: bool,
}

/// Summary numbers from the last resolved turn, cached for status-effect
/// and unlock trigger evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnSummary {
    pub power_produced: i64,
    pub power_consumed: i64,
    /// Percent, 0..; 0 when nothing was produced.
    pub power_utilization: i64,
    pub products_demanded: i64,
    pub products_consumed: i64,
    pub jobs_filled: i64,
}

/// The aggregate resource ledger for one city instance.
///
/// Stocks (`money`, `raw_goods_available`, `products_available`) persist
/// across turns; flow fields are recomputed from scratch by every pipeline
/// run. This is the unit of snapshotting: the pipeline takes one by
/// reference and returns a brand-new one.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityState {
    pub money: i64,
    pub population: i64,
    pub raw_goods_available: i64,
    pub products_available: i64,

    pub power_available: i64,
    pub power_capacity: i64,
    pub workforce_available: i64,
    pub jobs_capacity: i64,
    pub unemployed: i64,

    /// Clamped 0..=100.
    pub happiness: i64,
    pub turn: u32,
    /// Percent 0..=100.
    pub service_coverage: i64,

    /// Effect ids active for the *next* turn's modifier phase, decided at
    /// the end of the current turn (one-turn latency by design).
    pub active_status_effects: Vec<String>,
    pub blueprint_state: BlueprintState,
    pub last_turn_stats: TurnSummary,
}

impl CityState {
    pub fn new(ruleset: &Ruleset) -> Self {
        Self {
            money: ruleset.initial_money,
            population: 0,
            raw_goods_available: 0,
            products_available: 0,
            power_available: 0,
            power_capacity: 0,
            workforce_available: 0,
            jobs_capacity: 0,
            unemployed: 0,
            happiness: HAPPINESS_MAX,
            turn: 0,
            service_coverage: 0,
            active_status_effects: Vec::new(),
            blueprint_state: BlueprintState {
                unlocked: ruleset.starting_blueprints.clone(),
                selected: None,
                max_slots: ruleset.initial_blueprint_slots,
                placed_this_turn: false,
                pending_unlocks: Vec::new(),
                slot_upgrade_granted: false,
            },
            last_turn_stats: TurnSummary::default(),
        }
    }

    pub fn clamp_happiness(&mut self) {
        self.happiness = self.happiness.clamp(0, HAPPINESS_MAX);
    }

    pub fn holds_blueprint(&self, id: &str) -> bool {
        self.blueprint_state.unlocked.iter().any(|b| b == id)
    }
}
