//! All tunable numbers and tables live here, loaded from JSON and validated
//! once at startup. Nothing in the pipeline hardcodes an economy constant.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::BuildingType;
use crate::resources::floor_scale;

mod conditions;
mod standard;
mod types;
mod validate;

pub use conditions::{all_hold, any_group_holds, holds, resolve};
pub use types::{
    Blueprint, BuildingStats, Comparison, Condition, ConditionSource, EffectAction,
    OptionalUpkeep, PopulationParams, PowerParams, ProductParams, SlotCosts, StatKey,
    StatusEffect, StorageParams,
};

/// A ruleset that fails validation is unusable; the app treats this as
/// fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "ruleset parse error: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid ruleset: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The complete game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    pub max_tier: u8,
    pub grid_size: usize,
    /// Coverage below this costs happiness each turn.
    pub min_service_coverage: i64,
    pub initial_money: i64,
    pub initial_blueprint_slots: u32,

    pub population: PopulationParams,
    pub product: ProductParams,
    pub power: PowerParams,
    pub storage: StorageParams,
    pub blueprint_slot_costs: SlotCosts,

    /// Relative weights for blueprint offer draws; must sum to 1.0.
    pub spawn_weights: BTreeMap<BuildingType, f32>,
    /// Stats per building type per tier (1..=max_tier).
    pub building_stats: BTreeMap<BuildingType, BTreeMap<u8, BuildingStats>>,

    pub starting_blueprints: Vec<String>,
    pub blueprints: BTreeMap<String, Blueprint>,
    pub status_effects: Vec<StatusEffect>,
}

impl Ruleset {
    /// Parse and validate a ruleset from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let ruleset: Ruleset =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    /// Stats table for a `(type, tier)` pair. Validation guarantees this is
    /// `Some` for every tier in `1..=max_tier`.
    pub fn stats_for(&self, building_type: BuildingType, tier: u8) -> Option<&BuildingStats> {
        self.building_stats.get(&building_type)?.get(&tier)
    }

    pub fn blueprint(&self, id: &str) -> Option<&Blueprint> {
        self.blueprints.get(id)
    }

    pub fn effect_by_id(&self, id: &str) -> Option<&StatusEffect> {
        self.status_effects.iter().find(|e| e.id == id)
    }

    /// Money cost of the nth additional blueprint slot (0-based).
    pub fn slot_cost(&self, slot_index: u32) -> i64 {
        floor_scale(
            self.blueprint_slot_costs.base,
            self.blueprint_slot_costs.multiplier.powi(slot_index as i32),
        )
    }
}
