//! Serde schema types for the data-driven ruleset.

use serde::{Deserialize, Serialize};

use crate::grid::BuildingType;
use crate::resources::{Resource, ResourceMap};

// ---------------------------------------------------------------------------
// Per-building configuration
// ---------------------------------------------------------------------------

/// Immutable stats for one `(building_type, tier)` pair.
///
/// Star requirement tables are **cumulative totals**: the requirement to
/// *be at* that star level, not a delta on top of the previous level. A
/// `None` entry means the level is not reachable for this building.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingStats {
    #[serde(default)]
    pub base_requirements: ResourceMap,
    #[serde(default)]
    pub star_requirements: [Option<ResourceMap>; 2],
    pub produces: [ResourceMap; 3],
    pub priority: i32,
    /// Flat per-turn money charge regardless of star level.
    #[serde(default)]
    pub fixed_cost: Option<i64>,
    /// Opt-in per-turn payment for a production bonus.
    #[serde(default)]
    pub optional_upkeep: Option<OptionalUpkeep>,
}

impl BuildingStats {
    /// Whether the given star level (2 or 3) is defined at all.
    pub fn star_defined(&self, level: u8) -> bool {
        matches!(level, 2 | 3) && self.star_requirements[level as usize - 2].is_some()
    }

    /// Total requirements to hold the given star level (1..=3).
    /// Star tables override the base per resource they list.
    pub fn requirement_at(&self, stars: u8) -> ResourceMap {
        let mut req = self.base_requirements.clone();
        for level in 2..=stars.min(3) {
            if let Some(table) = &self.star_requirements[level as usize - 2] {
                for (resource, total) in table.iter() {
                    req.set(resource, total);
                }
            }
        }
        req
    }

    /// Incremental cost to step from `level - 1` to `level`, per resource,
    /// floored at zero (spec rule: cumulative totals, never negative deltas).
    pub fn incremental_cost(&self, level: u8) -> ResourceMap {
        let prev = self.requirement_at(level - 1);
        let cur = self.requirement_at(level);
        let mut cost = ResourceMap::new();
        for (resource, amount) in cur.iter() {
            let delta = amount - prev.get(resource);
            if delta > 0 {
                cost.set(resource, delta);
            }
        }
        cost
    }

    /// Output table for the given star level (1..=3).
    pub fn produces_at(&self, stars: u8) -> &ResourceMap {
        let idx = stars.clamp(1, 3) as usize - 1;
        &self.produces[idx]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionalUpkeep {
    pub cost: i64,
    /// Multiplier applied to the tile's production while upkeep is paid.
    pub production_bonus: f32,
}

// ---------------------------------------------------------------------------
// Economy parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationParams {
    pub tax_per_pop: f32,
    pub happiness_decay_per_pop: f32,
    pub maintenance_per_pop: f32,
    pub product_consumption_rate: f32,
    /// Money earned per product consumed by the population.
    pub sales_multiplier: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductParams {
    /// Fraction of stored raw goods lost per turn, above the threshold.
    pub decay_rate: f32,
    /// Stock at or below this never decays.
    pub spoilage_threshold: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerParams {
    /// Money charged per unit of generated-but-unused power.
    pub idle_cost_per_unit: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageParams {
    /// Per-tile cap for each tracked resource.
    pub caps: ResourceMap,
    /// Money per excess unit when an export hub is present.
    pub export_rate: f32,
    /// Minimum Warehouse tier that counts as an export hub.
    pub export_hub_min_tier: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotCosts {
    pub base: i64,
    pub multiplier: f32,
}

// ---------------------------------------------------------------------------
// Conditions (shared by status-effect triggers and unlock trees)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
}

impl Comparison {
    pub fn eval(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Ge => lhs >= rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Lt => lhs < rhs,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Ge => ">=",
            Comparison::Le => "<=",
            Comparison::Eq => "==",
            Comparison::Gt => ">",
            Comparison::Lt => "<",
        }
    }
}

/// Derived values a condition can read beyond raw resource totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    ServiceCoverage,
    Unemployed,
    PowerUtilization,
    JobsFilled,
}

/// Where a condition's left-hand value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionSource {
    Resource { resource: Resource },
    Stat { stat: StatKey },
    Turn,
    BuildingCount { building: BuildingType },
}

/// `resolved(source) <op> value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(flatten)]
    pub source: ConditionSource,
    pub op: Comparison,
    pub value: i64,
}

// ---------------------------------------------------------------------------
// Status effects
// ---------------------------------------------------------------------------

/// What an active status effect does during the modifier phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectAction {
    /// Multiply production of one building type (or all, when `target` is
    /// absent). Multiple active multipliers compose by multiplication.
    ProductionMultiplier {
        #[serde(default)]
        target: Option<BuildingType>,
        factor: f32,
    },
    /// Immediate delta to happiness or money.
    ResourceDelta { resource: Resource, amount: i64 },
    /// Force every tile of this type to star 0 for the turn.
    DisableBuilding { building: BuildingType },
}

/// Trigger-gated modifier. Triggers are AND-combined and evaluated against
/// the *end* of a turn; the effect then applies to the *next* turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub id: String,
    pub name: String,
    pub triggers: Vec<Condition>,
    pub effects: Vec<EffectAction>,
}

// ---------------------------------------------------------------------------
// Blueprints
// ---------------------------------------------------------------------------

/// A placeable building template plus its OR-of-AND unlock tree.
/// An empty outer list means the blueprint is only available as a starting
/// blueprint and never auto-unlocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub id: String,
    pub name: String,
    pub building_type: BuildingType,
    pub tier: u8,
    pub build_cost: i64,
    #[serde(default)]
    pub unlock_conditions: Vec<Vec<Condition>>,
}
