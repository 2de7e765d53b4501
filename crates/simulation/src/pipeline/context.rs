//! Shared mutable state threaded through the ten pipeline phases.

use std::collections::{BTreeMap, BTreeSet};

use crate::city::CityState;
use crate::config::HAPPINESS_MAX;
use crate::grid::{BuildingType, CityGrid, DisableReason, Tile};
use crate::resources::{Resource, ResourceMap};
use crate::ruleset::Ruleset;
use crate::stats::BuildingAlert;
use crate::trace::ChangeTracker;

/// Production modifiers accumulated from active status effects.
#[derive(Debug, Clone)]
pub struct TurnModifiers {
    pub all: f32,
    pub per_type: BTreeMap<BuildingType, f32>,
    pub disabled_types: BTreeSet<BuildingType>,
}

impl Default for TurnModifiers {
    fn default() -> Self {
        Self {
            all: 1.0,
            per_type: BTreeMap::new(),
            disabled_types: BTreeSet::new(),
        }
    }
}

/// Working state for one pipeline run. Owns the output city; the caller's
/// city is never mutated.
pub struct TurnContext<'a> {
    pub rules: &'a Ruleset,
    pub city: CityState,
    pub tracker: ChangeTracker,
    pub modifiers: TurnModifiers,
    pub alerts: Vec<BuildingAlert>,

    /// Refundable reservations per tile position (workforce, power, and
    /// star-level stock deductions), paid back if the tile is disabled
    /// mid-pipeline.
    pub reserved: BTreeMap<(usize, usize), ResourceMap>,
    /// Paid-upkeep production bonus per tile position.
    pub tile_bonus: BTreeMap<(usize, usize), f32>,

    pub power_produced: i64,
    pub unmet_power_demand: i64,
    pub products_demanded: i64,
    pub products_consumed: i64,
    pub jobs_filled: i64,

    /// External scale on population maintenance (difficulty knob).
    pub upkeep_multiplier: f32,
}

impl<'a> TurnContext<'a> {
    pub fn new(rules: &'a Ruleset, city: &CityState, upkeep_multiplier: f32) -> Self {
        Self {
            rules,
            city: city.clone(),
            tracker: ChangeTracker::new(),
            modifiers: TurnModifiers::default(),
            alerts: Vec::new(),
            reserved: BTreeMap::new(),
            tile_bonus: BTreeMap::new(),
            power_produced: 0,
            unmet_power_demand: 0,
            products_demanded: 0,
            products_consumed: 0,
            jobs_filled: 0,
            upkeep_multiplier,
        }
    }

    /// Apply a resource delta to the city ledger and log it. This is the
    /// only place pipeline code mutates a resource field, so the trace and
    /// the ledger cannot drift apart. Happiness deltas are clamped and the
    /// *applied* amount is what gets logged.
    pub fn credit(&mut self, source: &str, resource: Resource, amount: i64) {
        let applied = match resource {
            Resource::Money => {
                self.city.money += amount;
                amount
            }
            Resource::Population => {
                self.city.population += amount;
                amount
            }
            Resource::Workforce => {
                self.city.workforce_available += amount;
                amount
            }
            Resource::Power => {
                self.city.power_available += amount;
                amount
            }
            Resource::Happiness => {
                let before = self.city.happiness;
                self.city.happiness = (before + amount).clamp(0, HAPPINESS_MAX);
                self.city.happiness - before
            }
            Resource::RawGoods => {
                self.city.raw_goods_available += amount;
                amount
            }
            Resource::Products => {
                self.city.products_available += amount;
                amount
            }
        };
        self.tracker.track(source, resource, applied);
    }

    /// Current pool level for a requirement check.
    pub fn available(&self, resource: Resource) -> i64 {
        match resource {
            Resource::Money => self.city.money,
            Resource::Population => self.city.population,
            Resource::Workforce => self.city.workforce_available,
            Resource::Power => self.city.power_available,
            Resource::Happiness => self.city.happiness,
            Resource::RawGoods => self.city.raw_goods_available,
            Resource::Products => self.city.products_available,
        }
    }

    /// Production multiplier for a tile: status-effect factors composed
    /// with its paid-upkeep bonus.
    pub fn multiplier(&self, building_type: BuildingType, pos: (usize, usize)) -> f32 {
        let type_factor = self
            .modifiers
            .per_type
            .get(&building_type)
            .copied()
            .unwrap_or(1.0);
        let bonus = self.tile_bonus.get(&pos).copied().unwrap_or(1.0);
        self.modifiers.all * type_factor * bonus
    }

    /// Reserve resources against a tile so a later disable can pay them
    /// back.
    pub fn reserve(&mut self, pos: (usize, usize), resource: Resource, amount: i64) {
        if amount != 0 {
            self.reserved.entry(pos).or_default().add(resource, amount);
        }
    }

    /// Refund everything reserved against a tile, with one compensating
    /// trace entry per resource.
    pub fn refund(&mut self, pos: (usize, usize), building_type: BuildingType) {
        let Some(held) = self.reserved.remove(&pos) else {
            return;
        };
        let source = format!("{} Refund", building_type.name());
        for (resource, amount) in held.iter() {
            self.credit(&source, resource, amount);
        }
    }

    /// Disable a tile for the rest of the turn and record the alert.
    pub fn disable(&mut self, tile: &mut Tile, pos: (usize, usize), reason: DisableReason) {
        tile.stars = 0;
        tile.disabled = true;
        tile.disabled_reason = Some(reason);
        self.alerts
            .push(BuildingAlert::new(pos.0, pos.1, tile.building_type, reason));
    }
}

/// An occupied position paired with its resolution priority.
#[derive(Debug, Clone, Copy)]
pub struct OrderedTile {
    pub r: usize,
    pub c: usize,
    pub priority: i32,
}

/// Occupied positions in resolution order: ruleset priority for the tile's
/// `(type, tier)`, then row, then column. Ties cannot occur past that.
pub fn ordered_tiles(grid: &CityGrid, rules: &Ruleset) -> Vec<OrderedTile> {
    let mut order: Vec<OrderedTile> = grid
        .iter_cells()
        .filter_map(|cell| {
            let tile = cell.tile.as_ref()?;
            let priority = rules
                .stats_for(tile.building_type, tile.tier)
                .map(|s| s.priority)
                .unwrap_or(i32::MAX);
            Some(OrderedTile {
                r: cell.r,
                c: cell.c,
                priority,
            })
        })
        .collect();
    order.sort_by_key(|p| (p.priority, p.r, p.c));
    order
}

/// Drain an amount of a stored resource out of tile buffers, freshest
/// first: this turn's production buffers in row-major order, then
/// persistent storage. Any remainder was unattributed city stock and needs
/// no tile adjustment.
pub fn drain_goods(grid: &mut CityGrid, resource: Resource, mut amount: i64) {
    let size = grid.size();
    for pass in 0..2 {
        if amount == 0 {
            return;
        }
        for r in 0..size {
            for c in 0..size {
                if amount == 0 {
                    return;
                }
                if let Some(tile) = grid.tile_at_mut(r, c) {
                    let buffer = if pass == 0 {
                        &mut tile.produced_this_turn
                    } else {
                        &mut tile.storage
                    };
                    let take = buffer.get(resource).min(amount);
                    if take > 0 {
                        buffer.add(resource, -take);
                        amount -= take;
                    }
                }
            }
        }
    }
}
