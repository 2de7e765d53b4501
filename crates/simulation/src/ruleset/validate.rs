//! Startup validation. Everything here is fatal: a ruleset that refers to
//! missing stats or misweighted spawn tables would corrupt a run silently.

use crate::grid::BuildingType;
use crate::resources::Resource;

use super::types::EffectAction;
use super::{ConfigError, Ruleset};

const WEIGHT_TOLERANCE: f32 = 1e-3;

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

impl Ruleset {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(invalid(format!("grid_size {} is too small", self.grid_size)));
        }
        if self.max_tier == 0 {
            return Err(invalid("max_tier must be at least 1"));
        }
        if self.initial_blueprint_slots == 0 {
            return Err(invalid("initial_blueprint_slots must be at least 1"));
        }
        if !(0..=100).contains(&self.min_service_coverage) {
            return Err(invalid("min_service_coverage must be a percent in 0..=100"));
        }

        self.check_rates()?;
        self.check_spawn_weights()?;
        self.check_building_stats()?;
        self.check_blueprints()?;
        self.check_status_effects()?;
        Ok(())
    }

    fn check_rates(&self) -> Result<(), ConfigError> {
        let rates = [
            ("population.tax_per_pop", self.population.tax_per_pop),
            (
                "population.happiness_decay_per_pop",
                self.population.happiness_decay_per_pop,
            ),
            (
                "population.maintenance_per_pop",
                self.population.maintenance_per_pop,
            ),
            (
                "population.product_consumption_rate",
                self.population.product_consumption_rate,
            ),
            ("population.sales_multiplier", self.population.sales_multiplier),
            ("product.decay_rate", self.product.decay_rate),
            ("power.idle_cost_per_unit", self.power.idle_cost_per_unit),
            ("storage.export_rate", self.storage.export_rate),
            ("blueprint_slot_costs.multiplier", self.blueprint_slot_costs.multiplier),
        ];
        for (name, rate) in rates {
            if !rate.is_finite() || rate < 0.0 {
                return Err(invalid(format!("{name} must be finite and non-negative")));
            }
        }
        if self.product.spoilage_threshold < 0 {
            return Err(invalid("product.spoilage_threshold must be non-negative"));
        }
        if self.storage.export_hub_min_tier == 0 {
            return Err(invalid("storage.export_hub_min_tier must be at least 1"));
        }
        for (resource, cap) in self.storage.caps.iter() {
            if cap < 0 {
                return Err(invalid(format!(
                    "storage cap for {} must be non-negative",
                    resource.name()
                )));
            }
        }
        Ok(())
    }

    fn check_spawn_weights(&self) -> Result<(), ConfigError> {
        let mut sum = 0.0f32;
        for (&bt, &weight) in &self.spawn_weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(format!(
                    "spawn weight for {} must be finite and non-negative",
                    bt.name()
                )));
            }
            sum += weight;
        }
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(invalid(format!("spawn weights sum to {sum}, expected 1.0")));
        }
        Ok(())
    }

    fn check_building_stats(&self) -> Result<(), ConfigError> {
        for &bt in BuildingType::all() {
            let Some(tiers) = self.building_stats.get(&bt) else {
                return Err(invalid(format!("no stats for {}", bt.name())));
            };
            for tier in 1..=self.max_tier {
                let Some(stats) = tiers.get(&tier) else {
                    return Err(invalid(format!(
                        "no stats for {} tier {tier}",
                        bt.name()
                    )));
                };
                if let Some(cost) = stats.fixed_cost {
                    if cost < 0 {
                        return Err(invalid(format!(
                            "{} tier {tier}: fixed_cost must be non-negative",
                            bt.name()
                        )));
                    }
                }
                if let Some(upkeep) = &stats.optional_upkeep {
                    if upkeep.cost < 0 {
                        return Err(invalid(format!(
                            "{} tier {tier}: upkeep cost must be non-negative",
                            bt.name()
                        )));
                    }
                    if !upkeep.production_bonus.is_finite() || upkeep.production_bonus <= 0.0 {
                        return Err(invalid(format!(
                            "{} tier {tier}: upkeep bonus must be finite and positive",
                            bt.name()
                        )));
                    }
                }
                for req in std::iter::once(&stats.base_requirements)
                    .chain(stats.star_requirements.iter().flatten())
                {
                    for (resource, amount) in req.iter() {
                        if amount < 0 {
                            return Err(invalid(format!(
                                "{} tier {tier}: negative requirement for {}",
                                bt.name(),
                                resource.name()
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn check_blueprints(&self) -> Result<(), ConfigError> {
        for (key, bp) in &self.blueprints {
            if key != &bp.id {
                return Err(invalid(format!(
                    "blueprint key {key:?} does not match id {:?}",
                    bp.id
                )));
            }
            if bp.tier == 0 || bp.tier > self.max_tier {
                return Err(invalid(format!(
                    "blueprint {}: tier {} out of range 1..={}",
                    bp.id, bp.tier, self.max_tier
                )));
            }
            if bp.build_cost < 0 {
                return Err(invalid(format!(
                    "blueprint {}: build_cost must be non-negative",
                    bp.id
                )));
            }
            if self.stats_for(bp.building_type, bp.tier).is_none() {
                return Err(invalid(format!(
                    "blueprint {}: no stats for {} tier {}",
                    bp.id,
                    bp.building_type.name(),
                    bp.tier
                )));
            }
        }
        for id in &self.starting_blueprints {
            if !self.blueprints.contains_key(id) {
                return Err(invalid(format!("unknown starting blueprint {id:?}")));
            }
        }
        if self.starting_blueprints.len() > self.initial_blueprint_slots as usize {
            return Err(invalid("more starting blueprints than initial slots"));
        }
        Ok(())
    }

    fn check_status_effects(&self) -> Result<(), ConfigError> {
        for (i, effect) in self.status_effects.iter().enumerate() {
            if effect.triggers.is_empty() {
                return Err(invalid(format!(
                    "status effect {}: no triggers",
                    effect.id
                )));
            }
            if self.status_effects[..i].iter().any(|e| e.id == effect.id) {
                return Err(invalid(format!("duplicate status effect id {:?}", effect.id)));
            }
            for action in &effect.effects {
                match action {
                    EffectAction::ProductionMultiplier { factor, .. } => {
                        if !factor.is_finite() || *factor <= 0.0 {
                            return Err(invalid(format!(
                                "status effect {}: multiplier factor must be finite and positive",
                                effect.id
                            )));
                        }
                    }
                    EffectAction::ResourceDelta { resource, .. } => {
                        if !matches!(resource, Resource::Happiness | Resource::Money) {
                            return Err(invalid(format!(
                                "status effect {}: resource deltas may only touch happiness or money",
                                effect.id
                            )));
                        }
                    }
                    EffectAction::DisableBuilding { .. } => {}
                }
            }
        }
        Ok(())
    }
}
