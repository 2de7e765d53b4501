//! Phase 3: fixed charges and capacity generation. Power plants put their
//! output on the grid and residential tiles seed the population pool;
//! goods production waits for the consumption chain.

use crate::grid::CityGrid;
use crate::resources::{floor_scale, Resource};

use super::context::{ordered_tiles, TurnContext};

pub fn run(ctx: &mut TurnContext<'_>, grid: &mut CityGrid) {
    for pos in ordered_tiles(grid, ctx.rules) {
        let Some(tile) = grid.tile_at(pos.r, pos.c) else {
            continue;
        };
        if tile.disabled {
            continue;
        }
        let bt = tile.building_type;
        let upkeep_paid = tile.upkeep_paid;
        let Some(stats) = ctx.rules.stats_for(bt, tile.tier).cloned() else {
            continue;
        };

        if let Some(cost) = stats.fixed_cost {
            ctx.credit(&format!("{} Fixed Cost", bt.name()), Resource::Money, -cost);
        }
        if upkeep_paid {
            if let Some(upkeep) = &stats.optional_upkeep {
                ctx.credit(&format!("{} Upkeep", bt.name()), Resource::Money, -upkeep.cost);
                ctx.tile_bonus.insert((pos.r, pos.c), upkeep.production_bonus);
            }
        }

        let mult = ctx.multiplier(bt, (pos.r, pos.c));
        let base = stats.produces_at(1);

        let power = floor_scale(base.get(Resource::Power), mult);
        if power > 0 {
            ctx.credit("Power Generation", Resource::Power, power);
            ctx.city.power_capacity += power;
            ctx.power_produced += power;
        }

        let residents = floor_scale(base.get(Resource::Population), mult);
        if residents > 0 {
            ctx.credit("Residential Base", Resource::Population, residents);
            ctx.credit("Residential Base", Resource::Workforce, residents);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CityState;
    use crate::grid::BuildingType;
    use crate::pipeline::flow_reset;
    use crate::ruleset::Ruleset;

    fn run_through_generation(grid: &mut CityGrid) -> TurnContext<'static> {
        // Leak keeps the test setup terse; rulesets are tiny.
        let rules: &'static Ruleset = Box::leak(Box::new(Ruleset::standard()));
        let city = CityState::new(rules);
        let mut ctx = TurnContext::new(rules, &city, 1.0);
        flow_reset::run(&mut ctx, grid);
        run(&mut ctx, grid);
        ctx
    }

    #[test]
    fn plant_output_and_residents_seed_the_pools() {
        let mut grid = CityGrid::new(7);
        grid.place_tile(0, 0, BuildingType::Power, 1);
        grid.place_tile(0, 1, BuildingType::Residential, 1);
        let ctx = run_through_generation(&mut grid);

        assert_eq!(ctx.city.power_available, 6);
        assert_eq!(ctx.city.power_capacity, 6);
        assert_eq!(ctx.power_produced, 6);
        assert_eq!(ctx.city.population, 4);
        assert_eq!(ctx.city.workforce_available, 4);
        // Plant fixed cost.
        assert_eq!(ctx.city.money, 49);
    }

    #[test]
    fn paid_upkeep_is_charged_and_remembered() {
        let mut grid = CityGrid::new(7);
        grid.place_tile(2, 2, BuildingType::Factory, 1);
        grid.tile_at_mut(2, 2).unwrap().upkeep_paid = true;
        let ctx = run_through_generation(&mut grid);

        assert_eq!(ctx.city.money, 48);
        let bonus = ctx.tile_bonus[&(2, 2)];
        assert!((bonus - 1.25).abs() < 1e-6);
    }

    #[test]
    fn disabled_tiles_generate_nothing() {
        let mut grid = CityGrid::new(7);
        grid.place_tile(0, 0, BuildingType::Power, 1);
        let rules: &'static Ruleset = Box::leak(Box::new(Ruleset::standard()));
        let city = CityState::new(rules);
        let mut ctx = TurnContext::new(rules, &city, 1.0);
        flow_reset::run(&mut ctx, &mut grid);
        let tile = grid.tile_at_mut(0, 0).unwrap();
        ctx.disable(tile, (0, 0), crate::grid::DisableReason::StatusEffect);
        run(&mut ctx, &mut grid);

        assert_eq!(ctx.city.power_available, 0);
        assert_eq!(ctx.city.money, 50);
    }
}
