//! Phase 4: staffing and base power draw, in priority order. Workforce is
//! the hard gate: an unstaffed building shuts down outright, and an
//! unstaffed power plant takes its output off the grid with it. Buildings
//! that staff but cannot draw their base power shut down too, releasing
//! their crew back to the pool.

use crate::grid::{BuildingType, CityGrid, DisableReason};
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
        let tier = tile.tier;
        let Some(stats) = ctx.rules.stats_for(bt, tier).cloned() else {
            continue;
        };
        let base = stats.requirement_at(1);
        let staff = base.get(Resource::Workforce);
        let power = base.get(Resource::Power);
        ctx.city.jobs_capacity += staff;

        if ctx.city.workforce_available < staff {
            if let Some(tile) = grid.tile_at_mut(pos.r, pos.c) {
                ctx.disable(tile, (pos.r, pos.c), DisableReason::Workforce);
            }
            if bt == BuildingType::Power {
                retract_plant(ctx, &stats, (pos.r, pos.c));
            }
            continue;
        }
        if staff > 0 {
            ctx.credit(&format!("{} Jobs", bt.name()), Resource::Workforce, -staff);
            ctx.reserve((pos.r, pos.c), Resource::Workforce, staff);
            ctx.jobs_filled += staff;
        }

        if ctx.city.power_available < power {
            ctx.unmet_power_demand += power;
            ctx.refund((pos.r, pos.c), bt);
            ctx.jobs_filled -= staff;
            if let Some(tile) = grid.tile_at_mut(pos.r, pos.c) {
                ctx.disable(tile, (pos.r, pos.c), DisableReason::Power);
            }
            continue;
        }
        if power > 0 {
            ctx.credit(&format!("{} Power Draw", bt.name()), Resource::Power, -power);
            ctx.reserve((pos.r, pos.c), Resource::Power, power);
        }
    }
}

/// An unstaffed plant never generated; undo its phase 3 contribution.
fn retract_plant(
    ctx: &mut TurnContext<'_>,
    stats: &crate::ruleset::BuildingStats,
    pos: (usize, usize),
) {
    let mult = ctx.multiplier(BuildingType::Power, pos);
    let output = floor_scale(stats.produces_at(1).get(Resource::Power), mult);
    if output > 0 {
        ctx.credit("Power Generation", Resource::Power, -output);
        ctx.city.power_capacity -= output;
        ctx.power_produced -= output;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CityState;
    use crate::pipeline::{flow_reset, generation};
    use crate::ruleset::Ruleset;

    fn run_pipeline_prefix(grid: &mut CityGrid) -> TurnContext<'static> {
        let rules: &'static Ruleset = Box::leak(Box::new(Ruleset::standard()));
        let city = CityState::new(rules);
        let mut ctx = TurnContext::new(rules, &city, 1.0);
        flow_reset::run(&mut ctx, grid);
        generation::run(&mut ctx, grid);
        run(&mut ctx, grid);
        ctx
    }

    #[test]
    fn staffed_buildings_reserve_workforce_and_power() {
        let mut grid = CityGrid::new(7);
        grid.place_tile(0, 0, BuildingType::Power, 1);
        grid.place_tile(0, 1, BuildingType::Residential, 1);
        grid.place_tile(1, 0, BuildingType::Factory, 1);
        let ctx = run_pipeline_prefix(&mut grid);

        // Residents 4; plant takes 1, factory 2.
        assert_eq!(ctx.city.workforce_available, 1);
        assert_eq!(ctx.city.jobs_capacity, 3);
        assert_eq!(ctx.jobs_filled, 3);
        // Plant made 6, factory drew 2.
        assert_eq!(ctx.city.power_available, 4);
        assert!(!grid.tile_at(1, 0).unwrap().disabled);
    }

    #[test]
    fn unstaffed_plant_loses_its_output() {
        let mut grid = CityGrid::new(7);
        grid.place_tile(0, 0, BuildingType::Power, 1);
        // No residential: nobody to run the plant.
        let ctx = run_pipeline_prefix(&mut grid);

        let tile = grid.tile_at(0, 0).unwrap();
        assert!(tile.disabled);
        assert_eq!(tile.disabled_reason, Some(DisableReason::Workforce));
        assert_eq!(ctx.city.power_available, 0);
        assert_eq!(ctx.city.power_capacity, 0);
        assert_eq!(ctx.power_produced, 0);
    }

    #[test]
    fn power_shortage_disables_and_refunds_the_crew() {
        let mut grid = CityGrid::new(7);
        grid.place_tile(0, 0, BuildingType::Residential, 1);
        grid.place_tile(1, 0, BuildingType::Factory, 1);
        // No plant anywhere.
        let ctx = run_pipeline_prefix(&mut grid);

        let factory = grid.tile_at(1, 0).unwrap();
        assert!(factory.disabled);
        assert_eq!(factory.disabled_reason, Some(DisableReason::Power));
        // Crew released; power never went negative.
        assert_eq!(ctx.city.workforce_available, 4);
        assert_eq!(ctx.city.power_available, 0);
        assert_eq!(ctx.unmet_power_demand, 2);
        assert_eq!(ctx.jobs_filled, 0);
        // Capacity still counts the unpowered job slots.
        assert_eq!(ctx.city.jobs_capacity, 2);
    }
}
