//! The turn resolution pipeline. Ten phases run in a fixed order over the
//! grid and a working copy of the city; the caller's city is never touched.
//!
//! 1. flow reset and storage decay
//! 2. status effect modifiers
//! 3. fixed charges and capacity generation
//! 4. staffing and base power draw
//! 5. star ladder
//! 6. production chain
//! 7. storage settlement
//! 8. population accounts and coverage
//! 9. status effect re-evaluation
//! 10. blueprint unlocks

pub mod context;

mod consumption;
mod effects_eval;
mod flow_reset;
mod generation;
mod penalties;
mod stars;
mod status_mods;
mod storage;
mod workforce;

use crate::city::CityState;
use crate::grid::CityGrid;
use crate::ruleset::Ruleset;
use crate::stats::SimulationStats;
use crate::unlocks;

use context::TurnContext;

/// Result of resolving one turn: the successor city plus the full
/// diagnostic trace.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub city: CityState,
    pub stats: SimulationStats,
}

pub fn run_simulation(grid: &mut CityGrid, city: &CityState, rules: &Ruleset) -> TurnOutcome {
    run_simulation_with(grid, city, rules, 1.0)
}

/// Variant taking an external maintenance multiplier (difficulty knob).
pub fn run_simulation_with(
    grid: &mut CityGrid,
    city: &CityState,
    rules: &Ruleset,
    upkeep_multiplier: f32,
) -> TurnOutcome {
    let mut ctx = TurnContext::new(rules, city, upkeep_multiplier);

    flow_reset::run(&mut ctx, grid);
    status_mods::run(&mut ctx, grid);
    generation::run(&mut ctx, grid);
    workforce::run(&mut ctx, grid);
    stars::run(&mut ctx, grid);
    consumption::run(&mut ctx, grid);
    storage::run(&mut ctx, grid);
    penalties::run(&mut ctx, grid);
    effects_eval::run(&mut ctx, grid);
    unlocks::run(&mut ctx.city, &grid.building_counts(), rules);

    let summary = ctx.city.last_turn_stats;
    let (breakdown, net_changes) = ctx.tracker.into_parts();
    TurnOutcome {
        city: ctx.city,
        stats: SimulationStats {
            power_produced: summary.power_produced,
            power_consumed: summary.power_consumed,
            power_utilization: summary.power_utilization,
            net_changes,
            breakdown,
            building_alerts: ctx.alerts,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BuildingType;
    use crate::resources::Resource;

    fn five_tile_city() -> (CityGrid, CityState, Ruleset) {
        let rules = Ruleset::standard();
        let city = CityState::new(&rules);
        let mut grid = CityGrid::new(rules.grid_size);
        grid.place_tile(0, 0, BuildingType::Power, 1);
        grid.place_tile(1, 0, BuildingType::Residential, 1);
        grid.place_tile(1, 1, BuildingType::Residential, 1);
        grid.place_tile(2, 0, BuildingType::Factory, 1);
        grid.place_tile(3, 0, BuildingType::Shop, 1);
        (grid, city, rules)
    }

    #[test]
    fn full_chain_turn_settles_exactly() {
        let (mut grid, city, rules) = five_tile_city();
        let outcome = run_simulation(&mut grid, &city, &rules);
        let next = &outcome.city;

        // Power: plant makes 6; base draws 3, star-ups 3, nothing idle.
        assert_eq!(outcome.stats.power_produced, 6);
        assert_eq!(outcome.stats.power_consumed, 6);
        assert_eq!(outcome.stats.power_utilization, 100);
        assert_eq!(next.power_available, 0);

        // Both residentials star 2, factory star 2, shop star 1.
        assert_eq!(grid.tile_at(1, 0).unwrap().stars, 2);
        assert_eq!(grid.tile_at(1, 1).unwrap().stars, 2);
        assert_eq!(grid.tile_at(2, 0).unwrap().stars, 2);
        assert_eq!(grid.tile_at(3, 0).unwrap().stars, 1);

        // Population 8 base + 4 star bonus; 6 employed.
        assert_eq!(next.population, 12);
        assert_eq!(next.jobs_capacity, 5);
        assert_eq!(next.unemployed, 6);

        // Goods: factory made 6, shop ate 3; shop sold 3 products which
        // the population then consumed in full.
        assert_eq!(next.raw_goods_available, 3);
        assert_eq!(next.products_available, 0);
        assert_eq!(next.last_turn_stats.products_demanded, 3);
        assert_eq!(next.last_turn_stats.products_consumed, 3);

        // Money: 50 - 1 fixed + 5 shop + 6 product sales - 1 upkeep + 2 tax.
        assert_eq!(next.money, 61);
        assert_eq!(next.service_coverage, 100);
        assert_eq!(next.happiness, 100);
        assert!(outcome.stats.building_alerts.is_empty());
    }

    #[test]
    fn unpowered_factory_shuts_down_cleanly() {
        let rules = Ruleset::standard();
        let city = CityState::new(&rules);
        let mut grid = CityGrid::new(rules.grid_size);
        grid.place_tile(1, 0, BuildingType::Residential, 1);
        grid.place_tile(2, 0, BuildingType::Factory, 1);

        let outcome = run_simulation(&mut grid, &city, &rules);
        let factory = grid.tile_at(2, 0).unwrap();
        assert!(factory.disabled);
        assert_eq!(outcome.city.power_available, 0);
        assert_eq!(outcome.city.raw_goods_available, 0);
        // The released crew shows up as unemployment.
        assert_eq!(outcome.city.unemployed, 4);
        assert_eq!(outcome.stats.power_consumed, 2);
        assert_eq!(outcome.stats.building_alerts.len(), 1);
        assert_eq!(
            outcome.stats.building_alerts[0].message,
            "Factory at (2, 0): No Power"
        );
    }

    #[test]
    fn breakdown_sums_to_net_changes() {
        let (mut grid, city, rules) = five_tile_city();
        let outcome = run_simulation(&mut grid, &city, &rules);
        for &resource in Resource::all() {
            let sum: i64 = outcome
                .stats
                .breakdown
                .iter()
                .filter(|e| e.resource == resource)
                .map(|e| e.amount)
                .sum();
            assert_eq!(sum, outcome.stats.net(resource), "{resource:?} drifted");
        }
    }

    #[test]
    fn caller_city_is_never_mutated() {
        let (mut grid, city, rules) = five_tile_city();
        let before = city.clone();
        let _ = run_simulation(&mut grid, &city, &rules);
        assert_eq!(city, before);
    }

    #[test]
    fn identical_inputs_resolve_identically() {
        let (mut grid_a, city, rules) = five_tile_city();
        let mut grid_b = grid_a.clone();
        let a = run_simulation(&mut grid_a, &city, &rules);
        let b = run_simulation(&mut grid_b, &city, &rules);
        assert_eq!(a.city, b.city);
        assert_eq!(a.stats, b.stats);
        assert_eq!(grid_a, grid_b);
    }
}
