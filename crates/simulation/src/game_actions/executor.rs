//! Action validation and execution. Placing a building is the only action
//! that advances time: it stages the placement, resolves merges, runs the
//! turn pipeline, and snapshots the result.

use bevy::prelude::*;

use crate::city::{CityState, GamePhase, GameStatus};
use crate::grid::CityGrid;
use crate::merge::resolve_merge;
use crate::pipeline::run_simulation;
use crate::ruleset::Ruleset;
use crate::snapshot::{TurnHistory, TurnSnapshot};
use crate::ActiveRuleset;

use super::actions::GameAction;
use super::queue::ActionQueue;
use super::result_log::ActionResultLog;
use super::results::{ActionError, ActionResult};

/// Full legality check for a placement, in the order the player would want
/// to hear about problems.
pub fn can_execute_place_building(
    grid: &CityGrid,
    city: &CityState,
    rules: &Ruleset,
    r: usize,
    c: usize,
    blueprint_id: &str,
) -> Result<(), ActionError> {
    let blueprint = rules.blueprint(blueprint_id).ok_or(ActionError::UnknownBlueprint {
        id: blueprint_id.to_string(),
    })?;
    if !city.holds_blueprint(blueprint_id) {
        return Err(ActionError::BlueprintNotUnlocked {
            id: blueprint_id.to_string(),
        });
    }
    if !grid.in_bounds(r, c) {
        return Err(ActionError::OutOfBounds { r, c });
    }
    if grid.tile_at(r, c).is_some() {
        return Err(ActionError::CellOccupied { r, c });
    }
    if city.blueprint_state.placed_this_turn {
        return Err(ActionError::AlreadyPlacedThisTurn);
    }
    if city.money < blueprint.build_cost {
        return Err(ActionError::InsufficientFunds {
            needed: blueprint.build_cost,
            have: city.money,
        });
    }
    Ok(())
}

/// Place, merge, resolve the turn, and snapshot. The grid is mutated in
/// place; the caller installs the returned city.
pub fn execute_place_building(
    grid: &mut CityGrid,
    city: &CityState,
    rules: &Ruleset,
    r: usize,
    c: usize,
    blueprint_id: &str,
) -> Result<TurnSnapshot, ActionError> {
    can_execute_place_building(grid, city, rules, r, c, blueprint_id)?;
    let Some(blueprint) = rules.blueprint(blueprint_id) else {
        return Err(ActionError::UnknownBlueprint {
            id: blueprint_id.to_string(),
        });
    };

    grid.place_tile(r, c, blueprint.building_type, blueprint.tier);
    resolve_merge(grid, r, c, rules.max_tier);

    let mut staged = city.clone();
    staged.money -= blueprint.build_cost;
    staged.blueprint_state.placed_this_turn = true;
    staged.blueprint_state.selected = None;
    staged.blueprint_state.pending_unlocks.clear();

    let outcome = run_simulation(grid, &staged, rules);
    let mut next = outcome.city;
    next.turn += 1;
    next.blueprint_state.placed_this_turn = false;

    let phase = if next.happiness <= 0 || grid.is_full() {
        GamePhase::GameOver
    } else {
        GamePhase::Playing
    };
    Ok(TurnSnapshot {
        turn: next.turn,
        action: format!("place {blueprint_id} at ({r}, {c})"),
        grid: grid.clone(),
        city: next,
        stats: outcome.stats,
        phase,
    })
}

pub fn execute_select_blueprint(
    city: &mut CityState,
    rules: &Ruleset,
    blueprint_id: &str,
) -> Result<(), ActionError> {
    if rules.blueprint(blueprint_id).is_none() {
        return Err(ActionError::UnknownBlueprint {
            id: blueprint_id.to_string(),
        });
    }
    if !city.holds_blueprint(blueprint_id) {
        return Err(ActionError::BlueprintNotUnlocked {
            id: blueprint_id.to_string(),
        });
    }
    city.blueprint_state.selected = Some(blueprint_id.to_string());
    Ok(())
}

pub fn execute_set_upkeep(
    grid: &mut CityGrid,
    r: usize,
    c: usize,
    paid: bool,
) -> Result<(), ActionError> {
    if !grid.in_bounds(r, c) {
        return Err(ActionError::OutOfBounds { r, c });
    }
    let Some(tile) = grid.tile_at_mut(r, c) else {
        return Err(ActionError::NoTileThere { r, c });
    };
    tile.upkeep_paid = paid;
    Ok(())
}

pub fn execute_buy_slot(city: &mut CityState, rules: &Ruleset) -> Result<(), ActionError> {
    let bought = city
        .blueprint_state
        .max_slots
        .saturating_sub(rules.initial_blueprint_slots);
    let cost = rules.slot_cost(bought);
    if city.money < cost {
        return Err(ActionError::InsufficientFunds {
            needed: cost,
            have: city.money,
        });
    }
    city.money -= cost;
    city.blueprint_state.max_slots += 1;
    Ok(())
}

/// Drain the queue once per fixed tick.
pub fn execute_queued_actions(
    mut queue: ResMut<ActionQueue>,
    mut grid: ResMut<CityGrid>,
    mut city: ResMut<CityState>,
    mut status: ResMut<GameStatus>,
    rules: Res<ActiveRuleset>,
    mut history: ResMut<TurnHistory>,
    mut log: ResMut<ActionResultLog>,
) {
    while let Some(action) = queue.pop() {
        let description = action.describe();
        let outcome = match &action {
            GameAction::NewGame => {
                *grid = CityGrid::new(rules.0.grid_size);
                *city = CityState::new(&rules.0);
                *status = GameStatus::default();
                history.clear();
                Ok(())
            }
            _ if status.phase == GamePhase::GameOver => Err(ActionError::GameOver),
            GameAction::PlaceBuilding { r, c, blueprint_id } => {
                execute_place_building(&mut grid, &city, &rules.0, *r, *c, blueprint_id).map(
                    |snapshot| {
                        *city = snapshot.city.clone();
                        status.phase = snapshot.phase;
                        history.push(snapshot);
                    },
                )
            }
            GameAction::SelectBlueprint { blueprint_id } => {
                execute_select_blueprint(&mut city, &rules.0, blueprint_id)
            }
            GameAction::SetUpkeep { r, c, paid } => execute_set_upkeep(&mut grid, *r, *c, *paid),
            GameAction::BuyBlueprintSlot => execute_buy_slot(&mut city, &rules.0),
        };
        let result = match outcome {
            Ok(()) => ActionResult::Success { action: description },
            Err(error) => {
                warn!("action rejected: {description}: {error}");
                ActionResult::Failed {
                    action: description,
                    error,
                }
            }
        };
        log.push(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BuildingType;

    fn setup() -> (CityGrid, CityState, Ruleset) {
        let rules = Ruleset::standard();
        let city = CityState::new(&rules);
        let grid = CityGrid::new(rules.grid_size);
        (grid, city, rules)
    }

    #[test]
    fn validation_rejects_each_illegal_case() {
        let (mut grid, mut city, rules) = setup();
        assert_eq!(
            can_execute_place_building(&grid, &city, &rules, 0, 0, "nope"),
            Err(ActionError::UnknownBlueprint { id: "nope".into() })
        );
        assert_eq!(
            can_execute_place_building(&grid, &city, &rules, 0, 0, "factory_t2"),
            Err(ActionError::BlueprintNotUnlocked {
                id: "factory_t2".into()
            })
        );
        assert_eq!(
            can_execute_place_building(&grid, &city, &rules, 9, 9, "factory_t1"),
            Err(ActionError::OutOfBounds { r: 9, c: 9 })
        );
        grid.place_tile(0, 0, BuildingType::Shop, 1);
        assert_eq!(
            can_execute_place_building(&grid, &city, &rules, 0, 0, "factory_t1"),
            Err(ActionError::CellOccupied { r: 0, c: 0 })
        );
        city.money = 3;
        assert_eq!(
            can_execute_place_building(&grid, &city, &rules, 1, 1, "factory_t1"),
            Err(ActionError::InsufficientFunds { needed: 15, have: 3 })
        );
        city.money = 50;
        city.blueprint_state.placed_this_turn = true;
        assert_eq!(
            can_execute_place_building(&grid, &city, &rules, 1, 1, "factory_t1"),
            Err(ActionError::AlreadyPlacedThisTurn)
        );
    }

    #[test]
    fn placement_advances_the_turn_and_charges_the_cost() {
        let (mut grid, city, rules) = setup();
        let snapshot =
            execute_place_building(&mut grid, &city, &rules, 3, 3, "residential_t1").unwrap();

        assert_eq!(snapshot.turn, 1);
        assert_eq!(snapshot.phase, GamePhase::Playing);
        assert!(grid.tile_at(3, 3).is_some());
        assert!(!snapshot.city.blueprint_state.placed_this_turn);
        // Build cost 10, plus whatever the turn settled; population alone
        // produces no upkeep at this size, so only the tax line moves it.
        assert_eq!(snapshot.city.money, 50 - 10);
        // Caller's city untouched.
        assert_eq!(city.turn, 0);
    }

    #[test]
    fn placement_triggers_merges() {
        let (mut grid, city, rules) = setup();
        grid.place_tile(0, 0, BuildingType::Residential, 1);
        grid.place_tile(0, 1, BuildingType::Residential, 1);
        let snapshot =
            execute_place_building(&mut grid, &city, &rules, 1, 0, "residential_t1").unwrap();
        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(grid.tile_at(1, 0).unwrap().tier, 2);
        assert_eq!(snapshot.grid, grid);
    }

    #[test]
    fn full_board_ends_the_run() {
        let (mut grid, city, rules) = setup();
        for r in 0..rules.grid_size {
            for c in 0..rules.grid_size {
                // Checkerboard of types so nothing merges.
                if (r, c) == (0, 0) {
                    continue;
                }
                let bt = if (r + c) % 2 == 0 {
                    BuildingType::Shop
                } else {
                    BuildingType::Warehouse
                };
                grid.place_tile(r, c, bt, 1);
            }
        }
        let snapshot =
            execute_place_building(&mut grid, &city, &rules, 0, 0, "power_t1").unwrap();
        assert_eq!(snapshot.phase, GamePhase::GameOver);
    }

    #[test]
    fn buying_slots_gets_steeper() {
        let (_, mut city, rules) = setup();
        city.money = 200;
        execute_buy_slot(&mut city, &rules).unwrap();
        assert_eq!(city.money, 150);
        assert_eq!(city.blueprint_state.max_slots, 7);
        execute_buy_slot(&mut city, &rules).unwrap();
        // Second slot costs floor(50 * 1.5) = 75.
        assert_eq!(city.money, 75);
    }

    #[test]
    fn upkeep_toggle_needs_a_tile() {
        let (mut grid, _, _) = setup();
        assert_eq!(
            execute_set_upkeep(&mut grid, 2, 2, true),
            Err(ActionError::NoTileThere { r: 2, c: 2 })
        );
        grid.place_tile(2, 2, BuildingType::Factory, 1);
        execute_set_upkeep(&mut grid, 2, 2, true).unwrap();
        assert!(grid.tile_at(2, 2).unwrap().upkeep_paid);
    }
}
