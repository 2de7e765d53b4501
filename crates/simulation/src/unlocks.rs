//! Phase 10: blueprint unlock checks, run after the ledger has settled so
//! conditions see the finished turn.

use crate::city::CityState;
use crate::grid::BuildingCounts;
use crate::ruleset::{any_group_holds, Ruleset};

pub fn run(city: &mut CityState, counts: &BuildingCounts, rules: &Ruleset) {
    check_unlock_conditions(city, counts, rules);
    check_slot_unlock(city, rules);
}

/// Walk every still-locked blueprint and unlock those whose OR-of-AND
/// condition tree holds, stopping the moment the roster is full.
/// Blueprints with an empty tree never unlock here.
pub fn check_unlock_conditions(city: &mut CityState, counts: &BuildingCounts, rules: &Ruleset) {
    for (id, blueprint) in &rules.blueprints {
        if city.blueprint_state.unlocked.len() >= city.blueprint_state.max_slots as usize {
            break;
        }
        if city.holds_blueprint(id) || blueprint.unlock_conditions.is_empty() {
            continue;
        }
        if any_group_holds(&blueprint.unlock_conditions, city, counts) {
            city.blueprint_state.unlocked.push(id.clone());
            city.blueprint_state.pending_unlocks.push(id.clone());
        }
    }
}

/// One-time roster expansion for reaching two unlocked tier 2+ blueprints.
pub fn check_slot_unlock(city: &mut CityState, rules: &Ruleset) {
    if city.blueprint_state.slot_upgrade_granted {
        return;
    }
    let advanced = city
        .blueprint_state
        .unlocked
        .iter()
        .filter(|id| rules.blueprint(id).is_some_and(|b| b.tier >= 2))
        .count();
    if advanced >= 2 {
        city.blueprint_state.max_slots += 1;
        city.blueprint_state.slot_upgrade_granted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{BuildingType, CityGrid};

    fn counts_with_factories(n: usize) -> BuildingCounts {
        let mut grid = CityGrid::new(7);
        for c in 0..n {
            grid.place_tile(0, c, BuildingType::Factory, 1);
        }
        grid.building_counts()
    }

    #[test]
    fn conditions_unlock_and_queue_for_presentation() {
        let rules = Ruleset::standard();
        let mut city = CityState::new(&rules);
        // factory_t2 wants two factories and 40 money.
        city.money = 45;
        run(&mut city, &counts_with_factories(2), &rules);

        assert!(city.holds_blueprint("factory_t2"));
        assert_eq!(city.blueprint_state.pending_unlocks, vec!["factory_t2".to_string()]);
    }

    #[test]
    fn unmet_conditions_unlock_nothing() {
        let rules = Ruleset::standard();
        let mut city = CityState::new(&rules);
        city.money = 45;
        run(&mut city, &counts_with_factories(1), &rules);
        assert!(!city.holds_blueprint("factory_t2"));
    }

    #[test]
    fn full_roster_blocks_further_unlocks() {
        let rules = Ruleset::standard();
        let mut city = CityState::new(&rules);
        city.money = 45;
        city.blueprint_state.max_slots = city.blueprint_state.unlocked.len() as u32;
        run(&mut city, &counts_with_factories(2), &rules);
        assert!(!city.holds_blueprint("factory_t2"));
    }

    #[test]
    fn starting_only_blueprints_never_reunlock() {
        let rules = Ruleset::standard();
        let mut city = CityState::new(&rules);
        city.blueprint_state.unlocked.clear();
        run(&mut city, &counts_with_factories(0), &rules);
        // All tier 1 blueprints have empty trees.
        assert!(!city.holds_blueprint("factory_t1"));
    }

    #[test]
    fn slot_upgrade_fires_exactly_once() {
        let rules = Ruleset::standard();
        let mut city = CityState::new(&rules);
        let before = city.blueprint_state.max_slots;
        city.blueprint_state.unlocked.push("factory_t2".into());
        city.blueprint_state.unlocked.push("shop_t2".into());

        check_slot_unlock(&mut city, &rules);
        assert_eq!(city.blueprint_state.max_slots, before + 1);
        assert!(city.blueprint_state.slot_upgrade_granted);

        check_slot_unlock(&mut city, &rules);
        assert_eq!(city.blueprint_state.max_slots, before + 1);
    }
}
