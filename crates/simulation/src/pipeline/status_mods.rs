//! Phase 2: apply the status effects that triggered at the end of the
//! previous turn.

use crate::grid::{CityGrid, DisableReason};
use crate::ruleset::EffectAction;

use super::context::TurnContext;

pub fn run(ctx: &mut TurnContext<'_>, grid: &mut CityGrid) {
    let active = ctx.city.active_status_effects.clone();
    for id in &active {
        let Some(effect) = ctx.rules.effect_by_id(id).cloned() else {
            // Stale id from a ruleset swap mid-save; skip it.
            continue;
        };
        for action in &effect.effects {
            match *action {
                EffectAction::ProductionMultiplier { target, factor } => match target {
                    Some(bt) => {
                        let entry = ctx.modifiers.per_type.entry(bt).or_insert(1.0);
                        *entry *= factor;
                    }
                    None => ctx.modifiers.all *= factor,
                },
                EffectAction::ResourceDelta { resource, amount } => {
                    ctx.credit(&effect.name, resource, amount);
                }
                EffectAction::DisableBuilding { building } => {
                    ctx.modifiers.disabled_types.insert(building);
                }
            }
        }
    }

    if ctx.modifiers.disabled_types.is_empty() {
        return;
    }
    let disabled = ctx.modifiers.disabled_types.clone();
    for r in 0..grid.size() {
        for c in 0..grid.size() {
            let Some(tile) = grid.tile_at_mut(r, c) else {
                continue;
            };
            if disabled.contains(&tile.building_type) {
                ctx.disable(tile, (r, c), DisableReason::StatusEffect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CityState;
    use crate::grid::BuildingType;
    use crate::resources::Resource;
    use crate::ruleset::Ruleset;

    #[test]
    fn multipliers_compose_and_deltas_apply() {
        let rules = Ruleset::standard();
        let mut city = CityState::new(&rules);
        city.active_status_effects = vec!["blackout".into(), "boomtown".into()];
        let mut grid = CityGrid::new(7);

        let mut ctx = TurnContext::new(&rules, &city, 1.0);
        run(&mut ctx, &mut grid);

        // Blackout: factory x0.75 and -5 happiness. Boomtown: all x1.25.
        assert!((ctx.modifiers.all - 1.25).abs() < 1e-6);
        let factory = ctx.modifiers.per_type[&BuildingType::Factory];
        assert!((factory - 0.75).abs() < 1e-6);
        assert_eq!(ctx.city.happiness, 95);
        assert_eq!(ctx.tracker.net(Resource::Happiness), -5);
    }

    #[test]
    fn disable_building_marks_every_tile_of_the_type() {
        let rules = Ruleset::standard();
        let mut city = CityState::new(&rules);
        city.active_status_effects = vec!["labor_strike".into()];
        let mut grid = CityGrid::new(7);
        grid.place_tile(0, 0, BuildingType::Factory, 1);
        grid.place_tile(2, 2, BuildingType::Factory, 2);
        grid.place_tile(1, 1, BuildingType::Shop, 1);
        for r in 0..3 {
            for c in 0..3 {
                if let Some(t) = grid.tile_at_mut(r, c) {
                    t.stars = 1;
                }
            }
        }

        let mut ctx = TurnContext::new(&rules, &city, 1.0);
        run(&mut ctx, &mut grid);

        assert!(grid.tile_at(0, 0).unwrap().disabled);
        assert!(grid.tile_at(2, 2).unwrap().disabled);
        assert!(!grid.tile_at(1, 1).unwrap().disabled);
        assert_eq!(ctx.alerts.len(), 2);
        assert_eq!(ctx.city.money, rules.initial_money - 5);
    }

    #[test]
    fn unknown_effect_ids_are_ignored() {
        let rules = Ruleset::standard();
        let mut city = CityState::new(&rules);
        city.active_status_effects = vec!["gone".into()];
        let mut grid = CityGrid::new(7);
        let mut ctx = TurnContext::new(&rules, &city, 1.0);
        run(&mut ctx, &mut grid);
        assert!(ctx.tracker.entries().is_empty());
    }
}
