//! Phase 9: re-evaluate status effect triggers against the finished turn.
//! Whatever fires now shapes the *next* turn's modifier phase.

use crate::grid::CityGrid;
use crate::ruleset::all_hold;

use super::context::TurnContext;

pub fn run(ctx: &mut TurnContext<'_>, grid: &mut CityGrid) {
    let counts = grid.building_counts();
    ctx.city.active_status_effects = ctx
        .rules
        .status_effects
        .iter()
        .filter(|effect| all_hold(&effect.triggers, &ctx.city, &counts))
        .map(|effect| effect.id.clone())
        .collect();
}
