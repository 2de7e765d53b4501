//! Phase 5: the star ladder. Surviving tiles climb one level at a time by
//! paying the incremental cost out of whatever the pools still hold, in
//! priority order, so low-priority buildings feel scarcity first.

use crate::config::MAX_STARS;
use crate::grid::CityGrid;

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
        let Some(stats) = ctx.rules.stats_for(bt, tile.tier).cloned() else {
            continue;
        };

        let mut hint = None;
        let mut reached = tile.stars;
        'ladder: for level in (reached + 1)..=MAX_STARS {
            if !stats.star_defined(level) {
                break;
            }
            let cost = stats.incremental_cost(level);
            for (resource, amount) in cost.iter() {
                if ctx.available(resource) < amount {
                    let short = amount - ctx.available(resource);
                    hint = Some(format!(
                        "Star {level}: needs {short} more {}",
                        resource.name()
                    ));
                    break 'ladder;
                }
            }
            let source = format!("{} Star Up", bt.name());
            for (resource, amount) in cost.iter() {
                ctx.credit(&source, resource, -amount);
                ctx.reserve((pos.r, pos.c), resource, amount);
            }
            reached = level;
        }

        if let Some(tile) = grid.tile_at_mut(pos.r, pos.c) {
            tile.stars = reached;
            tile.missing_reqs = hint;
        }
    }
}
