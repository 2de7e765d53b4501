//! Phase 1: zero the flow ledger, reset per-turn tile state, and apply
//! storage decay to last turn's leftovers.

use crate::grid::CityGrid;
use crate::resources::{floor_scale, Resource};

use super::context::{drain_goods, TurnContext};

pub fn run(ctx: &mut TurnContext<'_>, grid: &mut CityGrid) {
    let city = &mut ctx.city;
    city.population = 0;
    city.workforce_available = 0;
    city.power_available = 0;
    city.power_capacity = 0;
    city.jobs_capacity = 0;
    city.unemployed = 0;

    for r in 0..grid.size() {
        for c in 0..grid.size() {
            if let Some(tile) = grid.tile_at_mut(r, c) {
                tile.stars = 1;
                tile.disabled = false;
                tile.disabled_reason = None;
                tile.missing_reqs = None;
                tile.produced_this_turn = Default::default();
            }
        }
    }

    // Raw goods spoil: stock above the threshold loses a fraction per turn.
    let stock = ctx.city.raw_goods_available;
    let threshold = ctx.rules.product.spoilage_threshold;
    if stock > threshold {
        let loss = floor_scale(stock - threshold, ctx.rules.product.decay_rate);
        if loss > 0 {
            ctx.credit("Storage Decay", Resource::RawGoods, -loss);
            drain_goods(grid, Resource::RawGoods, loss);
        }
    }
}
