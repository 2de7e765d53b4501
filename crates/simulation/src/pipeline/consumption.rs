//! Phase 6: the production chain. Factories turn power and crew into raw
//! goods, shops turn raw goods into products and sales, residential tiles
//! cash in their star bonus. Priority order again, so shops see what
//! factories made this same turn.

use crate::grid::{CityGrid, DisableReason};
use crate::resources::{floor_scale, Resource};

use super::context::{drain_goods, ordered_tiles, TurnContext};

pub fn run(ctx: &mut TurnContext<'_>, grid: &mut CityGrid) {
    for pos in ordered_tiles(grid, ctx.rules) {
        let Some(tile) = grid.tile_at(pos.r, pos.c) else {
            continue;
        };
        if tile.disabled {
            continue;
        }
        let bt = tile.building_type;
        let stars = tile.stars;
        let Some(stats) = ctx.rules.stats_for(bt, tile.tier).cloned() else {
            continue;
        };
        let name = bt.name();
        let mult = ctx.multiplier(bt, (pos.r, pos.c));
        let base = stats.requirement_at(1);

        // Stock inputs. Falling short here shuts the building down and
        // releases everything it reserved, including star-up deductions.
        let mut starved = false;
        for resource in [Resource::RawGoods, Resource::Products] {
            let need = base.get(resource);
            if need > 0 && ctx.available(resource) < need {
                starved = true;
            }
        }
        if starved {
            ctx.refund((pos.r, pos.c), bt);
            ctx.jobs_filled -= base.get(Resource::Workforce);
            if let Some(tile) = grid.tile_at_mut(pos.r, pos.c) {
                ctx.disable(tile, (pos.r, pos.c), DisableReason::RawGoods);
            }
            continue;
        }
        for resource in [Resource::RawGoods, Resource::Products] {
            let need = base.get(resource);
            if need > 0 {
                ctx.credit(&format!("{name} Supply"), resource, -need);
                drain_goods(grid, resource, need);
            }
        }

        // Outputs at the earned star level.
        let outputs = stats.produces_at(stars).clone();
        let base_out = stats.produces_at(1).clone();
        for (resource, amount) in outputs.iter() {
            let scaled = floor_scale(amount, mult);
            match resource {
                // Put on the grid back in phase 3.
                Resource::Power => {}
                Resource::Population => {
                    let bonus = scaled - floor_scale(base_out.get(resource), mult);
                    if bonus > 0 {
                        ctx.credit("Residential Star Bonus", Resource::Population, bonus);
                        ctx.credit("Residential Star Bonus", Resource::Workforce, bonus);
                    }
                }
                Resource::Money => {
                    ctx.credit(&format!("{name} Sales"), Resource::Money, scaled);
                }
                Resource::RawGoods | Resource::Products => {
                    if scaled > 0 {
                        ctx.credit(&format!("{name} Production"), resource, scaled);
                        if resource == Resource::RawGoods {
                            if let Some(tile) = grid.tile_at_mut(pos.r, pos.c) {
                                tile.produced_this_turn.add(resource, scaled);
                            }
                        }
                    }
                }
                Resource::Workforce | Resource::Happiness => {
                    ctx.credit(&format!("{name} Production"), resource, scaled);
                }
            }
        }
    }
}
