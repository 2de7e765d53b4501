//! Phase 7: settle goods into storage. Fresh production folds into tile
//! storage, per-tile caps overflow into warehouses, and whatever still
//! does not fit is exported for money (if an export hub stands) or lost.

use crate::grid::{BuildingType, CityGrid};
use crate::resources::{floor_scale, Resource};

use super::context::TurnContext;

pub fn run(ctx: &mut TurnContext<'_>, grid: &mut CityGrid) {
    let size = grid.size();
    let raw_cap = ctx.rules.storage.caps.get(Resource::RawGoods);
    let product_cap = ctx.rules.storage.caps.get(Resource::Products);

    let mut warehouses = Vec::new();
    let mut has_export_hub = false;
    for r in 0..size {
        for c in 0..size {
            if let Some(tile) = grid.tile_at(r, c) {
                if tile.building_type == BuildingType::Warehouse && !tile.disabled {
                    warehouses.push((r, c));
                    if tile.tier >= ctx.rules.storage.export_hub_min_tier {
                        has_export_hub = true;
                    }
                }
            }
        }
    }

    // Fold this turn's leftovers into storage and collect per-tile
    // overflow beyond the cap.
    let mut overflow = 0i64;
    for r in 0..size {
        for c in 0..size {
            let Some(tile) = grid.tile_at_mut(r, c) else {
                continue;
            };
            let fresh = std::mem::take(&mut tile.produced_this_turn);
            tile.storage.merge(&fresh);
            let held = tile.storage.get(Resource::RawGoods);
            if held > raw_cap {
                overflow += held - raw_cap;
                tile.storage.set(Resource::RawGoods, raw_cap);
            }
        }
    }

    // Overflow spills into warehouses with spare room, row-major.
    for &(r, c) in &warehouses {
        if overflow == 0 {
            break;
        }
        if let Some(tile) = grid.tile_at_mut(r, c) {
            let spare = raw_cap - tile.storage.get(Resource::RawGoods);
            let moved = spare.max(0).min(overflow);
            if moved > 0 {
                tile.storage.add(Resource::RawGoods, moved);
                overflow -= moved;
            }
        }
    }
    settle_excess(ctx, Resource::RawGoods, overflow, has_export_hub);

    // Products pool caps city-wide; each warehouse extends it.
    let pool_cap = product_cap * (1 + warehouses.len() as i64);
    let excess = ctx.city.products_available - pool_cap;
    if excess > 0 {
        settle_excess(ctx, Resource::Products, excess, has_export_hub);
    }
}

fn settle_excess(ctx: &mut TurnContext<'_>, resource: Resource, excess: i64, hub: bool) {
    if excess <= 0 {
        return;
    }
    if hub {
        ctx.credit("Export Sales", resource, -excess);
        ctx.credit(
            "Export Sales",
            Resource::Money,
            floor_scale(excess, ctx.rules.storage.export_rate),
        );
    } else {
        ctx.credit("Waste", resource, -excess);
    }
}
