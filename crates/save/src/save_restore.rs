// ---------------------------------------------------------------------------
// Capture and restore between live simulation types and save structs
// ---------------------------------------------------------------------------

use simulation::city::{BlueprintState, CityState, GameStatus, TurnSummary};
use simulation::grid::{CityGrid, Tile};
use simulation::resources::ResourceMap;
use simulation::snapshot::{TurnHistory, TurnSnapshot};
use simulation::stats::{BuildingAlert, SimulationStats};
use simulation::trace::ChangeEntry;

use crate::save_codec::{
    building_type_to_u8, disable_reason_to_u8, phase_to_u8, resource_to_u8, u8_to_building_type,
    u8_to_disable_reason, u8_to_phase, u8_to_resource,
};
use crate::save_error::SaveError;
use crate::save_types::{
    SaveAlert, SaveBlueprintState, SaveChangeEntry, SaveCity, SaveData, SaveGrid, SaveSnapshot,
    SaveStats, SaveTile, SaveTurnSummary, CURRENT_SAVE_VERSION,
};

/// Everything a loaded save rebuilds.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedSession {
    pub city: CityState,
    pub grid: CityGrid,
    pub status: GameStatus,
    pub history: TurnHistory,
}

/// Capture the live session into a versioned save struct.
pub fn capture(
    city: &CityState,
    grid: &CityGrid,
    status: GameStatus,
    history: &TurnHistory,
) -> SaveData {
    SaveData {
        version: CURRENT_SAVE_VERSION,
        phase: phase_to_u8(status.phase),
        city: capture_city(city),
        grid: capture_grid(grid),
        history: history.iter().map(capture_snapshot).collect(),
    }
}

/// Rebuild the live session from a save struct.
///
/// # Errors
///
/// Returns a decode error when a tile carries an unknown enum tag or sits
/// outside the saved board size, and a version error when the save is from
/// a newer build.
pub fn restore(data: &SaveData) -> Result<SavedSession, SaveError> {
    if data.version > CURRENT_SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected_max: CURRENT_SAVE_VERSION,
            found: data.version,
        });
    }
    let mut history = TurnHistory::default();
    for snapshot in &data.history {
        history.push(restore_snapshot(snapshot)?);
    }
    Ok(SavedSession {
        city: restore_city(&data.city),
        grid: restore_grid(&data.grid)?,
        status: GameStatus {
            phase: u8_to_phase(data.phase)?,
        },
        history,
    })
}

fn capture_city(city: &CityState) -> SaveCity {
    let bp = &city.blueprint_state;
    let last = &city.last_turn_stats;
    SaveCity {
        money: city.money,
        population: city.population,
        raw_goods_available: city.raw_goods_available,
        products_available: city.products_available,
        power_available: city.power_available,
        power_capacity: city.power_capacity,
        workforce_available: city.workforce_available,
        jobs_capacity: city.jobs_capacity,
        unemployed: city.unemployed,
        happiness: city.happiness,
        turn: city.turn,
        service_coverage: city.service_coverage,
        active_status_effects: city.active_status_effects.clone(),
        blueprints: SaveBlueprintState {
            unlocked: bp.unlocked.clone(),
            selected: bp.selected.clone(),
            max_slots: bp.max_slots,
            placed_this_turn: bp.placed_this_turn,
            pending_unlocks: bp.pending_unlocks.clone(),
            slot_upgrade_granted: bp.slot_upgrade_granted,
        },
        last_turn: SaveTurnSummary {
            power_produced: last.power_produced,
            power_consumed: last.power_consumed,
            power_utilization: last.power_utilization,
            products_demanded: last.products_demanded,
            products_consumed: last.products_consumed,
            jobs_filled: last.jobs_filled,
        },
    }
}

fn restore_city(save: &SaveCity) -> CityState {
    CityState {
        money: save.money,
        population: save.population,
        raw_goods_available: save.raw_goods_available,
        products_available: save.products_available,
        power_available: save.power_available,
        power_capacity: save.power_capacity,
        workforce_available: save.workforce_available,
        jobs_capacity: save.jobs_capacity,
        unemployed: save.unemployed,
        happiness: save.happiness,
        turn: save.turn,
        service_coverage: save.service_coverage,
        active_status_effects: save.active_status_effects.clone(),
        blueprint_state: BlueprintState {
            unlocked: save.blueprints.unlocked.clone(),
            selected: save.blueprints.selected.clone(),
            max_slots: save.blueprints.max_slots,
            placed_this_turn: save.blueprints.placed_this_turn,
            pending_unlocks: save.blueprints.pending_unlocks.clone(),
            slot_upgrade_granted: save.blueprints.slot_upgrade_granted,
        },
        last_turn_stats: TurnSummary {
            power_produced: save.last_turn.power_produced,
            power_consumed: save.last_turn.power_consumed,
            power_utilization: save.last_turn.power_utilization,
            products_demanded: save.last_turn.products_demanded,
            products_consumed: save.last_turn.products_consumed,
            jobs_filled: save.last_turn.jobs_filled,
        },
    }
}

fn capture_grid(grid: &CityGrid) -> SaveGrid {
    let tiles = grid
        .iter_cells()
        .filter_map(|cell| {
            let tile = cell.tile.as_ref()?;
            Some(SaveTile {
                r: cell.r as u32,
                c: cell.c as u32,
                id: tile.id,
                building: building_type_to_u8(tile.building_type),
                tier: tile.tier,
                stars: tile.stars,
                disabled: tile.disabled,
                disabled_reason: disable_reason_to_u8(tile.disabled_reason),
                missing_reqs: tile.missing_reqs.clone(),
                upkeep_paid: tile.upkeep_paid,
                storage: pack_map(&tile.storage),
                produced_this_turn: pack_map(&tile.produced_this_turn),
            })
        })
        .collect();
    SaveGrid {
        size: grid.size() as u32,
        tiles,
    }
}

fn restore_grid(save: &SaveGrid) -> Result<CityGrid, SaveError> {
    let size = save.size as usize;
    let mut tiles = Vec::with_capacity(save.tiles.len());
    for saved in &save.tiles {
        let (r, c) = (saved.r as usize, saved.c as usize);
        if r >= size || c >= size {
            return Err(SaveError::Decode(format!(
                "tile at ({r}, {c}) is outside the {size}x{size} board"
            )));
        }
        let mut tile = Tile::new(saved.id, u8_to_building_type(saved.building)?, saved.tier);
        tile.stars = saved.stars;
        tile.disabled = saved.disabled;
        tile.disabled_reason = u8_to_disable_reason(saved.disabled_reason)?;
        tile.missing_reqs = saved.missing_reqs.clone();
        tile.upkeep_paid = saved.upkeep_paid;
        tile.storage = unpack_map(&saved.storage)?;
        tile.produced_this_turn = unpack_map(&saved.produced_this_turn)?;
        tiles.push((r, c, tile));
    }
    Ok(CityGrid::from_tiles(size, tiles))
}

fn capture_snapshot(snapshot: &TurnSnapshot) -> SaveSnapshot {
    let stats = &snapshot.stats;
    SaveSnapshot {
        turn: snapshot.turn,
        action: snapshot.action.clone(),
        grid: capture_grid(&snapshot.grid),
        city: capture_city(&snapshot.city),
        stats: SaveStats {
            power_produced: stats.power_produced,
            power_consumed: stats.power_consumed,
            power_utilization: stats.power_utilization,
            net_changes: stats
                .net_changes
                .iter()
                .map(|(&r, &amount)| (resource_to_u8(r), amount))
                .collect(),
            breakdown: stats
                .breakdown
                .iter()
                .map(|e| SaveChangeEntry {
                    source: e.source.clone(),
                    resource: resource_to_u8(e.resource),
                    amount: e.amount,
                })
                .collect(),
            building_alerts: stats
                .building_alerts
                .iter()
                .map(|a| SaveAlert {
                    r: a.r as u32,
                    c: a.c as u32,
                    building: building_type_to_u8(a.building_type),
                    reason: disable_reason_to_u8(Some(a.reason)),
                    message: a.message.clone(),
                })
                .collect(),
        },
        phase: phase_to_u8(snapshot.phase),
    }
}

fn restore_snapshot(save: &SaveSnapshot) -> Result<TurnSnapshot, SaveError> {
    let mut net_changes = std::collections::BTreeMap::new();
    for &(tag, amount) in &save.stats.net_changes {
        net_changes.insert(u8_to_resource(tag)?, amount);
    }
    let mut breakdown = Vec::with_capacity(save.stats.breakdown.len());
    for e in &save.stats.breakdown {
        breakdown.push(ChangeEntry {
            source: e.source.clone(),
            resource: u8_to_resource(e.resource)?,
            amount: e.amount,
        });
    }
    let mut building_alerts = Vec::with_capacity(save.stats.building_alerts.len());
    for a in &save.stats.building_alerts {
        let reason = u8_to_disable_reason(a.reason)?.ok_or_else(|| {
            SaveError::Decode("alert with no disable reason".to_string())
        })?;
        let mut alert = BuildingAlert::new(
            a.r as usize,
            a.c as usize,
            u8_to_building_type(a.building)?,
            reason,
        );
        alert.message = a.message.clone();
        building_alerts.push(alert);
    }
    Ok(TurnSnapshot {
        turn: save.turn,
        action: save.action.clone(),
        grid: restore_grid(&save.grid)?,
        city: restore_city(&save.city),
        stats: SimulationStats {
            power_produced: save.stats.power_produced,
            power_consumed: save.stats.power_consumed,
            power_utilization: save.stats.power_utilization,
            net_changes,
            breakdown,
            building_alerts,
        },
        phase: u8_to_phase(save.phase)?,
    })
}

fn pack_map(map: &ResourceMap) -> Vec<(u8, i64)> {
    map.iter()
        .map(|(resource, amount)| (resource_to_u8(resource), amount))
        .collect()
}

fn unpack_map(pairs: &[(u8, i64)]) -> Result<ResourceMap, SaveError> {
    pairs
        .iter()
        .map(|&(tag, amount)| Ok((u8_to_resource(tag)?, amount)))
        .collect()
}
