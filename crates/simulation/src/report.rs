//! Plain-text projection of a snapshot, for logs and headless debugging.

use std::fmt::Write as _;

use crate::grid::{BuildingType, CityGrid};
use crate::snapshot::{TurnHistory, TurnSnapshot};

fn type_letter(building_type: BuildingType) -> char {
    match building_type {
        BuildingType::Residential => 'R',
        BuildingType::Factory => 'F',
        BuildingType::Shop => 'S',
        BuildingType::Power => 'P',
        BuildingType::Warehouse => 'W',
    }
}

/// Each cell renders as letter + tier (`R2`), lowercased when the building
/// is disabled; empty cells are ` .`.
pub fn render_grid(grid: &CityGrid) -> String {
    let mut out = String::new();
    for r in 0..grid.size() {
        for c in 0..grid.size() {
            if c > 0 {
                out.push(' ');
            }
            match grid.tile_at(r, c) {
                Some(tile) => {
                    let mut letter = type_letter(tile.building_type);
                    if tile.disabled {
                        letter = letter.to_ascii_lowercase();
                    }
                    out.push(letter);
                    out.push(char::from_digit(tile.tier as u32, 10).unwrap_or('?'));
                }
                None => out.push_str(" ."),
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_snapshot(snapshot: &TurnSnapshot) -> String {
    let city = &snapshot.city;
    let mut out = String::new();
    let _ = writeln!(out, "turn {} [{}]", snapshot.turn, snapshot.action);
    let _ = writeln!(
        out,
        "money {}  pop {}  happiness {}  coverage {}%",
        city.money, city.population, city.happiness, city.service_coverage
    );
    let _ = writeln!(
        out,
        "power {}/{}  raw {}  products {}  unemployed {}",
        snapshot.stats.power_consumed,
        snapshot.stats.power_produced,
        city.raw_goods_available,
        city.products_available,
        city.unemployed
    );
    out.push_str(&render_grid(&snapshot.grid));
    let stars: Vec<String> = snapshot
        .grid
        .iter_cells()
        .filter_map(|cell| {
            let tile = cell.tile.as_ref()?;
            Some(format!("({},{}) {}*", cell.r, cell.c, tile.stars))
        })
        .collect();
    if !stars.is_empty() {
        let _ = writeln!(out, "stars: {}", stars.join(" "));
    }
    for alert in &snapshot.stats.building_alerts {
        let _ = writeln!(out, "! {}", alert.message);
    }
    if !city.blueprint_state.pending_unlocks.is_empty() {
        let _ = writeln!(
            out,
            "unlocked: {}",
            city.blueprint_state.pending_unlocks.join(", ")
        );
    }
    out
}

pub fn render_history(history: &TurnHistory) -> String {
    history
        .iter()
        .map(render_snapshot)
        .collect::<Vec<_>>()
        .join("\n")
}
