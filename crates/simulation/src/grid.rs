use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::resources::ResourceMap;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    Residential,
    Factory,
    Shop,
    Power,
    Warehouse,
}

impl BuildingType {
    pub fn name(self) -> &'static str {
        match self {
            BuildingType::Residential => "Residential",
            BuildingType::Factory => "Factory",
            BuildingType::Shop => "Shop",
            BuildingType::Power => "Power",
            BuildingType::Warehouse => "Warehouse",
        }
    }

    pub fn all() -> &'static [BuildingType] {
        &[
            BuildingType::Residential,
            BuildingType::Factory,
            BuildingType::Shop,
            BuildingType::Power,
            BuildingType::Warehouse,
        ]
    }
}

/// Why a tile was forced to star 0 this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisableReason {
    Workforce,
    Power,
    RawGoods,
    StatusEffect,
}

impl DisableReason {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            DisableReason::Workforce => "workforce",
            DisableReason::Power => "power",
            DisableReason::RawGoods => "raw_goods",
            DisableReason::StatusEffect => "status_effect",
        }
    }

    /// Short alert text shown to the player.
    pub fn alert(self) -> &'static str {
        match self {
            DisableReason::Workforce => "No Workers",
            DisableReason::Power => "No Power",
            DisableReason::RawGoods => "No Stock",
            DisableReason::StatusEffect => "Status Effect",
        }
    }
}

/// A placed building instance occupying one grid cell.
///
/// `tier` only ever increases (merges upgrade in place); `stars` and the
/// disable fields are recomputed by every pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    pub building_type: BuildingType,
    pub tier: u8,
    pub stars: u8,
    pub disabled: bool,
    pub disabled_reason: Option<DisableReason>,
    /// Hint describing what blocked the next star level, if anything.
    pub missing_reqs: Option<String>,
    /// Opt-in per-turn upkeep payment for a production bonus.
    pub upkeep_paid: bool,
    /// Stored goods persisting turn to turn.
    pub storage: ResourceMap,
    /// Output produced this turn; merged into `storage` at end of turn.
    pub produced_this_turn: ResourceMap,
}

impl Tile {
    pub fn new(id: u32, building_type: BuildingType, tier: u8) -> Self {
        Self {
            id,
            building_type,
            tier,
            stars: 0,
            disabled: false,
            disabled_reason: None,
            missing_reqs: None,
            upkeep_paid: false,
            storage: ResourceMap::new(),
            produced_this_turn: ResourceMap::new(),
        }
    }
}

/// One grid position. Cells never move; only their tile occupancy changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub r: usize,
    pub c: usize,
    pub tile: Option<Tile>,
}

/// Count of placed tiles per building type, disabled or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildingCounts(BTreeMap<BuildingType, u32>);

impl BuildingCounts {
    pub fn count(&self, building_type: BuildingType) -> u32 {
        self.0.get(&building_type).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    fn bump(&mut self, building_type: BuildingType) {
        *self.0.entry(building_type).or_insert(0) += 1;
    }
}

/// The board: a size×size row-major array of cells.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityGrid {
    size: usize,
    cells: Vec<Cell>,
    next_tile_id: u32,
}

impl CityGrid {
    pub fn new(size: usize) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for r in 0..size {
            for c in 0..size {
                cells.push(Cell { r, c, tile: None });
            }
        }
        Self {
            size,
            cells,
            next_tile_id: 1,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, r: usize, c: usize) -> usize {
        r * self.size + c
    }

    #[inline]
    pub fn in_bounds(&self, r: usize, c: usize) -> bool {
        r < self.size && c < self.size
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> &Cell {
        &self.cells[self.index(r, c)]
    }

    #[inline]
    pub fn get_mut(&mut self, r: usize, c: usize) -> &mut Cell {
        let idx = self.index(r, c);
        &mut self.cells[idx]
    }

    pub fn tile_at(&self, r: usize, c: usize) -> Option<&Tile> {
        self.get(r, c).tile.as_ref()
    }

    pub fn tile_at_mut(&mut self, r: usize, c: usize) -> Option<&mut Tile> {
        self.get_mut(r, c).tile.as_mut()
    }

    /// Returns up to 4 cardinal neighbors and the count of valid entries.
    /// Use `&result[..count]` to iterate over valid neighbors.
    pub fn neighbors4(&self, r: usize, c: usize) -> ([(usize, usize); 4], usize) {
        let mut result = [(0, 0); 4];
        let mut count = 0;
        if r > 0 {
            result[count] = (r - 1, c);
            count += 1;
        }
        if r + 1 < self.size {
            result[count] = (r + 1, c);
            count += 1;
        }
        if c > 0 {
            result[count] = (r, c - 1);
            count += 1;
        }
        if c + 1 < self.size {
            result[count] = (r, c + 1);
            count += 1;
        }
        (result, count)
    }

    /// Place a fresh tile, assigning it a stable identity.
    /// Returns the new tile's id, or `None` if the cell is occupied.
    pub fn place_tile(
        &mut self,
        r: usize,
        c: usize,
        building_type: BuildingType,
        tier: u8,
    ) -> Option<u32> {
        if self.get(r, c).tile.is_some() {
            return None;
        }
        let id = self.next_tile_id;
        self.next_tile_id += 1;
        self.get_mut(r, c).tile = Some(Tile::new(id, building_type, tier));
        Some(id)
    }

    /// Rebuild a board from persisted tiles. Id assignment resumes past the
    /// highest id seen so restored boards keep handing out fresh ids.
    pub fn from_tiles(size: usize, tiles: Vec<(usize, usize, Tile)>) -> Self {
        let mut grid = Self::new(size);
        for (r, c, tile) in tiles {
            grid.next_tile_id = grid.next_tile_id.max(tile.id + 1);
            grid.get_mut(r, c).tile = Some(tile);
        }
        grid
    }

    /// Row-major iteration over all cells.
    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.tile.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.tile.is_some())
    }

    pub fn building_counts(&self) -> BuildingCounts {
        let mut counts = BuildingCounts::default();
        for cell in &self.cells {
            if let Some(tile) = &cell.tile {
                counts.bump(tile.building_type);
            }
        }
        counts
    }
}
