//! Same-type/tier clustering and merge-to-next-tier resolution.
//!
//! Three orthogonally connected tiles of the same `(building_type, tier)`
//! merge into one tile of the next tier at the seed position. Selection of
//! the two consumed tiles is fully deterministic (Manhattan distance to the
//! seed, then row, then column) so replays reproduce exactly.

use std::collections::{HashSet, VecDeque};

use crate::config::{MERGE_CASCADE_LIMIT, MERGE_CLUSTER_MIN};
use crate::grid::CityGrid;

/// Connected component of cells reachable from `(r, c)` via orthogonal
/// adjacency where every tile matches the seed's `(building_type, tier)`.
/// Returns an empty vec when the seed cell is empty.
pub fn flood_fill(grid: &CityGrid, r: usize, c: usize) -> Vec<(usize, usize)> {
    let Some(seed) = grid.tile_at(r, c) else {
        return Vec::new();
    };
    let key = (seed.building_type, seed.tier);

    let mut visited: HashSet<(usize, usize)> = HashSet::new();
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    let mut component = Vec::new();

    visited.insert((r, c));
    queue.push_back((r, c));

    while let Some((cr, cc)) = queue.pop_front() {
        component.push((cr, cc));
        let (neighbors, count) = grid.neighbors4(cr, cc);
        for &(nr, nc) in &neighbors[..count] {
            if visited.contains(&(nr, nc)) {
                continue;
            }
            if let Some(tile) = grid.tile_at(nr, nc) {
                if (tile.building_type, tile.tier) == key {
                    visited.insert((nr, nc));
                    queue.push_back((nr, nc));
                }
            }
        }
    }
    component
}

fn manhattan(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Attempt a merge at the seed cell, cascading up to
/// [`MERGE_CASCADE_LIMIT`] times as the upgraded tile may again sit in a
/// large-enough cluster. Returns whether at least one merge occurred.
///
/// Each merge consumes the seed plus the two cluster members nearest to it
/// (distance, then row, then column), removes those two tiles, and raises
/// the seed tile's tier by one, preserving its identity. Stars are left
/// untouched; the next pipeline run recomputes them.
pub fn resolve_merge(grid: &mut CityGrid, r: usize, c: usize, max_tier: u8) -> bool {
    let mut merged = false;
    for _ in 0..MERGE_CASCADE_LIMIT {
        let Some(tile) = grid.tile_at(r, c) else {
            break;
        };
        if tile.tier >= max_tier {
            break;
        }

        let cluster = flood_fill(grid, r, c);
        if cluster.len() < MERGE_CLUSTER_MIN {
            break;
        }

        let mut others: Vec<(usize, usize)> = cluster
            .into_iter()
            .filter(|&pos| pos != (r, c))
            .collect();
        others.sort_by_key(|&pos| (manhattan(pos, (r, c)), pos.0, pos.1));

        for &(or, oc) in others.iter().take(MERGE_CLUSTER_MIN - 1) {
            grid.get_mut(or, oc).tile = None;
        }
        if let Some(seed) = grid.tile_at_mut(r, c) {
            seed.tier += 1;
        }
        merged = true;
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BuildingType;

    fn grid_with(tiles: &[(usize, usize, BuildingType, u8)]) -> CityGrid {
        let mut grid = CityGrid::new(7);
        for &(r, c, bt, tier) in tiles {
            grid.place_tile(r, c, bt, tier).unwrap();
        }
        grid
    }

    #[test]
    fn flood_fill_matches_type_and_tier() {
        let grid = grid_with(&[
            (0, 0, BuildingType::Factory, 1),
            (0, 1, BuildingType::Factory, 1),
            (0, 2, BuildingType::Factory, 2),
            (1, 0, BuildingType::Shop, 1),
        ]);
        let component = flood_fill(&grid, 0, 0);
        assert_eq!(component.len(), 2);
        assert!(component.contains(&(0, 0)));
        assert!(component.contains(&(0, 1)));
    }

    #[test]
    fn flood_fill_empty_seed() {
        let grid = CityGrid::new(7);
        assert!(flood_fill(&grid, 3, 3).is_empty());
    }

    #[test]
    fn cluster_of_two_never_merges() {
        let mut grid = grid_with(&[
            (0, 0, BuildingType::Factory, 1),
            (0, 1, BuildingType::Factory, 1),
        ]);
        assert!(!resolve_merge(&mut grid, 0, 0, 3));
        assert_eq!(grid.tile_at(0, 0).unwrap().tier, 1);
    }

    #[test]
    fn merge_consumes_two_nearest_and_upgrades_seed() {
        // Line of four; seed at the left end. The two nearest others are
        // (0,1) and (0,2); (0,3) survives.
        let mut grid = grid_with(&[
            (0, 0, BuildingType::Factory, 1),
            (0, 1, BuildingType::Factory, 1),
            (0, 2, BuildingType::Factory, 1),
            (0, 3, BuildingType::Factory, 1),
        ]);
        assert!(resolve_merge(&mut grid, 0, 0, 3));
        assert_eq!(grid.tile_at(0, 0).unwrap().tier, 2);
        assert!(grid.tile_at(0, 1).is_none());
        assert!(grid.tile_at(0, 2).is_none());
        assert!(grid.tile_at(0, 3).is_some());
    }

    #[test]
    fn merge_preserves_seed_identity() {
        let mut grid = grid_with(&[
            (1, 1, BuildingType::Shop, 1),
            (1, 2, BuildingType::Shop, 1),
            (2, 1, BuildingType::Shop, 1),
        ]);
        let id = grid.tile_at(1, 1).unwrap().id;
        assert!(resolve_merge(&mut grid, 1, 1, 3));
        let seed = grid.tile_at(1, 1).unwrap();
        assert_eq!(seed.id, id);
        assert_eq!(seed.tier, 2);
    }

    #[test]
    fn merge_tie_breaks_by_row_then_column() {
        // Seed at center with all four neighbors at distance 1; the two
        // consumed must be (1,2) then (2,1) under (distance, row, col).
        let mut grid = grid_with(&[
            (2, 2, BuildingType::Residential, 1),
            (1, 2, BuildingType::Residential, 1),
            (3, 2, BuildingType::Residential, 1),
            (2, 1, BuildingType::Residential, 1),
            (2, 3, BuildingType::Residential, 1),
        ]);
        assert!(resolve_merge(&mut grid, 2, 2, 3));
        assert!(grid.tile_at(1, 2).is_none());
        assert!(grid.tile_at(2, 1).is_none());
        assert!(grid.tile_at(3, 2).is_some());
        assert!(grid.tile_at(2, 3).is_some());
    }

    #[test]
    fn merge_is_deterministic_across_identical_grids() {
        let build = || {
            grid_with(&[
                (2, 2, BuildingType::Factory, 1),
                (2, 3, BuildingType::Factory, 1),
                (3, 2, BuildingType::Factory, 1),
                (1, 2, BuildingType::Factory, 1),
            ])
        };
        let mut a = build();
        let mut b = build();
        resolve_merge(&mut a, 2, 2, 3);
        resolve_merge(&mut b, 2, 2, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn cascade_chains_into_next_tier() {
        // Three T1 at the seed, plus two T2 adjacent: after the first merge
        // the seed becomes T2 and immediately merges again to T3.
        let mut grid = grid_with(&[
            (0, 0, BuildingType::Factory, 1),
            (0, 1, BuildingType::Factory, 1),
            (1, 0, BuildingType::Factory, 1),
            (1, 1, BuildingType::Factory, 2),
            (0, 2, BuildingType::Factory, 2),
        ]);
        // Rewire: seed (0,1) touches (0,0),(1,1),(0,2).
        assert!(resolve_merge(&mut grid, 0, 1, 3));
        let seed = grid.tile_at(0, 1).unwrap();
        assert_eq!(seed.tier, 3);
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn merge_stops_at_tier_cap() {
        let mut grid = grid_with(&[
            (0, 0, BuildingType::Factory, 3),
            (0, 1, BuildingType::Factory, 3),
            (0, 2, BuildingType::Factory, 3),
        ]);
        assert!(!resolve_merge(&mut grid, 0, 0, 3));
        assert_eq!(grid.tile_at(0, 0).unwrap().tier, 3);
        assert_eq!(grid.occupied_count(), 3);
    }
}
