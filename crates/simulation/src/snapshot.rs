//! Post-turn snapshots, kept in order for replay and diagnostics.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::city::{CityState, GamePhase};
use crate::grid::CityGrid;
use crate::stats::SimulationStats;

/// Everything about the world right after one turn resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    pub turn: u32,
    /// Human-readable description of the action that drove the turn.
    pub action: String,
    pub grid: CityGrid,
    pub city: CityState,
    pub stats: SimulationStats,
    pub phase: GamePhase,
}

/// Ordered log of every resolved turn this run.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnHistory {
    snapshots: Vec<TurnSnapshot>,
}

impl TurnHistory {
    pub fn push(&mut self, snapshot: TurnSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn last(&self) -> Option<&TurnSnapshot> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TurnSnapshot> {
        self.snapshots.iter()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
