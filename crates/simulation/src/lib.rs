//! Turn-based city resolution engine.
//!
//! Everything is plain data plus pure functions over it; Bevy supplies the
//! resource container, schedules, and plugin wiring so the engine runs
//! headless under `MinimalPlugins`. One player action resolves one turn
//! through [`pipeline::run_simulation`].

use bevy::prelude::*;

pub mod city;
pub mod config;
pub mod game_actions;
pub mod grid;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod resources;
pub mod ruleset;
pub mod sim_rng;
pub mod snapshot;
pub mod spawn;
pub mod stats;
pub mod trace;
pub mod unlocks;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use city::{BlueprintState, CityState, GamePhase, GameStatus, TurnSummary};
pub use game_actions::{ActionQueue, ActionResultLog, GameAction};
pub use grid::{BuildingType, CityGrid, DisableReason, Tile};
pub use pipeline::{run_simulation, run_simulation_with, TurnOutcome};
pub use resources::{Resource as CityResource, ResourceMap};
pub use ruleset::{ConfigError, Ruleset};
pub use sim_rng::SimRng;
pub use snapshot::{TurnHistory, TurnSnapshot};
pub use stats::SimulationStats;

/// The ruleset in force for this run.
#[derive(Resource, Debug, Clone)]
pub struct ActiveRuleset(pub Ruleset);

impl Default for ActiveRuleset {
    fn default() -> Self {
        Self(Ruleset::standard())
    }
}

/// Startup: seed the board and ledger from the ruleset unless the app
/// already provided them (loads, tests).
fn init_city(
    mut commands: Commands,
    rules: Res<ActiveRuleset>,
    existing: Option<Res<CityGrid>>,
) {
    if existing.is_some() {
        return;
    }
    commands.insert_resource(CityGrid::new(rules.0.grid_size));
    commands.insert_resource(CityState::new(&rules.0));
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveRuleset>()
            .init_resource::<GameStatus>()
            .init_resource::<SimRng>()
            .init_resource::<TurnHistory>()
            .add_systems(Startup, init_city)
            .add_plugins(game_actions::GameActionsPlugin);
    }
}
