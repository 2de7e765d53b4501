//! # TestCity — headless integration test harness
//!
//! A fluent builder wrapping `bevy::app::App` + `SimulationPlugin` so
//! integration tests can queue actions and tick turns without a window.

use bevy::app::App;
use bevy::prelude::*;

use crate::city::{CityState, GameStatus};
use crate::game_actions::{ActionQueue, ActionResult, ActionResultLog, GameAction};
use crate::grid::{BuildingType, CityGrid};
use crate::ruleset::Ruleset;
use crate::snapshot::TurnHistory;
use crate::{ActiveRuleset, SimulationPlugin};

pub struct TestCity {
    app: App,
}

impl TestCity {
    pub fn new() -> Self {
        Self::with_ruleset(Ruleset::standard())
    }

    pub fn with_ruleset(rules: Ruleset) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        // Insert before the plugin so init_resource keeps this one.
        app.insert_resource(ActiveRuleset(rules));
        app.add_plugins(SimulationPlugin);
        // Run Startup so the grid and city exist.
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Builder setup
    // -----------------------------------------------------------------------

    pub fn with_money(mut self, amount: i64) -> Self {
        self.app.world_mut().resource_mut::<CityState>().money = amount;
        self
    }

    /// Drop a building straight onto the board, bypassing the action layer.
    pub fn with_building(mut self, r: usize, c: usize, bt: BuildingType, tier: u8) -> Self {
        self.app
            .world_mut()
            .resource_mut::<CityGrid>()
            .place_tile(r, c, bt, tier);
        self
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Queue an action and run one fixed tick.
    pub fn act(&mut self, action: GameAction) {
        self.app
            .world_mut()
            .resource_mut::<ActionQueue>()
            .push(action);
        self.tick();
    }

    /// Queue a placement and resolve the turn.
    pub fn place(&mut self, r: usize, c: usize, blueprint_id: &str) {
        self.act(GameAction::PlaceBuilding {
            r,
            c,
            blueprint_id: blueprint_id.to_string(),
        });
    }

    /// Run the executor once without queueing anything.
    pub fn tick(&mut self) {
        self.app.world_mut().run_schedule(FixedUpdate);
    }

    // -----------------------------------------------------------------------
    // State access
    // -----------------------------------------------------------------------

    pub fn city(&self) -> &CityState {
        self.app.world().resource::<CityState>()
    }

    pub fn grid(&self) -> &CityGrid {
        self.app.world().resource::<CityGrid>()
    }

    pub fn status(&self) -> GameStatus {
        *self.app.world().resource::<GameStatus>()
    }

    pub fn history(&self) -> &TurnHistory {
        self.app.world().resource::<TurnHistory>()
    }

    pub fn last_result(&self) -> Option<&ActionResult> {
        self.app.world().resource::<ActionResultLog>().last()
    }
}

impl Default for TestCity {
    fn default() -> Self {
        Self::new()
    }
}
