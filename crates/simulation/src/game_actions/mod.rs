//! The action layer: everything the player can do, validated and executed
//! against the simulation state.

mod actions;
mod executor;
mod queue;
mod result_log;
mod results;

pub use actions::GameAction;
pub use executor::{
    can_execute_place_building, execute_buy_slot, execute_place_building, execute_queued_actions,
    execute_select_blueprint, execute_set_upkeep,
};
pub use queue::ActionQueue;
pub use result_log::ActionResultLog;
pub use results::{ActionError, ActionResult};

use bevy::prelude::*;

pub struct GameActionsPlugin;

impl Plugin for GameActionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActionQueue>()
            .init_resource::<ActionResultLog>()
            .add_systems(FixedUpdate, execute_queued_actions);
    }
}
