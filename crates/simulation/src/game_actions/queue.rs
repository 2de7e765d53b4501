//! FIFO action queue resource. The UI pushes, the executor drains once per
//! fixed tick.

use std::collections::VecDeque;

use bevy::prelude::*;

use super::actions::GameAction;

#[derive(Resource, Debug, Default)]
pub struct ActionQueue {
    queue: VecDeque<GameAction>,
}

impl ActionQueue {
    pub fn push(&mut self, action: GameAction) {
        self.queue.push_back(action);
    }

    pub fn pop(&mut self) -> Option<GameAction> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
