//! Rolling log of action outcomes for the presentation layer.

use bevy::prelude::*;

use super::results::ActionResult;

#[derive(Resource, Debug, Default)]
pub struct ActionResultLog {
    results: Vec<ActionResult>,
}

impl ActionResultLog {
    pub fn push(&mut self, result: ActionResult) {
        self.results.push(result);
    }

    pub fn last(&self) -> Option<&ActionResult> {
        self.results.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionResult> {
        self.results.iter()
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }
}
