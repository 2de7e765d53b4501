use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grid::{BuildingType, DisableReason};
use crate::resources::Resource;
use crate::trace::ChangeEntry;

/// One disable event recorded during a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingAlert {
    pub r: usize,
    pub c: usize,
    pub building_type: BuildingType,
    pub reason: DisableReason,
    pub message: String,
}

impl BuildingAlert {
    pub fn new(r: usize, c: usize, building_type: BuildingType, reason: DisableReason) -> Self {
        let message = format!(
            "{} at ({}, {}): {}",
            building_type.name(),
            r,
            c,
            reason.alert()
        );
        Self {
            r,
            c,
            building_type,
            reason,
            message,
        }
    }
}

/// Diagnostic output of one pipeline run.
///
/// `breakdown` is the ordered trace of every resource delta; it sums to
/// `net_changes` per resource exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub power_produced: i64,
    pub power_consumed: i64,
    /// Percent of produced power that was consumed; 0 when none produced.
    pub power_utilization: i64,
    pub net_changes: BTreeMap<Resource, i64>,
    pub breakdown: Vec<ChangeEntry>,
    pub building_alerts: Vec<BuildingAlert>,
}

impl SimulationStats {
    pub fn net(&self, resource: Resource) -> i64 {
        self.net_changes.get(&resource).copied().unwrap_or(0)
    }
}
