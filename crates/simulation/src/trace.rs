//! The single choke point for resource mutation bookkeeping.
//!
//! Every nonzero delta the pipeline applies to the city ledger goes through
//! [`ChangeTracker::track`], so `sum(breakdown entries for R) ==
//! net_changes[R]` holds by construction rather than by audit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::resources::Resource;

/// One logged resource delta, attributed to a human-readable source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub source: String,
    pub resource: Resource,
    pub amount: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    entries: Vec<ChangeEntry>,
    net: BTreeMap<Resource, i64>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a delta. Zero deltas are dropped so the breakdown stays
    /// readable.
    pub fn track(&mut self, source: &str, resource: Resource, amount: i64) {
        if amount == 0 {
            return;
        }
        self.entries.push(ChangeEntry {
            source: source.to_string(),
            resource,
            amount,
        });
        *self.net.entry(resource).or_insert(0) += amount;
    }

    pub fn net(&self, resource: Resource) -> i64 {
        self.net.get(&resource).copied().unwrap_or(0)
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    /// Consume the tracker into `(breakdown, net_changes)`.
    pub fn into_parts(self) -> (Vec<ChangeEntry>, BTreeMap<Resource, i64>) {
        (self.entries, self.net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_equals_entry_sum_per_resource() {
        let mut tracker = ChangeTracker::new();
        tracker.track("Shop Sales", Resource::Money, 5);
        tracker.track("Idle Power", Resource::Money, -2);
        tracker.track("Factory Production", Resource::RawGoods, 4);
        tracker.track("noop", Resource::Money, 0);

        let (entries, net) = tracker.into_parts();
        assert_eq!(entries.len(), 3);
        for &resource in Resource::all() {
            let sum: i64 = entries
                .iter()
                .filter(|e| e.resource == resource)
                .map(|e| e.amount)
                .sum();
            assert_eq!(sum, net.get(&resource).copied().unwrap_or(0));
        }
    }
}
