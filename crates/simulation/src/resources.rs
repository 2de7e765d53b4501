use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The closed set of resource keys flowing through the engine.
///
/// Flow resources (`Power`, `Workforce`) are recomputed from scratch every
/// turn; stock resources (`Money`, `RawGoods`, `Products`) persist across
/// turns and only change through logged deltas.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Money,
    Population,
    Workforce,
    Power,
    Happiness,
    RawGoods,
    Products,
}

impl Resource {
    pub fn name(self) -> &'static str {
        match self {
            Resource::Money => "Money",
            Resource::Population => "Population",
            Resource::Workforce => "Workforce",
            Resource::Power => "Power",
            Resource::Happiness => "Happiness",
            Resource::RawGoods => "Raw Goods",
            Resource::Products => "Products",
        }
    }

    pub fn all() -> &'static [Resource] {
        &[
            Resource::Money,
            Resource::Population,
            Resource::Workforce,
            Resource::Power,
            Resource::Happiness,
            Resource::RawGoods,
            Resource::Products,
        ]
    }

    /// Stocks persist across turns; everything else is recomputed.
    pub fn is_stock(self) -> bool {
        matches!(
            self,
            Resource::Money | Resource::RawGoods | Resource::Products
        )
    }
}

/// A bag of resource amounts keyed by the closed [`Resource`] set.
///
/// Backed by a `BTreeMap` so iteration order (and therefore trace order)
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceMap(BTreeMap<Resource, i64>);

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, resource: Resource) -> i64 {
        self.0.get(&resource).copied().unwrap_or(0)
    }

    /// Set an amount, removing the entry when it reaches zero.
    pub fn set(&mut self, resource: Resource, amount: i64) {
        if amount == 0 {
            self.0.remove(&resource);
        } else {
            self.0.insert(resource, amount);
        }
    }

    pub fn add(&mut self, resource: Resource, amount: i64) {
        self.set(resource, self.get(resource) + amount);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Resource, i64)> + '_ {
        self.0.iter().map(|(&r, &a)| (r, a))
    }

    /// Merge another bag into this one (summing amounts).
    pub fn merge(&mut self, other: &ResourceMap) {
        for (resource, amount) in other.iter() {
            self.add(resource, amount);
        }
    }
}

impl FromIterator<(Resource, i64)> for ResourceMap {
    fn from_iter<T: IntoIterator<Item = (Resource, i64)>>(iter: T) -> Self {
        let mut map = ResourceMap::new();
        for (resource, amount) in iter {
            map.add(resource, amount);
        }
        map
    }
}

/// Scale an integer amount by a fractional rate, flooring the result.
/// All fractional math in the engine funnels through this so rounding is
/// uniform.
pub fn floor_scale(amount: i64, rate: f32) -> i64 {
    (amount as f32 * rate).floor() as i64
}
