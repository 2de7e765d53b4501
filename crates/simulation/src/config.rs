//! Engine-level constants. Values the designers tune per ruleset live in
//! [`crate::ruleset::Ruleset`]; these are structural limits of the engine
//! itself.

/// Highest star (activation) level a tile can reach. 0 means disabled.
pub const MAX_STARS: u8 = 3;

/// Minimum connected cluster size for a merge to fire.
pub const MERGE_CLUSTER_MIN: usize = 3;

/// How many times a single `resolve_merge` call may cascade after the seed
/// upgrades into a new cluster.
pub const MERGE_CASCADE_LIMIT: u32 = 3;

/// Happiness is clamped to `0..=HAPPINESS_MAX`.
pub const HAPPINESS_MAX: i64 = 100;

/// Board edge length used when no ruleset overrides it.
pub const DEFAULT_GRID_SIZE: usize = 7;

/// Tier cap used by the standard ruleset.
pub const DEFAULT_MAX_TIER: u8 = 3;
