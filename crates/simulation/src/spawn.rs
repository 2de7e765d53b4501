//! Weighted blueprint offers. The only randomness in the whole crate.

use rand::Rng;

use crate::city::CityState;
use crate::ruleset::Ruleset;
use crate::sim_rng::SimRng;

/// Draw one blueprint id from the player's unlocked roster, weighted by
/// the ruleset's per-type spawn weights. Returns `None` on an empty
/// roster or an all-zero weight total.
pub fn draw_blueprint_offer(
    city: &CityState,
    rules: &Ruleset,
    rng: &mut SimRng,
) -> Option<String> {
    let candidates: Vec<(&str, f32)> = city
        .blueprint_state
        .unlocked
        .iter()
        .filter_map(|id| {
            let bp = rules.blueprint(id)?;
            let weight = rules.spawn_weights.get(&bp.building_type).copied()?;
            (weight > 0.0).then_some((id.as_str(), weight))
        })
        .collect();

    let total: f32 = candidates.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = rng.0.gen_range(0.0..total);
    for (id, weight) in &candidates {
        roll -= weight;
        if roll < 0.0 {
            return Some((*id).to_string());
        }
    }
    // Float edge: the roll landed exactly on the total.
    candidates.last().map(|(id, _)| (*id).to_string())
}
