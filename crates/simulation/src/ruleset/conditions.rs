//! Condition evaluation against a city snapshot. Shared by status-effect
//! triggers and blueprint unlock trees.

use crate::city::CityState;
use crate::grid::BuildingCounts;
use crate::resources::Resource;

use super::types::{Condition, ConditionSource, StatKey};

/// Resolve a condition source to its current value. Derived stats read the
/// cached summary from the last resolved turn.
pub fn resolve(source: ConditionSource, city: &CityState, counts: &BuildingCounts) -> i64 {
    match source {
        ConditionSource::Resource { resource } => match resource {
            Resource::Money => city.money,
            Resource::Population => city.population,
            Resource::Workforce => city.workforce_available,
            Resource::Power => city.power_available,
            Resource::Happiness => city.happiness,
            Resource::RawGoods => city.raw_goods_available,
            Resource::Products => city.products_available,
        },
        ConditionSource::Stat { stat } => match stat {
            StatKey::ServiceCoverage => city.service_coverage,
            StatKey::Unemployed => city.unemployed,
            StatKey::PowerUtilization => city.last_turn_stats.power_utilization,
            StatKey::JobsFilled => city.last_turn_stats.jobs_filled,
        },
        ConditionSource::Turn => city.turn as i64,
        ConditionSource::BuildingCount { building } => counts.count(building) as i64,
    }
}

pub fn holds(cond: &Condition, city: &CityState, counts: &BuildingCounts) -> bool {
    cond.op.eval(resolve(cond.source, city, counts), cond.value)
}

/// AND over one condition group.
pub fn all_hold(conds: &[Condition], city: &CityState, counts: &BuildingCounts) -> bool {
    conds.iter().all(|c| holds(c, city, counts))
}

/// OR over AND-groups. An empty outer list never holds, so blueprints with
/// no conditions stay starting-only.
pub fn any_group_holds(
    groups: &[Vec<Condition>],
    city: &CityState,
    counts: &BuildingCounts,
) -> bool {
    groups.iter().any(|g| all_hold(g, city, counts))
}

#[cfg(test)]
mod tests {
    use super::super::types::Comparison;
    use super::super::Ruleset;
    use super::*;
    use crate::grid::{BuildingType, CityGrid};

    fn setup() -> (CityState, BuildingCounts) {
        let ruleset = Ruleset::standard();
        let mut city = CityState::new(&ruleset);
        city.population = 20;
        city.turn = 5;
        city.last_turn_stats.power_utilization = 80;

        let mut grid = CityGrid::new(7);
        grid.place_tile(0, 0, BuildingType::Factory, 1);
        grid.place_tile(0, 1, BuildingType::Factory, 1);
        (city, grid.building_counts())
    }

    #[test]
    fn resolves_every_source_kind() {
        let (city, counts) = setup();
        let pop = ConditionSource::Resource {
            resource: Resource::Population,
        };
        assert_eq!(resolve(pop, &city, &counts), 20);
        assert_eq!(resolve(ConditionSource::Turn, &city, &counts), 5);
        assert_eq!(
            resolve(
                ConditionSource::Stat {
                    stat: StatKey::PowerUtilization
                },
                &city,
                &counts
            ),
            80
        );
        assert_eq!(
            resolve(
                ConditionSource::BuildingCount {
                    building: BuildingType::Factory
                },
                &city,
                &counts
            ),
            2
        );
    }

    #[test]
    fn or_of_and_semantics() {
        let (city, counts) = setup();
        let pop_20 = Condition {
            source: ConditionSource::Resource {
                resource: Resource::Population,
            },
            op: Comparison::Ge,
            value: 20,
        };
        let turn_99 = Condition {
            source: ConditionSource::Turn,
            op: Comparison::Ge,
            value: 99,
        };

        // One failing group, one passing group.
        assert!(any_group_holds(
            &[vec![turn_99], vec![pop_20]],
            &city,
            &counts
        ));
        // A group with a failing member fails as a whole.
        assert!(!any_group_holds(&[vec![pop_20, turn_99]], &city, &counts));
        // Empty outer list never holds.
        assert!(!any_group_holds(&[], &city, &counts));
    }
}
