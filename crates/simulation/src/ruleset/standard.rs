//! The built-in balance table. Serves as the default config and as the
//! fixture every integration test runs against.

use std::collections::BTreeMap;

use crate::grid::BuildingType;
use crate::resources::{Resource, ResourceMap};

use super::types::{
    Blueprint, BuildingStats, Comparison, Condition, ConditionSource, EffectAction,
    OptionalUpkeep, PopulationParams, PowerParams, ProductParams, SlotCosts, StatKey,
    StatusEffect, StorageParams,
};
use super::Ruleset;

fn res(pairs: &[(Resource, i64)]) -> ResourceMap {
    pairs.iter().copied().collect()
}

fn residential(tier: u8) -> BuildingStats {
    use Resource::{Population, Power, Products};
    let (base, s2, s3, p1, p2, p3) = match tier {
        1 => (
            res(&[]),
            res(&[(Power, 1)]),
            res(&[(Power, 2), (Products, 2)]),
            4,
            6,
            8,
        ),
        2 => (
            res(&[(Power, 1)]),
            res(&[(Power, 3)]),
            res(&[(Power, 5), (Products, 4)]),
            10,
            15,
            20,
        ),
        _ => (
            res(&[(Power, 2)]),
            res(&[(Power, 5)]),
            res(&[(Power, 8), (Products, 8)]),
            22,
            33,
            44,
        ),
    };
    BuildingStats {
        base_requirements: base,
        star_requirements: [Some(s2), Some(s3)],
        produces: [
            res(&[(Population, p1)]),
            res(&[(Population, p2)]),
            res(&[(Population, p3)]),
        ],
        priority: 10,
        fixed_cost: None,
        optional_upkeep: None,
    }
}

fn factory(tier: u8) -> BuildingStats {
    use Resource::{Power, RawGoods, Workforce};
    let (base, s2, s3, p1, p2, p3, upkeep) = match tier {
        1 => (2, 3, 4, 4, 6, 9, 2),
        2 => (4, 6, 8, 10, 15, 22, 4),
        _ => (7, 10, 14, 24, 36, 52, 7),
    };
    BuildingStats {
        base_requirements: res(&[(Workforce, base), (Power, base)]),
        star_requirements: [
            Some(res(&[(Workforce, s2), (Power, s2)])),
            Some(res(&[(Workforce, s3), (Power, s3)])),
        ],
        produces: [
            res(&[(RawGoods, p1)]),
            res(&[(RawGoods, p2)]),
            res(&[(RawGoods, p3)]),
        ],
        priority: 20,
        fixed_cost: None,
        optional_upkeep: Some(OptionalUpkeep {
            cost: upkeep,
            production_bonus: 1.25,
        }),
    }
}

fn shop(tier: u8) -> BuildingStats {
    use Resource::{Money, Power, Products, RawGoods, Workforce};
    #[rustfmt::skip]
    let (b, s2, s3, p1, p2, p3) = match tier {
        1 => ((2, 1, 3), (3, 2, 5), (4, 3, 8), (3, 5), (5, 8), (8, 13)),
        2 => ((4, 2, 7), (6, 3, 11), (8, 5, 17), (7, 12), (11, 19), (17, 30)),
        _ => ((7, 4, 15), (10, 6, 24), (14, 9, 37), (15, 27), (24, 43), (37, 68)),
    };
    let req = |(wf, pw, raw): (i64, i64, i64)| {
        res(&[(Workforce, wf), (Power, pw), (RawGoods, raw)])
    };
    let out = |(products, money): (i64, i64)| res(&[(Products, products), (Money, money)]);
    BuildingStats {
        base_requirements: req(b),
        star_requirements: [Some(req(s2)), Some(req(s3))],
        produces: [out(p1), out(p2), out(p3)],
        priority: 30,
        fixed_cost: None,
        optional_upkeep: None,
    }
}

fn power_plant(tier: u8) -> BuildingStats {
    use Resource::{Power, Workforce};
    let (workforce, output, cost) = match tier {
        1 => (1, 6, 1),
        2 => (2, 14, 2),
        _ => (3, 30, 4),
    };
    // No star ladder; power plants run flat out or not at all.
    BuildingStats {
        base_requirements: res(&[(Workforce, workforce)]),
        star_requirements: [None, None],
        produces: [
            res(&[(Power, output)]),
            res(&[(Power, output)]),
            res(&[(Power, output)]),
        ],
        priority: 0,
        fixed_cost: Some(cost),
        optional_upkeep: None,
    }
}

fn warehouse(tier: u8) -> BuildingStats {
    use Resource::{Power, Workforce};
    let (staff, cost) = match tier {
        1 => (1, 1),
        2 => (2, 2),
        _ => (3, 3),
    };
    BuildingStats {
        base_requirements: res(&[(Workforce, staff), (Power, staff)]),
        star_requirements: [None, None],
        produces: [ResourceMap::new(), ResourceMap::new(), ResourceMap::new()],
        priority: 40,
        fixed_cost: Some(cost),
        optional_upkeep: None,
    }
}

fn cond(source: ConditionSource, op: Comparison, value: i64) -> Condition {
    Condition { source, op, value }
}

fn blueprint(
    id: &str,
    name: &str,
    building_type: BuildingType,
    tier: u8,
    build_cost: i64,
    unlock_conditions: Vec<Vec<Condition>>,
) -> (String, Blueprint) {
    (
        id.to_string(),
        Blueprint {
            id: id.to_string(),
            name: name.to_string(),
            building_type,
            tier,
            build_cost,
            unlock_conditions,
        },
    )
}

impl Ruleset {
    /// The shipped balance table.
    pub fn standard() -> Self {
        use BuildingType::{Factory, Power, Residential, Shop, Warehouse};

        let mut building_stats: BTreeMap<BuildingType, BTreeMap<u8, BuildingStats>> =
            BTreeMap::new();
        for tier in 1..=3u8 {
            building_stats
                .entry(Residential)
                .or_default()
                .insert(tier, residential(tier));
            building_stats
                .entry(Factory)
                .or_default()
                .insert(tier, factory(tier));
            building_stats.entry(Shop).or_default().insert(tier, shop(tier));
            building_stats
                .entry(Power)
                .or_default()
                .insert(tier, power_plant(tier));
            building_stats
                .entry(Warehouse)
                .or_default()
                .insert(tier, warehouse(tier));
        }

        let spawn_weights: BTreeMap<BuildingType, f32> = [
            (Residential, 0.30),
            (Factory, 0.25),
            (Shop, 0.25),
            (Power, 0.15),
            (Warehouse, 0.05),
        ]
        .into_iter()
        .collect();

        let blueprints: BTreeMap<String, Blueprint> = [
            blueprint("residential_t1", "Apartment Block", Residential, 1, 10, vec![]),
            blueprint("factory_t1", "Workshop", Factory, 1, 15, vec![]),
            blueprint("shop_t1", "Corner Store", Shop, 1, 15, vec![]),
            blueprint("power_t1", "Coal Plant", Power, 1, 20, vec![]),
            blueprint("warehouse_t1", "Depot", Warehouse, 1, 10, vec![]),
            blueprint(
                "residential_t2",
                "Tower Block",
                Residential,
                2,
                30,
                vec![vec![
                    cond(
                        ConditionSource::Resource {
                            resource: Resource::Population,
                        },
                        Comparison::Ge,
                        20,
                    ),
                    cond(ConditionSource::Turn, Comparison::Ge, 5),
                ]],
            ),
            blueprint(
                "factory_t2",
                "Assembly Line",
                Factory,
                2,
                40,
                vec![vec![
                    cond(
                        ConditionSource::BuildingCount { building: Factory },
                        Comparison::Ge,
                        2,
                    ),
                    cond(
                        ConditionSource::Resource {
                            resource: Resource::Money,
                        },
                        Comparison::Ge,
                        40,
                    ),
                ]],
            ),
            blueprint(
                "shop_t2",
                "Department Store",
                Shop,
                2,
                40,
                vec![
                    vec![
                        cond(
                            ConditionSource::Stat {
                                stat: StatKey::ServiceCoverage,
                            },
                            Comparison::Ge,
                            50,
                        ),
                        cond(
                            ConditionSource::Resource {
                                resource: Resource::Money,
                            },
                            Comparison::Ge,
                            40,
                        ),
                    ],
                    // Alternative route for trade-heavy runs.
                    vec![cond(
                        ConditionSource::Resource {
                            resource: Resource::Products,
                        },
                        Comparison::Ge,
                        12,
                    )],
                ],
            ),
            blueprint(
                "power_t2",
                "Gas Turbine",
                Power,
                2,
                50,
                vec![vec![cond(
                    ConditionSource::Stat {
                        stat: StatKey::PowerUtilization,
                    },
                    Comparison::Ge,
                    80,
                )]],
            ),
            blueprint(
                "warehouse_t2",
                "Freight Terminal",
                Warehouse,
                2,
                25,
                vec![vec![cond(
                    ConditionSource::Resource {
                        resource: Resource::RawGoods,
                    },
                    Comparison::Ge,
                    15,
                )]],
            ),
        ]
        .into_iter()
        .collect();

        let status_effects = vec![
            StatusEffect {
                id: "blackout".to_string(),
                name: "Blackout".to_string(),
                triggers: vec![
                    cond(
                        ConditionSource::Stat {
                            stat: StatKey::PowerUtilization,
                        },
                        Comparison::Ge,
                        95,
                    ),
                    cond(ConditionSource::Turn, Comparison::Ge, 2),
                ],
                effects: vec![
                    EffectAction::ProductionMultiplier {
                        target: Some(Factory),
                        factor: 0.75,
                    },
                    EffectAction::ResourceDelta {
                        resource: Resource::Happiness,
                        amount: -5,
                    },
                ],
            },
            StatusEffect {
                id: "boomtown".to_string(),
                name: "Boomtown".to_string(),
                triggers: vec![
                    cond(
                        ConditionSource::Resource {
                            resource: Resource::Happiness,
                        },
                        Comparison::Ge,
                        85,
                    ),
                    cond(
                        ConditionSource::Stat {
                            stat: StatKey::ServiceCoverage,
                        },
                        Comparison::Ge,
                        75,
                    ),
                ],
                effects: vec![EffectAction::ProductionMultiplier {
                    target: None,
                    factor: 1.25,
                }],
            },
            StatusEffect {
                id: "labor_strike".to_string(),
                name: "Labor Strike".to_string(),
                triggers: vec![cond(
                    ConditionSource::Resource {
                        resource: Resource::Happiness,
                    },
                    Comparison::Le,
                    15,
                )],
                effects: vec![
                    EffectAction::DisableBuilding { building: Factory },
                    EffectAction::ResourceDelta {
                        resource: Resource::Money,
                        amount: -5,
                    },
                ],
            },
        ];

        Ruleset {
            max_tier: 3,
            grid_size: 7,
            min_service_coverage: 40,
            initial_money: 50,
            initial_blueprint_slots: 6,
            population: PopulationParams {
                tax_per_pop: 0.2,
                happiness_decay_per_pop: 0.02,
                maintenance_per_pop: 0.1,
                product_consumption_rate: 0.25,
                sales_multiplier: 2.0,
            },
            product: ProductParams {
                decay_rate: 0.1,
                spoilage_threshold: 10,
            },
            power: PowerParams {
                idle_cost_per_unit: 0.5,
            },
            storage: StorageParams {
                caps: res(&[(Resource::RawGoods, 20), (Resource::Products, 15)]),
                export_rate: 1.5,
                export_hub_min_tier: 2,
            },
            blueprint_slot_costs: SlotCosts {
                base: 50,
                multiplier: 1.5,
            },
            spawn_weights,
            building_stats,
            starting_blueprints: vec![
                "residential_t1".to_string(),
                "factory_t1".to_string(),
                "shop_t1".to_string(),
                "power_t1".to_string(),
                "warehouse_t1".to_string(),
            ],
            blueprints,
            status_effects,
        }
    }
}
