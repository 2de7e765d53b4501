//! Phase 8: the population settles its accounts. Product demand, upkeep
//! charges, taxes, idle power fees, and the service coverage read that
//! feeds happiness.

use crate::city::TurnSummary;
use crate::grid::CityGrid;
use crate::resources::{floor_scale, Resource};

use super::context::TurnContext;

pub fn run(ctx: &mut TurnContext<'_>, _grid: &mut CityGrid) {
    let pop = ctx.city.population;
    let params = ctx.rules.population;

    let demand = floor_scale(pop, params.product_consumption_rate);
    let consumed = demand.min(ctx.city.products_available);
    ctx.products_demanded = demand;
    ctx.products_consumed = consumed;
    if consumed > 0 {
        ctx.credit("Product Consumption", Resource::Products, -consumed);
        ctx.credit(
            "Product Sales",
            Resource::Money,
            floor_scale(consumed, params.sales_multiplier),
        );
    }

    ctx.credit(
        "Crowding",
        Resource::Happiness,
        -floor_scale(pop, params.happiness_decay_per_pop),
    );
    ctx.credit(
        "Population Maintenance",
        Resource::Money,
        -floor_scale(pop, params.maintenance_per_pop * ctx.upkeep_multiplier),
    );
    ctx.credit("Income Tax", Resource::Money, floor_scale(pop, params.tax_per_pop));

    let idle = ctx.city.power_available;
    if idle > 0 {
        ctx.credit(
            "Idle Power",
            Resource::Money,
            -floor_scale(idle, ctx.rules.power.idle_cost_per_unit),
        );
    }

    ctx.city.unemployed = ctx.city.workforce_available;

    let jobs_ratio = if ctx.city.jobs_capacity > 0 {
        ctx.jobs_filled as f64 / ctx.city.jobs_capacity as f64
    } else {
        1.0
    };
    let products_ratio = if demand > 0 {
        consumed as f64 / demand as f64
    } else {
        1.0
    };
    ctx.city.service_coverage = ((jobs_ratio + products_ratio) / 2.0 * 100.0).floor() as i64;
    if ctx.city.service_coverage < ctx.rules.min_service_coverage {
        ctx.credit("Low Coverage", Resource::Happiness, -1);
    }

    let produced = ctx.power_produced;
    let consumed_power = produced - ctx.city.power_available + ctx.unmet_power_demand;
    let utilization = if produced > 0 {
        consumed_power * 100 / produced
    } else {
        0
    };
    ctx.city.last_turn_stats = TurnSummary {
        power_produced: produced,
        power_consumed: consumed_power,
        power_utilization: utilization,
        products_demanded: demand,
        products_consumed: consumed,
        jobs_filled: ctx.jobs_filled,
    };
}
