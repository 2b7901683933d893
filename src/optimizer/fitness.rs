//! Shared fitness building blocks.
//!
//! Every optimization strategy scores candidate schedules with the same
//! function: span compression (when minimizing time), average resource
//! efficiency (when maximizing efficiency), minus a flat penalty per
//! conflict. Conflicts are date-range overlaps between items sharing a
//! resource plus per-resource overload counts.

use std::collections::HashMap;

use crate::models::{Resource, ScheduleItem};

use super::{ResourceAssignment, StrategyContext};

/// Penalty subtracted from fitness per detected conflict.
pub const CONFLICT_PENALTY: f64 = 50.0;

/// Load percentage at which a resource works best.
pub const PEAK_LOAD_PERCENT: f64 = 80.0;

/// Efficiency of a resource at a given load percentage.
///
/// Peaks at 100 when the load sits at [`PEAK_LOAD_PERCENT`] and degrades
/// linearly on both sides, reaching 0 at 0% and 160% load.
pub fn resource_efficiency(load_percent: f64) -> f64 {
    (100.0 - (load_percent - PEAK_LOAD_PERCENT).abs() * 1.25).clamp(0.0, 100.0)
}

/// Overall span of a schedule in days (latest end − earliest start).
pub fn total_span_days(items: &[ScheduleItem]) -> i64 {
    let earliest = items.iter().map(|i| i.start).min();
    let latest = items.iter().map(|i| i.end).max();
    match (earliest, latest) {
        (Some(start), Some(end)) => (end - start).num_days(),
        _ => 0,
    }
}

/// Distributes items over resources with least-loaded balancing.
///
/// Returns the item → resource map plus the per-resource assignment
/// report. Resources that cannot carry an item's span (when
/// `respect_availability` is set) are skipped for that item; if no
/// resource qualifies the item stays unassigned and never conflicts.
/// Ties break on resource id so the distribution is deterministic.
pub fn balance_assignments(
    items: &[ScheduleItem],
    resources: &[Resource],
    respect_availability: bool,
) -> (HashMap<String, String>, Vec<ResourceAssignment>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut map: HashMap<String, String> = HashMap::new();

    for item in items {
        let candidate = resources
            .iter()
            .filter(|r| !respect_availability || r.is_available_over(item.start, item.end))
            .min_by(|a, b| {
                let load_a = load_ratio(counts.get(a.id.as_str()).copied().unwrap_or(0), a);
                let load_b = load_ratio(counts.get(b.id.as_str()).copied().unwrap_or(0), b);
                load_a
                    .partial_cmp(&load_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.id.cmp(&b.id))
            });

        if let Some(resource) = candidate {
            *counts.entry(resource.id.as_str()).or_insert(0) += 1;
            map.insert(item.id.clone(), resource.id.clone());
        }
    }

    let reports = resources
        .iter()
        .map(|resource| {
            let assigned_item_ids: Vec<String> = items
                .iter()
                .filter(|i| map.get(&i.id).map(String::as_str) == Some(resource.id.as_str()))
                .map(|i| i.id.clone())
                .collect();
            let load_percent =
                assigned_item_ids.len() as f64 / resource.max_capacity.max(1) as f64 * 100.0;
            ResourceAssignment {
                resource_id: resource.id.clone(),
                efficiency: resource_efficiency(load_percent),
                load_percent,
                assigned_item_ids,
            }
        })
        .collect();

    (map, reports)
}

fn load_ratio(count: usize, resource: &Resource) -> f64 {
    count as f64 / resource.max_capacity.max(1) as f64
}

/// Counts schedule conflicts: overlapping item pairs on the same
/// resource, plus how far each resource's assignment count exceeds its
/// capacity.
pub fn count_conflicts(
    items: &[ScheduleItem],
    assignment: &HashMap<String, String>,
    resources: &[Resource],
) -> usize {
    let mut conflicts = 0;

    for (i, a) in items.iter().enumerate() {
        let Some(resource_a) = assignment.get(&a.id) else {
            continue;
        };
        for b in items.iter().skip(i + 1) {
            if assignment.get(&b.id) == Some(resource_a) && a.overlaps(b) {
                conflicts += 1;
            }
        }
    }

    for resource in resources {
        let assigned = assignment
            .values()
            .filter(|r| r.as_str() == resource.id)
            .count();
        conflicts += assigned.saturating_sub(resource.max_capacity as usize);
    }

    conflicts
}

/// Scores a candidate schedule. Higher is better.
pub fn evaluate(items: &[ScheduleItem], ctx: &StrategyContext) -> f64 {
    let mut fitness = 0.0;

    if ctx.config.objectives.minimize_time {
        fitness += 1_000_000.0 / total_span_days(items).max(1) as f64;
    }

    if ctx.config.objectives.maximize_efficiency || ctx.config.objectives.balance_load {
        let loads: Vec<f64> = ctx
            .resources
            .iter()
            .map(|resource| {
                let assigned = ctx
                    .assignment
                    .values()
                    .filter(|r| r.as_str() == resource.id)
                    .count();
                assigned as f64 / resource.max_capacity.max(1) as f64 * 100.0
            })
            .collect();

        if !loads.is_empty() {
            if ctx.config.objectives.maximize_efficiency {
                let total: f64 = loads.iter().map(|&l| resource_efficiency(l)).sum();
                fitness += total / loads.len() as f64;
            }
            if ctx.config.objectives.balance_load {
                // Reward an even spread: 100 when every resource carries
                // the same load, down to 0 at a 100-point spread.
                let max = loads.iter().cloned().fold(f64::MIN, f64::max);
                let min = loads.iter().cloned().fold(f64::MAX, f64::min);
                fitness += (100.0 - (max - min)).max(0.0);
            }
        }
    }

    fitness - CONFLICT_PENALTY * count_conflicts(items, ctx.assignment, ctx.resources) as f64
}
