//! Critical-path strategy.
//!
//! # Algorithm
//!
//! 1. Extract the critical set: at-risk items (high or critical) ranked
//!    by amount descending, capped at 30% of the schedule.
//! 2. Give every other item a slack allowance indexed by its
//!    criticality (low 14, medium 7, high 3, critical 0 days).
//! 3. Shift non-critical items with positive slack earlier by
//!    `min(slack, 7)` days, freeing shared resources ahead of the
//!    critical set.
//!
//! The critical set itself is never moved. Deterministic.

use chrono::Duration;

use crate::models::{Criticality, ScheduleItem};

use super::{OptimizationStrategy, StrategyContext, StrategyOutcome};

/// Slack-driven early shifting around a protected critical set.
#[derive(Debug, Clone)]
pub struct CriticalPathStrategy {
    /// Share of the schedule treated as the critical set.
    pub critical_fraction: f64,
    /// Upper bound on any single early shift, in days.
    pub max_shift_days: i64,
}

impl Default for CriticalPathStrategy {
    fn default() -> Self {
        Self {
            critical_fraction: 0.3,
            max_shift_days: 7,
        }
    }
}

/// Slack allowance by criticality, in days.
fn slack_days(criticality: Criticality) -> i64 {
    match criticality {
        Criticality::Low => 14,
        Criticality::Medium => 7,
        Criticality::High => 3,
        Criticality::Critical => 0,
    }
}

/// Whether shifting `index` to `new_start` keeps its resource within
/// capacity against the other items' current positions.
fn capacity_allows(
    schedule: &[ScheduleItem],
    index: usize,
    new_start: chrono::NaiveDate,
    ctx: &StrategyContext,
) -> bool {
    let Some(resource_id) = ctx.assignment.get(&schedule[index].id) else {
        return true;
    };
    let end = new_start + Duration::days(schedule[index].duration_days());
    let overlapping = schedule
        .iter()
        .enumerate()
        .filter(|(other_index, other)| {
            *other_index != index
                && ctx.assignment.get(&other.id) == Some(resource_id)
                && other.start <= end
                && new_start <= other.end
        })
        .count();
    let capacity = ctx
        .resources
        .iter()
        .find(|r| &r.id == resource_id)
        .map(|r| r.max_capacity.max(1) as usize)
        .unwrap_or(1);

    overlapping < capacity
}

impl OptimizationStrategy for CriticalPathStrategy {
    fn name(&self) -> &'static str {
        "critical-path"
    }

    fn optimize(&self, items: &[ScheduleItem], ctx: &StrategyContext) -> StrategyOutcome {
        let mut schedule = items.to_vec();

        // Critical set: at-risk items by amount, top `critical_fraction`.
        let mut risky: Vec<usize> = (0..schedule.len())
            .filter(|&i| schedule[i].criticality >= Criticality::High)
            .collect();
        risky.sort_by(|&a, &b| {
            schedule[b]
                .amount
                .partial_cmp(&schedule[a].amount)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| schedule[a].id.cmp(&schedule[b].id))
        });
        let set_size = ((schedule.len() as f64 * self.critical_fraction).ceil() as usize)
            .min(risky.len());
        risky.truncate(set_size);

        for index in 0..schedule.len() {
            if risky.contains(&index) {
                continue;
            }
            let slack = slack_days(schedule[index].criticality);
            if slack <= 0 {
                continue;
            }

            let shift = slack.min(self.max_shift_days);
            let mut new_start = schedule[index].start - Duration::days(shift);
            if new_start < ctx.as_of {
                new_start = ctx.as_of;
            }
            if new_start < schedule[index].start
                && capacity_allows(&schedule, index, new_start, ctx)
            {
                schedule[index].shift_to(new_start);
            }
        }

        StrategyOutcome {
            schedule,
            complete: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;
    use crate::optimizer::{CancellationToken, OptimizationConfig};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn item(id: &str, start: NaiveDate, criticality: Criticality, amount: f64) -> ScheduleItem {
        ScheduleItem::new(id, ItemKind::Order, start, start + Duration::days(10))
            .with_amount(amount)
            .with_criticality(criticality)
    }

    fn run(items: &[ScheduleItem]) -> Vec<ScheduleItem> {
        let config = OptimizationConfig::default();
        let assignment = HashMap::new();
        let ctx = StrategyContext {
            resources: &[],
            assignment: &assignment,
            config: &config,
            as_of: d(2025, 6, 1),
            cancel: CancellationToken::new(),
        };
        CriticalPathStrategy::default().optimize(items, &ctx).schedule
    }

    #[test]
    fn test_critical_set_is_not_moved() {
        let items = vec![
            item("big", d(2025, 7, 1), Criticality::Critical, 50_000.0),
            item("low-1", d(2025, 7, 1), Criticality::Low, 100.0),
            item("low-2", d(2025, 7, 1), Criticality::Low, 100.0),
        ];
        let out = run(&items);

        let big = out.iter().find(|i| i.id == "big").unwrap();
        assert_eq!(big.start, d(2025, 7, 1));
    }

    #[test]
    fn test_low_items_shift_at_most_seven_days() {
        let items = vec![
            item("big", d(2025, 7, 1), Criticality::Critical, 50_000.0),
            item("low", d(2025, 7, 1), Criticality::Low, 100.0),
        ];
        let out = run(&items);

        let low = out.iter().find(|i| i.id == "low").unwrap();
        // Slack 14 capped at 7.
        assert_eq!(low.start, d(2025, 6, 24));
        assert_eq!(low.duration_days(), 10);
    }

    #[test]
    fn test_medium_items_shift_by_slack() {
        let items = vec![
            item("big", d(2025, 7, 1), Criticality::Critical, 50_000.0),
            item("med", d(2025, 7, 1), Criticality::Medium, 100.0),
        ];
        let out = run(&items);
        let med = out.iter().find(|i| i.id == "med").unwrap();
        assert_eq!(med.start, d(2025, 6, 24)); // slack 7
    }

    #[test]
    fn test_high_item_outside_set_shifts_by_three() {
        // Four items → ceil(0.3 × 4) = 2 in the critical set. The two
        // richest at-risk items protect their dates; the poorer high
        // item shifts by its 3-day slack.
        let items = vec![
            item("rich-1", d(2025, 7, 1), Criticality::Critical, 90_000.0),
            item("rich-2", d(2025, 7, 1), Criticality::High, 80_000.0),
            item("poor-high", d(2025, 7, 1), Criticality::High, 500.0),
            item("low", d(2025, 7, 1), Criticality::Low, 100.0),
        ];
        let out = run(&items);

        assert_eq!(out.iter().find(|i| i.id == "rich-1").unwrap().start, d(2025, 7, 1));
        assert_eq!(out.iter().find(|i| i.id == "rich-2").unwrap().start, d(2025, 7, 1));
        assert_eq!(out.iter().find(|i| i.id == "poor-high").unwrap().start, d(2025, 6, 28));
        assert_eq!(out.iter().find(|i| i.id == "low").unwrap().start, d(2025, 6, 24));
    }

    #[test]
    fn test_shift_clamped_to_reference_date() {
        let items = vec![
            item("big", d(2025, 7, 1), Criticality::Critical, 50_000.0),
            item("near", d(2025, 6, 3), Criticality::Low, 100.0),
        ];
        let out = run(&items);
        let near = out.iter().find(|i| i.id == "near").unwrap();
        // Would shift to May 27; clamps to the reference date.
        assert_eq!(near.start, d(2025, 6, 1));
    }

    #[test]
    fn test_deterministic() {
        let items = vec![
            item("a", d(2025, 7, 1), Criticality::High, 1000.0),
            item("b", d(2025, 7, 5), Criticality::Medium, 2000.0),
            item("c", d(2025, 7, 10), Criticality::Low, 3000.0),
        ];
        let first = run(&items);
        let second = run(&items);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.start, b.start);
        }
    }
}
