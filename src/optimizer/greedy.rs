//! Greedy earliest-slot strategy.
//!
//! # Algorithm
//!
//! 1. Order items by priority: criticality weight × log(amount + 1),
//!    descending (ties break on id).
//! 2. For each item, scan forward from the reference date for the
//!    earliest weekday start with no resource or date conflict against
//!    already-placed items.
//! 3. Shift the item there (duration preserved) only when the slot is
//!    earlier than its current start.
//!
//! Deterministic: no randomness, stable ordering, stable scanning.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::ScheduleItem;

use super::{OptimizationStrategy, StrategyContext, StrategyOutcome};

/// Priority-ordered earliest-slot placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyStrategy;

fn priority(item: &ScheduleItem) -> f64 {
    item.criticality.weight() * (item.amount.max(0.0) + 1.0).ln()
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

impl GreedyStrategy {
    /// Whether an item can start at `candidate` without conflicting with
    /// the other items sharing its resource (at their current, possibly
    /// already-shifted, positions).
    fn fits(
        candidate: NaiveDate,
        duration: i64,
        item_index: usize,
        schedule: &[ScheduleItem],
        ctx: &StrategyContext,
    ) -> bool {
        let end = candidate + Duration::days(duration);
        let item_id = &schedule[item_index].id;
        let Some(resource_id) = ctx.assignment.get(item_id) else {
            // Unassigned items only need a calendar slot.
            return true;
        };

        if ctx.config.constraints.resource_availability {
            if let Some(resource) = ctx.resources.iter().find(|r| &r.id == resource_id) {
                if !resource.is_available_over(candidate, end) {
                    return false;
                }
            }
        }

        // Count other items on the same resource overlapping the slot.
        let overlapping = schedule
            .iter()
            .enumerate()
            .filter(|(index, other)| {
                *index != item_index
                    && ctx.assignment.get(&other.id) == Some(resource_id)
                    && other.start <= end
                    && candidate <= other.end
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
}

impl OptimizationStrategy for GreedyStrategy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn optimize(&self, items: &[ScheduleItem], ctx: &StrategyContext) -> StrategyOutcome {
        let mut schedule = items.to_vec();

        let mut order: Vec<usize> = (0..schedule.len()).collect();
        if ctx.config.objectives.respect_priority {
            order.sort_by(|&a, &b| {
                priority(&schedule[b])
                    .partial_cmp(&priority(&schedule[a]))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| schedule[a].id.cmp(&schedule[b].id))
            });
        }

        for &index in &order {
            let duration = schedule[index].duration_days();
            let mut candidate = ctx.as_of;
            let mut slot = None;

            while candidate < schedule[index].start {
                if is_weekend(candidate) {
                    candidate += Duration::days(1);
                    continue;
                }
                if Self::fits(candidate, duration, index, &schedule, ctx) {
                    slot = Some(candidate);
                    break;
                }
                candidate += Duration::days(1);
            }

            if let Some(start) = slot {
                schedule[index].shift_to(start);
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
    use crate::models::{Criticality, ItemKind, Resource};
    use crate::optimizer::{CancellationToken, OptimizationConfig};
    use std::collections::HashMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn item(id: &str, start: NaiveDate, end: NaiveDate, criticality: Criticality) -> ScheduleItem {
        ScheduleItem::new(id, ItemKind::Order, start, end)
            .with_amount(1000.0)
            .with_criticality(criticality)
    }

    fn context<'a>(
        resources: &'a [Resource],
        assignment: &'a HashMap<String, String>,
        config: &'a OptimizationConfig,
        cancel: &'a CancellationToken,
    ) -> StrategyContext<'a> {
        StrategyContext {
            resources,
            assignment,
            config,
            // 2025-06-02 is a Monday.
            as_of: d(2025, 6, 2),
            cancel: cancel.clone(),
        }
    }

    #[test]
    fn test_shifts_item_earlier() {
        let items = vec![item("A", d(2025, 6, 20), d(2025, 6, 30), Criticality::High)];
        let resources = vec![Resource::coordinator("C1").with_capacity(1)];
        let assignment: HashMap<String, String> =
            [("A".to_string(), "C1".to_string())].into_iter().collect();
        let config = OptimizationConfig::default();
        let cancel = CancellationToken::new();
        let ctx = context(&resources, &assignment, &config, &cancel);

        let outcome = GreedyStrategy.optimize(&items, &ctx);
        assert!(outcome.complete);
        assert_eq!(outcome.schedule[0].start, d(2025, 6, 2));
        assert_eq!(outcome.schedule[0].duration_days(), 10);
    }

    #[test]
    fn test_never_starts_on_weekend() {
        let items = vec![item("A", d(2025, 6, 20), d(2025, 6, 30), Criticality::High)];
        let config = OptimizationConfig::default();
        let cancel = CancellationToken::new();
        let assignment = HashMap::new();
        let ctx = StrategyContext {
            resources: &[],
            assignment: &assignment,
            config: &config,
            // 2025-06-07 is a Saturday; first weekday is Monday the 9th.
            as_of: d(2025, 6, 7),
            cancel: cancel.clone(),
        };

        let outcome = GreedyStrategy.optimize(&items, &ctx);
        assert_eq!(outcome.schedule[0].start, d(2025, 6, 9));
    }

    #[test]
    fn test_respects_capacity_of_shared_resource() {
        let items = vec![
            item("A", d(2025, 6, 16), d(2025, 6, 20), Criticality::Critical),
            item("B", d(2025, 6, 23), d(2025, 6, 27), Criticality::High),
        ];
        let resources = vec![Resource::coordinator("C1").with_capacity(1)];
        let assignment: HashMap<String, String> = [
            ("A".to_string(), "C1".to_string()),
            ("B".to_string(), "C1".to_string()),
        ]
        .into_iter()
        .collect();
        let config = OptimizationConfig::default();
        let cancel = CancellationToken::new();
        let ctx = context(&resources, &assignment, &config, &cancel);

        let outcome = GreedyStrategy.optimize(&items, &ctx);
        let a = outcome.schedule.iter().find(|i| i.id == "A").unwrap();
        let b = outcome.schedule.iter().find(|i| i.id == "B").unwrap();

        // A (higher priority) lands on the reference date; B must not
        // overlap it on the shared single-capacity resource.
        assert_eq!(a.start, d(2025, 6, 2));
        assert!(!a.overlaps(b));
    }

    #[test]
    fn test_deterministic() {
        let items = vec![
            item("A", d(2025, 6, 16), d(2025, 6, 20), Criticality::High),
            item("B", d(2025, 6, 23), d(2025, 6, 27), Criticality::High),
            item("C", d(2025, 6, 10), d(2025, 6, 12), Criticality::Medium),
        ];
        let resources = vec![Resource::coordinator("C1").with_capacity(2)];
        let assignment: HashMap<String, String> = items
            .iter()
            .map(|i| (i.id.clone(), "C1".to_string()))
            .collect();
        let config = OptimizationConfig::default();
        let cancel = CancellationToken::new();
        let ctx = context(&resources, &assignment, &config, &cancel);

        let first = GreedyStrategy.optimize(&items, &ctx);
        let second = GreedyStrategy.optimize(&items, &ctx);
        for (a, b) in first.schedule.iter().zip(second.schedule.iter()) {
            assert_eq!(a.start, b.start);
            assert_eq!(a.end, b.end);
        }
    }

    #[test]
    fn test_item_already_at_reference_date_stays() {
        let items = vec![item("A", d(2025, 6, 2), d(2025, 6, 12), Criticality::High)];
        let config = OptimizationConfig::default();
        let cancel = CancellationToken::new();
        let assignment = HashMap::new();
        let ctx = context(&[], &assignment, &config, &cancel);

        let outcome = GreedyStrategy.optimize(&items, &ctx);
        assert_eq!(outcome.schedule[0].start, d(2025, 6, 2));
        assert_eq!(outcome.schedule[0].end, d(2025, 6, 12));
    }

    #[test]
    fn test_blackout_blocks_slot() {
        let items = vec![item("A", d(2025, 6, 20), d(2025, 6, 25), Criticality::High)];
        let resources = vec![Resource::coordinator("C1")
            .with_availability(d(2025, 6, 1), d(2025, 12, 31))
            .with_blackout(d(2025, 6, 4))];
        let assignment: HashMap<String, String> =
            [("A".to_string(), "C1".to_string())].into_iter().collect();
        let config = OptimizationConfig::default();
        let cancel = CancellationToken::new();
        let ctx = context(&resources, &assignment, &config, &cancel);

        let outcome = GreedyStrategy.optimize(&items, &ctx);
        // 5-day item cannot span the June 4 blackout; June 5 is the
        // first clean weekday start.
        assert_eq!(outcome.schedule[0].start, d(2025, 6, 5));
    }
}
