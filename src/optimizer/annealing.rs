//! Simulated-annealing strategy.
//!
//! # Algorithm
//!
//! Maintains a current and a best solution. Each step swaps two items'
//! start positions (durations preserved), accepts improving neighbors
//! unconditionally and worsening ones with probability
//! `exp(delta / temperature)`. Temperature starts at 1000 and cools by
//! ×0.95 per step until it reaches 0.1 or the iteration budget runs out.
//! The best solution seen is returned.
//!
//! Randomness comes exclusively from the seed in the optimization
//! config, so identical inputs reproduce identical runs.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::models::ScheduleItem;

use super::{fitness, OptimizationStrategy, StrategyContext, StrategyOutcome};

/// Seeded simulated annealing over start-date sequences.
#[derive(Debug, Clone)]
pub struct AnnealingStrategy {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// Multiplicative cooling factor per step.
    pub cooling_rate: f64,
    /// Temperature at which the search stops.
    pub floor: f64,
}

impl Default for AnnealingStrategy {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.95,
            floor: 0.1,
        }
    }
}

impl OptimizationStrategy for AnnealingStrategy {
    fn name(&self) -> &'static str {
        "simulated-annealing"
    }

    fn optimize(&self, items: &[ScheduleItem], ctx: &StrategyContext) -> StrategyOutcome {
        if items.len() < 2 {
            return StrategyOutcome {
                schedule: items.to_vec(),
                complete: true,
            };
        }

        let mut rng = SmallRng::seed_from_u64(ctx.config.seed);
        let mut current = items.to_vec();
        let mut current_fitness = fitness::evaluate(&current, ctx);
        let mut best = current.clone();
        let mut best_fitness = current_fitness;

        let mut temperature = self.initial_temperature;
        let mut complete = true;
        let mut steps = 0u32;

        for _ in 0..ctx.config.iterations {
            if temperature < self.floor {
                break;
            }
            if ctx.cancel.is_cancelled() {
                complete = false;
                break;
            }

            let mut neighbor = current.clone();
            let i = rng.random_range(0..neighbor.len());
            let mut j = rng.random_range(0..neighbor.len());
            if i == j {
                j = (j + 1) % neighbor.len();
            }
            let start_i = neighbor[i].start;
            let start_j = neighbor[j].start;
            neighbor[i].shift_to(start_j);
            neighbor[j].shift_to(start_i);

            let neighbor_fitness = fitness::evaluate(&neighbor, ctx);
            let delta = neighbor_fitness - current_fitness;
            let accept = delta > 0.0 || rng.random::<f64>() < (delta / temperature).exp();

            if accept {
                current = neighbor;
                current_fitness = neighbor_fitness;
                if current_fitness > best_fitness {
                    best = current.clone();
                    best_fitness = current_fitness;
                }
            }

            temperature *= self.cooling_rate;
            steps += 1;
        }

        debug!(steps, best_fitness, "annealing finished");
        StrategyOutcome {
            schedule: best,
            complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Criticality, ItemKind};
    use crate::optimizer::{Algorithm, CancellationToken, OptimizationConfig};
    use chrono::{Duration, NaiveDate};
    use std::collections::HashMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_items() -> Vec<ScheduleItem> {
        (0..6)
            .map(|i| {
                let start = d(2025, 6, 2) + Duration::days(i * 4);
                ScheduleItem::new(format!("I{i}"), ItemKind::Order, start, start + Duration::days(10))
                    .with_amount(1000.0 * (i + 1) as f64)
                    .with_criticality(Criticality::Medium)
            })
            .collect()
    }

    fn config(seed: u64) -> OptimizationConfig {
        OptimizationConfig {
            algorithm: Algorithm::SimulatedAnnealing,
            seed,
            ..OptimizationConfig::default()
        }
    }

    #[test]
    fn test_same_seed_reproduces_run() {
        let items = sample_items();
        let assignment = HashMap::new();
        let cfg = config(7);
        let ctx = StrategyContext {
            resources: &[],
            assignment: &assignment,
            config: &cfg,
            as_of: d(2025, 6, 1),
            cancel: CancellationToken::new(),
        };

        let first = AnnealingStrategy::default().optimize(&items, &ctx);
        let second = AnnealingStrategy::default().optimize(&items, &ctx);
        for (a, b) in first.schedule.iter().zip(second.schedule.iter()) {
            assert_eq!(a.start, b.start);
            assert_eq!(a.end, b.end);
        }
    }

    #[test]
    fn test_returns_best_not_worse_than_input() {
        let items = sample_items();
        let assignment = HashMap::new();
        let cfg = config(42);
        let ctx = StrategyContext {
            resources: &[],
            assignment: &assignment,
            config: &cfg,
            as_of: d(2025, 6, 1),
            cancel: CancellationToken::new(),
        };

        let input_fitness = fitness::evaluate(&items, &ctx);
        let outcome = AnnealingStrategy::default().optimize(&items, &ctx);
        let output_fitness = fitness::evaluate(&outcome.schedule, &ctx);
        assert!(output_fitness >= input_fitness);
        assert!(outcome.complete);
    }

    #[test]
    fn test_durations_preserved() {
        let items = sample_items();
        let assignment = HashMap::new();
        let cfg = config(42);
        let ctx = StrategyContext {
            resources: &[],
            assignment: &assignment,
            config: &cfg,
            as_of: d(2025, 6, 1),
            cancel: CancellationToken::new(),
        };

        let outcome = AnnealingStrategy::default().optimize(&items, &ctx);
        for item in &outcome.schedule {
            assert_eq!(item.duration_days(), 10);
        }
    }

    #[test]
    fn test_cancellation_returns_incomplete_best() {
        let items = sample_items();
        let assignment = HashMap::new();
        let cfg = config(42);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let ctx = StrategyContext {
            resources: &[],
            assignment: &assignment,
            config: &cfg,
            as_of: d(2025, 6, 1),
            cancel,
        };

        let outcome = AnnealingStrategy::default().optimize(&items, &ctx);
        assert!(!outcome.complete);
        assert_eq!(outcome.schedule.len(), items.len());
    }

    #[test]
    fn test_single_item_passthrough() {
        let items = vec![sample_items().remove(0)];
        let assignment = HashMap::new();
        let cfg = config(42);
        let ctx = StrategyContext {
            resources: &[],
            assignment: &assignment,
            config: &cfg,
            as_of: d(2025, 6, 1),
            cancel: CancellationToken::new(),
        };

        let outcome = AnnealingStrategy::default().optimize(&items, &ctx);
        assert!(outcome.complete);
        assert_eq!(outcome.schedule[0].start, items[0].start);
    }
}
