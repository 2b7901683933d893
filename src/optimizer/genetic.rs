//! Genetic strategy.
//!
//! # Encoding
//!
//! An individual is a vector of start dates parallel to the item list;
//! durations never change. The initial population is the input schedule
//! plus mutated copies (random shifts of up to ±7 days on a subset of
//! items).
//!
//! # Loop
//!
//! Per generation: evaluate fitness, carry the best individual over
//! unchanged, then refill the population from tournament-selected
//! parents via single-point crossover and rate-bound mutation. The best
//! individual across all generations is returned.
//!
//! Randomness comes exclusively from the configured seed.

use chrono::{Duration, NaiveDate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::models::ScheduleItem;

use super::{fitness, OptimizationStrategy, StrategyContext, StrategyOutcome};

/// Seeded genetic search over start-date vectors.
#[derive(Debug, Clone)]
pub struct GeneticStrategy {
    /// Individuals per generation.
    pub population_size: usize,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
    /// Tournament size for parent selection.
    pub tournament_size: usize,
    /// Largest single mutation shift, in days.
    pub max_shift_days: i64,
}

impl Default for GeneticStrategy {
    fn default() -> Self {
        Self {
            population_size: 30,
            mutation_rate: 0.2,
            tournament_size: 3,
            max_shift_days: 7,
        }
    }
}

type Genome = Vec<NaiveDate>;

impl GeneticStrategy {
    fn decode(&self, items: &[ScheduleItem], genome: &Genome) -> Vec<ScheduleItem> {
        let mut schedule = items.to_vec();
        for (item, &start) in schedule.iter_mut().zip(genome.iter()) {
            item.shift_to(start);
        }
        schedule
    }

    /// Mutates a genome in place: each gene shifts by ±1..=max days with
    /// probability `mutation_rate`, clamped to the reference date and,
    /// under the deadline constraint, to the item's original start (so
    /// its required date never slips).
    fn mutate(
        &self,
        genome: &mut Genome,
        items: &[ScheduleItem],
        ctx: &StrategyContext,
        rng: &mut SmallRng,
    ) {
        for (gene, item) in genome.iter_mut().zip(items.iter()) {
            if rng.random::<f64>() >= self.mutation_rate {
                continue;
            }
            let offset = rng.random_range(-self.max_shift_days..=self.max_shift_days);
            let mut start = *gene + Duration::days(offset);
            if start < ctx.as_of {
                start = ctx.as_of;
            }
            if ctx.config.constraints.deadline && start > item.start {
                start = item.start;
            }
            *gene = start;
        }
    }

    fn tournament<'a>(
        &self,
        population: &'a [Genome],
        scores: &[f64],
        rng: &mut SmallRng,
    ) -> &'a Genome {
        let mut best = rng.random_range(0..population.len());
        for _ in 1..self.tournament_size {
            let challenger = rng.random_range(0..population.len());
            if scores[challenger] > scores[best] {
                best = challenger;
            }
        }
        &population[best]
    }

    fn crossover(&self, p1: &Genome, p2: &Genome, rng: &mut SmallRng) -> Genome {
        if p1.len() < 2 {
            return p1.clone();
        }
        let point = rng.random_range(1..p1.len());
        let mut child = p1[..point].to_vec();
        child.extend_from_slice(&p2[point..]);
        child
    }
}

impl OptimizationStrategy for GeneticStrategy {
    fn name(&self) -> &'static str {
        "genetic"
    }

    fn optimize(&self, items: &[ScheduleItem], ctx: &StrategyContext) -> StrategyOutcome {
        if items.is_empty() {
            return StrategyOutcome {
                schedule: Vec::new(),
                complete: true,
            };
        }

        let mut rng = SmallRng::seed_from_u64(ctx.config.seed);
        let base: Genome = items.iter().map(|i| i.start).collect();

        let mut population: Vec<Genome> = Vec::with_capacity(self.population_size);
        population.push(base.clone());
        while population.len() < self.population_size {
            let mut genome = base.clone();
            self.mutate(&mut genome, items, ctx, &mut rng);
            population.push(genome);
        }

        let mut best_genome = base;
        let mut best_fitness = fitness::evaluate(&self.decode(items, &best_genome), ctx);
        let mut complete = true;

        for generation in 0..ctx.config.iterations {
            if ctx.cancel.is_cancelled() {
                complete = false;
                break;
            }

            let scores: Vec<f64> = population
                .iter()
                .map(|g| fitness::evaluate(&self.decode(items, g), ctx))
                .collect();

            let elite = scores
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(i, _)| i)
                .unwrap_or(0);
            if scores[elite] > best_fitness {
                best_fitness = scores[elite];
                best_genome = population[elite].clone();
            }

            let mut next: Vec<Genome> = Vec::with_capacity(self.population_size);
            next.push(population[elite].clone());
            while next.len() < self.population_size {
                let p1 = self.tournament(&population, &scores, &mut rng);
                let p2 = self.tournament(&population, &scores, &mut rng);
                let mut child = self.crossover(p1, p2, &mut rng);
                self.mutate(&mut child, items, ctx, &mut rng);
                next.push(child);
            }
            population = next;

            if generation % 25 == 0 {
                debug!(generation, best_fitness, "genetic progress");
            }
        }

        StrategyOutcome {
            schedule: self.decode(items, &best_genome),
            complete,
        }
    }
}
