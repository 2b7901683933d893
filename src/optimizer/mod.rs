//! Schedule optimization.
//!
//! Re-schedules computed items over a constrained resource pool using
//! one of four interchangeable strategies:
//!
//! | Strategy | Character |
//! |----------|-----------|
//! | [`GreedyStrategy`] | deterministic earliest-slot shifting |
//! | [`CriticalPathStrategy`] | deterministic slack-based early shifts |
//! | [`AnnealingStrategy`] | seeded simulated annealing |
//! | [`GeneticStrategy`] | seeded genetic search |
//!
//! Bottleneck detection always runs before the chosen strategy, and the
//! shared fitness/conflict model scores every candidate the same way.
//! Inputs are copied on call; the optimizer never mutates caller-owned
//! slices. Long runs honor a [`CancellationToken`] and report
//! `complete = false` with the best schedule found so far.
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use equiplan::models::{ItemKind, Resource, ScheduleItem};
//! use equiplan::optimizer::{OptimizationConfig, ScheduleOptimizer};
//!
//! let items = vec![ScheduleItem::new(
//!     "O1",
//!     ItemKind::Order,
//!     NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
//! )];
//! let resources = vec![Resource::coordinator("C1").with_capacity(2)];
//!
//! let optimizer = ScheduleOptimizer::new(OptimizationConfig::default()).unwrap();
//! let result = optimizer.optimize(
//!     &items,
//!     &resources,
//!     &[],
//!     NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
//! );
//! assert!(result.complete);
//! assert_eq!(result.schedule.len(), 1);
//! ```

mod annealing;
mod bottleneck;
mod critical_path;
pub mod fitness;
mod genetic;
mod greedy;

pub use annealing::AnnealingStrategy;
pub use bottleneck::{detect_bottlenecks, Bottleneck, BottleneckKind};
pub use critical_path::CriticalPathStrategy;
pub use genetic::GeneticStrategy;
pub use greedy::GreedyStrategy;

use std::collections::HashMap;
use std::fmt::Debug;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::models::{Criticality, DependencyEdge, Resource, ScheduleItem};

/// Optimization strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    /// Deterministic earliest-slot shifting.
    Greedy,
    /// Seeded genetic search.
    Genetic,
    /// Seeded simulated annealing.
    SimulatedAnnealing,
    /// Deterministic slack-based shifting.
    CriticalPath,
}

impl Algorithm {
    /// Canonical configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Greedy => "greedy",
            Algorithm::Genetic => "genetic",
            Algorithm::SimulatedAnnealing => "simulated-annealing",
            Algorithm::CriticalPath => "critical-path",
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    /// Parses a configuration name. Unknown names are a hard error, not
    /// a silent fallback to the unmodified schedule.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(Algorithm::Greedy),
            "genetic" => Ok(Algorithm::Genetic),
            "simulated-annealing" => Ok(Algorithm::SimulatedAnnealing),
            "critical-path" => Ok(Algorithm::CriticalPath),
            other => Err(ConfigError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// What the optimizer tries to improve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Objectives {
    /// Compress the overall schedule span.
    pub minimize_time: bool,
    /// Keep resources near their efficiency peak.
    pub maximize_efficiency: bool,
    /// Spread load evenly across resources.
    pub balance_load: bool,
    /// Order work by item criticality.
    pub respect_priority: bool,
}

impl Default for Objectives {
    fn default() -> Self {
        Self {
            minimize_time: true,
            maximize_efficiency: true,
            balance_load: false,
            respect_priority: true,
        }
    }
}

/// What the optimizer must not violate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptimizationConstraints {
    /// Never move an item's end past its required date.
    pub deadline: bool,
    /// Only place items where their resource is available.
    pub resource_availability: bool,
    /// Honor supplied dependency edges in bottleneck analysis.
    pub dependency: bool,
    /// Flag schedules whose total amount exceeds this cap.
    pub budget_cap: Option<f64>,
}

impl Default for OptimizationConstraints {
    fn default() -> Self {
        Self {
            deadline: true,
            resource_availability: true,
            dependency: true,
            budget_cap: None,
        }
    }
}

/// Full optimizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Strategy to run.
    pub algorithm: Algorithm,
    /// Iteration budget for the stochastic strategies.
    pub iterations: u32,
    /// RNG seed for the stochastic strategies.
    pub seed: u64,
    /// Optimization objectives.
    pub objectives: Objectives,
    /// Hard constraints.
    pub constraints: OptimizationConstraints,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Greedy,
            iterations: 100,
            seed: 42,
            objectives: Objectives::default(),
            constraints: OptimizationConstraints::default(),
        }
    }
}

impl OptimizationConfig {
    /// Fails fast on configurations that cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if let Some(cap) = self.constraints.budget_cap {
            if !cap.is_finite() || cap < 0.0 {
                return Err(ConfigError::InvalidBudgetCap(cap));
            }
        }
        Ok(())
    }
}

/// Cooperative cancellation flag shared with the caller.
///
/// Cloning shares the flag: cancel from any clone and every strategy
/// checkpoint observes it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates an uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Read-only context handed to strategies.
#[derive(Debug)]
pub struct StrategyContext<'a> {
    /// Resource pool.
    pub resources: &'a [Resource],
    /// Item id → resource id map (fixed during a run).
    pub assignment: &'a HashMap<String, String>,
    /// Optimizer configuration.
    pub config: &'a OptimizationConfig,
    /// Reference "today" for forward scans and clamping.
    pub as_of: NaiveDate,
    /// Cancellation checkpoint.
    pub cancel: CancellationToken,
}

/// A strategy's output: the re-scheduled items and whether it ran to
/// completion.
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    /// Re-scheduled items (same ids and durations as the input).
    pub schedule: Vec<ScheduleItem>,
    /// `false` when cancellation stopped the run early.
    pub complete: bool,
}

/// A swappable optimization algorithm.
pub trait OptimizationStrategy: Send + Sync + Debug {
    /// Strategy name (matches [`Algorithm::as_str`] for the built-ins).
    fn name(&self) -> &'static str;

    /// Produces a re-scheduled copy of the items. Must not mutate the
    /// input slice.
    fn optimize(&self, items: &[ScheduleItem], ctx: &StrategyContext) -> StrategyOutcome;
}

/// Built-in strategy for an [`Algorithm`].
pub fn strategy_for(algorithm: Algorithm) -> Box<dyn OptimizationStrategy> {
    match algorithm {
        Algorithm::Greedy => Box::new(GreedyStrategy),
        Algorithm::Genetic => Box::new(GeneticStrategy::default()),
        Algorithm::SimulatedAnnealing => Box::new(AnnealingStrategy::default()),
        Algorithm::CriticalPath => Box::new(CriticalPathStrategy::default()),
    }
}

/// Per-resource assignment report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceAssignment {
    /// Resource id.
    pub resource_id: String,
    /// Items placed on this resource.
    pub assigned_item_ids: Vec<String>,
    /// Assigned count over capacity, in percent.
    pub load_percent: f64,
    /// Efficiency at that load (peaks at 80%).
    pub efficiency: f64,
}

/// Improvement metrics of an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationMetrics {
    /// Span compression against the input schedule, in days.
    pub days_saved: i64,
    /// Average per-resource efficiency.
    pub global_efficiency: f64,
    /// Conflicts removed against the input schedule.
    pub conflicts_resolved: i64,
    /// Monetary value of the improvement.
    pub estimated_cost: f64,
}

/// Full result of an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Re-scheduled items.
    pub schedule: Vec<ScheduleItem>,
    /// Per-resource assignment report.
    pub assignments: Vec<ResourceAssignment>,
    /// Structural constraints found before optimizing.
    pub bottlenecks: Vec<Bottleneck>,
    /// Improvement metrics.
    pub metrics: OptimizationMetrics,
    /// Suggested follow-ups.
    pub recommendations: Vec<String>,
    /// Warnings worth surfacing immediately.
    pub alerts: Vec<String>,
    /// `false` when the run was cancelled and the schedule is the best
    /// found so far rather than a finished search.
    pub complete: bool,
}

/// Runs bottleneck analysis, resource balancing, and the configured
/// strategy over a schedule snapshot.
pub struct ScheduleOptimizer {
    config: OptimizationConfig,
    cancel: CancellationToken,
}

impl ScheduleOptimizer {
    /// Validates the configuration and builds an optimizer.
    pub fn new(config: OptimizationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// Token callers can use to stop a long run from another thread.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Optimizes with the configured built-in strategy.
    pub fn optimize(
        &self,
        items: &[ScheduleItem],
        resources: &[Resource],
        dependencies: &[DependencyEdge],
        as_of: NaiveDate,
    ) -> OptimizationResult {
        let strategy = strategy_for(self.config.algorithm);
        self.optimize_with(strategy.as_ref(), items, resources, dependencies, as_of)
    }

    /// Optimizes with a caller-supplied strategy.
    pub fn optimize_with(
        &self,
        strategy: &dyn OptimizationStrategy,
        items: &[ScheduleItem],
        resources: &[Resource],
        dependencies: &[DependencyEdge],
        as_of: NaiveDate,
    ) -> OptimizationResult {
        info!(
            strategy = strategy.name(),
            items = items.len(),
            resources = resources.len(),
            "optimization started"
        );

        let (assignment, assignments) = fitness::balance_assignments(
            items,
            resources,
            self.config.constraints.resource_availability,
        );

        let considered_deps: &[DependencyEdge] = if self.config.constraints.dependency {
            dependencies
        } else {
            &[]
        };
        let bottlenecks = detect_bottlenecks(
            items,
            resources,
            &assignment,
            considered_deps,
            self.config.constraints.budget_cap,
        );

        let original_conflicts = fitness::count_conflicts(items, &assignment, resources);
        let original_span = fitness::total_span_days(items);

        let ctx = StrategyContext {
            resources,
            assignment: &assignment,
            config: &self.config,
            as_of,
            cancel: self.cancel.clone(),
        };
        let outcome = strategy.optimize(items, &ctx);

        let optimized_conflicts =
            fitness::count_conflicts(&outcome.schedule, &assignment, resources);
        let optimized_span = fitness::total_span_days(&outcome.schedule);

        let days_saved = (original_span - optimized_span).max(0);
        let conflicts_resolved = (original_conflicts as i64 - optimized_conflicts as i64).max(0);
        let global_efficiency = if assignments.is_empty() {
            0.0
        } else {
            assignments.iter().map(|a| a.efficiency).sum::<f64>() / assignments.len() as f64
        };
        let metrics = OptimizationMetrics {
            days_saved,
            global_efficiency,
            conflicts_resolved,
            estimated_cost: days_saved as f64 * 1000.0 + conflicts_resolved as f64 * 500.0,
        };

        let (recommendations, alerts) = self.summarize(
            &bottlenecks,
            &metrics,
            optimized_conflicts,
            outcome.complete,
        );

        info!(
            days_saved,
            conflicts_resolved,
            complete = outcome.complete,
            "optimization finished"
        );

        OptimizationResult {
            schedule: outcome.schedule,
            assignments,
            bottlenecks,
            metrics,
            recommendations,
            alerts,
            complete: outcome.complete,
        }
    }

    fn summarize(
        &self,
        bottlenecks: &[Bottleneck],
        metrics: &OptimizationMetrics,
        remaining_conflicts: usize,
        complete: bool,
    ) -> (Vec<String>, Vec<String>) {
        let mut recommendations = Vec::new();
        let mut alerts = Vec::new();

        if remaining_conflicts > 0 {
            recommendations.push(format!(
                "{remaining_conflicts} conflicts remain; add capacity or stagger required dates"
            ));
        }
        if metrics.global_efficiency < 50.0 {
            recommendations.push(
                "Resource loads are far from the efficiency peak; rebalance the pool".to_string(),
            );
        }
        for bottleneck in bottlenecks {
            if bottleneck.impact == Criticality::Critical {
                alerts.push(bottleneck.description.clone());
            }
            recommendations.extend(bottleneck.proposed_fixes.iter().take(1).cloned());
        }
        if !complete {
            alerts.push(
                "Optimization was cancelled; the schedule is the best found so far".to_string(),
            );
        }

        (recommendations, alerts)
    }
}
