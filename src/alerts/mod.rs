//! Alert generation.
//!
//! Transforms schedule, coherence, and resource-load facts into a
//! deduplicated, prioritized notification list. Architecture:
//!
//! - [`AlertRule`]: one detection concern per rule, composable
//! - [`AlertEngine`]: runs the rules, resolves recipients, writes
//!   through a [`NotificationStore`], and informs observers
//! - [`EscalationPolicy`]: pure tier transitions for unacknowledged
//!   action-requiring notifications
//!
//! # Idempotence
//!
//! Notification identities are deterministic, and the store upserts by
//! identity, so running the engine twice over identical facts does not
//! grow the store.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use equiplan::alerts::{AlertConfig, AlertEngine, AlertFacts, InMemoryNotificationStore};
//!
//! let store = Arc::new(InMemoryNotificationStore::new());
//! let engine = AlertEngine::from_config(&AlertConfig::default(), store).unwrap();
//!
//! let now = NaiveDate::from_ymd_opt(2025, 6, 25).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let produced = engine.run(&AlertFacts::new(now));
//! assert!(produced.is_empty()); // no facts, no alerts
//! ```

mod escalation;
pub mod rules;
mod store;

pub use escalation::{next_escalation, Escalation, EscalationPolicy, EscalationTier};
pub use store::{InMemoryNotificationStore, NotificationStore, UpsertOutcome};

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::coherence::CoherenceResult;
use crate::error::ConfigError;
use crate::models::{
    Notification, NotificationCategory, ProjectBudget, Resource, ScheduleItem,
};

/// Snapshot of facts the rules evaluate against.
///
/// All slices are borrowed from the caller; the engine never retains
/// them past a run.
#[derive(Debug, Clone)]
pub struct AlertFacts<'a> {
    /// Evaluation timestamp; its date is the dedup bucket.
    pub now: NaiveDateTime,
    /// Computed schedule items.
    pub items: &'a [ScheduleItem],
    /// Coherence validation results.
    pub coherence: &'a [CoherenceResult],
    /// Resource load snapshot.
    pub resources: &'a [Resource],
    /// Project budget snapshot.
    pub projects: &'a [ProjectBudget],
}

impl<'a> AlertFacts<'a> {
    /// Creates empty facts at the given time.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            items: &[],
            coherence: &[],
            resources: &[],
            projects: &[],
        }
    }

    /// Sets the schedule items.
    pub fn with_items(mut self, items: &'a [ScheduleItem]) -> Self {
        self.items = items;
        self
    }

    /// Sets the coherence results.
    pub fn with_coherence(mut self, coherence: &'a [CoherenceResult]) -> Self {
        self.coherence = coherence;
        self
    }

    /// Sets the resources.
    pub fn with_resources(mut self, resources: &'a [Resource]) -> Self {
        self.resources = resources;
        self
    }

    /// Sets the project budgets.
    pub fn with_projects(mut self, projects: &'a [ProjectBudget]) -> Self {
        self.projects = projects;
        self
    }
}

/// A detection rule turning facts into notifications.
///
/// Rules are pure over their input facts; the engine owns storage and
/// recipient resolution.
pub trait AlertRule: Send + Sync + Debug {
    /// Rule name (e.g. "critical-date").
    fn name(&self) -> &'static str;

    /// Evaluates the rule, returning zero or more notifications with
    /// deterministic identities.
    fn evaluate(&self, facts: &AlertFacts) -> Vec<Notification>;
}

/// Receives notifications as the engine inserts them.
///
/// Observers are informed of newly inserted notifications only;
/// refreshes of an existing identity stay silent so delivery channels
/// are not spammed on every re-evaluation.
pub trait NotificationObserver: Send + Sync {
    /// Called once per newly inserted notification.
    fn on_notification(&self, notification: &Notification);
}

/// Alert engine configuration.
///
/// Each rule class can be toggled independently; thresholds carry the
/// documented defaults from the rule types.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Toggle for [`rules::CriticalDateRule`].
    pub enable_critical_date: bool,
    /// Toggle for [`rules::CoherenceRule`].
    pub enable_coherence: bool,
    /// Toggle for [`rules::BudgetRule`].
    pub enable_budget: bool,
    /// Toggle for [`rules::ResourceOverloadRule`].
    pub enable_resource_load: bool,
    /// Toggle for the system rules (volume, overdue projects).
    pub enable_system: bool,
    /// Lead windows (days) for the critical-date rule.
    pub critical_date_windows: Vec<i64>,
    /// Minimum coherence deviation (percent) before alerting.
    pub coherence_threshold_percent: f64,
    /// Budget execution thresholds (percent).
    pub budget_thresholds: Vec<f64>,
    /// Item count from which the volume rule fires.
    pub volume_threshold: usize,
    /// Recipients when no category override exists.
    pub default_recipients: Vec<String>,
    /// Per-category recipient overrides.
    pub recipients_by_category: HashMap<NotificationCategory, Vec<String>>,
    /// Escalation tiers for unacknowledged notifications.
    pub escalation: EscalationPolicy,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enable_critical_date: true,
            enable_coherence: true,
            enable_budget: true,
            enable_resource_load: true,
            enable_system: true,
            critical_date_windows: vec![1, 3, 7, 15],
            coherence_threshold_percent: 1.0,
            budget_thresholds: vec![75.0, 85.0, 95.0],
            volume_threshold: 100,
            default_recipients: vec!["procurement".to_string()],
            recipients_by_category: HashMap::new(),
            escalation: EscalationPolicy::default(),
        }
    }
}

impl AlertConfig {
    /// Fails fast on configurations that cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enable_critical_date && self.critical_date_windows.is_empty() {
            return Err(ConfigError::EmptyThresholds("critical_date_windows"));
        }
        if self.enable_budget && self.budget_thresholds.is_empty() {
            return Err(ConfigError::EmptyThresholds("budget_thresholds"));
        }
        if !self.coherence_threshold_percent.is_finite() || self.coherence_threshold_percent < 0.0 {
            return Err(ConfigError::InvalidPercentage {
                name: "coherence_threshold_percent",
                value: self.coherence_threshold_percent,
            });
        }
        for t in &self.budget_thresholds {
            if !t.is_finite() || *t < 0.0 {
                return Err(ConfigError::InvalidPercentage {
                    name: "budget_thresholds",
                    value: *t,
                });
            }
        }
        Ok(())
    }
}

/// Runs alert rules over facts and maintains the notification store.
pub struct AlertEngine {
    rules: Vec<Arc<dyn AlertRule>>,
    store: Arc<dyn NotificationStore>,
    observers: Vec<Arc<dyn NotificationObserver>>,
    default_recipients: Vec<String>,
    recipients_by_category: HashMap<NotificationCategory, Vec<String>>,
}

impl Debug for AlertEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertEngine")
            .field("rules", &self.rules.len())
            .field("observers", &self.observers.len())
            .field("default_recipients", &self.default_recipients)
            .field("recipients_by_category", &self.recipients_by_category)
            .finish()
    }
}

impl AlertEngine {
    /// Builds an engine from configuration, with the enabled rule set.
    pub fn from_config(
        config: &AlertConfig,
        store: Arc<dyn NotificationStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut engine = Self::with_store(store)
            .with_recipients(config.default_recipients.clone(), config.recipients_by_category.clone());

        if config.enable_critical_date {
            engine = engine.with_rule(rules::CriticalDateRule {
                windows: config.critical_date_windows.clone(),
            });
        }
        if config.enable_coherence {
            engine = engine.with_rule(rules::CoherenceRule {
                deviation_threshold_percent: config.coherence_threshold_percent,
            });
        }
        if config.enable_budget {
            engine = engine.with_rule(rules::BudgetRule {
                thresholds: config.budget_thresholds.clone(),
            });
        }
        if config.enable_resource_load {
            engine = engine.with_rule(rules::ResourceOverloadRule);
        }
        if config.enable_system {
            engine = engine
                .with_rule(rules::VolumeRule {
                    threshold: config.volume_threshold,
                })
                .with_rule(rules::OverdueProjectRule);
        }
        Ok(engine)
    }

    /// Creates an engine with no rules over the given store.
    pub fn with_store(store: Arc<dyn NotificationStore>) -> Self {
        Self {
            rules: Vec::new(),
            store,
            observers: Vec::new(),
            default_recipients: Vec::new(),
            recipients_by_category: HashMap::new(),
        }
    }

    /// Adds a rule.
    pub fn with_rule<R: AlertRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Registers an observer.
    pub fn with_observer<O: NotificationObserver + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Sets recipient resolution tables.
    pub fn with_recipients(
        mut self,
        default_recipients: Vec<String>,
        by_category: HashMap<NotificationCategory, Vec<String>>,
    ) -> Self {
        self.default_recipients = default_recipients;
        self.recipients_by_category = by_category;
        self
    }

    /// Access to the underlying store.
    pub fn store(&self) -> &Arc<dyn NotificationStore> {
        &self.store
    }

    /// Evaluates every rule against the facts, upserts the results, and
    /// returns the notifications produced by this run (in stored form).
    pub fn run(&self, facts: &AlertFacts) -> Vec<Notification> {
        let mut produced = Vec::new();
        let mut inserted = 0usize;
        let mut refreshed = 0usize;

        for rule in &self.rules {
            let notifications = rule.evaluate(facts);
            debug!(rule = rule.name(), count = notifications.len(), "rule evaluated");

            for mut notification in notifications {
                notification.recipients = self.resolve_recipients(notification.category);
                let outcome = self.store.upsert(notification.clone());

                if outcome == UpsertOutcome::Inserted {
                    inserted += 1;
                    for observer in &self.observers {
                        observer.on_notification(&notification);
                    }
                } else {
                    refreshed += 1;
                }
                // Hand back the stored form (created_at/read survive refreshes).
                if let Some(stored) = self.store.get(&notification.id) {
                    produced.push(stored);
                }
            }
        }

        info!(inserted, refreshed, "alert run finished");
        produced
    }

    /// Computes pending escalations for everything in the store.
    pub fn pending_escalations(
        &self,
        policy: &EscalationPolicy,
        now: NaiveDateTime,
    ) -> Vec<(Notification, Escalation)> {
        self.store
            .list()
            .into_iter()
            .filter_map(|n| next_escalation(&n, policy, now).map(|e| (n, e)))
            .collect()
    }

    fn resolve_recipients(&self, category: NotificationCategory) -> Vec<String> {
        self.recipients_by_category
            .get(&category)
            .cloned()
            .unwrap_or_else(|| self.default_recipients.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Criticality, ItemKind, Severity};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn now() -> NaiveDateTime {
        d(2025, 6, 25).and_hms_opt(9, 0, 0).unwrap()
    }

    fn at_risk_items() -> Vec<ScheduleItem> {
        vec![
            ScheduleItem::new("O1", ItemKind::Order, d(2025, 6, 1), d(2025, 6, 27))
                .with_criticality(Criticality::High),
            ScheduleItem::new("O2", ItemKind::Order, d(2025, 6, 1), d(2025, 7, 1))
                .with_criticality(Criticality::High),
        ]
    }

    fn engine_with_store() -> (AlertEngine, Arc<InMemoryNotificationStore>) {
        let store = Arc::new(InMemoryNotificationStore::new());
        let engine = AlertEngine::from_config(&AlertConfig::default(), store.clone()).unwrap();
        (engine, store)
    }

    #[test]
    fn test_run_produces_notifications() {
        let (engine, store) = engine_with_store();
        let items = at_risk_items();
        let facts = AlertFacts::new(now()).with_items(&items);

        let produced = engine.run(&facts);
        assert_eq!(produced.len(), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_idempotent_rerun() {
        let (engine, store) = engine_with_store();
        let items = at_risk_items();
        let facts = AlertFacts::new(now()).with_items(&items);

        engine.run(&facts);
        let first_count = store.len();
        engine.run(&facts);
        assert_eq!(store.len(), first_count, "re-running must not duplicate");
    }

    #[test]
    fn test_recipients_resolved_from_config() {
        let store = Arc::new(InMemoryNotificationStore::new());
        let mut config = AlertConfig::default();
        config.default_recipients = vec!["fallback".to_string()];
        config
            .recipients_by_category
            .insert(NotificationCategory::CriticalDate, vec!["expediters".to_string()]);

        let engine = AlertEngine::from_config(&config, store).unwrap();
        let items = at_risk_items();
        let facts = AlertFacts::new(now()).with_items(&items);

        let produced = engine.run(&facts);
        assert!(produced
            .iter()
            .all(|n| n.recipients == vec!["expediters".to_string()]));
    }

    #[test]
    fn test_disabled_rule_stays_silent() {
        let store = Arc::new(InMemoryNotificationStore::new());
        let config = AlertConfig {
            enable_critical_date: false,
            ..AlertConfig::default()
        };
        let engine = AlertEngine::from_config(&config, store.clone()).unwrap();
        let items = at_risk_items();
        let facts = AlertFacts::new(now()).with_items(&items);

        engine.run(&facts);
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let store = Arc::new(InMemoryNotificationStore::new());
        let config = AlertConfig {
            budget_thresholds: Vec::new(),
            ..AlertConfig::default()
        };
        assert_eq!(
            AlertEngine::from_config(&config, store).unwrap_err(),
            ConfigError::EmptyThresholds("budget_thresholds")
        );
    }

    #[derive(Default)]
    struct CountingObserver {
        seen: AtomicUsize,
    }

    impl NotificationObserver for Arc<CountingObserver> {
        fn on_notification(&self, _notification: &Notification) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_observer_sees_inserts_only() {
        let store = Arc::new(InMemoryNotificationStore::new());
        let observer = Arc::new(CountingObserver::default());
        let engine = AlertEngine::from_config(&AlertConfig::default(), store)
            .unwrap()
            .with_observer(observer.clone());

        let items = at_risk_items();
        let facts = AlertFacts::new(now()).with_items(&items);

        engine.run(&facts);
        engine.run(&facts);
        // Two inserts on the first run, zero on the refresh run.
        assert_eq!(observer.seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_refresh_preserves_acknowledgement() {
        let (engine, store) = engine_with_store();
        let items = at_risk_items();
        let facts = AlertFacts::new(now()).with_items(&items);

        let produced = engine.run(&facts);
        store.mark_read(&produced[0].id);

        let produced = engine.run(&facts);
        let reads: Vec<bool> = produced.iter().map(|n| n.read).collect();
        assert!(reads.contains(&true));
    }

    #[test]
    fn test_pending_escalations() {
        let (engine, _store) = engine_with_store();
        let items = at_risk_items();
        let facts = AlertFacts::new(now()).with_items(&items);
        engine.run(&facts);

        // O1 is due in 2 days → requires_action; 30 hours later the
        // critical-priority wait (12h) has passed.
        let later = d(2025, 6, 26).and_hms_opt(15, 0, 0).unwrap();
        let escalations = engine.pending_escalations(&EscalationPolicy::default(), later);
        assert!(!escalations.is_empty());
        assert!(escalations.iter().all(|(n, _)| n.severity == Severity::Critical));
    }
}
