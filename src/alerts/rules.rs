//! Built-in alert rules.
//!
//! # Categories
//!
//! - **Date**: [`CriticalDateRule`]
//! - **Reconciliation**: [`CoherenceRule`]
//! - **Financial**: [`BudgetRule`]
//! - **Capacity**: [`ResourceOverloadRule`]
//! - **System**: [`VolumeRule`], [`OverdueProjectRule`]
//!
//! Every rule derives deterministic notification identities from the
//! facts it fires on, so the engine's upsert keeps repeated evaluation
//! idempotent. Rules fill everything except recipients, which the engine
//! resolves from configuration.

use super::{AlertFacts, AlertRule};
use crate::models::{
    Criticality, Notification, NotificationAction, NotificationCategory, Severity,
};

/// Emits a notification per at-risk item whose deadline falls inside a
/// configured lead window.
///
/// Severity scales with days remaining: ≤3 → critical, ≤7 → error,
/// otherwise warning. Overdue items are always critical.
#[derive(Debug, Clone)]
pub struct CriticalDateRule {
    /// Lead windows in days, ascending.
    pub windows: Vec<i64>,
}

impl Default for CriticalDateRule {
    fn default() -> Self {
        Self {
            windows: vec![1, 3, 7, 15],
        }
    }
}

impl AlertRule for CriticalDateRule {
    fn name(&self) -> &'static str {
        "critical-date"
    }

    fn evaluate(&self, facts: &AlertFacts) -> Vec<Notification> {
        let today = facts.now.date();
        let mut out = Vec::new();

        for item in facts.items {
            if item.criticality < Criticality::High {
                continue;
            }
            let days = item.days_remaining(today);

            let (discriminator, severity) = if days < 0 {
                ("overdue".to_string(), Severity::Critical)
            } else {
                // Tightest window containing the deadline.
                let window = match self.windows.iter().filter(|w| days <= **w).min() {
                    Some(w) => *w,
                    None => continue,
                };
                let severity = if days <= 3 {
                    Severity::Critical
                } else if days <= 7 {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                (format!("window-{window}"), severity)
            };

            let id =
                Notification::identity(NotificationCategory::CriticalDate, &item.id, &discriminator, today);
            let message = if days < 0 {
                format!("{} is {} days overdue", item.label, -days)
            } else {
                format!("{} is due in {} days", item.label, days)
            };

            out.push(
                Notification::new(id, NotificationCategory::CriticalDate, severity, format!("Deadline: {}", item.label), facts.now)
                    .about(&item.id)
                    .with_message(message)
                    .with_due_at(item.end)
                    .with_requires_action(days <= 3)
                    .with_action(NotificationAction::new("Expedite procurement", "expedite-item")),
            );
        }
        out
    }
}

/// Emits a notification per incoherent list/order reconciliation.
///
/// Severity is error beyond 20% deviation, warning otherwise.
#[derive(Debug, Clone)]
pub struct CoherenceRule {
    /// Minimum deviation (percent) before a notification fires.
    pub deviation_threshold_percent: f64,
}

impl Default for CoherenceRule {
    fn default() -> Self {
        Self {
            deviation_threshold_percent: 1.0,
        }
    }
}

impl AlertRule for CoherenceRule {
    fn name(&self) -> &'static str {
        "coherence"
    }

    fn evaluate(&self, facts: &AlertFacts) -> Vec<Notification> {
        let today = facts.now.date();
        let mut out = Vec::new();

        for result in facts.coherence {
            if result.is_coherent || result.deviation_percent <= self.deviation_threshold_percent {
                continue;
            }
            let severity = if result.deviation_percent > 20.0 {
                Severity::Error
            } else {
                Severity::Warning
            };

            let id = Notification::identity(
                NotificationCategory::Coherence,
                &result.list_id,
                "deviation",
                today,
            );
            let direction = if result.amount_deviation > 0.0 {
                "over-executed"
            } else {
                "under-executed"
            };

            out.push(
                Notification::new(
                    id,
                    NotificationCategory::Coherence,
                    severity,
                    format!("List {} {}", result.list_id, direction),
                    facts.now,
                )
                .about(&result.list_id)
                .with_message(format!(
                    "Orders deviate {:.1}% from the list amount ({:.2} vs {:.2})",
                    result.deviation_percent, result.orders_amount, result.list_amount
                ))
                .with_detail(result.alerts.join("; "))
                .with_action(NotificationAction::new("Review reconciliation", "open-coherence")),
            );
        }
        out
    }
}

/// Emits a notification per project whose budget execution crossed a
/// configured threshold. Requires action from 90% on.
#[derive(Debug, Clone)]
pub struct BudgetRule {
    /// Execution thresholds in percent, ascending.
    pub thresholds: Vec<f64>,
}

impl Default for BudgetRule {
    fn default() -> Self {
        Self {
            thresholds: vec![75.0, 85.0, 95.0],
        }
    }
}

impl AlertRule for BudgetRule {
    fn name(&self) -> &'static str {
        "budget"
    }

    fn evaluate(&self, facts: &AlertFacts) -> Vec<Notification> {
        let today = facts.now.date();
        let mut out = Vec::new();

        for project in facts.projects {
            let percent = project.execution_percent();
            // Highest crossed threshold wins; lower ones are implied.
            let crossed = self
                .thresholds
                .iter()
                .copied()
                .filter(|t| percent >= *t)
                .fold(None::<f64>, |acc, t| Some(acc.map_or(t, |a| a.max(t))));
            let Some(threshold) = crossed else { continue };

            let severity = if threshold >= 95.0 {
                Severity::Error
            } else if threshold >= 85.0 {
                Severity::Warning
            } else {
                Severity::Info
            };

            let id = Notification::identity(
                NotificationCategory::Budget,
                &project.id,
                &format!("threshold-{}", threshold as i64),
                today,
            );

            out.push(
                Notification::new(
                    id,
                    NotificationCategory::Budget,
                    severity,
                    format!("Budget of {} at {:.0}%", project.name, percent),
                    facts.now,
                )
                .about(&project.id)
                .with_message(format!(
                    "Executed {:.2} of {:.2} ({:.1}%)",
                    project.executed_amount, project.budget_amount, percent
                ))
                .with_requires_action(percent >= 90.0)
                .with_action(NotificationAction::new("Review budget", "open-budget")),
            );
        }
        out
    }
}

/// Emits an overload notification per resource carrying more items than
/// its capacity. Critical from 150% of capacity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceOverloadRule;

impl AlertRule for ResourceOverloadRule {
    fn name(&self) -> &'static str {
        "resource-overload"
    }

    fn evaluate(&self, facts: &AlertFacts) -> Vec<Notification> {
        let today = facts.now.date();
        let mut out = Vec::new();

        for resource in facts.resources {
            if resource.current_load <= resource.max_capacity {
                continue;
            }
            let severity = if resource.max_capacity == 0
                || resource.current_load as f64 >= resource.max_capacity as f64 * 1.5
            {
                Severity::Critical
            } else {
                Severity::Error
            };

            let id = Notification::identity(
                NotificationCategory::ResourceLoad,
                &resource.id,
                "overload",
                today,
            );

            out.push(
                Notification::new(
                    id,
                    NotificationCategory::ResourceLoad,
                    severity,
                    format!("{} overloaded", display_name(resource)),
                    facts.now,
                )
                .about(&resource.id)
                .with_message(format!(
                    "{} assignments against a capacity of {}",
                    resource.current_load, resource.max_capacity
                ))
                .with_requires_action(severity == Severity::Critical)
                .with_action(NotificationAction::new("Rebalance assignments", "rebalance-resource")),
            );
        }
        out
    }
}

fn display_name(resource: &crate::models::Resource) -> &str {
    if resource.name.is_empty() {
        &resource.id
    } else {
        &resource.name
    }
}

/// Informational alert when the working set grows large.
#[derive(Debug, Clone)]
pub struct VolumeRule {
    /// Item count from which the alert fires.
    pub threshold: usize,
}

impl Default for VolumeRule {
    fn default() -> Self {
        Self { threshold: 100 }
    }
}

impl AlertRule for VolumeRule {
    fn name(&self) -> &'static str {
        "volume"
    }

    fn evaluate(&self, facts: &AlertFacts) -> Vec<Notification> {
        if facts.items.len() < self.threshold {
            return Vec::new();
        }
        let today = facts.now.date();
        let id = Notification::identity(NotificationCategory::System, "schedule", "volume", today);

        vec![Notification::new(
            id,
            NotificationCategory::System,
            Severity::Info,
            "Large working set",
            facts.now,
        )
        .with_message(format!(
            "{} schedule items in the current computation",
            facts.items.len()
        ))]
    }
}

/// Trend alert: projects past their end date but still alive.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverdueProjectRule;

impl AlertRule for OverdueProjectRule {
    fn name(&self) -> &'static str {
        "overdue-project"
    }

    fn evaluate(&self, facts: &AlertFacts) -> Vec<Notification> {
        let today = facts.now.date();
        let mut out = Vec::new();

        for project in facts.projects {
            let Some(end_date) = project.end_date else {
                continue;
            };
            if end_date >= today || project.state.is_terminal() {
                continue;
            }

            let id =
                Notification::identity(NotificationCategory::System, &project.id, "overdue", today);
            out.push(
                Notification::new(
                    id,
                    NotificationCategory::System,
                    Severity::Warning,
                    format!("{} past its end date", project.name),
                    facts.now,
                )
                .about(&project.id)
                .with_message(format!(
                    "Planned end {} has passed and the project is still open",
                    end_date
                ))
                .with_due_at(end_date),
            );
        }
        out
    }
}
