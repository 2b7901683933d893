//! Notification escalation.
//!
//! Unacknowledged action-requiring notifications advance through
//! recipient tiers after configured wait times. The transition is a pure
//! function over `(created_at, read, requires_action, priority)` and the
//! current time — no store access, no side effects; the caller applies
//! the returned recipient change and re-delivers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Notification, Priority};

/// One escalation step: who gets pulled in after how long.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationTier {
    /// Hours after creation before this tier activates.
    pub after_hours: i64,
    /// Recipients added at this tier.
    pub recipients: Vec<String>,
}

impl EscalationTier {
    /// Creates a tier.
    pub fn new(after_hours: i64, recipients: Vec<String>) -> Self {
        Self {
            after_hours,
            recipients,
        }
    }
}

/// Ordered escalation tiers.
///
/// The default policy escalates to a manager tier after 24 hours and a
/// directors tier after 72.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationPolicy {
    /// Tiers in ascending wait order.
    pub tiers: Vec<EscalationTier>,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            tiers: vec![
                EscalationTier::new(24, vec!["managers".to_string()]),
                EscalationTier::new(72, vec!["directors".to_string()]),
            ],
        }
    }
}

/// A computed escalation: the tier reached and its recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escalation {
    /// Zero-based tier index.
    pub tier: usize,
    /// Recipients for that tier.
    pub recipients: Vec<String>,
}

/// Wait multiplier by priority: urgent notifications escalate sooner.
fn wait_factor(priority: Priority) -> f64 {
    match priority {
        Priority::Critical => 0.5,
        Priority::High => 0.75,
        Priority::Medium | Priority::Low => 1.0,
    }
}

/// Computes the escalation tier a notification has reached, if any.
///
/// Returns `None` when the notification does not require action, has
/// been acknowledged, or no tier's wait time has elapsed yet.
pub fn next_escalation(
    notification: &Notification,
    policy: &EscalationPolicy,
    now: NaiveDateTime,
) -> Option<Escalation> {
    if !notification.requires_action || notification.read {
        return None;
    }

    let elapsed_hours = (now - notification.created_at).num_hours();
    if elapsed_hours < 0 {
        return None;
    }
    let factor = wait_factor(notification.priority);

    let mut reached = None;
    for (index, tier) in policy.tiers.iter().enumerate() {
        let wait = (tier.after_hours as f64 * factor).ceil() as i64;
        if elapsed_hours >= wait {
            reached = Some(Escalation {
                tier: index,
                recipients: tier.recipients.clone(),
            });
        }
    }
    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NotificationCategory, Severity};
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn pending_notification(severity: Severity) -> Notification {
        Notification::new(
            "n1",
            NotificationCategory::Budget,
            severity,
            "Budget at 95%",
            at(1, 8),
        )
        .with_requires_action(true)
    }

    #[test]
    fn test_no_escalation_before_first_tier() {
        let n = pending_notification(Severity::Warning);
        assert_eq!(next_escalation(&n, &EscalationPolicy::default(), at(1, 20)), None);
    }

    #[test]
    fn test_first_tier_after_24h() {
        let n = pending_notification(Severity::Warning);
        let esc = next_escalation(&n, &EscalationPolicy::default(), at(2, 9)).unwrap();
        assert_eq!(esc.tier, 0);
        assert_eq!(esc.recipients, vec!["managers".to_string()]);
    }

    #[test]
    fn test_highest_elapsed_tier_wins() {
        let n = pending_notification(Severity::Warning);
        let esc = next_escalation(&n, &EscalationPolicy::default(), at(5, 8)).unwrap();
        assert_eq!(esc.tier, 1);
        assert_eq!(esc.recipients, vec!["directors".to_string()]);
    }

    #[test]
    fn test_critical_priority_escalates_sooner() {
        // Critical halves the 24h wait: tier 0 after 12 hours.
        let n = pending_notification(Severity::Critical);
        let esc = next_escalation(&n, &EscalationPolicy::default(), at(1, 21)).unwrap();
        assert_eq!(esc.tier, 0);
    }

    #[test]
    fn test_acknowledged_never_escalates() {
        let mut n = pending_notification(Severity::Critical);
        n.read = true;
        assert_eq!(next_escalation(&n, &EscalationPolicy::default(), at(9, 8)), None);
    }

    #[test]
    fn test_informational_never_escalates() {
        let mut n = pending_notification(Severity::Warning);
        n.requires_action = false;
        assert_eq!(next_escalation(&n, &EscalationPolicy::default(), at(9, 8)), None);
    }
}
