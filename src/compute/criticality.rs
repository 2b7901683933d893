//! Criticality classification.
//!
//! Assigns a risk tier from days remaining and lifecycle state. The rule
//! ladder is evaluated top to bottom and always produces a tier — no
//! input combination falls through unclassified.

use crate::models::{Criticality, ItemState};

/// Days-remaining boundary for the `High` tier.
pub const HIGH_THRESHOLD_DAYS: i64 = 3;
/// Days-remaining boundary for the `Medium` tier.
pub const MEDIUM_THRESHOLD_DAYS: i64 = 7;

/// Classifies schedule risk.
///
/// Rule ladder, first match wins:
/// 1. `Rejected`/`Cancelled` state → `Critical`
/// 2. overdue (`days_remaining < 0`) → `Critical`
/// 3. `days_remaining ≤ 3` → `High`
/// 4. `days_remaining ≤ 7` → `Medium`
/// 5. otherwise → `Low`
///
/// # Example
/// ```
/// use equiplan::compute::classify_criticality;
/// use equiplan::models::{Criticality, ItemState};
///
/// assert_eq!(classify_criticality(2, ItemState::Pending), Criticality::High);
/// assert_eq!(classify_criticality(30, ItemState::Cancelled), Criticality::Critical);
/// ```
pub fn classify_criticality(days_remaining: i64, state: ItemState) -> Criticality {
    if matches!(state, ItemState::Rejected | ItemState::Cancelled) {
        return Criticality::Critical;
    }
    if days_remaining < 0 {
        Criticality::Critical
    } else if days_remaining <= HIGH_THRESHOLD_DAYS {
        Criticality::High
    } else if days_remaining <= MEDIUM_THRESHOLD_DAYS {
        Criticality::Medium
    } else {
        Criticality::Low
    }
}
