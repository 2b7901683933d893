//! Schedule item model.
//!
//! A schedule item is the computed, schedulable unit derived from an
//! equipment list or an equipment order. It carries the back-calculated
//! date span, the aggregated amount, and the derived risk tier.
//!
//! # Time Representation
//! All dates are calendar days (`chrono::NaiveDate`); durations and
//! remaining time are whole-day counts. "Today" is never read from the
//! ambient clock — callers pass an `as_of` date so derived values are
//! reproducible.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of planning entity a schedule item was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Aggregated equipment requirement forecast.
    List,
    /// Purchase commitment derived from a list.
    Order,
}

/// Business lifecycle state of a list or order.
///
/// Closed set: upstream snapshots are validated into this enum once at
/// the boundary rather than carrying free-form state strings through
/// every computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemState {
    /// Being drafted, not yet submitted.
    Draft,
    /// Submitted, awaiting review.
    Pending,
    /// Sent to the supplier.
    Sent,
    /// Approved by procurement.
    Approved,
    /// Goods received.
    Delivered,
    /// Rejected during review.
    Rejected,
    /// Cancelled after creation.
    Cancelled,
}

impl ItemState {
    /// Whether this state ends the lifecycle (no further schedule work).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ItemState::Delivered | ItemState::Rejected | ItemState::Cancelled
        )
    }

    /// Fixed progress lookup for orders (percent complete by state).
    pub fn progress_percent(&self) -> u8 {
        match self {
            ItemState::Draft => 0,
            ItemState::Pending => 15,
            ItemState::Sent => 40,
            ItemState::Approved => 70,
            ItemState::Delivered => 100,
            ItemState::Rejected | ItemState::Cancelled => 0,
        }
    }
}

/// Derived schedule risk tier.
///
/// Ordering is meaningful: `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Criticality {
    /// More than a week of margin.
    Low,
    /// A week or less remaining.
    Medium,
    /// Three days or less remaining.
    High,
    /// Overdue, or in a dead lifecycle state.
    Critical,
}

impl Criticality {
    /// Priority weight used by the greedy optimizer's ordering score.
    pub fn weight(&self) -> f64 {
        match self {
            Criticality::Low => 1.0,
            Criticality::Medium => 2.0,
            Criticality::High => 4.0,
            Criticality::Critical => 8.0,
        }
    }
}

/// A computed, schedulable unit derived from a list or an order.
///
/// Items are created per computation request from upstream snapshots and
/// never persisted by this crate. The optimizer rewrites `start`/`end`
/// (and the derived `criticality`) only on its own copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleItem {
    /// Unique item identifier (the source list/order id).
    pub id: String,
    /// Business code shown to users (e.g. "LST-2025-014").
    pub label: String,
    /// Source entity kind.
    pub kind: ItemKind,
    /// Procurement start date (back-calculated).
    pub start: NaiveDate,
    /// Required-by date.
    pub end: NaiveDate,
    /// Projected or executed monetary total. Currency is fixed to a
    /// single unit throughout a computation.
    pub amount: f64,
    /// Lifecycle state at snapshot time.
    pub state: ItemState,
    /// Derived risk tier (not authoritative; recompute after date edits).
    pub criticality: Criticality,
    /// Progress percent, derived from state. Orders only.
    pub progress_percent: Option<u8>,
}

impl ScheduleItem {
    /// Creates a schedule item spanning `[start, end]`.
    pub fn new(
        id: impl Into<String>,
        kind: ItemKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            kind,
            start,
            end,
            amount: 0.0,
            state: ItemState::Draft,
            criticality: Criticality::Low,
            progress_percent: None,
        }
    }

    /// Sets the business code label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the monetary amount.
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the lifecycle state.
    pub fn with_state(mut self, state: ItemState) -> Self {
        self.state = state;
        self
    }

    /// Sets the derived criticality.
    pub fn with_criticality(mut self, criticality: Criticality) -> Self {
        self.criticality = criticality;
        self
    }

    /// Sets the progress percent (orders).
    pub fn with_progress(mut self, percent: u8) -> Self {
        self.progress_percent = Some(percent);
        self
    }

    /// Span length in whole days (`end - start`).
    #[inline]
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Days between `as_of` and the required-by date.
    ///
    /// Negative when the item is overdue. Recomputed on every read
    /// rather than stored.
    #[inline]
    pub fn days_remaining(&self, as_of: NaiveDate) -> i64 {
        (self.end - as_of).num_days()
    }

    /// Whether two items' date spans overlap (inclusive on both ends).
    pub fn overlaps(&self, other: &ScheduleItem) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Moves the item to a new start date, preserving its duration.
    pub fn shift_to(&mut self, new_start: NaiveDate) {
        let duration = self.duration_days();
        self.start = new_start;
        self.end = new_start + chrono::Duration::days(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_item_builder() {
        let item = ScheduleItem::new("L1", ItemKind::List, d(2025, 6, 1), d(2025, 6, 30))
            .with_label("LST-2025-001")
            .with_amount(1000.0)
            .with_state(ItemState::Approved);

        assert_eq!(item.id, "L1");
        assert_eq!(item.label, "LST-2025-001");
        assert_eq!(item.kind, ItemKind::List);
        assert_eq!(item.duration_days(), 29);
        assert!((item.amount - 1000.0).abs() < 1e-10);
        assert_eq!(item.state, ItemState::Approved);
        assert!(item.progress_percent.is_none());
    }

    #[test]
    fn test_days_remaining() {
        let item = ScheduleItem::new("O1", ItemKind::Order, d(2025, 6, 1), d(2025, 6, 30));
        assert_eq!(item.days_remaining(d(2025, 6, 25)), 5);
        assert_eq!(item.days_remaining(d(2025, 6, 30)), 0);
        assert_eq!(item.days_remaining(d(2025, 7, 2)), -2);
    }

    #[test]
    fn test_overlaps() {
        let a = ScheduleItem::new("A", ItemKind::List, d(2025, 6, 1), d(2025, 6, 10));
        let b = ScheduleItem::new("B", ItemKind::List, d(2025, 6, 10), d(2025, 6, 20));
        let c = ScheduleItem::new("C", ItemKind::List, d(2025, 6, 11), d(2025, 6, 20));

        assert!(a.overlaps(&b)); // shared boundary day
        assert!(!a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_shift_preserves_duration() {
        let mut item = ScheduleItem::new("A", ItemKind::Order, d(2025, 6, 10), d(2025, 6, 25));
        let duration = item.duration_days();

        item.shift_to(d(2025, 6, 3));
        assert_eq!(item.start, d(2025, 6, 3));
        assert_eq!(item.duration_days(), duration);
        assert_eq!(item.end, d(2025, 6, 18));
    }

    #[test]
    fn test_terminal_states() {
        assert!(ItemState::Cancelled.is_terminal());
        assert!(ItemState::Rejected.is_terminal());
        assert!(ItemState::Delivered.is_terminal());
        assert!(!ItemState::Approved.is_terminal());
        assert!(!ItemState::Draft.is_terminal());
    }

    #[test]
    fn test_progress_lookup() {
        assert_eq!(ItemState::Draft.progress_percent(), 0);
        assert_eq!(ItemState::Sent.progress_percent(), 40);
        assert_eq!(ItemState::Delivered.progress_percent(), 100);
        assert_eq!(ItemState::Cancelled.progress_percent(), 0);
    }

    #[test]
    fn test_criticality_ordering() {
        assert!(Criticality::Low < Criticality::Medium);
        assert!(Criticality::High < Criticality::Critical);
        assert!(Criticality::Critical.weight() > Criticality::High.weight());
    }
}
