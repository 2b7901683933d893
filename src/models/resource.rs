//! Resource model.
//!
//! Resources are the people and organizations that carry procurement
//! work: sales engineers, project managers, purchase coordinators,
//! suppliers. Each has a concurrent-assignment capacity and day-level
//! availability (an optional window plus blackout dates).
//!
//! # Availability Precedence
//! Blackout dates override the availability window. A date is available
//! iff it falls inside the window (or no window is set) and is not a
//! blackout date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Resource classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Sales engineer (builds and maintains lists).
    Sales,
    /// Project manager (approves and tracks).
    Manager,
    /// Purchase coordinator (places and follows orders).
    Coordinator,
    /// External supplier.
    Supplier,
}

/// An inclusive calendar-day interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First available day.
    pub start: NaiveDate,
    /// Last available day.
    pub end: NaiveDate,
}

impl DateWindow {
    /// Creates a new window.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether a date falls inside this window.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whether the window fully covers `[start, end]`.
    pub fn covers(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= start && end <= self.end
    }
}

/// A resource that can be assigned schedule items.
///
/// Read-only to the optimizer: assignment results are reported back in
/// the optimization output, never written onto the resource itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Resource classification.
    pub kind: ResourceKind,
    /// Maximum concurrent item assignments.
    pub max_capacity: u32,
    /// Items currently assigned upstream (snapshot value).
    pub current_load: u32,
    /// Availability window. `None` = always available.
    pub availability: Option<DateWindow>,
    /// Individual unavailable days (override the window).
    pub blackout_dates: Vec<NaiveDate>,
}

impl Resource {
    /// Creates a resource with capacity 1 and no availability limits.
    pub fn new(id: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            max_capacity: 1,
            current_load: 0,
            availability: None,
            blackout_dates: Vec::new(),
        }
    }

    /// Creates a purchase coordinator.
    pub fn coordinator(id: impl Into<String>) -> Self {
        Self::new(id, ResourceKind::Coordinator)
    }

    /// Creates a supplier.
    pub fn supplier(id: impl Into<String>) -> Self {
        Self::new(id, ResourceKind::Supplier)
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the concurrent-assignment capacity.
    pub fn with_capacity(mut self, max_capacity: u32) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Sets the current load snapshot.
    pub fn with_load(mut self, current_load: u32) -> Self {
        self.current_load = current_load;
        self
    }

    /// Sets the availability window.
    pub fn with_availability(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.availability = Some(DateWindow::new(start, end));
        self
    }

    /// Adds a blackout date.
    pub fn with_blackout(mut self, date: NaiveDate) -> Self {
        self.blackout_dates.push(date);
        self
    }

    /// Whether the resource can work on a given day.
    pub fn is_available_on(&self, date: NaiveDate) -> bool {
        if self.blackout_dates.contains(&date) {
            return false;
        }
        match &self.availability {
            None => true,
            Some(window) => window.contains(date),
        }
    }

    /// Whether the resource can carry an item spanning `[start, end]`.
    ///
    /// Requires the window to cover the whole span and no blackout date
    /// to fall inside it.
    pub fn is_available_over(&self, start: NaiveDate, end: NaiveDate) -> bool {
        if let Some(window) = &self.availability {
            if !window.covers(start, end) {
                return false;
            }
        }
        !self
            .blackout_dates
            .iter()
            .any(|d| *d >= start && *d <= end)
    }

    /// Load as a fraction of capacity (`current_load / max_capacity`).
    pub fn load_ratio(&self) -> f64 {
        if self.max_capacity == 0 {
            return 0.0;
        }
        self.current_load as f64 / self.max_capacity as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_resource_builder() {
        let r = Resource::coordinator("C1")
            .with_name("Purchase Desk 1")
            .with_capacity(5)
            .with_load(3);

        assert_eq!(r.id, "C1");
        assert_eq!(r.kind, ResourceKind::Coordinator);
        assert_eq!(r.max_capacity, 5);
        assert!((r.load_ratio() - 0.6).abs() < 1e-10);
    }

    #[test]
    fn test_availability_no_window() {
        let r = Resource::supplier("S1");
        assert!(r.is_available_on(d(2025, 1, 1)));
        assert!(r.is_available_over(d(2025, 1, 1), d(2025, 12, 31)));
    }

    #[test]
    fn test_blackout_overrides_window() {
        let r = Resource::supplier("S1")
            .with_availability(d(2025, 6, 1), d(2025, 6, 30))
            .with_blackout(d(2025, 6, 15));

        assert!(r.is_available_on(d(2025, 6, 14)));
        assert!(!r.is_available_on(d(2025, 6, 15)));
        assert!(!r.is_available_on(d(2025, 7, 1))); // outside window
    }

    #[test]
    fn test_availability_over_span() {
        let r = Resource::supplier("S1")
            .with_availability(d(2025, 6, 1), d(2025, 6, 30))
            .with_blackout(d(2025, 6, 15));

        assert!(r.is_available_over(d(2025, 6, 1), d(2025, 6, 10)));
        assert!(!r.is_available_over(d(2025, 6, 10), d(2025, 6, 20))); // blackout inside
        assert!(!r.is_available_over(d(2025, 6, 20), d(2025, 7, 5))); // past window end
    }

    #[test]
    fn test_zero_capacity_load_ratio() {
        let r = Resource::supplier("S1").with_capacity(0).with_load(2);
        assert_eq!(r.load_ratio(), 0.0);
    }
}
