//! Date back-calculation.
//!
//! Derives a procurement span from a required-by date: the line with the
//! longest lead time dictates how early procurement must start.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::PricedLine;

/// A computed `[start, end]` span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    /// Back-calculated procurement start.
    pub start: NaiveDate,
    /// The required-by date, unchanged.
    pub end: NaiveDate,
}

impl DateSpan {
    /// Span length in whole days.
    #[inline]
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Back-calculates procurement start dates from required dates.
///
/// Total function: malformed lead times are normalized, never raised.
/// A negative lead time is replaced by `fallback_lead_time_days`
/// (default 0); with no lines at all the span collapses to a single day
/// (`start == end`).
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use equiplan::compute::DateBackCalculator;
/// use equiplan::models::ListLine;
///
/// let required = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
/// let lines = vec![
///     ListLine::new("LL1", 10.0, 100.0).with_lead_time(30),
///     ListLine::new("LL2", 2.0, 50.0).with_lead_time(12),
/// ];
///
/// let span = DateBackCalculator::default().back_calculate(required, &lines);
/// assert_eq!(span.end, required);
/// assert_eq!(span.start, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DateBackCalculator {
    /// Substitute for missing or negative lead times.
    fallback_lead_time_days: i64,
}

impl Default for DateBackCalculator {
    fn default() -> Self {
        Self {
            fallback_lead_time_days: 0,
        }
    }
}

impl DateBackCalculator {
    /// Creates a calculator with an explicit lead-time fallback.
    ///
    /// Negative fallbacks are clamped to 0.
    pub fn new(fallback_lead_time_days: i64) -> Self {
        Self {
            fallback_lead_time_days: fallback_lead_time_days.max(0),
        }
    }

    /// Computes the span for a required date and its lines.
    ///
    /// `end` is always the required date; `start` is `end` minus the
    /// largest (normalized) lead time across the lines.
    pub fn back_calculate<L: PricedLine>(&self, required_date: NaiveDate, lines: &[L]) -> DateSpan {
        let max_lead = lines
            .iter()
            .map(|line| {
                let days = line.lead_time_days();
                if days < 0 {
                    self.fallback_lead_time_days
                } else {
                    days
                }
            })
            .max()
            .unwrap_or(0);

        DateSpan {
            start: required_date - Duration::days(max_lead),
            end: required_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListLine, OrderLine};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_end_is_required_date() {
        let lines = vec![ListLine::new("LL1", 1.0, 1.0).with_lead_time(30)];
        let span = DateBackCalculator::default().back_calculate(d(2025, 6, 30), &lines);
        assert_eq!(span.end, d(2025, 6, 30));
        assert_eq!(span.start, d(2025, 5, 31));
        assert_eq!(span.duration_days(), 30);
    }

    #[test]
    fn test_max_lead_time_wins() {
        let lines = vec![
            ListLine::new("LL1", 1.0, 1.0).with_lead_time(10),
            ListLine::new("LL2", 1.0, 1.0).with_lead_time(45),
            ListLine::new("LL3", 1.0, 1.0).with_lead_time(5),
        ];
        let span = DateBackCalculator::default().back_calculate(d(2025, 6, 30), &lines);
        assert_eq!(span.start, d(2025, 5, 16));
    }

    #[test]
    fn test_empty_lines_collapse_span() {
        let span =
            DateBackCalculator::default().back_calculate(d(2025, 6, 30), &Vec::<ListLine>::new());
        assert_eq!(span.start, span.end);
        assert_eq!(span.duration_days(), 0);
    }

    #[test]
    fn test_negative_lead_time_normalized() {
        let lines = vec![ListLine::new("LL1", 1.0, 1.0).with_lead_time(-5)];
        let span = DateBackCalculator::default().back_calculate(d(2025, 6, 30), &lines);
        assert_eq!(span.start, span.end);
    }

    #[test]
    fn test_configured_fallback() {
        let lines = vec![
            OrderLine::new("OL1", 1.0, 1.0).with_lead_time(-1),
            OrderLine::new("OL2", 1.0, 1.0).with_lead_time(10),
        ];
        let span = DateBackCalculator::new(30).back_calculate(d(2025, 6, 30), &lines);
        // The normalized -1 becomes 30, which beats the explicit 10.
        assert_eq!(span.start, d(2025, 5, 31));
    }

    #[test]
    fn test_fallback_clamped_non_negative() {
        let calc = DateBackCalculator::new(-7);
        let lines = vec![ListLine::new("LL1", 1.0, 1.0).with_lead_time(-1)];
        let span = calc.back_calculate(d(2025, 6, 30), &lines);
        assert_eq!(span.start, span.end);
    }
}
