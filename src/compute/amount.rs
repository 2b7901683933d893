//! Monetary aggregation.
//!
//! Sums quantity × unit price across line items. Total function:
//! malformed lines (negative quantity or price) contribute nothing
//! instead of raising, so schedule computation never fails on dirty
//! snapshot data. The normalization is deliberate and documented here
//! rather than silent.

use crate::models::PricedLine;

/// Sums `quantity × unit_price` over the lines.
///
/// Lines with a negative quantity or unit price contribute 0. The result
/// is therefore always non-negative.
///
/// # Example
/// ```
/// use equiplan::compute::aggregate_amount;
/// use equiplan::models::ListLine;
///
/// let lines = vec![
///     ListLine::new("LL1", 10.0, 100.0),
///     ListLine::new("LL2", 3.0, 50.0),
/// ];
/// assert_eq!(aggregate_amount(&lines), 1150.0);
/// ```
pub fn aggregate_amount<L: PricedLine>(lines: &[L]) -> f64 {
    lines
        .iter()
        .map(|line| {
            let quantity = line.quantity();
            let price = line.unit_price();
            if quantity < 0.0 || price < 0.0 {
                0.0
            } else {
                quantity * price
            }
        })
        .sum()
}
