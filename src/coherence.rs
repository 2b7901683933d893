//! List/order coherence validation.
//!
//! Reconciles one equipment list against the orders that execute it:
//! aggregate amounts within tolerance, per-line ordered quantity not
//! exceeding the listed quantity, and order dates not sliding past the
//! list's required date.
//!
//! Incoherence is data, not an error — the validator always returns a
//! [`CoherenceResult`] carrying human-readable alerts and
//! recommendations, and never performs I/O. Callers pass pre-resolved
//! entities; orders linked to a different list are ignored.

use serde::{Deserialize, Serialize};

use crate::compute::aggregate_amount;
use crate::models::{EquipmentList, EquipmentOrder};

/// Default deviation tolerance, in percent of the list amount.
pub const DEFAULT_TOLERANCE_PERCENT: f64 = 1.0;

/// Execution status of one list line across all linked orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineExecution {
    /// List line id.
    pub line_id: String,
    /// Quantity forecast on the list line.
    pub listed_quantity: f64,
    /// Quantity committed across all order lines referencing it.
    pub ordered_quantity: f64,
    /// `ordered / listed × 100` (0 when nothing is listed).
    pub percent_executed: f64,
    /// Whether orders commit more than the list forecasts.
    pub exceeds_quantity: bool,
}

/// Outcome of validating one list against its orders.
///
/// Produced fresh per call and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoherenceResult {
    /// The validated list.
    pub list_id: String,
    /// Aggregated list amount.
    pub list_amount: f64,
    /// Sum of the linked orders' aggregated amounts.
    pub orders_amount: f64,
    /// `orders_amount − list_amount` (signed).
    pub amount_deviation: f64,
    /// `|deviation| / list_amount × 100` (0 when the list amount is 0).
    pub deviation_percent: f64,
    /// Whether the deviation is within tolerance.
    pub is_coherent: bool,
    /// Per-line execution status, one entry per list line.
    pub line_checks: Vec<LineExecution>,
    /// Orders whose required date falls after the list's.
    pub date_issues: Vec<String>,
    /// Human-readable problems found.
    pub alerts: Vec<String>,
    /// Suggested follow-ups for each problem.
    pub recommendations: Vec<String>,
}

/// Validates financial and quantity coherence between a list and its
/// orders.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use equiplan::coherence::CoherenceValidator;
/// use equiplan::models::{EquipmentList, EquipmentOrder, ListLine, OrderLine};
///
/// let due = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
/// let list = EquipmentList::new("L1", due)
///     .with_line(ListLine::new("LL1", 10.0, 100.0).with_lead_time(30));
/// let order = EquipmentOrder::new("O1", "L1", due)
///     .with_line(OrderLine::new("OL1", 10.0, 100.0).for_list_line("LL1"));
///
/// let result = CoherenceValidator::default().validate(&list, &[order]);
/// assert!(result.is_coherent);
/// assert!(result.alerts.is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CoherenceValidator {
    tolerance_percent: f64,
}

impl Default for CoherenceValidator {
    fn default() -> Self {
        Self {
            tolerance_percent: DEFAULT_TOLERANCE_PERCENT,
        }
    }
}

impl CoherenceValidator {
    /// Creates a validator with a custom tolerance (percent, clamped to
    /// be non-negative).
    pub fn with_tolerance(tolerance_percent: f64) -> Self {
        Self {
            tolerance_percent: tolerance_percent.max(0.0),
        }
    }

    /// Validates one list against its linked orders.
    pub fn validate(&self, list: &EquipmentList, orders: &[EquipmentOrder]) -> CoherenceResult {
        let linked: Vec<&EquipmentOrder> =
            orders.iter().filter(|o| o.list_id == list.id).collect();

        let list_amount = aggregate_amount(&list.lines);
        let orders_amount: f64 = linked.iter().map(|o| aggregate_amount(&o.lines)).sum();

        let amount_deviation = orders_amount - list_amount;
        let deviation_percent = if list_amount > 0.0 {
            amount_deviation.abs() / list_amount * 100.0
        } else {
            0.0
        };
        let is_coherent = deviation_percent <= self.tolerance_percent;

        let mut alerts = Vec::new();
        let mut recommendations = Vec::new();

        if !is_coherent {
            if amount_deviation > 0.0 {
                alerts.push(format!(
                    "Orders for list {} exceed the forecast amount by {:.2} ({:.1}% over)",
                    list.code, amount_deviation, deviation_percent
                ));
                recommendations.push(
                    "Review ordered quantities and unit prices against the list lines".to_string(),
                );
            } else {
                alerts.push(format!(
                    "Orders for list {} cover only {:.1}% of the forecast amount",
                    list.code,
                    if list_amount > 0.0 {
                        orders_amount / list_amount * 100.0
                    } else {
                        0.0
                    }
                ));
                recommendations
                    .push("Complete the missing orders to execute the full forecast".to_string());
            }
        }

        let line_checks = self.check_lines(list, &linked, &mut alerts, &mut recommendations);
        let date_issues = self.check_dates(list, &linked, &mut alerts, &mut recommendations);

        CoherenceResult {
            list_id: list.id.clone(),
            list_amount,
            orders_amount,
            amount_deviation,
            deviation_percent,
            is_coherent,
            line_checks,
            date_issues,
            alerts,
            recommendations,
        }
    }

    /// Per-line quantity execution: Σ ordered ≤ listed for each line.
    fn check_lines(
        &self,
        list: &EquipmentList,
        linked: &[&EquipmentOrder],
        alerts: &mut Vec<String>,
        recommendations: &mut Vec<String>,
    ) -> Vec<LineExecution> {
        list.lines
            .iter()
            .map(|line| {
                let ordered_quantity: f64 = linked
                    .iter()
                    .flat_map(|o| o.lines.iter())
                    .filter(|ol| ol.list_line_id.as_deref() == Some(line.id.as_str()))
                    .map(|ol| ol.quantity_ordered.max(0.0))
                    .sum();

                let percent_executed = if line.quantity > 0.0 {
                    ordered_quantity / line.quantity * 100.0
                } else {
                    0.0
                };
                let exceeds_quantity = ordered_quantity > line.quantity;

                if exceeds_quantity {
                    alerts.push(format!(
                        "Line {} of list {} is over-ordered: {:.0} committed against {:.0} listed ({:.0}%)",
                        line.id, list.code, ordered_quantity, line.quantity, percent_executed
                    ));
                    recommendations.push(format!(
                        "Reduce ordered quantity on line {} or update the list forecast",
                        line.id
                    ));
                }

                LineExecution {
                    line_id: line.id.clone(),
                    listed_quantity: line.quantity,
                    ordered_quantity,
                    percent_executed,
                    exceeds_quantity,
                }
            })
            .collect()
    }

    /// Date ordering: no order may be required later than its list.
    fn check_dates(
        &self,
        list: &EquipmentList,
        linked: &[&EquipmentOrder],
        alerts: &mut Vec<String>,
        recommendations: &mut Vec<String>,
    ) -> Vec<String> {
        let mut issues = Vec::new();
        for order in linked {
            if order.required_date > list.required_date {
                issues.push(order.id.clone());
                alerts.push(format!(
                    "Order {} is required on {}, after list {} ({})",
                    order.code, order.required_date, list.code, list.required_date
                ));
                recommendations.push(format!(
                    "Pull order {} forward or move the list requirement date",
                    order.code
                ));
            }
        }
        issues
    }
}
