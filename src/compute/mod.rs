//! Schedule computation.
//!
//! Pure derivation of [`ScheduleItem`]s from boundary snapshots:
//!
//! - [`DateBackCalculator`]: required date − max lead time → `[start, end]`
//! - [`aggregate_amount`]: Σ quantity × unit price
//! - [`classify_criticality`]: days-remaining + state → risk tier
//! - [`build_schedule`]: the pipeline gluing the three together
//!
//! Everything here is a total function over caller-supplied snapshot
//! data; no I/O, no clock reads, no error paths.

mod amount;
mod backdate;
mod criticality;

pub use amount::aggregate_amount;
pub use backdate::{DateBackCalculator, DateSpan};
pub use criticality::{classify_criticality, HIGH_THRESHOLD_DAYS, MEDIUM_THRESHOLD_DAYS};

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{EquipmentList, EquipmentOrder, ItemKind, ScheduleItem};

/// Derives a schedule item from one equipment list.
pub fn item_from_list(
    list: &EquipmentList,
    as_of: NaiveDate,
    calculator: &DateBackCalculator,
) -> ScheduleItem {
    let span = calculator.back_calculate(list.required_date, &list.lines);
    let amount = aggregate_amount(&list.lines);
    let days_remaining = (span.end - as_of).num_days();

    ScheduleItem::new(&list.id, ItemKind::List, span.start, span.end)
        .with_label(&list.code)
        .with_amount(amount)
        .with_state(list.state)
        .with_criticality(classify_criticality(days_remaining, list.state))
}

/// Derives a schedule item from one equipment order.
///
/// Orders additionally carry the state-derived progress percent.
pub fn item_from_order(
    order: &EquipmentOrder,
    as_of: NaiveDate,
    calculator: &DateBackCalculator,
) -> ScheduleItem {
    let span = calculator.back_calculate(order.required_date, &order.lines);
    let amount = aggregate_amount(&order.lines);
    let days_remaining = (span.end - as_of).num_days();

    ScheduleItem::new(&order.id, ItemKind::Order, span.start, span.end)
        .with_label(&order.code)
        .with_amount(amount)
        .with_state(order.state)
        .with_criticality(classify_criticality(days_remaining, order.state))
        .with_progress(order.state.progress_percent())
}

/// Computes the full schedule for a snapshot: one item per list and one
/// per order, dated, priced, and risk-classified as of `as_of`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use equiplan::compute::build_schedule;
/// use equiplan::models::{EquipmentList, ListLine};
///
/// let list = EquipmentList::new("L1", NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
///     .with_line(ListLine::new("LL1", 10.0, 100.0).with_lead_time(30));
///
/// let items = build_schedule(&[list], &[], NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
/// assert_eq!(items.len(), 1);
/// assert_eq!(items[0].start, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
/// assert_eq!(items[0].amount, 1000.0);
/// ```
pub fn build_schedule(
    lists: &[EquipmentList],
    orders: &[EquipmentOrder],
    as_of: NaiveDate,
) -> Vec<ScheduleItem> {
    let calculator = DateBackCalculator::default();
    let mut items = Vec::with_capacity(lists.len() + orders.len());

    for list in lists {
        items.push(item_from_list(list, as_of, &calculator));
    }
    for order in orders {
        items.push(item_from_order(order, as_of, &calculator));
    }

    debug!(
        lists = lists.len(),
        orders = orders.len(),
        as_of = %as_of,
        "computed schedule items"
    );
    items
}
