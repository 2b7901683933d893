//! Line item models.
//!
//! A line item is a priced row inside a list or an order. The two
//! variants are distinct types: list lines carry the forecast quantity,
//! order lines carry the committed quantity plus a back-reference to the
//! list line they execute. Lines exist only to feed aggregation and
//! back-calculation; they are not retained in computed outputs.

use serde::{Deserialize, Serialize};

/// Common read surface over both line variants.
///
/// Aggregation and date back-calculation only need quantity, unit price,
/// and lead time, so they are written once against this trait.
pub trait PricedLine {
    /// Quantity of units (forecast or committed).
    fn quantity(&self) -> f64;
    /// Price per unit.
    fn unit_price(&self) -> f64;
    /// Days between placing this line and its delivery.
    fn lead_time_days(&self) -> i64;
}

/// A priced requirement row inside an equipment list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListLine {
    /// Line identifier, unique within its list.
    pub id: String,
    /// Forecast quantity.
    pub quantity: f64,
    /// Price per unit.
    pub unit_price: f64,
    /// Procurement lead time in days.
    pub lead_time_days: i64,
}

impl ListLine {
    /// Creates a list line with zero lead time.
    pub fn new(id: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            id: id.into(),
            quantity,
            unit_price,
            lead_time_days: 0,
        }
    }

    /// Sets the procurement lead time.
    pub fn with_lead_time(mut self, days: i64) -> Self {
        self.lead_time_days = days;
        self
    }
}

/// A priced commitment row inside an equipment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Line identifier, unique within its order.
    pub id: String,
    /// List line this order line executes, when known.
    pub list_line_id: Option<String>,
    /// Committed quantity.
    pub quantity_ordered: f64,
    /// Price per unit.
    pub unit_price: f64,
    /// Procurement lead time in days.
    pub lead_time_days: i64,
}

impl OrderLine {
    /// Creates an order line with zero lead time and no list linkage.
    pub fn new(id: impl Into<String>, quantity_ordered: f64, unit_price: f64) -> Self {
        Self {
            id: id.into(),
            list_line_id: None,
            quantity_ordered,
            unit_price,
            lead_time_days: 0,
        }
    }

    /// Links this line to the list line it executes.
    pub fn for_list_line(mut self, list_line_id: impl Into<String>) -> Self {
        self.list_line_id = Some(list_line_id.into());
        self
    }

    /// Sets the procurement lead time.
    pub fn with_lead_time(mut self, days: i64) -> Self {
        self.lead_time_days = days;
        self
    }
}

impl PricedLine for ListLine {
    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn unit_price(&self) -> f64 {
        self.unit_price
    }

    fn lead_time_days(&self) -> i64 {
        self.lead_time_days
    }
}

impl PricedLine for OrderLine {
    fn quantity(&self) -> f64 {
        self.quantity_ordered
    }

    fn unit_price(&self) -> f64 {
        self.unit_price
    }

    fn lead_time_days(&self) -> i64 {
        self.lead_time_days
    }
}
