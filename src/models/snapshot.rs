//! Boundary input snapshots.
//!
//! Lists, orders, project budgets, and dependency edges arrive from the
//! caller's data-access layer as plain resolved records. The core never
//! loads entities itself; a missing list or order is the caller's
//! `NotFound`, not this crate's.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ItemState, ListLine, OrderLine};

/// An aggregated equipment requirement forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentList {
    /// Unique list identifier.
    pub id: String,
    /// Business code (e.g. "LST-2025-014").
    pub code: String,
    /// Date the equipment must be on site.
    pub required_date: NaiveDate,
    /// Lifecycle state at snapshot time.
    pub state: ItemState,
    /// Priced requirement lines.
    pub lines: Vec<ListLine>,
}

impl EquipmentList {
    /// Creates a draft list with no lines.
    pub fn new(id: impl Into<String>, required_date: NaiveDate) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            id,
            required_date,
            state: ItemState::Draft,
            lines: Vec::new(),
        }
    }

    /// Sets the business code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the lifecycle state.
    pub fn with_state(mut self, state: ItemState) -> Self {
        self.state = state;
        self
    }

    /// Adds a requirement line.
    pub fn with_line(mut self, line: ListLine) -> Self {
        self.lines.push(line);
        self
    }
}

/// A purchase commitment derived from one list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentOrder {
    /// Unique order identifier.
    pub id: String,
    /// Business code (e.g. "ORD-2025-103").
    pub code: String,
    /// Date the ordered equipment must be on site.
    pub required_date: NaiveDate,
    /// The list this order executes.
    pub list_id: String,
    /// Lifecycle state at snapshot time.
    pub state: ItemState,
    /// Priced commitment lines.
    pub lines: Vec<OrderLine>,
}

impl EquipmentOrder {
    /// Creates a draft order linked to a list, with no lines.
    pub fn new(
        id: impl Into<String>,
        list_id: impl Into<String>,
        required_date: NaiveDate,
    ) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            id,
            required_date,
            list_id: list_id.into(),
            state: ItemState::Draft,
            lines: Vec::new(),
        }
    }

    /// Sets the business code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the lifecycle state.
    pub fn with_state(mut self, state: ItemState) -> Self {
        self.state = state;
        self
    }

    /// Adds a commitment line.
    pub fn with_line(mut self, line: OrderLine) -> Self {
        self.lines.push(line);
        self
    }
}

/// Budget execution snapshot for one project.
///
/// Feeds the budget and overdue-trend alert rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectBudget {
    /// Unique project identifier.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Approved budget total.
    pub budget_amount: f64,
    /// Amount committed through orders so far.
    pub executed_amount: f64,
    /// Planned project end date, when known.
    pub end_date: Option<NaiveDate>,
    /// Project lifecycle state.
    pub state: ItemState,
}

impl ProjectBudget {
    /// Creates a project budget snapshot.
    pub fn new(id: impl Into<String>, budget_amount: f64, executed_amount: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            budget_amount,
            executed_amount,
            end_date: None,
            state: ItemState::Approved,
        }
    }

    /// Sets the project name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the planned end date.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Sets the lifecycle state.
    pub fn with_state(mut self, state: ItemState) -> Self {
        self.state = state;
        self
    }

    /// Budget execution as a percentage (0 when the budget is 0).
    pub fn execution_percent(&self) -> f64 {
        if self.budget_amount <= 0.0 {
            return 0.0;
        }
        self.executed_amount / self.budget_amount * 100.0
    }
}

/// A directed dependency between two schedule items.
///
/// `from` must finish before `to` starts. Supplied by the caller when
/// dependency data exists; used by bottleneck detection's cycle check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Prerequisite item id.
    pub from: String,
    /// Dependent item id.
    pub to: String,
}

impl DependencyEdge {
    /// Creates an edge `from → to`.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}
