//! Procurement planning domain models.
//!
//! Provides the core data types for schedule computation and
//! reconciliation: boundary snapshots (lists, orders, budgets), computed
//! schedule items, resources, and notifications. All types are plain
//! serde-serializable data so any transport or rendering layer can
//! consume them.
//!
//! # Entity Mapping
//!
//! | Type | Business meaning |
//! |------|-----------------|
//! | `EquipmentList` | Aggregated requirement forecast with priced lines |
//! | `EquipmentOrder` | Purchase commitment derived from one list |
//! | `ScheduleItem` | Computed schedulable unit (one per list/order) |
//! | `Resource` | Person/organization carrying procurement work |
//! | `Notification` | Prioritized alert emitted by the rule engine |

mod item;
mod line_item;
mod notification;
mod resource;
mod snapshot;

pub use item::{Criticality, ItemKind, ItemState, ScheduleItem};
pub use line_item::{ListLine, OrderLine, PricedLine};
pub use notification::{
    Notification, NotificationAction, NotificationCategory, Priority, Severity,
};
pub use resource::{DateWindow, Resource, ResourceKind};
pub use snapshot::{DependencyEdge, EquipmentList, EquipmentOrder, ProjectBudget};
