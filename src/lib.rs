//! Procurement schedule computation and reconciliation.
//!
//! Computes procurement schedules for engineering projects from two
//! planning entities — equipment lists (requirement forecasts) and
//! equipment orders (purchase commitments) — then validates, alerts on,
//! and optimizes them.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `EquipmentList`, `EquipmentOrder`,
//!   `ScheduleItem`, `Resource`, `Notification`
//! - **`compute`**: Date back-calculation, monetary aggregation,
//!   criticality classification, and the snapshot → schedule pipeline
//! - **`coherence`**: List-vs-orders reconciliation (amounts, per-line
//!   quantities, date ordering)
//! - **`alerts`**: Rule-based notification engine with a pluggable
//!   store, observers, and escalation
//! - **`optimizer`**: Bottleneck detection plus four interchangeable
//!   re-scheduling strategies (greedy, critical-path, simulated
//!   annealing, genetic)
//! - **`error`**: Fail-fast configuration errors
//!
//! # Architecture
//!
//! Every component is a synchronous, near-pure function over snapshot
//! data the caller resolves and passes in: no storage, no transport, no
//! clock reads. Outputs are plain serde-serializable data for any
//! rendering or delivery layer. The optimizer is the one long-running
//! unit; it takes a cancellation token and always hands back the best
//! schedule found.

pub mod alerts;
pub mod coherence;
pub mod compute;
pub mod error;
pub mod models;
pub mod optimizer;
