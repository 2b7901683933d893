//! Configuration error taxonomy.
//!
//! Only programmer errors raise: an unrecognized algorithm name, an
//! impossible iteration budget, a malformed threshold list. Business-rule
//! violations (incoherent amounts, overdue items) are returned as data by
//! the components that detect them, never as errors.

/// A configuration error detected before any computation runs.
///
/// Construction-time validation fails fast with one of these variants
/// instead of silently degrading to a default behavior.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The algorithm name does not match any known optimization strategy.
    #[error("unknown optimization algorithm '{0}'")]
    UnknownAlgorithm(String),

    /// The iteration budget is zero.
    #[error("optimization iterations must be at least 1")]
    ZeroIterations,

    /// A tolerance or threshold is not a finite, non-negative percentage.
    #[error("invalid {name} value {value}: must be finite and non-negative")]
    InvalidPercentage {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A threshold list that must contain at least one entry is empty.
    #[error("threshold list '{0}' must not be empty")]
    EmptyThresholds(&'static str),

    /// The budget cap constraint is not a usable amount.
    #[error("budget cap {0} must be finite and non-negative")]
    InvalidBudgetCap(f64),
}
