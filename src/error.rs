use thiserror::Error;

/// Errors raised while building a correlation figure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CorrelationError {
    /// The table needs at least two numeric columns to correlate.
    #[error("at least two numeric columns are required, found {found}")]
    InsufficientNumericColumns { found: usize },

    /// The correlation method name is not one of pearson, spearman, kendall.
    #[error("unsupported correlation method '{0}' (expected pearson, spearman or kendall)")]
    UnsupportedMethod(String),
}
