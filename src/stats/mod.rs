/// Statistics layer: correlation coefficients and their significance.
///
/// Architecture:
/// ```text
///   Table
///     │  numeric_columns()
///     ▼
///   ┌──────────────┐
///   │ correlation   │  pairwise-complete coefficients → CorrelationMatrix
///   └──────────────┘
///     │
///     ▼
///   ┌──────────────┐
///   │ distribution  │  Student-t / normal tail probabilities → p-values
///   └──────────────┘
/// ```

pub mod correlation;
pub mod distribution;
