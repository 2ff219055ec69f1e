/// Data layer: core types and loading.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named columns of CellValue, numeric column view
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
