use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common DataFrame dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`. Only integers and floats qualify.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// NumericColumn – a column that takes part in the correlation
// ---------------------------------------------------------------------------

/// A numeric column with nulls turned into `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Column-major table with named columns of equal length.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Column names in source order.
    pub column_names: Vec<String>,
    /// `columns[c][r]` is the cell at row `r` of column `c`.
    pub columns: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table from row-major records. Every row must have one value
    /// per column.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Vec<CellValue>>) -> anyhow::Result<Self> {
        let mut columns: Vec<Vec<CellValue>> =
            vec![Vec::with_capacity(rows.len()); column_names.len()];
        for (row_no, row) in rows.into_iter().enumerate() {
            if row.len() != column_names.len() {
                anyhow::bail!(
                    "Row {row_no}: expected {} values but found {}",
                    column_names.len(),
                    row.len()
                );
            }
            for (col, value) in columns.iter_mut().zip(row) {
                col.push(value);
            }
        }
        Ok(Table {
            column_names,
            columns,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.column_names
            .iter()
            .position(|c| c == name)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// A column is numeric when it has at least one non-null value and every
    /// non-null value is an integer or a float.
    pub fn is_numeric(&self, idx: usize) -> bool {
        let col = &self.columns[idx];
        col.iter().any(|v| !v.is_null()) && col.iter().all(|v| v.is_null() || v.as_f64().is_some())
    }

    /// The numeric columns in source order, nulls as `NaN`.
    pub fn numeric_columns(&self) -> Vec<NumericColumn> {
        (0..self.columns.len())
            .filter(|&idx| self.is_numeric(idx))
            .map(|idx| NumericColumn {
                name: self.column_names[idx].clone(),
                values: self.columns[idx]
                    .iter()
                    .map(|v| v.as_f64().unwrap_or(f64::NAN))
                    .collect(),
            })
            .collect()
    }

    /// First non-numeric column, a natural row identifier for hover text.
    pub fn default_id_column(&self) -> Option<String> {
        (0..self.columns.len())
            .find(|&idx| !self.is_numeric(idx))
            .map(|idx| self.column_names[idx].clone())
    }

    /// Per-row identifiers taken from `id_column`, or `row <i>` labels when
    /// no column is given or it does not exist.
    pub fn row_ids(&self, id_column: Option<&str>) -> Vec<String> {
        match id_column.and_then(|name| self.column(name)) {
            Some(col) => col.iter().map(|v| v.to_string()).collect(),
            None => (0..self.len()).map(|i| format!("row {i}")).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            vec!["id".into(), "a".into(), "b".into(), "empty".into()],
            vec![
                vec![
                    CellValue::String("s1".into()),
                    CellValue::Integer(1),
                    CellValue::Float(0.5),
                    CellValue::Null,
                ],
                vec![
                    CellValue::String("s2".into()),
                    CellValue::Integer(2),
                    CellValue::Null,
                    CellValue::Null,
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_columns_skip_text_and_all_null() {
        let table = sample();
        let numeric = table.numeric_columns();
        let names: Vec<&str> = numeric.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(numeric[0].values, vec![1.0, 2.0]);
        assert_eq!(numeric[1].values[0], 0.5);
        assert!(numeric[1].values[1].is_nan());
    }

    #[test]
    fn test_row_ids() {
        let table = sample();
        assert_eq!(table.default_id_column().as_deref(), Some("id"));
        assert_eq!(table.row_ids(Some("id")), vec!["s1", "s2"]);
        assert_eq!(table.row_ids(None), vec!["row 0", "row 1"]);
        assert_eq!(table.row_ids(Some("missing")), vec!["row 0", "row 1"]);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let result = Table::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![CellValue::Integer(1)]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Integer(3).to_string(), "3");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Null.to_string(), "<null>");
        assert_eq!(Table::default().len(), 0);
    }
}
