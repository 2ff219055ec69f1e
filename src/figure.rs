use crate::color::ColorMapper;
use crate::config::FigureOptions;
use crate::data::model::{NumericColumn, Table};
use crate::error::CorrelationError;
use crate::heatmap::Heatmap;
use crate::scatter::ScatterPayload;
use crate::stats::correlation::{CorrelationMatrix, CorrelationPair, sort_by_p_value};

// ---------------------------------------------------------------------------
// Heatmap + linked scatter figure
// ---------------------------------------------------------------------------

/// Interactive correlation heatmap with a scatter view of the selected cell.
///
/// The figure owns everything it draws, so it can be shown in any `Ui`
/// after the source table is gone.  See [`crate::ui::plot::heatmap_scatter`].
#[derive(Debug, Clone)]
pub struct HeatmapScatter {
    pub options: FigureOptions,
    pub matrix: CorrelationMatrix,
    pub heatmap: Heatmap,
    pub mapper: ColorMapper,
    columns: Vec<NumericColumn>,
    row_ids: Vec<String>,
    /// `(row, col)` of the selected heatmap cell.
    selected: (usize, usize),
    scatter: ScatterPayload,
}

/// Build the interactive figure for the numeric columns of `table`.
///
/// Fails when the table has fewer than two numeric columns.
pub fn render_heatmap_scatter(
    table: &Table,
    options: &FigureOptions,
) -> Result<HeatmapScatter, CorrelationError> {
    let columns = table.numeric_columns();
    let matrix = CorrelationMatrix::from_columns(&columns, options.method)?;
    let mut mapper = ColorMapper::new(options.palette);
    mapper.smooth = options.smooth_colors;
    let heatmap = Heatmap::new(&matrix, &mapper, options.cell_gap);

    let id_column = options
        .id_column
        .clone()
        .or_else(|| table.default_id_column());
    let row_ids = table.row_ids(id_column.as_deref());

    // Start on x = first column, y = second column.
    let selected = (1, 0);
    let scatter = ScatterPayload::new(&columns[0], &columns[1], &row_ids);

    log::info!(
        "Built {} correlation heatmap over {} numeric columns, {} rows",
        options.method,
        columns.len(),
        table.len()
    );

    Ok(HeatmapScatter {
        options: options.clone(),
        matrix,
        heatmap,
        mapper,
        columns,
        row_ids,
        selected,
        scatter,
    })
}

impl HeatmapScatter {
    pub fn selected(&self) -> (usize, usize) {
        self.selected
    }

    pub fn scatter(&self) -> &ScatterPayload {
        &self.scatter
    }

    /// Select heatmap cell `(row, col)`: the scatter switches to column
    /// `col` on x and column `row` on y.  Out-of-range cells are ignored.
    pub fn select(&mut self, row: usize, col: usize) -> bool {
        let n = self.columns.len();
        if row >= n || col >= n {
            log::warn!("Ignoring selection ({row}, {col}) outside a {n}x{n} heatmap");
            return false;
        }
        if self.selected == (row, col) {
            return false;
        }
        self.selected = (row, col);
        self.scatter = ScatterPayload::new(&self.columns[col], &self.columns[row], &self.row_ids);
        log::debug!("Selected {}", self.scatter.title);
        true
    }

    /// Select whichever cell lies under a heatmap plot coordinate.
    pub fn click(&mut self, point: [f64; 2]) -> bool {
        match self.heatmap.cell_at(point).map(|c| (c.row, c.col)) {
            Some((row, col)) => self.select(row, col),
            None => false,
        }
    }

    /// Select the cell showing `x_column` on x and `y_column` on y.
    pub fn select_pair(&mut self, x_column: &str, y_column: &str) -> bool {
        let index = |name: &str| self.matrix.labels.iter().position(|l| l == name);
        match (index(y_column), index(x_column)) {
            (Some(row), Some(col)) => self.select(row, col),
            _ => false,
        }
    }

    /// Tooltip for a heatmap plot coordinate.
    pub fn heatmap_hover_text(&self, point: [f64; 2]) -> Option<String> {
        self.heatmap.cell_at(point).map(|cell| {
            format!(
                "x: {}\ny: {}\nCoef.: {:.4}\nn: {}",
                cell.x_label,
                cell.y_label,
                cell.coef,
                self.matrix.count(cell.row, cell.col)
            )
        })
    }

    /// Tooltip for a scatter plot coordinate.  On a data point it lists the
    /// row identifier and every numeric value of that row.
    pub fn scatter_hover_text(&self, point: [f64; 2]) -> String {
        let scatter = &self.scatter;
        let [x, y] = point;
        let Some(row) = scatter.row_at(point) else {
            return format!("{}: {x:.3}\n{}: {y:.3}", scatter.x_label, scatter.y_label);
        };
        std::iter::once(scatter.row_ids[row].clone())
            .chain(
                self.columns
                    .iter()
                    .map(|c| format!("{}: {}", c.name, c.values[row])),
            )
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Long-form pairs sorted by p-value.
    pub fn sorted_pairs(&self, exclude_self: bool, exclude_dupe: bool) -> Vec<CorrelationPair> {
        let mut pairs = self.matrix.pairs(exclude_self, exclude_dupe);
        sort_by_p_value(&mut pairs);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use crate::stats::correlation::CorrelationMethod;

    fn table() -> Table {
        let names = vec!["id".into(), "a".into(), "b".into(), "c".into()];
        let rows = (0..8)
            .map(|i| {
                let x = i as f64;
                vec![
                    CellValue::String(format!("s{i}")),
                    CellValue::Integer(i),
                    CellValue::Float(x * x - 3.0 * x),
                    CellValue::Float((x * 1.7).sin()),
                ]
            })
            .collect();
        Table::from_rows(names, rows).unwrap()
    }

    fn column_values(table: &Table, name: &str) -> Vec<f64> {
        table
            .numeric_columns()
            .into_iter()
            .find(|c| c.name == name)
            .unwrap()
            .values
    }

    #[test]
    fn test_initial_selection_is_first_two_columns() {
        let fig = render_heatmap_scatter(&table(), &FigureOptions::default()).unwrap();
        assert_eq!(fig.selected(), (1, 0));
        assert_eq!(fig.scatter().x_label, "a");
        assert_eq!(fig.scatter().y_label, "b");
        assert_eq!(fig.scatter().title, "b vs a");
        assert_eq!(fig.heatmap.cells.len(), 9);
    }

    #[test]
    fn test_select_shows_raw_column_values() {
        let table = table();
        let mut fig = render_heatmap_scatter(&table, &FigureOptions::default()).unwrap();
        let n = fig.heatmap.size();
        for row in 0..n {
            for col in 0..n {
                fig.select(row, col);
                let scatter = fig.scatter();
                assert_eq!(scatter.len(), table.len());
                let xs = column_values(&table, &fig.matrix.labels[col]);
                let ys = column_values(&table, &fig.matrix.labels[row]);
                for (i, p) in scatter.points.iter().enumerate() {
                    assert_eq!(p[0], xs[i]);
                    assert_eq!(p[1], ys[i]);
                }
            }
        }
        assert!(!fig.select(5, 0));
    }

    #[test]
    fn test_click_selects_cell_under_pointer() {
        let mut fig = render_heatmap_scatter(&table(), &FigureOptions::default()).unwrap();
        // Row 2 (column "c") is the bottom row; column 2 is the rightmost.
        assert!(fig.click([2.1, 0.2]));
        assert_eq!(fig.selected(), (2, 2));
        assert_eq!(fig.scatter().title, "c vs c");
        // Gap between cells.
        assert!(!fig.click([1.5, 1.0]));
        assert_eq!(fig.selected(), (2, 2));
    }

    #[test]
    fn test_select_pair_by_name() {
        let mut fig = render_heatmap_scatter(&table(), &FigureOptions::default()).unwrap();
        assert!(fig.select_pair("c", "a"));
        assert_eq!(fig.selected(), (0, 2));
        assert_eq!(fig.scatter().title, "a vs c");
        assert!(!fig.select_pair("c", "id"));
    }

    #[test]
    fn test_hover_texts_use_row_ids() {
        let fig = render_heatmap_scatter(&table(), &FigureOptions::default()).unwrap();
        let hover = fig.heatmap_hover_text([0.0, 2.0]).unwrap();
        assert!(hover.starts_with("x: a\ny: a\nCoef.: 1.0000"));
        assert!(fig.heatmap_hover_text([0.5, 0.5]).is_none());

        let point = fig.scatter().points[3];
        let text = fig.scatter_hover_text(point);
        assert!(text.starts_with("s3\na: 3\nb: 0\nc: -0.925"), "{text}");
        assert_eq!(fig.scatter_hover_text([0.5, 100.0]), "a: 0.500\nb: 100.000");
    }

    #[test]
    fn test_explicit_id_column() {
        let options = FigureOptions {
            id_column: Some("missing".into()),
            ..FigureOptions::default()
        };
        let fig = render_heatmap_scatter(&table(), &options).unwrap();
        assert_eq!(fig.scatter().row_ids[0], "row 0");
    }

    #[test]
    fn test_errors() {
        let table = Table::from_rows(
            vec!["id".into(), "a".into()],
            vec![vec![CellValue::String("x".into()), CellValue::Integer(1)]],
        )
        .unwrap();
        let err = render_heatmap_scatter(&table, &FigureOptions::default()).unwrap_err();
        assert_eq!(err, CorrelationError::InsufficientNumericColumns { found: 1 });

        let err = render_heatmap_scatter(&Table::default(), &FigureOptions::default()).unwrap_err();
        assert_eq!(err, CorrelationError::InsufficientNumericColumns { found: 0 });

        assert!(matches!(
            "pearsons".parse::<CorrelationMethod>(),
            Err(CorrelationError::UnsupportedMethod(_))
        ));
    }

    #[test]
    fn test_sorted_pairs() {
        let options = FigureOptions {
            method: CorrelationMethod::Spearman,
            ..FigureOptions::default()
        };
        let fig = render_heatmap_scatter(&table(), &options).unwrap();
        let pairs = fig.sorted_pairs(true, true);
        assert_eq!(pairs.len(), 3);
        assert!(pairs.windows(2).all(|w| w[0].p_value <= w[1].p_value || w[1].p_value.is_nan()));
    }
}
