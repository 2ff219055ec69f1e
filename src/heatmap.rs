use eframe::egui::Color32;

use crate::color::ColorMapper;
use crate::stats::correlation::CorrelationMatrix;

// ---------------------------------------------------------------------------
// Heatmap cells
// ---------------------------------------------------------------------------

/// One square of the heatmap.
///
/// Plot coordinates: column index `col` on x, `n - 1 - row` on y, so the
/// first column's row sits at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapCell {
    pub row: usize,
    pub col: usize,
    /// Column label shown on the x axis.
    pub x_label: String,
    /// Row label shown on the y axis.
    pub y_label: String,
    pub coef: f64,
    pub color: Color32,
}

/// Cell geometry and colours for a correlation matrix.
#[derive(Debug, Clone)]
pub struct Heatmap {
    pub labels: Vec<String>,
    pub cells: Vec<HeatmapCell>,
    /// Fraction of the unit square covered by each cell.
    pub gap: f64,
}

impl Heatmap {
    pub fn new(matrix: &CorrelationMatrix, mapper: &ColorMapper, gap: f64) -> Self {
        let n = matrix.len();
        let mut cells = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let coef = matrix.get(row, col);
                cells.push(HeatmapCell {
                    row,
                    col,
                    x_label: matrix.labels[col].clone(),
                    y_label: matrix.labels[row].clone(),
                    coef,
                    color: mapper.color_for(coef),
                });
            }
        }
        Heatmap {
            labels: matrix.labels.clone(),
            cells,
            gap: gap.clamp(0.05, 1.0),
        }
    }

    /// Number of rows (= columns).
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&HeatmapCell> {
        let n = self.size();
        if row < n && col < n {
            self.cells.get(row * n + col)
        } else {
            None
        }
    }

    /// Plot-space center of a cell.
    pub fn center(&self, row: usize, col: usize) -> [f64; 2] {
        [col as f64, (self.size() - 1 - row) as f64]
    }

    /// Corners of a cell, counter-clockwise from bottom-left.
    pub fn corners(&self, row: usize, col: usize) -> [[f64; 2]; 4] {
        let [cx, cy] = self.center(row, col);
        let h = self.gap / 2.0;
        [
            [cx - h, cy - h],
            [cx + h, cy - h],
            [cx + h, cy + h],
            [cx - h, cy + h],
        ]
    }

    /// Label for an axis tick at `value`, if it lands on a cell center.
    pub fn x_tick_label(&self, value: f64) -> Option<&str> {
        tick_index(value, self.size()).map(|i| self.labels[i].as_str())
    }

    pub fn y_tick_label(&self, value: f64) -> Option<&str> {
        tick_index(value, self.size()).map(|i| self.labels[self.size() - 1 - i].as_str())
    }

    /// The cell under a plot coordinate.  Points in the gaps between cells
    /// are not hits.
    pub fn cell_at(&self, point: [f64; 2]) -> Option<&HeatmapCell> {
        let n = self.size();
        let [x, y] = point;
        let col = x.round();
        let flipped = y.round();
        if col < 0.0 || flipped < 0.0 || col >= n as f64 || flipped >= n as f64 {
            return None;
        }
        let h = self.gap / 2.0;
        if (x - col).abs() > h || (y - flipped).abs() > h {
            return None;
        }
        let row = n - 1 - flipped as usize;
        self.cell(row, col as usize)
    }
}

fn tick_index(value: f64, n: usize) -> Option<usize> {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 || idx >= n as f64 {
        return None;
    }
    Some(idx as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorPalette;
    use crate::data::model::NumericColumn;
    use crate::stats::correlation::CorrelationMethod;

    fn heatmap(n: usize) -> Heatmap {
        let columns: Vec<NumericColumn> = (0..n)
            .map(|i| NumericColumn {
                name: format!("c{i}"),
                values: (0..6).map(|r| ((r * (i + 1)) % 5) as f64).collect(),
            })
            .collect();
        let matrix = CorrelationMatrix::from_columns(&columns, CorrelationMethod::Pearson).unwrap();
        Heatmap::new(&matrix, &ColorMapper::new(ColorPalette::PiYG), 0.95)
    }

    #[test]
    fn test_cell_count_is_square_of_columns() {
        for n in 2..6 {
            assert_eq!(heatmap(n).cells.len(), n * n);
        }
    }

    #[test]
    fn test_cell_labels_and_colors() {
        let hm = heatmap(3);
        let mapper = ColorMapper::new(ColorPalette::PiYG);
        let cell = hm.cell(2, 0).unwrap();
        assert_eq!(cell.x_label, "c0");
        assert_eq!(cell.y_label, "c2");
        assert_eq!(cell.color, mapper.color_for(cell.coef));
        assert_eq!(hm.cell(1, 1).unwrap().coef, 1.0);
        assert!(hm.cell(3, 0).is_none());
    }

    #[test]
    fn test_cell_at_hits_and_gaps() {
        let hm = heatmap(3);
        // Row 0 is drawn at the top (y = 2).
        let cell = hm.cell_at([0.1, 2.2]).unwrap();
        assert_eq!((cell.row, cell.col), (0, 0));
        let cell = hm.cell_at([2.4, 0.0]).unwrap();
        assert_eq!((cell.row, cell.col), (2, 2));
        let cell = hm.cell_at([1.0, 2.0]).unwrap();
        assert_eq!((cell.row, cell.col), (0, 1));

        assert!(hm.cell_at([0.49, 1.0]).is_none());
        assert!(hm.cell_at([-0.6, 1.0]).is_none());
        assert!(hm.cell_at([1.0, 3.0]).is_none());
    }

    #[test]
    fn test_tick_labels() {
        let hm = heatmap(3);
        assert_eq!(hm.x_tick_label(0.0), Some("c0"));
        assert_eq!(hm.y_tick_label(0.0), Some("c2"));
        assert_eq!(hm.y_tick_label(2.0), Some("c0"));
        assert_eq!(hm.x_tick_label(0.5), None);
        assert_eq!(hm.x_tick_label(3.0), None);
    }

    #[test]
    fn test_corners_follow_gap() {
        let hm = heatmap(2);
        let corners = hm.corners(0, 1);
        assert!((corners[0][0] - 0.525).abs() < 1e-12);
        assert!((corners[2][1] - 1.475).abs() < 1e-12);
    }
}
