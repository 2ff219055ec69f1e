use crate::data::model::NumericColumn;

// ---------------------------------------------------------------------------
// Scatter payload for the selected heatmap cell
// ---------------------------------------------------------------------------

/// Raw paired values of two columns, one point per table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPayload {
    pub x_label: String,
    pub y_label: String,
    pub title: String,
    /// `[x, y]` per row.  Rows with a missing value hold `NaN` and are not
    /// drawn, but keep their index.
    pub points: Vec<[f64; 2]>,
    /// Hover identifier per row, same length as `points`.
    pub row_ids: Vec<String>,
}

impl ScatterPayload {
    pub fn new(x: &NumericColumn, y: &NumericColumn, row_ids: &[String]) -> Self {
        let points: Vec<[f64; 2]> = x
            .values
            .iter()
            .zip(&y.values)
            .map(|(&xv, &yv)| [xv, yv])
            .collect();
        let row_ids = (0..points.len())
            .map(|i| row_ids.get(i).cloned().unwrap_or_else(|| format!("row {i}")))
            .collect();
        ScatterPayload {
            x_label: x.name.clone(),
            y_label: y.name.clone(),
            title: format!("{} vs {}", y.name, x.name),
            points,
            row_ids,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points that can be drawn (both coordinates present).
    pub fn finite_points(&self) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .copied()
            .filter(|[x, y]| x.is_finite() && y.is_finite())
            .collect()
    }

    /// Index of the first row plotted exactly at `point`.
    pub fn row_at(&self, point: [f64; 2]) -> Option<usize> {
        self.points.iter().position(|&p| p == point)
    }
}
