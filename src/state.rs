use crate::color::ColorPalette;
use crate::config::FigureOptions;
use crate::data::model::Table;
use crate::figure::{HeatmapScatter, render_heatmap_scatter};
use crate::stats::correlation::{CorrelationMethod, CorrelationPair};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until user loads a file).
    pub table: Option<Table>,

    /// File name of the loaded table, for the top bar.
    pub source_name: Option<String>,

    /// Options the figure is built with.
    pub options: FigureOptions,

    /// Figure for the current table and options.
    pub figure: Option<HeatmapScatter>,

    /// Long-form correlations sorted by p-value (cached).
    pub pairs: Vec<CorrelationPair>,

    /// Pair table filters.
    pub exclude_self: bool,
    pub exclude_dupe: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_options(FigureOptions::default())
    }
}

impl AppState {
    pub fn with_options(options: FigureOptions) -> Self {
        Self {
            table: None,
            source_name: None,
            options,
            figure: None,
            pairs: Vec::new(),
            exclude_self: true,
            exclude_dupe: true,
            status_message: None,
            loading: false,
        }
    }

    /// Ingest a newly loaded table and build its figure.
    pub fn set_table(&mut self, table: Table, source_name: Option<String>) {
        self.table = Some(table);
        self.source_name = source_name;
        self.loading = false;
        self.rebuild_figure();
    }

    /// Rebuild the figure from the current table and options.
    pub fn rebuild_figure(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        // Keep the selected cell when the heatmap shows the same columns.
        let previous = self
            .figure
            .as_ref()
            .map(|f| (f.matrix.labels.clone(), f.selected()));
        match render_heatmap_scatter(table, &self.options) {
            Ok(mut figure) => {
                if let Some((labels, (row, col))) = previous {
                    if labels == figure.matrix.labels {
                        figure.select(row, col);
                    }
                }
                self.figure = Some(figure);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Cannot build correlation heatmap: {e}");
                self.figure = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.refresh_pairs();
    }

    /// Recompute the pair table after a filter change.
    pub fn refresh_pairs(&mut self) {
        self.pairs = self
            .figure
            .as_ref()
            .map(|f| f.sorted_pairs(self.exclude_self, self.exclude_dupe))
            .unwrap_or_default();
    }

    pub fn set_method(&mut self, method: CorrelationMethod) {
        if self.options.method != method {
            self.options.method = method;
            self.rebuild_figure();
        }
    }

    pub fn set_palette(&mut self, palette: ColorPalette) {
        if self.options.palette != palette {
            self.options.palette = palette;
            self.rebuild_figure();
        }
    }

    pub fn set_smooth_colors(&mut self, smooth: bool) {
        if self.options.smooth_colors != smooth {
            self.options.smooth_colors = smooth;
            self.rebuild_figure();
        }
    }

    /// Set the row identifier column; `None` falls back to the default.
    pub fn set_id_column(&mut self, column: Option<String>) {
        if self.options.id_column != column {
            self.options.id_column = column;
            self.rebuild_figure();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    const CSV: &str = "name,a,b,c\nx,1,2,9\ny,2,4,7\nz,3,5,8\nw,4,9,1\n";

    #[test]
    fn test_set_table_builds_figure_and_pairs() {
        let mut state = AppState::default();
        state.set_table(read_csv(CSV.as_bytes()).unwrap(), Some("t.csv".into()));
        assert!(state.figure.is_some());
        assert!(state.status_message.is_none());
        assert_eq!(state.pairs.len(), 3);

        state.exclude_dupe = false;
        state.refresh_pairs();
        assert_eq!(state.pairs.len(), 6);
    }

    #[test]
    fn test_method_change_rebuilds() {
        let mut state = AppState::default();
        state.set_table(read_csv(CSV.as_bytes()).unwrap(), None);
        state.set_method(CorrelationMethod::Kendall);
        let figure = state.figure.as_ref().unwrap();
        assert_eq!(figure.matrix.method, CorrelationMethod::Kendall);
    }

    #[test]
    fn test_option_change_keeps_selection() {
        let mut state = AppState::default();
        state.set_table(read_csv(CSV.as_bytes()).unwrap(), None);
        assert!(state.figure.as_mut().unwrap().select(2, 1));

        state.set_palette(ColorPalette::RdBu);
        state.set_smooth_colors(true);
        state.set_method(CorrelationMethod::Spearman);
        let figure = state.figure.as_ref().unwrap();
        assert_eq!(figure.selected(), (2, 1));
        assert_eq!(figure.scatter().title, "c vs b");

        // A table with other columns starts from the default cell.
        state.set_table(read_csv("k,p,q\nx,1,2\ny,2,1\nz,3,3\n".as_bytes()).unwrap(), None);
        assert_eq!(state.figure.as_ref().unwrap().selected(), (1, 0));
    }

    #[test]
    fn test_insufficient_columns_sets_status() {
        let mut state = AppState::default();
        state.set_table(read_csv("name,a\nx,1\ny,2\n".as_bytes()).unwrap(), None);
        assert!(state.figure.is_none());
        assert!(state.pairs.is_empty());
        let msg = state.status_message.unwrap();
        assert!(msg.contains("at least two numeric columns"));
    }
}
