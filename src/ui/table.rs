use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Correlation pair table (bottom panel)
// ---------------------------------------------------------------------------

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "–".to_string()
    } else if v != 0.0 && v.abs() < 1e-3 {
        format!("{v:.3e}")
    } else {
        format!("{v:.4}")
    }
}

/// Render the pairs sorted by p-value.  Clicking a pair selects its cell.
pub fn pair_table(ui: &mut Ui, state: &mut AppState) {
    if state.pairs.is_empty() {
        ui.label("No correlations to show.");
        return;
    }

    let mut clicked: Option<(String, String)> = None;
    let pairs = &state.pairs;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["col1", "col2", "coef", "p_value", "n"] {
                header.col(|ui| {
                    ui.label(RichText::new(title).strong());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, pairs.len(), |mut row| {
                let pair = &pairs[row.index()];
                row.col(|ui| {
                    if ui.link(&pair.col1).clicked() {
                        clicked = Some((pair.col1.clone(), pair.col2.clone()));
                    }
                });
                row.col(|ui| {
                    if ui.link(&pair.col2).clicked() {
                        clicked = Some((pair.col1.clone(), pair.col2.clone()));
                    }
                });
                row.col(|ui| {
                    ui.monospace(format_value(pair.coef));
                });
                row.col(|ui| {
                    ui.monospace(format_value(pair.p_value));
                });
                row.col(|ui| {
                    ui.monospace(pair.n.to_string());
                });
            });
        });

    if let (Some((x, y)), Some(figure)) = (clicked, state.figure.as_mut()) {
        figure.select_pair(&x, &y);
    }
}
