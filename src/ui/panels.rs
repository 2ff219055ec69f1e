use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::ColorPalette;
use crate::state::AppState;
use crate::stats::correlation::CorrelationMethod;

// ---------------------------------------------------------------------------
// Left side panel – figure options
// ---------------------------------------------------------------------------

/// Render the left options panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Options");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Correlation method ----
            ui.strong("Method");
            let current = state.options.method;
            egui::ComboBox::from_id_salt("method")
                .selected_text(current.name())
                .show_ui(ui, |ui: &mut Ui| {
                    for method in CorrelationMethod::ALL {
                        if ui.selectable_label(current == method, method.name()).clicked() {
                            state.set_method(method);
                        }
                    }
                });
            ui.add_space(4.0);

            // ---- Palette ----
            ui.strong("Palette");
            let current = state.options.palette;
            egui::ComboBox::from_id_salt("palette")
                .selected_text(current.name())
                .show_ui(ui, |ui: &mut Ui| {
                    for palette in ColorPalette::ALL {
                        if ui.selectable_label(current == palette, palette.name()).clicked() {
                            state.set_palette(palette);
                        }
                    }
                });
            let mut smooth = state.options.smooth_colors;
            if ui.checkbox(&mut smooth, "Smooth colours").changed() {
                state.set_smooth_colors(smooth);
            }
            ui.separator();

            let Some(table) = &state.table else {
                ui.label("No table loaded.");
                return;
            };

            // ---- Row identifier for scatter tooltips ----
            ui.strong("Row label");
            let columns = table.column_names.clone();
            let current = state.options.id_column.clone();
            let shown = current.clone().unwrap_or_else(|| "(automatic)".to_string());
            egui::ComboBox::from_id_salt("id_column")
                .selected_text(shown)
                .show_ui(ui, |ui: &mut Ui| {
                    if ui.selectable_label(current.is_none(), "(automatic)").clicked() {
                        state.set_id_column(None);
                    }
                    for col in &columns {
                        let is_current = current.as_deref() == Some(col.as_str());
                        if ui.selectable_label(is_current, col).clicked() {
                            state.set_id_column(Some(col.clone()));
                        }
                    }
                });
            ui.separator();

            // ---- Pair table filters ----
            ui.strong("Correlation table");
            let mut changed = ui.checkbox(&mut state.exclude_self, "Hide self pairs").changed();
            changed |= ui
                .checkbox(&mut state.exclude_dupe, "Hide mirrored pairs")
                .changed();
            if changed {
                state.refresh_pairs();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading {
            ui.spinner();
        }

        if let Some(table) = &state.table {
            let name = state.source_name.as_deref().unwrap_or("table");
            let numeric = state.figure.as_ref().map_or(0, |f| f.heatmap.size());
            ui.label(format!(
                "{name}: {} rows, {} columns ({numeric} numeric)",
                table.len(),
                table.column_names.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        open_path(state, &path);
    }
}

/// Load a file into the state, reporting failures in the status bar.
pub fn open_path(state: &mut AppState, path: &std::path::Path) {
    state.loading = true;
    match crate::data::loader::load_file(path) {
        Ok(table) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());
            state.set_table(table, name);
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
            state.loading = false;
        }
    }
}
