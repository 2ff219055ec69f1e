use eframe::egui;

use crate::config::FigureOptions;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct LacertaApp {
    pub state: AppState,
}

impl LacertaApp {
    pub fn new(options: FigureOptions) -> Self {
        Self {
            state: AppState::with_options(options),
        }
    }
}

impl eframe::App for LacertaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: options ----
        egui::SidePanel::left("options_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: correlations sorted by p-value ----
        if !self.state.pairs.is_empty() {
            egui::TopBottomPanel::bottom("pair_table")
                .resizable(true)
                .default_height(200.0)
                .show(ctx, |ui| {
                    table::pair_table(ui, &mut self.state);
                });
        }

        // ---- Central panel: heatmap + scatter ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.figure.as_mut() {
            Some(figure) => {
                egui::ScrollArea::both().show(ui, |ui| plot::heatmap_scatter(ui, figure));
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a file to view correlations  (File → Open…)");
                });
            }
        });
    }
}
