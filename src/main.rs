use std::path::PathBuf;

use eframe::egui;
use lacerta::app::LacertaApp;
use lacerta::config::FigureOptions;
use lacerta::ui::panels;

fn main() -> eframe::Result {
    env_logger::init();

    let figure_options = FigureOptions::from_env().unwrap_or_else(|e| {
        log::error!("Ignoring figure options: {e:#}");
        FigureOptions::default()
    });
    let mut app = LacertaApp::new(figure_options);

    // Optional file to open on start.
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        panels::open_path(&mut app.state, &path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 950.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Lacerta – Correlation Heatmap",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
