//! Interactive correlation heatmap with click-to-reveal scatter plots.
//!
//! ```no_run
//! use lacerta::config::FigureOptions;
//! use lacerta::data::loader::load_file;
//! use lacerta::figure::render_heatmap_scatter;
//!
//! # fn main() -> anyhow::Result<()> {
//! let table = load_file(std::path::Path::new("data.csv"))?;
//! let mut figure = render_heatmap_scatter(&table, &FigureOptions::default())?;
//! // Inside an egui frame:
//! // lacerta::ui::plot::heatmap_scatter(ui, &mut figure);
//! # let _ = &mut figure;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod figure;
pub mod heatmap;
pub mod scatter;
pub mod state;
pub mod stats;
pub mod ui;
