use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, pos2, vec2};
use egui_plot::{GridInput, GridMark, Plot, PlotPoints, Points, Polygon, VPlacement};

use crate::color::ColorMapper;
use crate::figure::HeatmapScatter;

// ---------------------------------------------------------------------------
// Heatmap + scatter (central panel)
// ---------------------------------------------------------------------------

/// Render the heatmap, its colour bar and the linked scatter side by side.
pub fn heatmap_scatter(ui: &mut Ui, figure: &mut HeatmapScatter) {
    ui.horizontal_top(|ui: &mut Ui| {
        let bar_height = figure.options.hm_height.min(ui.available_height());
        heatmap_plot(ui, figure);
        color_bar(ui, &figure.mapper, bar_height);
        ui.add_space(8.0);
        scatter_plot(ui, figure);
    });
}

/// One grid mark per integer coordinate, so axis labels land on cell centers.
fn unit_marks(input: GridInput) -> Vec<GridMark> {
    let (lo, hi) = input.bounds;
    let first = lo.ceil() as i64;
    let last = hi.floor() as i64;
    (first..=last)
        .map(|v| GridMark {
            value: v as f64,
            step_size: 1.0,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

fn heatmap_plot(ui: &mut Ui, figure: &mut HeatmapScatter) {
    let heatmap = &figure.heatmap;
    let n = heatmap.size() as f64;
    let (sel_row, sel_col) = figure.selected();
    let highlight = ui.visuals().strong_text_color();

    let response = Plot::new("correlation_heatmap")
        .width(figure.options.hm_width.min(ui.available_width() * 0.6))
        .height(figure.options.hm_height.min(ui.available_height()))
        .data_aspect(1.0)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .include_x(-0.5)
        .include_x(n - 0.5)
        .include_y(-0.5)
        .include_y(n - 0.5)
        .x_axis_position(VPlacement::Top)
        .x_grid_spacer(unit_marks)
        .y_grid_spacer(unit_marks)
        .x_axis_formatter(|mark, _range| {
            heatmap.x_tick_label(mark.value).unwrap_or_default().to_string()
        })
        .y_axis_formatter(|mark, _range| {
            heatmap.y_tick_label(mark.value).unwrap_or_default().to_string()
        })
        .label_formatter(|_name, _value| String::new())
        .show(ui, |plot_ui| {
            for cell in &heatmap.cells {
                let corners = heatmap.corners(cell.row, cell.col).to_vec();
                let mut polygon = Polygon::new(PlotPoints::from(corners))
                    .fill_color(cell.color)
                    .stroke(Stroke::NONE);
                if (cell.row, cell.col) == (sel_row, sel_col) {
                    polygon = polygon.stroke(Stroke::new(2.0, highlight));
                }
                plot_ui.polygon(polygon);
            }
            plot_ui.pointer_coordinate()
        });

    let Some(pointer) = response.inner else {
        return;
    };
    let point = [pointer.x, pointer.y];
    if response.response.clicked() {
        figure.click(point);
    }
    if let Some(text) = figure.heatmap_hover_text(point) {
        let _ = response.response.on_hover_text_at_pointer(text);
    }
}

// ---------------------------------------------------------------------------
// Colour bar
// ---------------------------------------------------------------------------

fn color_bar(ui: &mut Ui, mapper: &ColorMapper, height: f32) {
    const STEPS: usize = 110;
    const TICKS: usize = 10;

    let (rect, _) = ui.allocate_exact_size(vec2(56.0, height), Sense::hover());
    let bar = Rect::from_min_size(
        rect.min + vec2(6.0, 12.0),
        vec2(14.0, (height - 24.0).max(10.0)),
    );
    let painter = ui.painter_at(rect);
    let span = mapper.high - mapper.low;

    // Top of the bar is the high end of the scale.
    for i in 0..STEPS {
        let y0 = bar.top() + bar.height() * i as f32 / STEPS as f32;
        let y1 = bar.top() + bar.height() * (i + 1) as f32 / STEPS as f32;
        let value = mapper.high - span * (i as f64 + 0.5) / STEPS as f64;
        painter.rect_filled(
            Rect::from_min_max(pos2(bar.left(), y0), pos2(bar.right(), y1 + 0.5)),
            0.0,
            mapper.color_for(value),
        );
    }

    let text_color = ui.visuals().text_color();
    for k in 0..=TICKS {
        let y = bar.top() + bar.height() * k as f32 / TICKS as f32;
        let value = mapper.high - span * k as f64 / TICKS as f64;
        painter.text(
            pos2(bar.right() + 4.0, y),
            Align2::LEFT_CENTER,
            format!("{value:.1}"),
            FontId::proportional(10.0),
            text_color,
        );
    }
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

fn scatter_plot(ui: &mut Ui, figure: &HeatmapScatter) {
    let scatter = figure.scatter();
    let options = &figure.options;
    let color = ColorMapper::with_alpha(Color32::from_rgb(0x1f, 0x77, 0xb4), options.marker_alpha);

    ui.vertical(|ui: &mut Ui| {
        ui.label(egui::RichText::new(&scatter.title).strong());
        // Keyed by selection so a new column pair starts from auto bounds.
        Plot::new(("correlation_scatter", figure.selected()))
            .width(options.scatter_width.min(ui.available_width()))
            .height(options.scatter_height().min(ui.available_height()))
            .x_axis_label(scatter.x_label.clone())
            .y_axis_label(scatter.y_label.clone())
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .label_formatter(|_name, value| figure.scatter_hover_text([value.x, value.y]))
            .show(ui, |plot_ui| {
                let points = Points::new(PlotPoints::from(scatter.finite_points()))
                    .radius(options.marker_radius)
                    .color(color)
                    .filled(true);
                plot_ui.points(points);
            });
    });
}
