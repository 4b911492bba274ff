use eframe::egui::{self, load::SizedTexture, Color32, TextureHandle, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use lis_curves::render::{ChartModel, LINE_ALPHA, X_LABEL, Y_LABEL};

use crate::state::{AppState, ChartView};

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Render the chart in the central panel, either as the exported raster or
/// as a pan/zoom plot of the same curves.
pub fn chart_panel(ui: &mut Ui, state: &mut AppState, texture: Option<&TextureHandle>) {
    let Some(loaded) = state.session.loaded() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view curves  (File → Open…)");
        });
        return;
    };
    let mut view = state.view;
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut view, ChartView::Image, "Image");
        ui.selectable_value(&mut view, ChartView::Interactive, "Interactive");
    });
    ui.separator();

    match view {
        ChartView::Image => match texture {
            Some(tex) => {
                egui::ScrollArea::both().show(ui, |ui: &mut Ui| {
                    ui.add(
                        egui::Image::from_texture(SizedTexture::from_handle(tex)).shrink_to_fit(),
                    );
                });
            }
            None => {
                ui.label("Chart could not be rendered.");
            }
        },
        ChartView::Interactive => interactive_plot(ui, &loaded.chart),
    }

    state.view = view;
}

fn interactive_plot(ui: &mut Ui, chart: &ChartModel) {
    let alpha = (LINE_ALPHA * 255.0).round() as u8;

    Plot::new("curve_plot")
        .legend(Legend::default())
        .x_axis_label(X_LABEL)
        .y_axis_label(Y_LABEL)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for curve in &chart.curves {
                let name = format!("{} cycle {}", curve.direction, curve.cycle);
                let color =
                    Color32::from_rgba_unmultiplied(curve.color.r, curve.color.g, curve.color.b, alpha);

                for segment in curve.segments() {
                    let points: PlotPoints = segment.iter().map(|p| [p.capacity, p.voltage]).collect();
                    plot_ui.line(Line::new(points).name(&name).color(color).width(1.5));
                }
            }
        });
}
