use eframe::egui;
use lis_curves::ViewerConfig;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LisCurvesApp {
    pub state: AppState,
    /// Texture of `state.rendered`, tagged with the render generation it shows.
    chart_texture: Option<(u64, egui::TextureHandle)>,
}

impl LisCurvesApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            state: AppState::new(config),
            chart_texture: None,
        }
    }

    /// Upload the current raster to the GPU when it changed.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let generation = self.state.render_generation;
        if self
            .chart_texture
            .as_ref()
            .is_some_and(|(shown, _)| *shown == generation)
        {
            return;
        }
        self.chart_texture = self.state.rendered.as_ref().map(|rendered| {
            let image = egui::ColorImage::from_rgb(
                [rendered.width() as usize, rendered.height() as usize],
                rendered.image.as_raw(),
            );
            let handle = ctx.load_texture("chart", image, egui::TextureOptions::LINEAR);
            (generation, handle)
        });
    }
}

impl eframe::App for LisCurvesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: curve controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: first rows of the loaded table ----
        egui::TopBottomPanel::bottom("preview_panel")
            .resizable(true)
            .default_height(160.0)
            .show(ctx, |ui| {
                table::preview_table(ui, &self.state);
            });

        self.sync_texture(ctx);

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_panel(ui, &mut self.state, self.chart_texture.as_ref().map(|(_, t)| t));
        });
    }
}
