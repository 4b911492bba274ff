use std::borrow::Cow;
use std::error::Error;
use std::sync::OnceLock;

use eframe::egui;
use image::RgbImage;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use super::{ChartModel, RenderSettings, CHART_TITLE, LINE_ALPHA, LINE_WIDTH_PT, X_LABEL, Y_LABEL};
use crate::error::{Result, ViewerError};

const FONT_FAMILY: &str = "sans-serif";

// ---------------------------------------------------------------------------
// Rendered raster
// ---------------------------------------------------------------------------

/// In-memory RGB raster of a chart and the DPI it was drawn at.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub image: RgbImage,
    pub dpi: u32,
}

impl RenderedChart {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

// ---------------------------------------------------------------------------
// Font
// ---------------------------------------------------------------------------

/// plotters draws text with whatever font is registered under [`FONT_FAMILY`];
/// we hand it egui's bundled proportional font so no system fonts are needed.
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            let bytes = bundled_font().ok_or("egui ships no proportional font")?;
            register_font(FONT_FAMILY, FontStyle::Normal, bytes)
                .map_err(|_| "egui proportional font could not be parsed".to_string())
        })
        .clone()
        .map_err(ViewerError::Render)
}

fn bundled_font() -> Option<&'static [u8]> {
    let defs = egui::FontDefinitions::default();
    let name = defs.families.get(&egui::FontFamily::Proportional)?.first()?;
    let data = defs.font_data.get(name)?;
    Some(match &data.font {
        Cow::Borrowed(bytes) => *bytes,
        // registered once per process
        Cow::Owned(bytes) => &*Box::leak(bytes.clone().into_boxed_slice()),
    })
}

// ---------------------------------------------------------------------------
// Rasterisation
// ---------------------------------------------------------------------------

/// Draw `chart` into a fresh raster sized by `settings`. An empty chart
/// yields axes and title only.
pub fn rasterize(chart: &ChartModel, settings: &RenderSettings) -> Result<RenderedChart> {
    settings.validate().map_err(ViewerError::Config)?;
    ensure_font()?;

    let (width, height) = settings.pixel_size();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    draw(chart, settings, &mut buffer, (width, height))
        .map_err(|e| ViewerError::Render(e.to_string()))?;

    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ViewerError::Render("raster buffer does not match its size".to_string()))?;
    log::debug!(
        "rasterized {} curves into {width}x{height} px at {} dpi",
        chart.curves.len(),
        settings.dpi
    );
    Ok(RenderedChart {
        image,
        dpi: settings.dpi,
    })
}

fn draw(
    chart: &ChartModel,
    settings: &RenderSettings,
    buffer: &mut [u8],
    size: (u32, u32),
) -> std::result::Result<(), Box<dyn Error>> {
    let px = settings.px_per_pt();
    let scaled = |pt: f64| (pt * px).round().max(1.0) as u32;
    let font = |pt: f64| (FONT_FAMILY, pt * px).into_font();

    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(CHART_TITLE, font(14.0))
        .margin(scaled(10.0))
        .x_label_area_size(scaled(36.0))
        .y_label_area_size(scaled(48.0))
        .build_cartesian_2d(chart.x_range.clone(), chart.y_range.clone())?;

    // Axes sit in the label areas (left and bottom); no top or right frame.
    ctx.configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .axis_desc_style(font(12.0))
        .label_style(font(10.0))
        .axis_style(BLACK.stroke_width(scaled(0.8)))
        .bold_line_style(BLACK.mix(0.12).stroke_width(scaled(0.5)))
        .light_line_style(WHITE.mix(0.0))
        .draw()?;

    let line_width = scaled(LINE_WIDTH_PT);
    for curve in &chart.curves {
        let style = RGBAColor(curve.color.r, curve.color.g, curve.color.b, LINE_ALPHA).stroke_width(line_width);
        for segment in curve.segments() {
            ctx.draw_series(LineSeries::new(
                segment.iter().map(|p| (p.capacity, p.voltage)),
                style,
            ))?;
        }
    }

    root.present()?;
    Ok(())
}
