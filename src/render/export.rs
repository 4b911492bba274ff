use std::io::Cursor;
use std::path::Path;

use image::RgbImage;

use super::raster::RenderedChart;
use crate::error::{Result, ViewerError};

/// Suggested file name offered by the save dialog.
pub const EXPORT_FILE_NAME: &str = "charge_discharge_curves.png";

const METERS_PER_INCH: f64 = 0.0254;

/// What a PNG declares about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngInfo {
    pub width: u32,
    pub height: u32,
    /// From the pHYs chunk, `None` when absent or unitless.
    pub dpi: Option<u32>,
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode the raster as PNG with its DPI recorded in a pHYs chunk. With
/// `tight` the white margin is cropped to a 0.1 in pad.
pub fn encode_png(chart: &RenderedChart, tight: bool) -> Result<Vec<u8>> {
    let cropped;
    let image = if tight {
        cropped = tight_crop(&chart.image, chart.dpi / 10);
        &cropped
    } else {
        &chart.image
    };

    let ppm = (chart.dpi as f64 / METERS_PER_INCH).round() as u32;
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder.write_header().map_err(export_error)?;
        writer.write_image_data(image.as_raw()).map_err(export_error)?;
        writer.finish().map_err(export_error)?;
    }
    log::info!(
        "encoded {}x{} PNG at {} dpi ({} bytes)",
        image.width(),
        image.height(),
        chart.dpi,
        out.len()
    );
    Ok(out)
}

/// Read back dimensions and DPI of an encoded PNG.
pub fn read_png_info(bytes: &[u8]) -> Result<PngInfo> {
    let reader = png::Decoder::new(Cursor::new(bytes))
        .read_info()
        .map_err(export_error)?;
    let info = reader.info();
    let dpi = info
        .pixel_dims
        .as_ref()
        .filter(|d| matches!(d.unit, png::Unit::Meter))
        .map(|d| (d.xppu as f64 * METERS_PER_INCH).round() as u32);
    Ok(PngInfo {
        width: info.width,
        height: info.height,
        dpi,
    })
}

pub fn save_png(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)?;
    log::info!("saved chart to {}", path.display());
    Ok(())
}

fn export_error(e: impl std::fmt::Display) -> ViewerError {
    ViewerError::Export(e.to_string())
}

// ---------------------------------------------------------------------------
// Tight bounding box
// ---------------------------------------------------------------------------

/// Crop to the bounding box of non-white pixels plus `pad` on each side.
/// An all-white image is returned unchanged.
pub fn tight_crop(image: &RgbImage, pad: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in image.enumerate_pixels() {
        if px.0 == [255, 255, 255] {
            continue;
        }
        bbox = Some(match bbox {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    let Some((x0, y0, x1, y1)) = bbox else {
        return image.clone();
    };
    let left = x0.saturating_sub(pad);
    let top = y0.saturating_sub(pad);
    let right = (x1 + 1 + pad).min(w);
    let bottom = (y1 + 1 + pad).min(h);
    image::imageops::crop_imm(image, left, top, right - left, bottom - top).to_image()
}
