pub mod panels;
pub mod plot;
pub mod table;

use eframe::egui::Color32;
use lis_curves::color::Rgb;

pub fn to_color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}
