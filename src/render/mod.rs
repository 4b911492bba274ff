//! Rendering: styled chart model → raster image → PNG.
//!
//! ```text
//!  GroupedCurves ──build_chart──▶ ChartModel ──rasterize──▶ RenderedChart ──encode_png──▶ bytes
//!                 (colour policy,                (plotters,
//!                  curve selection)               fixed DPI)
//! ```
pub mod export;
pub mod raster;

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::color::{curve_color, ColorPolicy, Rgb};
use crate::data::filter::Direction;
use crate::data::group::{CurvePoint, GroupedCurves};

pub use export::{encode_png, read_png_info, save_png, PngInfo, EXPORT_FILE_NAME};
pub use raster::{rasterize, RenderedChart};

pub const CHART_TITLE: &str = "Voltage vs Capacity";
pub const X_LABEL: &str = "SpeCap/mAh/g";
pub const Y_LABEL: &str = "Voltage/V";

/// Line opacity and width (points) for every curve.
pub const LINE_ALPHA: f64 = 0.8;
pub const LINE_WIDTH_PT: f64 = 1.5;

// ---------------------------------------------------------------------------
// Curve selection
// ---------------------------------------------------------------------------

/// Which curve sets are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurveSelection {
    #[default]
    Both,
    ChargeOnly,
    DischargeOnly,
}

impl CurveSelection {
    pub const ALL: [CurveSelection; 3] = [
        CurveSelection::Both,
        CurveSelection::ChargeOnly,
        CurveSelection::DischargeOnly,
    ];

    pub fn includes(self, direction: Direction) -> bool {
        match self {
            CurveSelection::Both => true,
            CurveSelection::ChargeOnly => direction == Direction::Charge,
            CurveSelection::DischargeOnly => direction == Direction::Discharge,
        }
    }
}

impl fmt::Display for CurveSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveSelection::Both => write!(f, "Charge & discharge"),
            CurveSelection::ChargeOnly => write!(f, "Charge only"),
            CurveSelection::DischargeOnly => write!(f, "Discharge only"),
        }
    }
}

// ---------------------------------------------------------------------------
// Render settings
// ---------------------------------------------------------------------------

/// Physical figure size and resolution of the raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width_in: 10.0,
            height_in: 6.0,
            dpi: 300,
        }
    }
}

impl RenderSettings {
    /// Raster size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.width_in * dpi).round().max(1.0) as u32,
            (self.height_in * dpi).round().max(1.0) as u32,
        )
    }

    /// Pixels per typographic point.
    pub fn px_per_pt(&self) -> f64 {
        self.dpi as f64 / 72.0
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.width_in > 0.0 && self.height_in > 0.0) {
            return Err(format!(
                "figure size must be positive, got {}x{} in",
                self.width_in, self.height_in
            ));
        }
        if self.dpi == 0 {
            return Err("dpi must be positive".to_string());
        }
        let (w, h) = self.pixel_size();
        if w > 16_384 || h > 16_384 {
            return Err(format!("raster of {w}x{h} px is too large"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Chart model
// ---------------------------------------------------------------------------

/// One line on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledCurve {
    pub direction: Direction,
    pub cycle: i64,
    pub color: Rgb,
    pub points: Vec<CurvePoint>,
}

impl StyledCurve {
    /// Runs of finite points, drawn as separate polylines.
    pub fn segments(&self) -> impl Iterator<Item = &[CurvePoint]> {
        self.points
            .split(|p| !p.is_finite())
            .filter(|run| !run.is_empty())
    }
}

/// Everything needed to draw the chart, independent of the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    /// Draw order: charge then discharge, each by ascending cycle.
    pub curves: Vec<StyledCurve>,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
}

impl ChartModel {
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn count(&self, direction: Direction) -> usize {
        self.curves.iter().filter(|c| c.direction == direction).count()
    }
}

/// Colour and select curves. The grouped data is not touched, so switching
/// selection or policy only rebuilds this model.
pub fn build_chart(curves: &GroupedCurves, policy: ColorPolicy, selection: CurveSelection) -> ChartModel {
    let styled: Vec<StyledCurve> = Direction::ALL
        .into_iter()
        .filter(|&d| selection.includes(d))
        .flat_map(|d| {
            let dir = curves.get(d);
            dir.groups.iter().filter_map(move |g| {
                let range = dir.cycle_range?;
                Some(StyledCurve {
                    direction: d,
                    cycle: g.cycle,
                    color: curve_color(policy, d, g.cycle, range),
                    points: g.points.clone(),
                })
            })
        })
        .collect();

    let (x_range, y_range) = bounds(&styled);
    ChartModel {
        curves: styled,
        x_range,
        y_range,
    }
}

/// Data bounds of the finite points with 5% padding; `0..1` on an empty axis.
fn bounds(curves: &[StyledCurve]) -> (Range<f64>, Range<f64>) {
    let finite = curves
        .iter()
        .flat_map(|c| c.points.iter())
        .filter(|p| p.is_finite());

    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for p in finite {
        x = (x.0.min(p.capacity), x.1.max(p.capacity));
        y = (y.0.min(p.voltage), y.1.max(p.voltage));
    }
    (padded(x), padded(y))
}

fn padded((lo, hi): (f64, f64)) -> Range<f64> {
    if lo > hi {
        return 0.0..1.0;
    }
    let span = hi - lo;
    if span <= f64::EPSILON * hi.abs().max(1.0) {
        return (lo - 0.5)..(hi + 0.5);
    }
    let pad = span * 0.05;
    (lo - pad)..(hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::group::{CycleGroup, DirectionCurves};

    fn direction(direction: Direction, cycles: &[i64]) -> DirectionCurves {
        let groups: Vec<CycleGroup> = cycles
            .iter()
            .map(|&cycle| CycleGroup {
                direction,
                cycle,
                points: vec![
                    CurvePoint { capacity: 0.0, voltage: 2.0 },
                    CurvePoint { capacity: 100.0 * cycle as f64, voltage: 2.4 },
                ],
                indices: vec![0, 1],
            })
            .collect();
        DirectionCurves {
            direction,
            cycle_range: cycles.first().map(|&lo| (lo, *cycles.last().unwrap_or(&lo))),
            groups,
            skipped: 0,
        }
    }

    fn both() -> GroupedCurves {
        GroupedCurves {
            charge: direction(Direction::Charge, &[1, 2, 3]),
            discharge: direction(Direction::Discharge, &[1, 2]),
        }
    }

    #[test]
    fn selection_filters_directions() {
        let curves = both();
        let all = build_chart(&curves, ColorPolicy::Gradient, CurveSelection::Both);
        assert_eq!(all.curves.len(), 5);

        let charge = build_chart(&curves, ColorPolicy::Gradient, CurveSelection::ChargeOnly);
        assert_eq!(charge.count(Direction::Charge), 3);
        assert_eq!(charge.count(Direction::Discharge), 0);

        let discharge = build_chart(&curves, ColorPolicy::Gradient, CurveSelection::DischargeOnly);
        assert_eq!(discharge.count(Direction::Charge), 0);
        assert_eq!(discharge.count(Direction::Discharge), 2);
    }

    #[test]
    fn draw_order_is_charge_then_discharge_by_cycle() {
        let chart = build_chart(&both(), ColorPolicy::Fixed, CurveSelection::Both);
        let order: Vec<(Direction, i64)> = chart.curves.iter().map(|c| (c.direction, c.cycle)).collect();
        assert_eq!(
            order,
            vec![
                (Direction::Charge, 1),
                (Direction::Charge, 2),
                (Direction::Charge, 3),
                (Direction::Discharge, 1),
                (Direction::Discharge, 2),
            ]
        );
    }

    #[test]
    fn bounds_are_padded() {
        let chart = build_chart(&both(), ColorPolicy::Gradient, CurveSelection::Both);
        assert!(chart.x_range.start < 0.0 && chart.x_range.end > 300.0);
        assert!(chart.y_range.start < 2.0 && chart.y_range.end > 2.4);
    }

    #[test]
    fn empty_chart_has_default_bounds() {
        let empty = GroupedCurves {
            charge: DirectionCurves::empty(Direction::Charge),
            discharge: DirectionCurves::empty(Direction::Discharge),
        };
        let chart = build_chart(&empty, ColorPolicy::Gradient, CurveSelection::Both);
        assert!(chart.is_empty());
        assert_eq!(chart.x_range, 0.0..1.0);
        assert_eq!(chart.y_range, 0.0..1.0);
    }

    #[test]
    fn pixel_size_follows_dpi() {
        let settings = RenderSettings::default();
        assert_eq!(settings.pixel_size(), (3000, 1800));
        let small = RenderSettings { dpi: 50, ..settings };
        assert_eq!(small.pixel_size(), (500, 300));
    }

    #[test]
    fn zero_dpi_is_rejected() {
        let settings = RenderSettings {
            dpi: 0,
            ..RenderSettings::default()
        };
        assert!(settings.validate().is_err());
    }
    #[test]
    fn non_finite_points_split_a_curve() {
        let pt = |capacity, voltage| CurvePoint { capacity, voltage };
        let curve = StyledCurve {
            direction: Direction::Discharge,
            cycle: 1,
            color: Rgb::new(0, 0, 0),
            points: vec![
                pt(f64::NAN, 2.4),
                pt(0.0, 2.4),
                pt(10.0, 2.3),
                pt(20.0, f64::NAN),
                pt(30.0, 2.1),
            ],
        };
        let runs: Vec<usize> = curve.segments().map(<[CurvePoint]>::len).collect();
        assert_eq!(runs, vec![2, 1]);
    }
}
