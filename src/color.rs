use serde::{Deserialize, Serialize};

use crate::data::filter::Direction;
use crate::data::group::DirectionCurves;

// ---------------------------------------------------------------------------
// Rgb – renderer-neutral colour
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

impl From<colorous::Color> for Rgb {
    fn from(c: colorous::Color) -> Self {
        Rgb::new(c.r, c.g, c.b)
    }
}

/// Charge colour under [`ColorPolicy::Fixed`].
pub const FIXED_CHARGE: Rgb = Rgb::new(214, 39, 40);
/// Discharge colour under [`ColorPolicy::Fixed`].
pub const FIXED_DISCHARGE: Rgb = Rgb::new(31, 119, 180);

// ---------------------------------------------------------------------------
// Colour policy
// ---------------------------------------------------------------------------

/// How a curve's colour is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorPolicy {
    /// Palette per direction, sampled at the cycle's position within the
    /// direction's cycle range.
    #[default]
    Gradient,
    /// One colour per direction regardless of cycle.
    Fixed,
}

impl ColorPolicy {
    pub const ALL: [ColorPolicy; 2] = [ColorPolicy::Gradient, ColorPolicy::Fixed];

    pub fn label(self) -> &'static str {
        match self {
            ColorPolicy::Gradient => "Gradient by cycle",
            ColorPolicy::Fixed => "Fixed per direction",
        }
    }
}

/// Palette used for a direction under [`ColorPolicy::Gradient`].
pub fn palette(direction: Direction) -> colorous::Gradient {
    match direction {
        Direction::Charge => colorous::PLASMA,
        Direction::Discharge => colorous::VIRIDIS,
    }
}

/// Position of `cycle` in `[min, max]` rescaled to `[0, 1]`; a single-cycle
/// range maps to 0.5.
pub fn normalized_position(cycle: i64, (min, max): (i64, i64)) -> f64 {
    if max == min {
        0.5
    } else {
        (cycle as f64 - min as f64) / (max as f64 - min as f64)
    }
}

/// Colour of the curve for `cycle` in `direction`.
pub fn curve_color(policy: ColorPolicy, direction: Direction, cycle: i64, range: (i64, i64)) -> Rgb {
    match policy {
        ColorPolicy::Gradient => {
            let t = normalized_position(cycle, range).clamp(0.0, 1.0);
            palette(direction).eval_continuous(t).into()
        }
        ColorPolicy::Fixed => match direction {
            Direction::Charge => FIXED_CHARGE,
            Direction::Discharge => FIXED_DISCHARGE,
        },
    }
}

/// Legend entries (label → colour) for the UI: first and last cycle of the
/// direction, or a single entry under the fixed policy.
pub fn legend_entries(curves: &DirectionCurves, policy: ColorPolicy) -> Vec<(String, Rgb)> {
    let Some(range @ (lo, hi)) = curves.cycle_range else {
        return Vec::new();
    };
    let direction = curves.direction;
    match policy {
        ColorPolicy::Fixed => vec![(
            format!("{direction} (cycles {lo}–{hi})"),
            curve_color(policy, direction, lo, range),
        )],
        ColorPolicy::Gradient if lo == hi => vec![(
            format!("{direction} cycle {lo}"),
            curve_color(policy, direction, lo, range),
        )],
        ColorPolicy::Gradient => vec![
            (format!("{direction} cycle {lo}"), curve_color(policy, direction, lo, range)),
            (format!("{direction} cycle {hi}"), curve_color(policy, direction, hi, range)),
        ],
    }
}
