//! Deterministic display colours for robots.
//!
//! Hue is stepped by the golden-ratio conjugate per robot id; saturation and
//! value are fixed.

use std::fmt;

use crate::RobotId;

/// Golden-ratio conjugate, the hue step between consecutive robot ids.
const HUE_STEP: f64 = 0.618_033_988_749_895;

const SATURATION: f64 = 0.65;
const VALUE: f64 = 0.90;

/// An sRGB colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RobotColor {
    /// The colour for `robot`.  Pure function of the id.
    pub fn for_robot(robot: RobotId) -> Self {
        let hue = (robot.0 as f64 * HUE_STEP).fract();
        hsv_to_rgb(hue, SATURATION, VALUE)
    }

    /// `#rrggbb` form, as consumed by most GUI toolkits.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RobotColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// `h`, `s`, `v` all in `[0, 1]`.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> RobotColor {
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    let to_byte = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    RobotColor { r: to_byte(r), g: to_byte(g), b: to_byte(b) }
}
