//! Spin timing policy
//!
//! Duration depends only on the spin index. The final spin runs 1.5x
//! longer than the first for suspense.

use serde::{Deserialize, Serialize};

/// Multiplier applied to the base duration for the final spin
pub const FINAL_SPIN_DURATION_FACTOR: f32 = 1.5;

/// Easing curve for the wheel rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    /// Cubic ease-out: fast start, long glide into the pointer
    #[default]
    EaseOut,
    /// CSS-style cubic-bezier(x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseOut => "ease-out",
            Easing::CubicBezier(..) => "cubic-bezier",
        }
    }

    /// Map linear progress `t` in [0, 1] to eased progress
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                let s = solve_bezier_x(t, x1, x2);
                bezier(s, y1, y2)
            }
        }
    }
}

/// One coordinate of a cubic bezier anchored at 0 and 1
#[inline]
fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

#[inline]
fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`
fn solve_bezier_x(x: f32, x1: f32, x2: f32) -> f32 {
    // Newton first; fall back to bisection where the slope flattens out.
    let mut s = x;
    for _ in 0..8 {
        let err = bezier(s, x1, x2) - x;
        if err.abs() < 1e-5 {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s = (s - err / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = x;
    for _ in 0..32 {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < 1e-5 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

/// Timing parameters supplied by configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTiming {
    /// Duration of the first spin
    pub base_duration_ms: u32,
    pub easing: Easing,
    /// Minimum full turns before landing
    pub base_revolutions: u32,
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self {
            base_duration_ms: 4000,
            easing: Easing::CubicBezier(0.17, 0.67, 0.12, 0.99),
            base_revolutions: 5,
        }
    }
}

impl SpinTiming {
    /// Spin duration in milliseconds for a spin index
    pub fn duration_ms(&self, spin_index: u8) -> u32 {
        if spin_index >= 2 {
            (self.base_duration_ms as f32 * FINAL_SPIN_DURATION_FACTOR).round() as u32
        } else {
            self.base_duration_ms
        }
    }

    /// Spin duration in seconds
    pub fn duration_secs(&self, spin_index: u8) -> f32 {
        self.duration_ms(spin_index) as f32 / 1000.0
    }
}
