//! Scripted outcomes
//!
//! The wheel looks random but the business result is fixed by spin index:
//! spin 1 always misses, spin 2 always lands the grand prize. Randomness only
//! decorates the landing (sub-segment jitter, extra revolution, which loser).

use rand::Rng;

use super::segment::WheelLayout;
use crate::catalog::{Prize, PrizeCatalog};
use crate::error::WheelError;

/// Number of spins a session allows
pub const MAX_SPINS: u8 = 2;

/// Jitter range around the segment center, as a fraction of the segment angle
pub const JITTER_FRACTION: f32 = 0.15;

/// Deltas this close to zero count as already aligned
const ALIGNED_EPSILON: f32 = 1e-3;

/// Extra full turns added on top of the base revolutions for the final spin
pub const FINAL_SPIN_EXTRA_REVOLUTIONS: u32 = 3;

/// Pick the scripted prize for a spin
pub fn decide_outcome<'a, R: Rng>(
    catalog: &'a PrizeCatalog,
    spin_index: u8,
    rng: &mut R,
) -> Result<&'a Prize, WheelError> {
    match spin_index {
        1 => {
            let losers: Vec<&Prize> = catalog.losers().collect();
            match losers.len() {
                0 => Err(WheelError::NoLosingPrize),
                1 => Ok(losers[0]),
                n => Ok(losers[rng.random_range(0..n)]),
            }
        }
        2 => catalog.grand_prize().ok_or(WheelError::NoWinningPrize),
        attempted => Err(WheelError::SpinsExhausted { attempted }),
    }
}

/// Absolute rotation that lands `prize` under the pointer
///
/// The result is always strictly greater than `current_angle`.
pub fn compute_target_angle<R: Rng>(
    layout: &WheelLayout,
    prize: &Prize,
    spin_index: u8,
    current_angle: f32,
    base_revolutions: u32,
    rng: &mut R,
) -> Result<f32, WheelError> {
    let segment = layout.segment_for(&prize.id)?;
    let base = segment.pointer_angle();

    match spin_index {
        1 => {
            let max_jitter = layout.segment_angle() * JITTER_FRACTION;
            let jitter = rng.random_range(-max_jitter..=max_jitter);
            let revolutions = base_revolutions + rng.random_range(0..=1u32);
            Ok(base + jitter + revolutions as f32 * 360.0)
        }
        2 => {
            let from = current_angle.rem_euclid(360.0);
            let to = base.rem_euclid(360.0);
            let mut delta = to - from;
            if delta <= ALIGNED_EPSILON {
                delta += 360.0;
            }
            let extra = (base_revolutions + FINAL_SPIN_EXTRA_REVOLUTIONS) as f32 * 360.0;
            Ok(current_angle + delta + extra)
        }
        attempted => Err(WheelError::SpinsExhausted { attempted }),
    }
}
