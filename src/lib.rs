//! Spin Wheel - scripted spin-the-wheel promotion engine
//!
//! Core modules:
//! - `wheel`: Segment geometry, scripted outcomes, spin state machine
//! - `confetti`: Time-bounded particle burst for winning spins
//! - `popup`: Delayed, persisted, once-per-visitor display gate
//! - `persistence`: Layered flag storage (durable store + cookie)
//! - `platform`: Browser/native page abstraction
//! - `promo`: Session wiring driven by a fixed-timestep loop

pub mod catalog;
pub mod confetti;
pub mod error;
pub mod events;
pub mod persistence;
pub mod platform;
pub mod popup;
pub mod promo;
pub mod settings;
pub mod timer;
pub mod wheel;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::{Prize, PrizeCatalog};
pub use error::{ConfigError, StorageError, WheelError};
pub use events::PromoEvent;
pub use promo::Promotion;
pub use settings::PromoConfig;

/// Engine constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame accepted (tab switches produce huge gaps)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        let tiny = normalize_degrees(-1e-7);
        assert!((0.0..360.0).contains(&tiny));
    }
}
