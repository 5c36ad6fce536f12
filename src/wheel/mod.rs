//! Spin wheel engine
//!
//! Pure and deterministic given a seed:
//! - Segment geometry derived from the catalog
//! - Scripted outcome table keyed by spin index
//! - Pure spin state transitions, driven by an owned timer list

pub mod controller;
pub mod outcome;
pub mod segment;
pub mod state;
pub mod timing;

pub use controller::SpinWheel;
pub use outcome::{MAX_SPINS, compute_target_angle, decide_outcome};
pub use segment::{WheelLayout, WheelSegment};
pub use state::{PendingSpin, SpinEvent, SpinResult, SpinState, transition};
pub use timing::{Easing, SpinTiming};
