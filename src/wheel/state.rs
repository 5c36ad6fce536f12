//! Spin state machine
//!
//! `transition` is pure: it takes the current state and an event and returns the
//! next state, or rejects the event without touching anything. Scheduling and
//! visuals live in the controller.

use serde::{Deserialize, Serialize};

use super::outcome::MAX_SPINS;
use crate::catalog::Prize;
use crate::error::WheelError;

/// Immutable record of one finished spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    pub prize: Prize,
    /// Absolute resting angle (degrees)
    pub final_angle: f32,
    /// floor(final_angle / 360)
    pub revolutions: u32,
    pub duration_ms: u32,
}

impl SpinResult {
    pub fn new(prize: Prize, final_angle: f32, duration_ms: u32) -> Self {
        Self {
            prize,
            final_angle,
            revolutions: (final_angle / 360.0).floor().max(0.0) as u32,
            duration_ms,
        }
    }

    pub fn is_win(&self) -> bool {
        self.prize.is_winning
    }
}

/// A spin that has started but not yet committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSpin {
    pub spin_index: u8,
    pub from_angle: f32,
    pub target_angle: f32,
    pub prize: Prize,
    pub duration_ms: u32,
}

/// Mutable per-widget state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinState {
    pub is_spinning: bool,
    /// Spins started this session (0, 1 or 2)
    pub spin_count: u8,
    /// Absolute resting angle, never decreases
    pub current_angle: f32,
    pub result: Option<SpinResult>,
    pub show_confetti: bool,
    pub show_congratulations: bool,
    /// In-flight spin, committed on `SpinEvent::Complete`
    pub pending: Option<PendingSpin>,
}

impl SpinState {
    /// Index of the next spin, or None when the session is exhausted
    pub fn next_spin_index(&self) -> Option<u8> {
        (self.spin_count < MAX_SPINS).then_some(self.spin_count + 1)
    }

    pub fn is_exhausted(&self) -> bool {
        self.spin_count >= MAX_SPINS && !self.is_spinning
    }

    /// Check a new spin may start right now
    pub fn check_can_spin(&self) -> Result<u8, WheelError> {
        if self.is_spinning {
            return Err(WheelError::SpinInProgress);
        }
        self.next_spin_index()
            .ok_or(WheelError::SpinsExhausted {
                attempted: self.spin_count + 1,
            })
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum SpinEvent {
    Start {
        prize: Prize,
        target_angle: f32,
        duration_ms: u32,
    },
    Complete,
    Reset,
}

/// Apply one event to a spin state
pub fn transition(state: &SpinState, event: SpinEvent) -> Result<SpinState, WheelError> {
    match event {
        SpinEvent::Start {
            prize,
            target_angle,
            duration_ms,
        } => {
            let spin_index = state.check_can_spin()?;
            Ok(SpinState {
                is_spinning: true,
                spin_count: spin_index,
                show_confetti: false,
                show_congratulations: false,
                pending: Some(PendingSpin {
                    spin_index,
                    from_angle: state.current_angle,
                    target_angle,
                    prize,
                    duration_ms,
                }),
                ..state.clone()
            })
        }
        SpinEvent::Complete => {
            let pending = state.pending.as_ref().ok_or(WheelError::NotSpinning)?;
            let result = SpinResult::new(
                pending.prize.clone(),
                pending.target_angle,
                pending.duration_ms,
            );
            Ok(SpinState {
                is_spinning: false,
                spin_count: state.spin_count,
                current_angle: pending.target_angle,
                show_confetti: result.is_win(),
                show_congratulations: result.is_win(),
                result: Some(result),
                pending: None,
            })
        }
        SpinEvent::Reset => Ok(SpinState::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(prize: &Prize, target_angle: f32) -> SpinEvent {
        SpinEvent::Start {
            prize: prize.clone(),
            target_angle,
            duration_ms: 4000,
        }
    }

    #[test]
    fn test_start_then_complete_commits_together() {
        let lose = Prize::new("lose", "l", 0.0, "", false);
        let state = SpinState::default();

        let spinning = transition(&state, start(&lose, 1980.0)).unwrap();
        assert!(spinning.is_spinning);
        assert_eq!(spinning.spin_count, 1);
        assert_eq!(spinning.current_angle, 0.0);
        assert!(spinning.result.is_none());

        let done = transition(&spinning, SpinEvent::Complete).unwrap();
        assert!(!done.is_spinning);
        assert_eq!(done.current_angle, 1980.0);
        let result = done.result.as_ref().unwrap();
        assert_eq!(result.revolutions, 5);
        assert!(!done.show_confetti);
        assert!(!done.show_congratulations);
        assert!(done.pending.is_none());
    }

    #[test]
    fn test_win_sets_flags() {
        let win = Prize::new("win", "w", 50.0, "W50", true);
        let state = SpinState {
            spin_count: 1,
            current_angle: 1980.0,
            ..Default::default()
        };
        let spinning = transition(&state, start(&win, 5000.0)).unwrap();
        let pending = spinning.pending.as_ref().unwrap();
        assert_eq!(pending.spin_index, 2);
        assert_eq!(pending.from_angle, 1980.0);

        let done = transition(&spinning, SpinEvent::Complete).unwrap();
        assert!(done.show_confetti);
        assert!(done.show_congratulations);
        assert!(done.is_exhausted());
    }

    #[test]
    fn test_rejections_leave_state_alone() {
        let lose = Prize::new("lose", "l", 0.0, "", false);
        let spinning = transition(&SpinState::default(), start(&lose, 720.0)).unwrap();
        assert_eq!(
            transition(&spinning, start(&lose, 900.0)),
            Err(WheelError::SpinInProgress)
        );

        let exhausted = SpinState {
            spin_count: 2,
            ..Default::default()
        };
        assert_eq!(
            transition(&exhausted, start(&lose, 900.0)),
            Err(WheelError::SpinsExhausted { attempted: 3 })
        );
        assert_eq!(
            transition(&SpinState::default(), SpinEvent::Complete),
            Err(WheelError::NotSpinning)
        );
    }

    #[test]
    fn test_reset() {
        let state = SpinState {
            spin_count: 2,
            current_angle: 4000.0,
            show_confetti: true,
            ..Default::default()
        };
        assert_eq!(transition(&state, SpinEvent::Reset).unwrap(), SpinState::default());
    }
}
