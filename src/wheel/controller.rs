//! Spin wheel widget
//!
//! Thin adapter around the pure state machine: picks the scripted outcome,
//! schedules the spin timer, commits the result when it fires and exposes the
//! eased display angle for renderers.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::outcome::{compute_target_angle, decide_outcome};
use super::segment::WheelLayout;
use super::state::{SpinEvent, SpinResult, SpinState, transition};
use super::timing::SpinTiming;
use crate::catalog::PrizeCatalog;
use crate::error::WheelError;
use crate::events::{EventQueue, PromoEvent};
use crate::timer::{TimerHandle, Timers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WheelTimer {
    SpinComplete,
}

/// One mounted wheel
#[derive(Debug)]
pub struct SpinWheel {
    catalog: PrizeCatalog,
    layout: WheelLayout,
    timing: SpinTiming,
    state: SpinState,
    rng: Pcg32,
    timers: Timers<WheelTimer>,
    spin_timer: Option<TimerHandle>,
    /// Whether the current result's code has been handed out
    claimed: bool,
    events: EventQueue,
}

impl SpinWheel {
    /// Mount a wheel. Fails if the catalog cannot drive both scripted spins.
    pub fn new(catalog: PrizeCatalog, timing: SpinTiming, seed: u64) -> Result<Self, WheelError> {
        catalog.validate()?;
        let layout = WheelLayout::compute(&catalog)?;
        log::debug!(
            "Wheel mounted: {} segments of {:.2}°",
            layout.segments().len(),
            layout.segment_angle()
        );

        Ok(Self {
            catalog,
            layout,
            timing,
            state: SpinState::default(),
            rng: Pcg32::seed_from_u64(seed),
            timers: Timers::new(),
            spin_timer: None,
            claimed: false,
            events: EventQueue::default(),
        })
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn layout(&self) -> &WheelLayout {
        &self.layout
    }

    pub fn catalog(&self) -> &PrizeCatalog {
        &self.catalog
    }

    pub fn timing(&self) -> &SpinTiming {
        &self.timing
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }

    /// Start the next scripted spin. Returns its index (1 or 2).
    ///
    /// Rejected without any state change while a spin is in flight or once both
    /// spins are used.
    pub fn request_spin(&mut self) -> Result<u8, WheelError> {
        let spin_index = self.state.check_can_spin()?;

        let prize = decide_outcome(&self.catalog, spin_index, &mut self.rng)?.clone();
        let target_angle = compute_target_angle(
            &self.layout,
            &prize,
            spin_index,
            self.state.current_angle,
            self.timing.base_revolutions,
            &mut self.rng,
        )
        .inspect_err(|e| log::error!("Spin {} aborted: {}", spin_index, e))?;
        let duration_ms = self.timing.duration_ms(spin_index);

        self.state = transition(
            &self.state,
            SpinEvent::Start {
                prize,
                target_angle,
                duration_ms,
            },
        )?;
        self.spin_timer = Some(self.timers.schedule(duration_ms, WheelTimer::SpinComplete));
        self.claimed = false;

        log::info!(
            "Spin {} started: {:.1}° -> {:.1}° over {}ms",
            spin_index,
            self.state.current_angle,
            target_angle,
            duration_ms
        );
        self.events.push(PromoEvent::SpinStarted { spin_index });
        Ok(spin_index)
    }

    /// Advance the spin clock. Returns the result if a spin committed this step.
    pub fn advance(&mut self, dt: f32) -> Option<SpinResult> {
        let mut committed = None;
        for (handle, timer) in self.timers.advance(dt) {
            match timer {
                WheelTimer::SpinComplete if Some(handle) == self.spin_timer => {
                    self.spin_timer = None;
                    match transition(&self.state, SpinEvent::Complete) {
                        Ok(next) => self.state = next,
                        Err(e) => {
                            log::warn!("Spin timer fired without a spin: {}", e);
                            continue;
                        }
                    }
                    if let Some(result) = self.state.result.clone() {
                        log::info!(
                            "Spin {} landed on `{}` at {:.1}° ({} turns)",
                            self.state.spin_count,
                            result.prize.id,
                            result.final_angle,
                            result.revolutions
                        );
                        self.events.push(PromoEvent::SpinCompleted {
                            result: result.clone(),
                        });
                        committed = Some(result);
                    }
                }
                WheelTimer::SpinComplete => {}
            }
        }
        committed
    }

    /// Rotation to draw right now (eased while spinning)
    pub fn display_angle(&self) -> f32 {
        match (&self.state.pending, self.spin_timer) {
            (Some(pending), Some(handle)) => {
                let t = self.timers.progress(handle).unwrap_or(1.0);
                let eased = self.timing.easing.apply(t);
                pending.from_angle + (pending.target_angle - pending.from_angle) * eased
            }
            _ => self.state.current_angle,
        }
    }

    /// Hand out the redemption code of a committed winning result, once
    pub fn claim(&mut self) -> Option<String> {
        if self.state.is_spinning || self.claimed {
            return None;
        }
        let result = self.state.result.as_ref().filter(|r| r.is_win())?;
        let code = result.prize.code.clone();
        self.claimed = true;
        log::info!("Prize `{}` claimed", result.prize.id);
        self.events.push(PromoEvent::PrizeClaimed { code: code.clone() });
        Some(code)
    }

    /// Cancel any pending spin and return to the freshly mounted state
    pub fn reset(&mut self) {
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            log::debug!("Wheel reset cancelled {} timer(s)", cancelled);
        }
        self.spin_timer = None;
        self.claimed = false;
        self.state = SpinState::default();
    }

    /// Unmount: nothing scheduled by this wheel may fire afterwards
    pub fn teardown(&mut self) {
        self.reset();
        self.events.drain();
    }

    pub fn drain_events(&mut self) -> Vec<PromoEvent> {
        self.events.drain()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn wheel() -> SpinWheel {
        SpinWheel::new(PrizeCatalog::default(), SpinTiming::default(), 42).unwrap()
    }

    fn run_for(wheel: &mut SpinWheel, secs: f32) -> Option<SpinResult> {
        let steps = (secs / SIM_DT).ceil() as usize + 1;
        let mut result = None;
        for _ in 0..steps {
            if let Some(r) = wheel.advance(SIM_DT) {
                result = Some(r);
            }
        }
        result
    }

    #[test]
    fn test_invalid_catalog_refuses_to_mount() {
        let err = SpinWheel::new(PrizeCatalog::new(vec![]), SpinTiming::default(), 1).unwrap_err();
        assert_eq!(err, WheelError::EmptyCatalog);
    }

    #[test]
    fn test_full_session() {
        let mut wheel = wheel();
        assert_eq!(wheel.request_spin(), Ok(1));
        assert_eq!(wheel.request_spin(), Err(WheelError::SpinInProgress));

        let first = run_for(&mut wheel, 4.0).expect("first spin commits");
        assert_eq!(first.prize.id, "try_again");
        assert!(!wheel.state().show_confetti);
        assert_eq!(wheel.claim(), None);

        assert_eq!(wheel.request_spin(), Ok(2));
        assert!(run_for(&mut wheel, 4.0).is_none(), "final spin runs longer");
        let second = run_for(&mut wheel, 2.0).expect("second spin commits");
        assert_eq!(second.prize.id, "discount_50");
        assert!(second.final_angle > first.final_angle);
        assert!(wheel.state().show_confetti);
        assert!(wheel.is_exhausted());

        assert_eq!(wheel.claim(), Some("SPIN50".to_string()));
        assert_eq!(wheel.claim(), None);
        assert_eq!(
            wheel.request_spin(),
            Err(WheelError::SpinsExhausted { attempted: 3 })
        );

        let names: Vec<&str> = wheel.drain_events().iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec![
                "spin_started",
                "spin_completed",
                "spin_started",
                "spin_completed",
                "prize_claimed"
            ]
        );
    }

    #[test]
    fn test_display_angle_eases_toward_target() {
        let mut wheel = wheel();
        wheel.request_spin().unwrap();
        let target = wheel.state().pending.as_ref().unwrap().target_angle;
        assert_eq!(wheel.display_angle(), 0.0);

        wheel.advance(1.0);
        let mid = wheel.display_angle();
        assert!(mid > 0.0 && mid < target);

        run_for(&mut wheel, 3.0);
        assert_eq!(wheel.display_angle(), target);
        assert_eq!(wheel.state().current_angle, target);
    }

    #[test]
    fn test_teardown_cancels_spin() {
        let mut wheel = wheel();
        wheel.request_spin().unwrap();
        wheel.teardown();
        assert_eq!(wheel.pending_timers(), 0);
        assert!(run_for(&mut wheel, 10.0).is_none());
        assert_eq!(wheel.state(), &SpinState::default());
        assert!(wheel.drain_events().is_empty());
    }

    #[test]
    fn test_same_seed_same_landing() {
        let mut a = wheel();
        let mut b = wheel();
        a.request_spin().unwrap();
        b.request_spin().unwrap();
        let ra = run_for(&mut a, 5.0).unwrap();
        let rb = run_for(&mut b, 5.0).unwrap();
        assert_eq!(ra.final_angle, rb.final_angle);
    }
}
