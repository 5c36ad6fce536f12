//! Promotion session
//!
//! Wires the popup gate, the wheel and the confetti burst together and drives
//! them from a single fixed-timestep loop:
//! - gate delay fires -> popup visible
//! - spin requested -> wheel timer runs -> result committed
//! - committed win -> confetti burst starts (after the commit, never before)

use crate::confetti::{Bounds, ConfettiSim};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::error::WheelError;
use crate::events::{EventQueue, PromoEvent};
use crate::persistence::LayeredFlag;
use crate::platform::{Key, PageHost};
use crate::popup::{GateStatus, PopupGate};
use crate::settings::PromoConfig;
use crate::wheel::{SpinState, SpinWheel};

/// One mounted promotion
#[derive(Debug)]
pub struct Promotion {
    gate: PopupGate,
    /// None when the configuration could not drive a wheel
    wheel: Option<SpinWheel>,
    confetti: Option<ConfettiSim>,
    config: PromoConfig,
    bounds: Bounds,
    accumulator: f32,
    seed: u64,
    bursts: u64,
    events: EventQueue,
    torn_down: bool,
}

impl Promotion {
    /// Mount a promotion. An invalid configuration leaves it mounted but inert.
    pub fn new(
        config: PromoConfig,
        flag: LayeredFlag,
        page: Box<dyn PageHost>,
        bounds: Bounds,
        seed: u64,
    ) -> Self {
        let wheel = config.validate().and_then(|()| {
            Ok(SpinWheel::new(
                config.catalog.clone(),
                config.timing.clone(),
                seed,
            )?)
        });
        let wheel = match wheel {
            Ok(wheel) => Some(wheel),
            Err(e) => {
                log::error!("Promotion disabled, invalid configuration: {}", e);
                None
            }
        };

        let mut popup = config.popup.clone();
        popup.enabled &= wheel.is_some();
        let gate = PopupGate::new(popup, flag, page).with_diagnostics(config.diagnostics);

        Self {
            gate,
            wheel,
            confetti: None,
            config,
            bounds,
            accumulator: 0.0,
            seed,
            bursts: 0,
            events: EventQueue::default(),
            torn_down: false,
        }
    }

    pub fn config(&self) -> &PromoConfig {
        &self.config
    }

    /// False when the configuration disabled the promotion
    pub fn is_available(&self) -> bool {
        self.wheel.is_some()
    }

    pub fn gate_status(&self) -> GateStatus {
        self.gate.status()
    }

    pub fn is_visible(&self) -> bool {
        self.gate.is_visible()
    }

    pub fn spin_state(&self) -> Option<&SpinState> {
        self.wheel.as_ref().map(|w| w.state())
    }

    pub fn wheel(&self) -> Option<&SpinWheel> {
        self.wheel.as_ref()
    }

    pub fn confetti(&self) -> Option<&ConfettiSim> {
        self.confetti.as_ref()
    }

    /// Rotation to draw this frame
    pub fn display_angle(&self) -> f32 {
        self.wheel.as_ref().map(|w| w.display_angle()).unwrap_or(0.0)
    }

    pub fn is_exhausted(&self) -> bool {
        self.wheel.as_ref().is_none_or(|w| w.is_exhausted())
    }

    /// Page finished loading: start the popup delay
    pub fn on_page_load(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.gate.arm()
    }

    /// Advance by a frame's worth of time using fixed substeps
    pub fn update(&mut self, frame_dt: f32) {
        if self.torn_down {
            return;
        }
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// One fixed step
    fn step(&mut self, dt: f32) {
        self.gate.advance(dt);
        self.collect_gate_events();

        let committed = self.wheel.as_mut().and_then(|w| w.advance(dt));
        self.collect_wheel_events();
        if let Some(result) = committed {
            if result.is_win() {
                self.start_confetti();
            }
        }

        if let Some(confetti) = self.confetti.as_mut() {
            if confetti.tick(dt) {
                log::debug!("Confetti done after {:.2}s", confetti.elapsed());
                self.confetti = None;
            }
        }
    }

    /// User pressed the spin button
    pub fn spin(&mut self) -> Result<u8, WheelError> {
        if self.torn_down || !self.gate.is_visible() {
            return Err(WheelError::Disabled);
        }
        let wheel = self.wheel.as_mut().ok_or(WheelError::Disabled)?;
        let spin_index = wheel.request_spin()?;
        self.collect_wheel_events();
        Ok(spin_index)
    }

    /// User claimed the prize shown on the result surface
    pub fn claim(&mut self) -> Option<String> {
        let code = self.wheel.as_mut()?.claim();
        self.collect_wheel_events();
        code
    }

    /// Close button
    pub fn close(&mut self) -> bool {
        let closed = self.gate.hide();
        self.collect_gate_events();
        closed
    }

    /// Escape closes; Enter spins
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Enter if self.gate.is_visible() => match self.spin() {
                Ok(_) => true,
                Err(e) => {
                    log::debug!("Spin key ignored: {}", e);
                    false
                }
            },
            _ => {
                let handled = self.gate.handle_key(key);
                self.collect_gate_events();
                handled
            }
        }
    }

    /// Viewport changed
    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = Bounds::new(width, height);
        if let Some(confetti) = self.confetti.as_mut() {
            confetti.resize(self.bounds);
        }
    }

    pub fn force_show(&mut self) -> bool {
        if self.torn_down || !self.is_available() {
            return false;
        }
        let shown = self.gate.force_show();
        self.collect_gate_events();
        shown
    }

    /// Clear persisted state, rewind the wheel and re-arm the gate
    pub fn reset(&mut self) -> bool {
        if self.torn_down || !self.gate.reset() {
            return false;
        }
        if let Some(wheel) = self.wheel.as_mut() {
            wheel.reset();
        }
        if let Some(mut confetti) = self.confetti.take() {
            confetti.cancel();
        }
        self.collect_gate_events();
        true
    }

    pub fn enable(&mut self) -> bool {
        // An invalid configuration stays disabled
        !self.torn_down && self.is_available() && self.gate.enable()
    }

    pub fn disable(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        let disabled = self.gate.disable();
        self.collect_gate_events();
        disabled
    }

    /// Unmount: cancel every timer and the confetti loop
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.gate.teardown();
        if let Some(wheel) = self.wheel.as_mut() {
            wheel.teardown();
        }
        if let Some(mut confetti) = self.confetti.take() {
            confetti.cancel();
        }
        self.accumulator = 0.0;
        self.torn_down = true;
        log::info!("Promotion torn down");
    }

    /// Timers still outstanding (zero after teardown)
    pub fn pending_timers(&self) -> usize {
        self.gate.pending_timers() + self.wheel.as_ref().map_or(0, |w| w.pending_timers())
    }

    pub fn drain_events(&mut self) -> Vec<PromoEvent> {
        self.events.drain()
    }

    fn start_confetti(&mut self) {
        if let Some(mut previous) = self.confetti.take() {
            previous.cancel();
        }
        self.bursts += 1;
        let seed = self.seed ^ self.bursts.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        self.confetti = Some(ConfettiSim::burst(
            self.config.confetti.clone(),
            self.bounds.center(),
            self.bounds,
            seed,
        ));
    }

    fn collect_gate_events(&mut self) {
        for event in self.gate.drain_events() {
            self.events.push(event);
        }
    }

    fn collect_wheel_events(&mut self) {
        if let Some(wheel) = self.wheel.as_mut() {
            for event in wheel.drain_events() {
                self.events.push(event);
            }
        }
    }
}
