//! Popup display gate
//!
//! Decides whether and when the promotion appears:
//! - After a delay on page load, unless it was already shown
//! - "Already shown" survives reloads through a layered persisted flag
//! - While visible, Escape closes it and page scrolling is suspended

use serde::{Deserialize, Serialize};

use crate::events::{EventQueue, PromoEvent};
use crate::persistence::LayeredFlag;
use crate::platform::{Key, PageHost, ScrollLock};
use crate::timer::{TimerHandle, Timers};

/// Popup parameters supplied by configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    pub enabled: bool,
    /// Delay after page load before showing
    pub delay_ms: u32,
    /// Persist the shown flag so reloads don't show it again
    pub show_only_once: bool,
    /// Key for the durable store and cookie name
    pub persistence_key: String,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 3000,
            show_only_once: true,
            persistence_key: "spin_wheel_popup_shown".to_string(),
        }
    }
}

/// Observable gate status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Disabled,
    /// Not armed, or suppressed because it was already shown
    Idle,
    /// Delay timer running
    Waiting,
    Visible,
    /// Shown and closed this session
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateTimer {
    Delay,
}

pub struct PopupGate {
    config: PopupConfig,
    flag: LayeredFlag,
    page: Box<dyn PageHost>,
    scroll: ScrollLock,
    timers: Timers<GateTimer>,
    delay_timer: Option<TimerHandle>,
    visible: bool,
    shown_this_session: bool,
    enabled: bool,
    /// Allows force-show/reset/enable/disable
    diagnostics: bool,
    events: EventQueue,
}

impl std::fmt::Debug for PopupGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopupGate")
            .field("status", &self.status())
            .field("flag", &self.flag)
            .finish()
    }
}

impl PopupGate {
    pub fn new(config: PopupConfig, flag: LayeredFlag, page: Box<dyn PageHost>) -> Self {
        let enabled = config.enabled;
        Self {
            config,
            flag,
            page,
            scroll: ScrollLock::default(),
            timers: Timers::new(),
            delay_timer: None,
            visible: false,
            shown_this_session: false,
            enabled,
            diagnostics: false,
            events: EventQueue::default(),
        }
    }

    /// Allow the diagnostic operations (keep off in production)
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn config(&self) -> &PopupConfig {
        &self.config
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn has_shown_this_session(&self) -> bool {
        self.shown_this_session
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn status(&self) -> GateStatus {
        if !self.enabled {
            GateStatus::Disabled
        } else if self.visible {
            GateStatus::Visible
        } else if self.delay_timer.is_some() {
            GateStatus::Waiting
        } else if self.shown_this_session {
            GateStatus::Closed
        } else {
            GateStatus::Idle
        }
    }

    /// Shown this session, or persisted from an earlier one
    pub fn already_shown(&self) -> bool {
        self.shown_this_session || (self.config.show_only_once && self.flag.is_set())
    }

    /// Page load: start the delay unless the popup is off or already shown.
    /// Returns true if the timer was started.
    pub fn arm(&mut self) -> bool {
        if !self.enabled || self.visible || self.delay_timer.is_some() {
            return false;
        }
        if self.already_shown() {
            log::info!("Popup already shown, not scheduling");
            return false;
        }
        self.delay_timer = Some(self.timers.schedule(self.config.delay_ms, GateTimer::Delay));
        log::debug!("Popup scheduled in {}ms", self.config.delay_ms);
        true
    }

    /// Advance the delay timer; shows the popup when it elapses
    pub fn advance(&mut self, dt: f32) {
        for (handle, timer) in self.timers.advance(dt) {
            if timer == GateTimer::Delay && Some(handle) == self.delay_timer {
                self.delay_timer = None;
                self.show();
            }
        }
    }

    /// Show unless disabled, visible or already shown. Returns true if shown.
    pub fn show(&mut self) -> bool {
        if !self.enabled || self.visible || self.already_shown() {
            return false;
        }
        self.cancel_delay();

        // Persist before reporting shown so a re-entrant check sees it
        if self.config.show_only_once {
            let written = self.flag.set();
            if written == 0 {
                log::warn!("Popup flag could not be persisted; it may show again");
            }
        }
        self.shown_this_session = true;
        self.open();
        true
    }

    /// Close the popup. Returns true if it was visible.
    pub fn hide(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.visible = false;
        self.scroll.unlock(self.page.as_mut());
        log::info!("Popup closed");
        self.events.push(PromoEvent::PopupClosed);
        true
    }

    /// Keyboard input while the popup is up. Returns true if consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        self.visible && key == Key::Escape && self.hide()
    }

    /// Show regardless of gating and persistence
    pub fn force_show(&mut self) -> bool {
        if !self.diagnostics_allowed("force_show") || self.visible {
            return false;
        }
        self.cancel_delay();
        self.open();
        true
    }

    /// Forget everything and re-arm as on a first visit
    pub fn reset(&mut self) -> bool {
        if !self.diagnostics_allowed("reset") {
            return false;
        }
        self.hide();
        self.cancel_delay();
        let cleared = self.flag.clear();
        log::info!("Popup reset ({} backend(s) cleared)", cleared);
        self.shown_this_session = false;
        self.arm();
        true
    }

    pub fn enable(&mut self) -> bool {
        if !self.diagnostics_allowed("enable") {
            return false;
        }
        self.enabled = true;
        true
    }

    pub fn disable(&mut self) -> bool {
        if !self.diagnostics_allowed("disable") {
            return false;
        }
        self.hide();
        self.cancel_delay();
        self.enabled = false;
        true
    }

    /// Unmount: cancel the delay and give scrolling back
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.delay_timer = None;
        self.scroll.unlock(self.page.as_mut());
        self.visible = false;
    }

    pub fn drain_events(&mut self) -> Vec<PromoEvent> {
        self.events.drain()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }

    fn open(&mut self) {
        self.visible = true;
        self.scroll.lock(self.page.as_mut());
        log::info!("Popup shown");
        self.events.push(PromoEvent::PopupShown);
    }

    fn cancel_delay(&mut self) {
        if let Some(handle) = self.delay_timer.take() {
            self.timers.cancel(handle);
        }
    }

    fn diagnostics_allowed(&self, op: &str) -> bool {
        if !self.diagnostics {
            log::warn!("Popup {} ignored: diagnostics are disabled", op);
        }
        self.diagnostics
    }
}
