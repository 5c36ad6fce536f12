//! Events emitted to analytics/marketing collaborators
//!
//! The core never interprets these; it only queues them in emission order.

use serde::Serialize;

use crate::wheel::SpinResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromoEvent {
    SpinStarted { spin_index: u8 },
    SpinCompleted { result: SpinResult },
    PrizeClaimed { code: String },
    PopupShown,
    PopupClosed,
}

impl PromoEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PromoEvent::SpinStarted { .. } => "spin_started",
            PromoEvent::SpinCompleted { .. } => "spin_completed",
            PromoEvent::PrizeClaimed { .. } => "prize_claimed",
            PromoEvent::PopupShown => "popup_shown",
            PromoEvent::PopupClosed => "popup_closed",
        }
    }
}

/// FIFO of events waiting for the host to collect
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<PromoEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: PromoEvent) {
        log::debug!("event: {}", event.name());
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<PromoEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
