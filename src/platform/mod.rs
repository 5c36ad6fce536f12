//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Background page scrolling (suspended while the popup is open)
//! - Keyboard input relevant to the popup

/// Keys the promotion reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            _ => Key::Other,
        }
    }
}

/// The page hosting the promotion
pub trait PageHost {
    /// Current `overflow` of the scrolling element
    fn scroll_overflow(&self) -> String;
    fn set_scroll_overflow(&mut self, value: &str);
}

/// Page without a DOM (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct HeadlessPage {
    overflow: String,
}

impl HeadlessPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overflow(overflow: &str) -> Self {
        Self {
            overflow: overflow.to_string(),
        }
    }

    pub fn overflow(&self) -> &str {
        &self.overflow
    }
}

impl PageHost for HeadlessPage {
    fn scroll_overflow(&self) -> String {
        self.overflow.clone()
    }

    fn set_scroll_overflow(&mut self, value: &str) {
        self.overflow = value.to_string();
    }
}

/// Suspends scrolling and remembers the exact value to put back
#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    saved: Option<String>,
}

impl ScrollLock {
    pub fn is_locked(&self) -> bool {
        self.saved.is_some()
    }

    pub fn lock(&mut self, page: &mut dyn PageHost) {
        if self.saved.is_none() {
            self.saved = Some(page.scroll_overflow());
            page.set_scroll_overflow("hidden");
        }
    }

    pub fn unlock(&mut self, page: &mut dyn PageHost) {
        if let Some(saved) = self.saved.take() {
            page.set_scroll_overflow(&saved);
        }
    }
}

/// `document.body.style.overflow`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentPage;

#[cfg(target_arch = "wasm32")]
impl PageHost for DocumentPage {
    fn scroll_overflow(&self) -> String {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .and_then(|b| b.style().get_property_value("overflow").ok())
            .unwrap_or_default()
    }

    fn set_scroll_overflow(&mut self, value: &str) {
        if let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        {
            if let Err(e) = body.style().set_property("overflow", value) {
                log::warn!("Failed to set body overflow: {:?}", e);
            }
        }
    }
}
