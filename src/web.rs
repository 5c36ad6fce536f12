//! JavaScript bindings
//!
//! The host page owns the render loop and calls `update` from
//! `requestAnimationFrame`; everything else maps one DOM event to one call.

use wasm_bindgen::prelude::*;

use crate::confetti::Bounds;
use crate::persistence::default_layers;
use crate::platform::{DocumentPage, Key};
use crate::promo::Promotion;
use crate::settings::PromoConfig;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
    }
    log::info!("Spin wheel module loaded");
}

#[wasm_bindgen]
pub struct WebPromotion {
    inner: Promotion,
}

#[wasm_bindgen]
impl WebPromotion {
    /// Mount from a JSON configuration (empty string for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, width: f32, height: f32) -> Result<WebPromotion, JsValue> {
        let config = if config_json.trim().is_empty() {
            PromoConfig::default()
        } else {
            PromoConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let flag = default_layers(&config.popup.persistence_key);
        let seed = js_sys::Date::now() as u64;
        Ok(Self {
            inner: Promotion::new(
                config,
                flag,
                Box::new(DocumentPage),
                Bounds::new(width, height),
                seed,
            ),
        })
    }

    pub fn on_page_load(&mut self) -> bool {
        self.inner.on_page_load()
    }

    /// Frame delta in seconds
    pub fn update(&mut self, dt: f32) {
        self.inner.update(dt);
    }

    pub fn spin(&mut self) -> Result<u8, JsValue> {
        self.inner
            .spin()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn claim(&mut self) -> Option<String> {
        self.inner.claim()
    }

    pub fn close(&mut self) -> bool {
        self.inner.close()
    }

    /// `KeyboardEvent.key`
    pub fn key_down(&mut self, key: &str) -> bool {
        self.inner.handle_key(Key::from_dom(key))
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.inner.resize(width, height);
    }

    pub fn is_visible(&self) -> bool {
        self.inner.is_visible()
    }

    pub fn display_angle(&self) -> f32 {
        self.inner.display_angle()
    }

    /// Flattened particles: x, y, rotation, size, opacity, color per particle
    pub fn confetti(&self) -> Vec<f32> {
        self.inner
            .confetti()
            .map(|c| {
                c.particles()
                    .iter()
                    .flat_map(|p| {
                        [p.pos.x, p.pos.y, p.rotation, p.size, p.opacity, p.color as f32]
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pending events as a JSON array
    pub fn drain_events(&mut self) -> String {
        serde_json::to_string(&self.inner.drain_events()).unwrap_or_else(|e| {
            log::warn!("Failed to encode events: {}", e);
            "[]".to_string()
        })
    }

    pub fn force_show(&mut self) -> bool {
        self.inner.force_show()
    }

    pub fn reset(&mut self) -> bool {
        self.inner.reset()
    }

    pub fn enable(&mut self) -> bool {
        self.inner.enable()
    }

    pub fn disable(&mut self) -> bool {
        self.inner.disable()
    }

    pub fn teardown(&mut self) {
        self.inner.teardown();
    }
}
