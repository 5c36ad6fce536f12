//! Promotion configuration
//!
//! Supplied read-only by the host page as JSON. Every section has defaults, so
//! a partial document is enough.

use serde::{Deserialize, Serialize};

use crate::catalog::PrizeCatalog;
use crate::confetti::ConfettiConfig;
use crate::error::ConfigError;
use crate::popup::PopupConfig;
use crate::wheel::SpinTiming;

/// Everything the promotion reads from its host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoConfig {
    pub catalog: PrizeCatalog,
    pub timing: SpinTiming,
    pub popup: PopupConfig,
    pub confetti: ConfettiConfig,
    /// Enables force-show/reset/enable/disable
    pub diagnostics: bool,
}

impl Default for PromoConfig {
    fn default() -> Self {
        Self {
            catalog: PrizeCatalog::default(),
            timing: SpinTiming::default(),
            popup: PopupConfig::default(),
            confetti: ConfettiConfig::default(),
            diagnostics: cfg!(debug_assertions),
        }
    }
}

impl PromoConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog.validate()?;
        if self.timing.base_duration_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timing.base_duration_ms",
                reason: "must be positive",
            });
        }
        if self.popup.persistence_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "popup.persistence_key",
                reason: "must not be empty",
            });
        }
        let confetti = &self.confetti;
        let ranges = [
            confetti.min_speed,
            confetti.max_speed,
            confetti.min_life,
            confetti.max_life,
            confetti.min_size,
            confetti.max_size,
            confetti.gravity,
            confetti.upward_bias,
        ];
        if ranges.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "confetti",
                reason: "values must be finite",
            });
        }
        if !(confetti.drag > 0.0 && confetti.drag < 1.0) {
            return Err(ConfigError::Invalid {
                field: "confetti.drag",
                reason: "must be between 0 and 1",
            });
        }
        if confetti.min_life <= 0.0 || confetti.min_life > confetti.max_life {
            return Err(ConfigError::Invalid {
                field: "confetti.min_life",
                reason: "must be positive and at most max_life",
            });
        }
        if confetti.min_speed > confetti.max_speed || confetti.min_size > confetti.max_size {
            return Err(ConfigError::Invalid {
                field: "confetti",
                reason: "ranges must have min <= max",
            });
        }
        Ok(())
    }
}
