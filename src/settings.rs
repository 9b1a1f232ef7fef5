//! Runtime settings
//!
//! Read once at start-up and never written back: from a JSON file on native,
//! from the `data-settings` attribute of `#app` in the browser.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::Tab;

/// Slowest and fastest allowed time scale
pub const MIN_SPEED: f32 = 0.25;
pub const MAX_SPEED: f32 = 4.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid setting: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed (otherwise seeded from the clock)
    pub seed: Option<u64>,
    /// Time scale applied to every simulation clock
    pub speed: f32,
    /// Whether streaming simulations start playing on mount
    pub stream_autoplay: bool,
    /// Tab shown at start-up
    pub start_tab: Tab,

    // === Accessibility ===
    /// Disable CSS transitions on animated items
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            speed: 1.0,
            stream_autoplay: true,
            start_tab: Tab::Concept,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse and validate settings. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&content)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.speed.is_finite() || !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            return Err(SettingsError::InvalidValue(format!(
                "speed {} outside {}..={}",
                self.speed, MIN_SPEED, MAX_SPEED
            )));
        }
        Ok(())
    }

    /// Scale real elapsed time into simulation time
    pub fn scale_elapsed(&self, elapsed_ms: f64) -> f64 {
        elapsed_ms * f64::from(self.speed)
    }

    /// Load settings from the page (WASM only). Falls back to defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .and_then(|el| el.get_attribute("data-settings"));

        match json.as_deref().map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from page");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring page settings: {}", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
