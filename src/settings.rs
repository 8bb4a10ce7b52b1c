//! Player settings and preferences
//!
//! Persisted in LocalStorage on the web and in a JSON file on native builds.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tuning::{ArenaTuning, Difficulty, Tuning, TuningError};

/// Errors from loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings produce an invalid tuning: {0}")]
    Tuning(#[from] TuningError),
}

/// Which mini-game to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Fast three-lane runner
    #[default]
    Classic,
    /// Slower runner with difficulty selection
    Realms,
    /// Top-down arena shooter
    Arena,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Realms => "realms",
            GameMode::Arena => "arena",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "temple" => Some(GameMode::Classic),
            "realms" | "runner" => Some(GameMode::Realms),
            "arena" => Some(GameMode::Arena),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: GameMode,
    /// Only used by the realms runner
    pub difficulty: Difficulty,
    /// Fixed seed for reproducible runs; random when absent
    pub seed: Option<u64>,

    // === HUD ===
    pub show_hud: bool,

    // === Accessibility ===
    /// Reduced motion (minimize shake, flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            difficulty: Difficulty::Slow,
            seed: None,
            show_hud: true,
            reduced_motion: false,
        }
    }
}

/// Presentation preferences the page applies while drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayHints {
    pub show_hud: bool,
    pub reduced_motion: bool,
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "eclipse_realms_settings";

    /// Runner balance table for the selected mode
    pub fn tuning(&self) -> Result<Tuning, SettingsError> {
        let tuning = match self.mode {
            GameMode::Realms => Tuning::realms(self.difficulty),
            GameMode::Classic | GameMode::Arena => Tuning::classic(),
        };
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn arena_tuning(&self) -> Result<ArenaTuning, SettingsError> {
        let tuning = ArenaTuning::default();
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn display_hints(&self) -> DisplayHints {
        DisplayHints {
            show_hud: self.show_hud,
            reduced_motion: self.reduced_motion,
        }
    }

    /// Seed to start a run with. Falls back to `fallback` (usually a clock
    /// reading) when none is configured.
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(err) => log::warn!("Ignoring stored settings: {err}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(json) = serde_json::to_string(self)
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }
}
