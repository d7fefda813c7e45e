//! Player preferences and host configuration
//!
//! Persisted in LocalStorage on the web; the play shell can also hand over a
//! JSON document when it mounts the game.

use serde::{Deserialize, Serialize};

use crate::consts::GAME_CODE;
use crate::score::DEFAULT_SCORE_ENDPOINT;

/// Keyboard layout, values are `KeyboardEvent.key` strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: String,
    pub right: String,
    /// Start, restart and fire
    pub confirm: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: "a".to_string(),
            right: "d".to_string(),
            confirm: " ".to_string(),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bindings: KeyBindings,

    // === Visual Effects ===
    /// Background star particles
    pub starfield: bool,

    // === Hub ===
    /// Submit the final score when a run ends
    pub report_scores: bool,
    /// Score submission endpoint
    pub score_endpoint: String,
    /// Game code used for submissions
    pub game_code: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bindings: KeyBindings::default(),
            starfield: true,
            report_scores: true,
            score_endpoint: DEFAULT_SCORE_ENDPOINT.to_string(),
            game_code: GAME_CODE.to_string(),
        }
    }
}

impl Settings {
    /// Parse host-provided settings, missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// LocalStorage key
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "invaders_settings";

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(target_arch = "wasm32")]
impl Settings {
    /// Stored preferences, or defaults when missing or unreadable
    pub fn load() -> Self {
        let stored = local_storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
        match stored.map(|json| Self::from_json(&json)) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Persist for the next mount
    pub fn save(&self) {
        let Some(storage) = local_storage() else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(STORAGE_KEY, &json).is_err() {
                    log::warn!("LocalStorage refused settings");
                }
            }
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }
}

/// Nothing is stored natively
#[cfg(not(target_arch = "wasm32"))]
impl Settings {
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.bindings.left, "a");
        assert_eq!(settings.bindings.right, "d");
        assert_eq!(settings.bindings.confirm, " ");
        assert_eq!(settings.game_code, "INVADERS");
        assert_eq!(settings.score_endpoint, "/api/game/score");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{"starfield": false, "bindings": {"confirm": "Enter"}}"#)
                .unwrap();
        assert!(!settings.starfield);
        assert_eq!(settings.bindings.confirm, "Enter");
        assert_eq!(settings.bindings.left, "a");
        assert!(settings.report_scores);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Settings::from_json("{not json").is_err());
    }
}
