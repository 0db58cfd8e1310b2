//! Game settings and preferences
//!
//! Persisted separately from deck progress in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::sim::session::SessionMode;

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Sentence progression mode
    pub mode: SessionMode,

    // === Study aids ===
    /// Show the translation line under revealed sentences
    pub show_translations: bool,
    /// Tap a revealed word to look it up
    pub word_lookup: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Narration/speech volume (0.0 - 1.0)
    pub speech_volume: f32,
    /// Background music on session start
    pub background_music: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: SessionMode::Paired,
            show_translations: true,
            word_lookup: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            speech_volume: 1.0,
            background_music: true,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Effective speech volume (master applied)
    pub fn effective_speech_volume(&self) -> f32 {
        (self.master_volume * self.speech_volume).clamp(0.0, 1.0)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "word_blast_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
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

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_speech_volume_clamped() {
        let settings = Settings {
            master_volume: 0.5,
            speech_volume: 1.0,
            ..Default::default()
        };
        assert_eq!(settings.effective_speech_volume(), 0.5);
    }

    #[test]
    fn test_settings_json_roundtrip() {
        let settings = Settings {
            mode: SessionMode::Single,
            show_translations: false,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mode, SessionMode::Single);
        assert!(!back.show_translations);
    }
}
