//! Persisted deck progress
//!
//! Exactly one integer survives across sessions: the sentence-deck cursor.
//! Stored in LocalStorage under a fixed key; anything missing, unparseable
//! or out of range comes back as 0.

use serde::{Deserialize, Serialize};

use crate::sim::session::ProgressStore;

/// Deck cursor persistence
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeckProgress {
    pub cursor: usize,
}

impl DeckProgress {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "word_blast_progress";

    /// Load the cursor from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(progress) = serde_json::from_str::<DeckProgress>(&json) {
                    log::info!("Loaded deck cursor: {}", progress.cursor);
                    return progress;
                }
            }
        }

        log::info!("No saved progress, starting at the top of the deck");
        Self::default()
    }

    /// Save the cursor to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn persist(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn persist(&self) {
        // No-op for native
    }
}

impl ProgressStore for DeckProgress {
    fn load(&mut self) -> usize {
        self.cursor
    }

    fn save(&mut self, cursor: usize) {
        self.cursor = cursor;
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_roundtrip_in_memory() {
        let mut progress = DeckProgress::default();
        assert_eq!(ProgressStore::load(&mut progress), 0);
        progress.save(5);
        assert_eq!(ProgressStore::load(&mut progress), 5);
        // Idempotent
        progress.save(5);
        assert_eq!(progress.cursor, 5);
    }
}
