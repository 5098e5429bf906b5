//! Player preferences
//!
//! Persisted in the key-value store, separate from tuning.

use serde::{Deserialize, Serialize};

use crate::persistence::{GameStore, KeyValueStore, StorageError};

/// Audio preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Background music
    pub music_enabled: bool,
    /// Sound effects
    pub sfx_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_enabled: true,
            sfx_enabled: true,
        }
    }
}

impl Settings {
    /// Load settings; unreadable keys fall back to enabled
    pub fn load<S: KeyValueStore>(store: &GameStore<S>) -> Self {
        let settings = Self {
            music_enabled: store.get_music_enabled(),
            sfx_enabled: store.get_sfx_enabled(),
        };
        log::info!(
            "Loaded settings (music: {}, sfx: {})",
            settings.music_enabled,
            settings.sfx_enabled
        );
        settings
    }

    /// Write both toggles
    pub fn save<S: KeyValueStore>(&self, store: &mut GameStore<S>) -> Result<(), StorageError> {
        store.set_music_enabled(self.music_enabled)?;
        store.set_sfx_enabled(self.sfx_enabled)?;
        log::info!("Settings saved");
        Ok(())
    }
}
