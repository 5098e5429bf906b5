//! Key-value persistence
//!
//! Backends:
//! - [`MemoryStore`]: in-process map (tests, ephemeral runs)
//! - [`JsonFileStore`]: JSON file on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! [`GameStore`] layers the typed game keys on top of any backend. Reads never
//! fail outward: a backend error is logged and treated as a missing key.

use thiserror::Error;

mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;
mod memory;

pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;
pub use memory::MemoryStore;

/// Storage keys
pub mod keys {
    pub const HIGH_SCORE: &str = "high_score";
    pub const GAMES_PLAYED: &str = "games_played";
    pub const MUSIC_ENABLED: &str = "music_enabled";
    pub const SFX_ENABLED: &str = "sfx_enabled";
}

/// Backend failure
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Backend missing or refusing access
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Opaque string key-value backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Typed accessors for the game's persisted values.
///
/// Missing keys default to `0` for counters and `true` for toggles.
#[derive(Debug, Clone, Default)]
pub struct GameStore<S> {
    inner: S,
}

impl<S: KeyValueStore> GameStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.inner.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read '{key}', using default: {e}");
                None
            }
        }
    }

    fn read_counter(&self, key: &str) -> u64 {
        let Some(raw) = self.read(key) else {
            return 0;
        };
        raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed value for '{key}': {raw:?}");
            0
        })
    }

    fn read_toggle(&self, key: &str) -> bool {
        self.read(key).map(|v| v == "true").unwrap_or(true)
    }

    pub fn get_high_score(&self) -> u64 {
        self.read_counter(keys::HIGH_SCORE)
    }

    pub fn set_high_score(&mut self, score: u64) -> Result<(), StorageError> {
        self.inner.set(keys::HIGH_SCORE, &score.to_string())
    }

    pub fn get_games_played(&self) -> u64 {
        self.read_counter(keys::GAMES_PLAYED)
    }

    /// Bump the games-played counter and return the new count.
    ///
    /// A failed write is logged; the incremented value is still returned.
    pub fn increment_games_played(&mut self) -> u64 {
        let count = self.get_games_played() + 1;
        if let Err(e) = self.inner.set(keys::GAMES_PLAYED, &count.to_string()) {
            log::warn!("Failed to persist games played: {e}");
        }
        count
    }

    pub fn get_music_enabled(&self) -> bool {
        self.read_toggle(keys::MUSIC_ENABLED)
    }

    pub fn set_music_enabled(&mut self, enabled: bool) -> Result<(), StorageError> {
        self.inner.set(keys::MUSIC_ENABLED, &enabled.to_string())
    }

    pub fn get_sfx_enabled(&self) -> bool {
        self.read_toggle(keys::SFX_ENABLED)
    }

    pub fn set_sfx_enabled(&mut self, enabled: bool) -> Result<(), StorageError> {
        self.inner.set(keys::SFX_ENABLED, &enabled.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let err: StorageError = std::io::Error::other("disk gone").into();
        assert_eq!(err.to_string(), "storage I/O error: disk gone");
        assert!(std::error::Error::source(&err).is_some());

        let err = StorageError::Unavailable("no window".into());
        assert_eq!(err.to_string(), "storage unavailable: no window");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_defaults_when_empty() {
        let store = GameStore::new(MemoryStore::new());
        assert_eq!(store.get_high_score(), 0);
        assert_eq!(store.get_games_played(), 0);
        assert!(store.get_music_enabled());
        assert!(store.get_sfx_enabled());
    }

    #[test]
    fn test_values_round_trip_through_strings() {
        let mut store = GameStore::new(MemoryStore::new());
        store.set_high_score(1234).unwrap();
        store.set_music_enabled(false).unwrap();
        assert_eq!(store.get_high_score(), 1234);
        assert!(!store.get_music_enabled());
        assert!(store.get_sfx_enabled());
        assert_eq!(
            store.inner().get(keys::HIGH_SCORE).unwrap().as_deref(),
            Some("1234")
        );
        assert_eq!(
            store.inner().get(keys::MUSIC_ENABLED).unwrap().as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_increment_games_played() {
        let mut store = GameStore::new(MemoryStore::new());
        assert_eq!(store.increment_games_played(), 1);
        assert_eq!(store.increment_games_played(), 2);
        assert_eq!(store.get_games_played(), 2);
    }

    #[test]
    fn test_read_failure_means_default() {
        let mut backend = MemoryStore::new();
        backend.set(keys::HIGH_SCORE, "500").unwrap();
        backend.set(keys::SFX_ENABLED, "false").unwrap();
        backend.fail_reads(true);

        let store = GameStore::new(backend);
        assert_eq!(store.get_high_score(), 0);
        assert!(store.get_sfx_enabled());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let mut backend = MemoryStore::new();
        backend.fail_writes(true);
        let mut store = GameStore::new(backend);

        assert!(store.set_high_score(10).is_err());
        // Counter still reports the incremented value
        assert_eq!(store.increment_games_played(), 1);
        assert_eq!(store.get_games_played(), 0);
    }

    #[test]
    fn test_malformed_counter_defaults() {
        let mut backend = MemoryStore::new();
        backend.set(keys::GAMES_PLAYED, "lots").unwrap();
        let store = GameStore::new(backend);
        assert_eq!(store.get_games_played(), 0);
    }

    #[test]
    fn test_toggle_only_true_string_is_true() {
        let mut backend = MemoryStore::new();
        backend.set(keys::MUSIC_ENABLED, "yes").unwrap();
        let store = GameStore::new(backend);
        assert!(!store.get_music_enabled());
    }
}
