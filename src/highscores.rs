//! High score and play-count records
//!
//! The session only emits its final score; comparing against the stored best
//! and persisting a new record happens here.

use serde::{Deserialize, Serialize};

use crate::persistence::{GameStore, KeyValueStore};

/// Records screen data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Records {
    pub high_score: u64,
    pub games_played: u64,
}

/// Outcome of reporting a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    /// Final score of the session
    pub score: u64,
    /// Best score after this session
    pub high_score: u64,
    /// True when this session set a new record
    pub new_record: bool,
    /// False if the new record could not be written
    pub persisted: bool,
}

impl Records {
    /// Load records from the store
    pub fn load<S: KeyValueStore>(store: &GameStore<S>) -> Self {
        Self {
            high_score: store.get_high_score(),
            games_played: store.get_games_played(),
        }
    }

    /// Check if a score beats the current best
    pub fn beats(&self, score: u64) -> bool {
        score > self.high_score
    }

    /// Record a finished session.
    ///
    /// The best score is re-read from the store so a stale in-memory copy
    /// never overwrites a higher persisted value. A failed write is logged
    /// and dropped; the report still carries the in-memory result.
    pub fn report_session_end<S: KeyValueStore>(
        &mut self,
        store: &mut GameStore<S>,
        score: u64,
    ) -> SessionReport {
        self.high_score = self.high_score.max(store.get_high_score());

        if !self.beats(score) {
            return SessionReport {
                score,
                high_score: self.high_score,
                new_record: false,
                persisted: true,
            };
        }

        self.high_score = score;
        let persisted = match store.set_high_score(score) {
            Ok(()) => {
                log::info!("New high score: {score}");
                true
            }
            Err(e) => {
                log::warn!("Failed to persist high score {score}: {e}");
                false
            }
        };

        SessionReport {
            score,
            high_score: score,
            new_record: true,
            persisted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_load_empty() {
        let store = GameStore::new(MemoryStore::new());
        assert_eq!(Records::load(&store), Records::default());
    }

    #[test]
    fn test_new_record_persisted() {
        let mut store = GameStore::new(MemoryStore::new());
        let mut records = Records::load(&store);

        let report = records.report_session_end(&mut store, 120);
        assert!(report.new_record);
        assert!(report.persisted);
        assert_eq!(store.get_high_score(), 120);

        let report = records.report_session_end(&mut store, 80);
        assert!(!report.new_record);
        assert_eq!(report.high_score, 120);
        assert_eq!(store.get_high_score(), 120);
    }

    #[test]
    fn test_zero_and_ties_are_not_records() {
        let mut store = GameStore::new(MemoryStore::new());
        let mut records = Records::load(&store);
        assert!(!records.report_session_end(&mut store, 0).new_record);

        store.set_high_score(50).unwrap();
        assert!(!records.report_session_end(&mut store, 50).new_record);
    }

    #[test]
    fn test_write_failure_still_reports() {
        let mut backend = MemoryStore::new();
        backend.fail_writes(true);
        let mut store = GameStore::new(backend);
        let mut records = Records::default();

        let report = records.report_session_end(&mut store, 300);
        assert!(report.new_record);
        assert!(!report.persisted);
        assert_eq!(report.high_score, 300);
        assert_eq!(records.high_score, 300);
    }

    #[test]
    fn test_stale_memory_does_not_regress_store() {
        let mut store = GameStore::new(MemoryStore::new());
        let mut records = Records::load(&store);
        store.set_high_score(1000).unwrap();

        let report = records.report_session_end(&mut store, 400);
        assert!(!report.new_record);
        assert_eq!(store.get_high_score(), 1000);
    }
}
