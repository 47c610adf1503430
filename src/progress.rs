//! Per-game level progression
//!
//! Persisted as one JSON document keyed by game id. Unreadable data is
//! replaced with fresh records rather than surfaced to the player.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LEVEL, MIN_LEVEL};
use crate::error::StorageError;
use crate::persistence::ProgressBackend;
use crate::sim::GameKind;

/// Unlock state and scores for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Highest playable level (1..=4), never decreases
    pub highest_unlocked_level: u8,
    /// Score of the last completion of each level
    #[serde(default)]
    pub scores: BTreeMap<u8, u32>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            highest_unlocked_level: MIN_LEVEL,
            scores: BTreeMap::new(),
        }
    }
}

impl ProgressRecord {
    pub fn is_unlocked(&self, level: u8) -> bool {
        (MIN_LEVEL..=self.highest_unlocked_level).contains(&level)
    }

    /// Record a finished level and unlock the next one.
    ///
    /// Levels outside the playable range are ignored; returns whether the
    /// record changed.
    pub fn complete(&mut self, level: u8, score: u32) -> bool {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return false;
        }
        self.scores.insert(level, score);
        if level >= self.highest_unlocked_level {
            self.highest_unlocked_level = level.saturating_add(1).min(MAX_LEVEL);
        }
        true
    }

    /// Bring loaded values back into range
    fn sanitize(&mut self) {
        self.highest_unlocked_level = crate::clamp_level(self.highest_unlocked_level);
        self.scores
            .retain(|level, _| (MIN_LEVEL..=MAX_LEVEL).contains(level));
    }
}

/// All games' progress plus the backend it persists to
pub struct ProgressStore {
    records: BTreeMap<GameKind, ProgressRecord>,
    backend: Box<dyn ProgressBackend>,
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl ProgressStore {
    /// LocalStorage / file name
    pub const STORAGE_KEY: &'static str = "mini_arcade_progress";

    /// Load from `backend`, falling back to defaults on any failure
    pub fn load(backend: Box<dyn ProgressBackend>) -> Self {
        let records = match Self::read_records(backend.as_ref()) {
            Ok(Some(mut records)) => {
                records.values_mut().for_each(ProgressRecord::sanitize);
                log::info!("Loaded progress for {} games", records.len());
                records
            }
            Ok(None) => {
                log::info!("No progress found, starting fresh");
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("Could not load progress ({e}), starting fresh");
                BTreeMap::new()
            }
        };
        Self { records, backend }
    }

    fn read_records(
        backend: &dyn ProgressBackend,
    ) -> Result<Option<BTreeMap<GameKind, ProgressRecord>>, StorageError> {
        let Some(json) = backend.read()? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Progress for `kind`, created on first access
    pub fn get(&mut self, kind: GameKind) -> &ProgressRecord {
        self.records.entry(kind).or_default()
    }

    pub fn is_level_unlocked(&self, kind: GameKind, level: u8) -> bool {
        match self.records.get(&kind) {
            Some(record) => record.is_unlocked(level),
            None => level == MIN_LEVEL,
        }
    }

    pub fn highest_unlocked_level(&self, kind: GameKind) -> u8 {
        self.records
            .get(&kind)
            .map(|r| r.highest_unlocked_level)
            .unwrap_or(MIN_LEVEL)
    }

    pub fn score(&self, kind: GameKind, level: u8) -> Option<u32> {
        self.records.get(&kind)?.scores.get(&level).copied()
    }

    /// Store a finished level's score and unlock the next level
    pub fn record_completion(&mut self, kind: GameKind, level: u8, score: u32) {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            log::warn!("Ignoring {kind} completion for nonexistent level {level}");
            return;
        }
        let record = self.records.entry(kind).or_default();
        record.complete(level, score);
        log::info!(
            "{kind} level {level} complete ({score} pts), unlocked up to {}",
            record.highest_unlocked_level
        );
        self.save();
    }

    /// Forget all progress
    pub fn clear(&mut self) {
        self.records.clear();
        self.save();
    }

    /// Persist the whole mapping in one write
    fn save(&mut self) {
        let json = match serde_json::to_string(&self.records) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not serialize progress: {e}");
                return;
            }
        };
        if let Err(e) = self.backend.write(&json) {
            log::warn!("Could not save progress: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryBackend;

    struct BrokenBackend;

    impl ProgressBackend for BrokenBackend {
        fn read(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk on fire".to_string()))
        }

        fn write(&mut self, _data: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk on fire".to_string()))
        }
    }

    fn fresh() -> (ProgressStore, MemoryBackend) {
        let backend = MemoryBackend::new();
        (ProgressStore::load(Box::new(backend.clone())), backend)
    }

    #[test]
    fn test_defaults_on_first_access() {
        let (mut store, _) = fresh();
        assert_eq!(store.get(GameKind::Color), &ProgressRecord::default());
        assert!(store.is_level_unlocked(GameKind::Color, 1));
        assert!(!store.is_level_unlocked(GameKind::Color, 2));
        assert!(!store.is_level_unlocked(GameKind::Color, 0));
    }

    #[test]
    fn test_complete_level_one_of_catch() {
        let (mut store, backend) = fresh();
        store.record_completion(GameKind::Catch, 1, 80);
        assert_eq!(store.highest_unlocked_level(GameKind::Catch), 2);
        assert_eq!(store.score(GameKind::Catch, 1), Some(80));
        assert!(store.is_level_unlocked(GameKind::Catch, 2));
        assert!(!store.is_level_unlocked(GameKind::Catch, 3));
        // Other games untouched
        assert!(!store.is_level_unlocked(GameKind::Trace, 2));

        let saved = backend.contents().unwrap();
        assert_eq!(
            saved,
            r#"{"catch":{"highest_unlocked_level":2,"scores":{"1":80}}}"#
        );
    }

    #[test]
    fn test_replaying_lower_level_keeps_unlock() {
        let (mut store, _) = fresh();
        store.record_completion(GameKind::Shapes, 1, 1000);
        store.record_completion(GameKind::Shapes, 2, 1000);
        store.record_completion(GameKind::Shapes, 1, 900);
        assert_eq!(store.highest_unlocked_level(GameKind::Shapes), 3);
        assert_eq!(store.score(GameKind::Shapes, 1), Some(900));
    }

    #[test]
    fn test_unlock_caps_at_four() {
        let (mut store, _) = fresh();
        for level in 1..=4 {
            store.record_completion(GameKind::Basket, level, 100);
        }
        assert_eq!(store.highest_unlocked_level(GameKind::Basket), 4);
    }

    #[test]
    fn test_out_of_range_completion_ignored() {
        let (mut store, backend) = fresh();
        store.record_completion(GameKind::Catch, 1, 80);
        let saved = backend.contents();

        store.record_completion(GameKind::Catch, 0, 50);
        store.record_completion(GameKind::Catch, 9, 70);
        store.record_completion(GameKind::Catch, 255, 1);
        assert_eq!(store.highest_unlocked_level(GameKind::Catch), 2);
        assert_eq!(store.score(GameKind::Catch, 0), None);
        assert_eq!(store.score(GameKind::Catch, 9), None);
        assert_eq!(backend.contents(), saved);

        let mut record = ProgressRecord::default();
        assert!(!record.complete(255, 1));
        assert_eq!(record, ProgressRecord::default());
    }

    #[test]
    fn test_reload_from_backend() {
        let (mut store, backend) = fresh();
        store.record_completion(GameKind::Trace, 1, 600);
        let mut reloaded = ProgressStore::load(Box::new(backend));
        assert_eq!(reloaded.get(GameKind::Trace).highest_unlocked_level, 2);
        assert_eq!(reloaded.score(GameKind::Trace, 1), Some(600));
    }

    #[test]
    fn test_corrupt_data_resets_silently() {
        let backend = MemoryBackend::with_data("{\"trace\": [oops");
        assert!(matches!(
            ProgressStore::read_records(&backend),
            Err(StorageError::Corrupt(_))
        ));
        let mut store = ProgressStore::load(Box::new(backend));
        assert_eq!(store.get(GameKind::Trace), &ProgressRecord::default());
    }

    #[test]
    fn test_out_of_range_values_sanitized() {
        let backend = MemoryBackend::with_data(
            r#"{"color":{"highest_unlocked_level":9,"scores":{"2":300,"7":5}}}"#,
        );
        let store = ProgressStore::load(Box::new(backend));
        assert_eq!(store.highest_unlocked_level(GameKind::Color), 4);
        assert_eq!(store.score(GameKind::Color, 2), Some(300));
        assert_eq!(store.score(GameKind::Color, 7), None);
    }

    #[test]
    fn test_unavailable_storage_never_errors() {
        let mut store = ProgressStore::load(Box::new(BrokenBackend));
        store.record_completion(GameKind::Catch, 1, 10);
        assert!(store.is_level_unlocked(GameKind::Catch, 2));
    }

    #[test]
    fn test_clear_forgets_everything() {
        let (mut store, backend) = fresh();
        store.record_completion(GameKind::Catch, 1, 10);
        store.clear();
        assert!(!store.is_level_unlocked(GameKind::Catch, 2));
        assert_eq!(backend.contents().as_deref(), Some("{}"));
    }

    proptest::proptest! {
        #[test]
        fn prop_unlock_level_never_decreases(levels in proptest::collection::vec(1u8..=4, 1..32)) {
            let (mut store, _) = fresh();
            for level in levels {
                let before = store.highest_unlocked_level(GameKind::Color);
                store.record_completion(GameKind::Color, level, 1);
                let after = store.highest_unlocked_level(GameKind::Color);
                proptest::prop_assert_eq!(after, before.max((level + 1).min(4)));
                proptest::prop_assert_eq!(store.is_level_unlocked(GameKind::Color, level + 1), level < 4);
            }
        }
    }
}
