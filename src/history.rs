//! Trick history: rolled tricks, newest first, persisted as JSON beside the settings.

use crate::coordinator::TrickLog;
use crate::store;
use crate::GameMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickEntry {
    /// Creation time in ms, bumped to stay unique and increasing.
    pub id: u64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub landed: bool,
    pub mode: GameMode,
}

#[derive(Debug, Default)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    entries: Vec<TrickEntry>,
}

impl HistoryStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`; a missing or unreadable file starts an empty history.
    pub fn load(path: PathBuf) -> Self {
        let entries = match store::load_json::<Vec<TrickEntry>>(&path) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "failed to load history, starting empty");
                Vec::new()
            }
        };
        Self {
            path: Some(path),
            entries,
        }
    }

    /// Newest first.
    pub fn entries(&self) -> &[TrickEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn landed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.landed).count()
    }

    fn next_id(&self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        self.entries
            .first()
            .map_or(millis, |newest| millis.max(newest.id + 1))
    }

    pub fn add(&mut self, text: &str, mode: GameMode) -> u64 {
        let now = Utc::now();
        let id = self.next_id(now);
        self.entries.insert(
            0,
            TrickEntry {
                id,
                text: text.to_string(),
                timestamp: now,
                landed: false,
                mode,
            },
        );
        debug!(id, ?mode, "trick added to history");
        self.save();
        id
    }

    /// Flip the landed flag of entry `id`. Returns false if there is no such entry.
    pub fn toggle_landed(&mut self, id: u64) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        entry.landed = !entry.landed;
        self.save();
        true
    }

    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.save();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.save();
    }

    fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = store::save_json(path, &self.entries) {
            warn!(error = %e, "failed to save history");
        }
    }
}

impl TrickLog for HistoryStore {
    fn add_trick(&mut self, text: &str, mode: GameMode) {
        self.add(text, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn add_prepends_with_increasing_ids() {
        let mut h = HistoryStore::in_memory();
        let first = h.add("KICKFLIP", GameMode::Flatground);
        let second = h.add("SMITH\n1 TRY", GameMode::Ledge);
        assert!(second > first);
        assert_eq!(h.entries()[0].text, "SMITH\n1 TRY");
        assert_eq!(h.entries()[1].text, "KICKFLIP");
        assert!(!h.entries()[0].landed);
    }

    #[test]
    fn toggle_delete_and_clear() {
        let mut h = HistoryStore::in_memory();
        let a = h.add("A", GameMode::Flatground);
        let b = h.add("B", GameMode::Flatground);
        assert!(h.toggle_landed(a));
        assert_eq!(h.landed_count(), 1);
        assert!(h.toggle_landed(a));
        assert_eq!(h.landed_count(), 0);
        assert!(!h.toggle_landed(9));

        assert!(h.delete(b));
        assert!(!h.delete(b));
        assert_eq!(h.len(), 1);
        h.clear();
        assert!(h.is_empty());
    }

    #[test]
    fn persists_across_loads() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join(HISTORY_FILE);
        let mut h = HistoryStore::load(path.clone());
        assert!(h.is_empty());
        let id = h.add("HEELFLIP", GameMode::Flatground);
        h.add_trick("NOSESLIDE\n5 TRIES", GameMode::Ledge);
        h.toggle_landed(id);

        let reloaded = HistoryStore::load(path);
        assert_eq!(reloaded.entries(), h.entries());
        assert_eq!(reloaded.landed_count(), 1);
        assert_eq!(reloaded.entries()[0].mode, GameMode::Ledge);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(HISTORY_FILE);
        std::fs::write(&path, "not json").unwrap();
        assert!(HistoryStore::load(path).is_empty());
    }
}
