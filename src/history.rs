use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::errors::UtmError;
use crate::storage::KeyValueStore;

/// Most entries kept; older ones fall off the end.
pub const HISTORY_LIMIT: usize = 10;

pub const DEFAULT_STORAGE_KEY: &str = "utm-history";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub timestamp: i64,
}

/// Newest-first list of generated links, unique by exact URL string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(HISTORY_LIMIT);
        Self { entries }
    }

    /// Returns the list with `url` at the front, stamped with the clock's time.
    pub fn record(&self, url: &str, clock: &dyn Clock) -> History {
        let mut entries = Vec::with_capacity(HISTORY_LIMIT);
        entries.push(HistoryEntry {
            url: url.to_string(),
            timestamp: clock.now_millis(),
        });
        entries.extend(
            self.entries
                .iter()
                .filter(|entry| entry.url != url)
                .take(HISTORY_LIMIT - 1)
                .cloned(),
        );
        History { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// 1-based lookup, matching how the list is shown.
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// Anything that is not a JSON array of entries reads as an empty history.
    pub fn from_json(raw: &str) -> History {
        match serde_json::from_str::<Vec<HistoryEntry>>(raw) {
            Ok(entries) => History::new(entries),
            Err(e) => {
                warn!(action = "parse", component = "history", error = %e, "Ignoring malformed history");
                History::default()
            }
        }
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Sole owner of the history list and of its persisted copy.
pub struct HistoryStore<S: KeyValueStore> {
    storage: S,
    key: String,
    history: History,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let history = load(&storage, &key);
        Self {
            storage,
            key,
            history,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Re-reads the persisted list, replacing the in-memory copy.
    pub fn load(&mut self) -> &History {
        self.history = load(&self.storage, &self.key);
        &self.history
    }

    pub fn record(&mut self, url: &str, clock: &dyn Clock) -> &History {
        self.history = self.history.record(url, clock);
        if let Err(e) = self.save() {
            warn!(action = "persist", component = "history", error = %e, "Failed to persist history");
        }
        &self.history
    }

    pub fn save(&self) -> Result<(), UtmError> {
        let json = self
            .history
            .to_json()
            .map_err(|e| UtmError::Io(e.into()))?;
        self.storage.set(&self.key, &json)?;
        debug!(action = "persist", component = "history", entry_count = self.history.len(), "History persisted");
        Ok(())
    }
}

fn load<S: KeyValueStore>(storage: &S, key: &str) -> History {
    let history = match storage.get(key) {
        Ok(Some(raw)) => History::from_json(&raw),
        Ok(None) => History::default(),
        Err(e) => {
            warn!(action = "load", component = "history", error = %e, "Could not read history, starting empty");
            History::default()
        }
    };
    info!(action = "load", component = "history", entry_count = history.len(), "History loaded");
    history
}
