use crate::entry::{Entry, EntryId};
use crate::search;
use crate::{Clock, SystemClock};
use thiserror::Error;
use tracing::debug;

/// Default bound on the unpinned portion of the history
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// A durable backend failed; the attempted mutation was not applied
#[derive(Error, Debug)]
#[error("persistence failed: {0}")]
pub struct PersistenceError(String);

impl PersistenceError {
    pub fn new(message: impl Into<String>) -> Self {
        PersistenceError(message.into())
    }
}

/// Record-level persistence contract. Each call succeeds or fails atomically;
/// no partial-field writes are ever observed.
pub trait DurableStore {
    fn create(&mut self, entry: &Entry) -> Result<(), PersistenceError>;
    fn update(&mut self, entry: &Entry) -> Result<(), PersistenceError>;
    fn delete(&mut self, id: &EntryId) -> Result<(), PersistenceError>;
    fn list_all(&mut self) -> Result<Vec<Entry>, PersistenceError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Blank or whitespace-only input; nothing was stored
    Ignored,
    /// Identical content already lived in the store; its timestamp was refreshed
    Touched(EntryId),
    /// A new entry was created (retention may have evicted older ones)
    Created(EntryId),
}

/// The history state machine: owns the ordered in-memory view, applies
/// deduplication and retention, and mediates all writes to the durable store.
///
/// With `db: None` the store is memory-only, which tests and ephemeral
/// sessions rely on; the semantics are identical either way.
pub struct HistoryStore {
    db: Option<Box<dyn DurableStore + Send>>,
    clock: Box<dyn Clock + Send>,
    entries: Vec<Entry>,
    max_entries: usize,
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("db", &self.db.as_ref().map(|_| "DurableStore"))
            .field("entries", &self.entries.len())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl HistoryStore {
    /// Memory-only store
    pub fn new(max_entries: usize) -> Self {
        HistoryStore {
            db: None,
            clock: Box::new(SystemClock),
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Store backed by a durable collaborator; call [`HistoryStore::load`]
    /// before use to populate the view
    pub fn with_durable(db: Box<dyn DurableStore + Send>, max_entries: usize) -> Self {
        HistoryStore {
            db: Some(db),
            clock: Box::new(SystemClock),
            entries: Vec::new(),
            max_entries,
        }
    }

    pub fn set_clock(&mut self, clock: Box<dyn Clock + Send>) {
        self.clock = clock;
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Replace the in-memory view with the durable store contents.
    /// The only persistence failure that is fatal to a caller is this one,
    /// and only at startup.
    pub fn load(&mut self) -> Result<usize, PersistenceError> {
        if let Some(db) = &mut self.db {
            self.entries = db.list_all()?;
            Self::sort(&mut self.entries);
        }
        Ok(self.entries.len())
    }

    /// Record an observation of clipboard content.
    ///
    /// Idempotent with respect to content equality: re-observing stored
    /// content refreshes its timestamp instead of creating a duplicate, and
    /// never triggers eviction. A failed durable write leaves the view at its
    /// last good state.
    pub fn ingest(&mut self, content: &str) -> Result<IngestOutcome, PersistenceError> {
        if content.trim().is_empty() {
            return Ok(IngestOutcome::Ignored);
        }
        let now = self.clock.now_millis();

        if let Some(pos) = self.entries.iter().position(|e| e.content == content) {
            let mut touched = self.entries[pos].clone();
            touched.touched_at = now;
            if let Some(db) = &mut self.db {
                db.update(&touched)?;
            }
            let id = touched.id.clone();
            self.entries[pos] = touched;
            Self::sort(&mut self.entries);
            debug!("touched entry {}", id);
            return Ok(IngestOutcome::Touched(id));
        }

        let entry = Entry::new(content, now);
        if let Some(db) = &mut self.db {
            db.create(&entry)?;
        }
        let id = entry.id.clone();
        self.entries.push(entry);
        // Sort before retention: if an eviction delete fails, the view must
        // already be in listing order. Eviction picks candidates by
        // timestamp, not position, and removal preserves order.
        Self::sort(&mut self.entries);
        self.apply_retention()?;
        debug!("created entry {}", id);
        Ok(IngestOutcome::Created(id))
    }

    /// Flip the pin flag. `Ok(false)` for an id that no longer exists
    /// (e.g. it raced with eviction); never an error for an absent id.
    pub fn toggle_pin(&mut self, id: &EntryId) -> Result<bool, PersistenceError> {
        let Some(pos) = self.entries.iter().position(|e| &e.id == id) else {
            return Ok(false);
        };
        let mut updated = self.entries[pos].clone();
        updated.pinned = !updated.pinned;
        if let Some(db) = &mut self.db {
            db.update(&updated)?;
        }
        self.entries[pos] = updated;
        Self::sort(&mut self.entries);
        Ok(true)
    }

    /// Remove an entry unconditionally, pinned or not. `Ok(false)` when absent.
    pub fn delete(&mut self, id: &EntryId) -> Result<bool, PersistenceError> {
        let Some(pos) = self.entries.iter().position(|e| &e.id == id) else {
            return Ok(false);
        };
        if let Some(db) = &mut self.db {
            db.delete(id)?;
        }
        self.entries.remove(pos);
        Ok(true)
    }

    /// The current view: pinned entries first, then unpinned, each group
    /// newest first. Pure.
    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    /// Case-insensitive substring filter over [`HistoryStore::list`];
    /// an empty query returns the full view.
    pub fn search(&self, query: &str) -> Vec<Entry> {
        search::filter(&self.entries, query)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evict the oldest unpinned entries until the bound holds again.
    ///
    /// Runs only after a genuinely new entry was inserted. Trims exactly the
    /// overshoot rather than down to a lower watermark, so the store stays as
    /// close to `max_entries` as the pin constraint allows. Pinned entries
    /// are never candidates; the just-inserted entry is (it only loses when
    /// pins alone fill the budget). Each eviction is persisted before the
    /// view changes, so a failed delete leaves the view consistent.
    fn apply_retention(&mut self) -> Result<(), PersistenceError> {
        if self.entries.len() <= self.max_entries {
            return Ok(());
        }
        let excess = self.entries.len() - self.max_entries;

        let mut unpinned: Vec<(i64, EntryId)> = self
            .entries
            .iter()
            .filter(|e| !e.pinned)
            .map(|e| (e.touched_at, e.id.clone()))
            .collect();
        unpinned.sort_by_key(|(touched_at, _)| *touched_at);

        for (_, id) in unpinned.into_iter().take(excess) {
            if let Some(db) = &mut self.db {
                db.delete(&id)?;
            }
            self.entries.retain(|e| e.id != id);
            debug!("evicted entry {}", id);
        }
        Ok(())
    }

    fn sort(entries: &mut [Entry]) {
        entries.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then(b.touched_at.cmp(&a.touched_at))
        });
    }
}
