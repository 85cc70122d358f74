mod detect;
mod entry;
mod search;
mod store;

/// Return the current wall-clock time in unix milliseconds
pub fn current_time_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Time source for the history store; injectable so tests run deterministically
pub trait Clock {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        current_time_millis()
    }
}

pub use crate::detect::ChangeDetector;
pub use crate::entry::{Entry, EntryId};
pub use crate::store::{
    DEFAULT_MAX_ENTRIES, DurableStore, HistoryStore, IngestOutcome, PersistenceError,
};
