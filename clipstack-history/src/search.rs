use crate::entry::Entry;

/// Case-insensitive substring filter over the current view, preserving
/// relative order. Recomputed on every call; at this scale a persistent
/// index would buy nothing.
pub fn filter(entries: &[Entry], query: &str) -> Vec<Entry> {
    if query.is_empty() {
        return entries.to_vec();
    }
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|e| e.content.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
