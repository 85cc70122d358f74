/// Turns a continuously-readable clipboard into a discrete stream of
/// "new content" observations.
///
/// This is a cheap pre-filter keyed on the last raw value seen, independent
/// of the store's own dedup: content that differs from the previous read is
/// emitted even if it already exists as an older entry.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last_raw: Option<String>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one clipboard reading. Returns the content to ingest, or `None`
    /// when the tick is a no-op: nothing readable, identical to the last
    /// observed raw value, or blank after trimming.
    pub fn observe(&mut self, read: Option<String>) -> Option<String> {
        let raw = read?;
        if self.last_raw.as_deref() == Some(raw.as_str()) {
            return None;
        }
        if raw.trim().is_empty() {
            return None;
        }
        self.last_raw = Some(raw.clone());
        Some(raw)
    }

    /// Forget the last observed value, so the next read is treated as new
    pub fn reset(&mut self) {
        self.last_raw = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(detector: &mut ChangeDetector, raw: &str) -> Option<String> {
        detector.observe(Some(raw.to_string()))
    }

    #[test]
    fn test_first_read_is_emitted() {
        let mut detector = ChangeDetector::new();
        assert_eq!(obs(&mut detector, "hello"), Some("hello".to_string()));
    }

    #[test]
    fn test_identical_reads_emit_once() {
        let mut detector = ChangeDetector::new();
        assert!(obs(&mut detector, "same").is_some());
        assert!(obs(&mut detector, "same").is_none());
        assert!(obs(&mut detector, "same").is_none());
    }

    #[test]
    fn test_unreadable_and_blank_are_noops() {
        let mut detector = ChangeDetector::new();
        assert!(detector.observe(None).is_none());
        assert!(obs(&mut detector, "").is_none());
        assert!(obs(&mut detector, "  \n\t").is_none());
    }

    #[test]
    fn test_blank_does_not_clobber_last_raw() {
        let mut detector = ChangeDetector::new();
        assert!(obs(&mut detector, "x").is_some());
        assert!(obs(&mut detector, "   ").is_none());
        // "x" is still the last observed value
        assert!(obs(&mut detector, "x").is_none());
    }

    #[test]
    fn test_reobserved_content_is_emitted_again() {
        // The detector only suppresses consecutive duplicates; going back to
        // earlier content is a real transition and the store's dedup handles it
        let mut detector = ChangeDetector::new();
        assert!(obs(&mut detector, "a").is_some());
        assert!(obs(&mut detector, "b").is_some());
        assert!(obs(&mut detector, "a").is_some());
    }

    #[test]
    fn test_reset_forgets_last_value() {
        let mut detector = ChangeDetector::new();
        assert!(obs(&mut detector, "x").is_some());
        detector.reset();
        assert!(obs(&mut detector, "x").is_some());
    }
}
