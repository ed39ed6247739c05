use crate::transcript::entry::TranscriptEntry;
use crate::transcript::reveal::{self, DEFAULT_REVEAL_INTERVAL};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// Append-only conversation log shared between the session and the UI.
///
/// Entries arrive in order and are never mutated or removed. Clones share
/// the same underlying log.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    entries: Arc<RwLock<Vec<TranscriptEntry>>>,
    reveal_interval: Duration,
}

impl TranscriptStore {
    pub fn new(reveal_interval: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            reveal_interval,
        }
    }

    /// Append a user turn, rendered in full immediately
    pub fn push_user(&self, text: impl Into<String>) {
        self.entries.write().push(TranscriptEntry::user(text));
    }

    /// Append an assistant turn and start its progressive reveal
    pub fn push_assistant(&self, text: impl Into<String>) {
        let entry = TranscriptEntry::assistant(text);
        reveal::spawn_ticker(entry.reveal.clone(), self.reveal_interval);
        self.entries.write().push(entry);
    }

    /// Snapshot of all entries, in arrival order
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Whether any entry is still mid-reveal. The UI keeps repainting while
    /// this holds.
    pub fn any_revealing(&self) -> bool {
        self.entries
            .read()
            .iter()
            .any(|entry| !entry.reveal.is_complete())
    }
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::entry::Role;

    #[test]
    fn test_entries_keep_arrival_order() {
        let store = TranscriptStore::default();

        store.push_user("what's the weather?");
        store.push_assistant("Sunny, 22 degrees.");

        let entries = store.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[1].role, Role::Assistant);
    }

    #[test]
    fn test_empty_store() {
        let store = TranscriptStore::default();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(!store.any_revealing());
    }

    #[test]
    fn test_assistant_entry_revealing_then_done() {
        let store = TranscriptStore::new(Duration::from_millis(1));

        store.push_assistant("ok");

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while store.any_revealing() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }

        let entries = store.entries();
        assert!(entries[0].is_fully_revealed());
        assert_eq!(entries[0].visible_text(), "ok");
    }

    #[test]
    fn test_user_entries_never_reveal_progressively() {
        let store = TranscriptStore::default();
        store.push_user("instant");
        assert!(!store.any_revealing());
    }
}
