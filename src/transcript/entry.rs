use crate::transcript::reveal::RevealProgress;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One turn in the conversation log.
///
/// Entries are append-only: text and role never change after creation; only
/// the revealed prefix grows.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub reveal: RevealProgress,
}

impl TranscriptEntry {
    /// A user turn, rendered in full immediately
    pub fn user(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            reveal: RevealProgress::complete(text.chars().count()),
            text,
            timestamp: Utc::now(),
        }
    }

    /// An assistant turn, starting fully hidden
    pub fn assistant(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            reveal: RevealProgress::hidden(text.chars().count()),
            text,
            timestamp: Utc::now(),
        }
    }

    /// The currently revealed prefix, always on a character boundary
    pub fn visible_text(&self) -> &str {
        match self.text.char_indices().nth(self.reveal.shown()) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => &self.text,
        }
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.reveal.is_complete()
    }
}
