use serde::{Deserialize, Serialize};

/// Parsed server response for one voice exchange.
///
/// All fields are optional; the server omits what a given exchange did not
/// produce. Consumed immediately to update the transcript and start playback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplyPayload {
    /// Transcription of what the user said
    #[serde(default)]
    pub user_text: Option<String>,

    /// The assistant's text answer
    #[serde(default)]
    pub ai_text: Option<String>,

    /// Locator of the synthesized speech, absolute or relative to the server
    #[serde(default)]
    pub audio_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_reply() {
        let reply: ReplyPayload = serde_json::from_str(
            r#"{"user_text": "hello", "ai_text": "hi there", "audio_url": "/audio/r1.mp3"}"#,
        )
        .unwrap();

        assert_eq!(reply.user_text.as_deref(), Some("hello"));
        assert_eq!(reply.ai_text.as_deref(), Some("hi there"));
        assert_eq!(reply.audio_url.as_deref(), Some("/audio/r1.mp3"));
    }

    #[test]
    fn test_reply_without_audio() {
        let reply: ReplyPayload =
            serde_json::from_str(r#"{"user_text": "hello", "ai_text": "hi"}"#).unwrap();

        assert!(reply.audio_url.is_none());
        assert_eq!(reply.ai_text.as_deref(), Some("hi"));
    }

    #[test]
    fn test_empty_reply() {
        let reply: ReplyPayload = serde_json::from_str("{}").unwrap();

        assert!(reply.user_text.is_none());
        assert!(reply.ai_text.is_none());
        assert!(reply.audio_url.is_none());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let reply: ReplyPayload =
            serde_json::from_str(r#"{"ai_text": "ok", "latency_ms": 320}"#).unwrap();

        assert_eq!(reply.ai_text.as_deref(), Some("ok"));
    }
}
