pub mod audio;
pub mod playback;
pub mod session;
pub mod transcript;
pub mod transport;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum TalkbackError {
    #[error("No usable input device: {0}")]
    DeviceUnavailable(String),

    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("Server returned status {0}")]
    Server(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Audio encoding error: {0}")]
    Encode(String),

    #[error("Resampling error: {0}")]
    Resample(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TalkbackError {
    /// Whether this error represents a user-driven cancellation rather than a
    /// genuine failure. Cancellations are never surfaced to the transcript.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TalkbackError::Cancelled)
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            TalkbackError::DeviceUnavailable(_) | TalkbackError::PermissionDenied(_) => {
                "Could not access microphone.".to_string()
            }
            TalkbackError::Server(_) | TalkbackError::Network(_) => {
                "Error communicating with server.".to_string()
            }
            TalkbackError::Cancelled => "Request cancelled.".to_string(),
            TalkbackError::Playback(_) => "Audio playback failed.".to_string(),
            TalkbackError::Encode(_) | TalkbackError::Resample(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            TalkbackError::Channel(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            TalkbackError::Config(_) => "Configuration error. Please check settings.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TalkbackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_is_not_a_failure() {
        assert!(TalkbackError::Cancelled.is_cancellation());
        assert!(!TalkbackError::Server(500).is_cancellation());
        assert!(!TalkbackError::Network("connection reset".into()).is_cancellation());
    }

    #[test]
    fn test_user_messages_match_surface_text() {
        assert_eq!(
            TalkbackError::DeviceUnavailable("no default device".into()).user_message(),
            "Could not access microphone."
        );
        assert_eq!(
            TalkbackError::Server(503).user_message(),
            "Error communicating with server."
        );
        assert_eq!(
            TalkbackError::Network("timed out".into()).user_message(),
            "Error communicating with server."
        );
    }
}
