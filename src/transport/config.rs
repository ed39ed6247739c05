use crate::{Result, TalkbackError};
use reqwest::Url;
use std::time::Duration;

/// Where and how captures are uploaded.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Base URL of the voice-chat server
    pub server_url: String,

    /// Path of the chat endpoint
    pub chat_path: String,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Whole-request timeout. A hung upload fails instead of pinning the
    /// session in its processing phase until the user intervenes.
    pub request_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            chat_path: "/chat".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl TransportConfig {
    /// The full upload endpoint URL
    pub fn endpoint(&self) -> Result<Url> {
        self.base()?
            .join(&self.chat_path)
            .map_err(|e| TalkbackError::Config(format!("Invalid chat path: {}", e)))
    }

    /// Resolve a reply's audio locator, which may be relative to the server.
    pub fn resolve_audio_url(&self, raw: &str) -> Result<Url> {
        if let Ok(url) = Url::parse(raw) {
            return Ok(url);
        }

        self.base()?.join(raw).map_err(|e| {
            TalkbackError::Config(format!("Unresolvable audio URL {:?}: {}", raw, e))
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.endpoint().map(|_| ())
    }

    fn base(&self) -> Result<Url> {
        Url::parse(&self.server_url)
            .map_err(|e| TalkbackError::Config(format!("Invalid server URL: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let config = TransportConfig::default();
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://127.0.0.1:8000/chat"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_server_url_rejected() {
        let config = TransportConfig {
            server_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_relative_audio_url() {
        let config = TransportConfig::default();

        let rooted = config.resolve_audio_url("/audio/reply.mp3").unwrap();
        assert_eq!(rooted.as_str(), "http://127.0.0.1:8000/audio/reply.mp3");

        let bare = config.resolve_audio_url("audio/reply.mp3").unwrap();
        assert_eq!(bare.as_str(), "http://127.0.0.1:8000/audio/reply.mp3");
    }

    #[test]
    fn test_resolve_absolute_audio_url() {
        let config = TransportConfig::default();
        let url = config
            .resolve_audio_url("https://cdn.example.com/reply.mp3")
            .unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/reply.mp3");
    }
}
