use crate::transcript::reveal::DEFAULT_REVEAL_INTERVAL;
use crate::transport::TransportConfig;
use crate::{Result, TalkbackError};
use std::time::Duration;

/// Sample rate of uploaded captures
pub const UPLOAD_SAMPLE_RATE: u32 = 16000;

/// Configuration for a complete interaction session
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Transport endpoint and timeouts
    pub transport: TransportConfig,

    /// Pacing of the assistant-text reveal
    pub reveal_interval: Duration,

    /// Whether to capture from a real input device
    pub enable_audio_input: bool,

    /// Whether to play replies on a real output device
    pub enable_audio_output: bool,

    /// Sample rate captures are converted to before upload
    pub upload_sample_rate: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            enable_audio_input: true,
            enable_audio_output: true,
            upload_sample_rate: UPLOAD_SAMPLE_RATE,
        }
    }
}

impl SessionConfig {
    /// Set the server base URL
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.transport.server_url = url.into();
        self
    }

    /// Disable the input device (buffer-only capture)
    pub fn without_audio_input(mut self) -> Self {
        self.enable_audio_input = false;
        self
    }

    /// Disable the output device (playback completes immediately)
    pub fn without_audio_output(mut self) -> Self {
        self.enable_audio_output = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.transport.validate()?;

        if self.upload_sample_rate == 0 {
            return Err(TalkbackError::Config(
                "Upload sample rate must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
