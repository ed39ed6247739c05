use crate::audio::{downsample, encode_wav, CapturedAudio};
use crate::Result;
#[cfg(feature = "audio-io")]
use crate::TalkbackError;
#[cfg(feature = "audio-io")]
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};
#[cfg(feature = "audio-io")]
use tracing::{debug, error};

/// Owns the microphone capability.
///
/// While active, input-stream callbacks append mono-mixed f32 chunks to an
/// internal buffer; `stop()` releases the device and finalizes the buffer
/// into a single uploadable payload.
pub struct CaptureController {
    enabled: bool,
    upload_sample_rate: u32,
    source_sample_rate: u32,
    buffer: Arc<Mutex<Vec<f32>>>,
    active: Arc<Mutex<bool>>,
    #[cfg(feature = "audio-io")]
    stream: Option<cpal::Stream>,
}

impl CaptureController {
    /// Create a capture controller. With `enabled = false` the controller
    /// manages only its buffer and never touches a device.
    pub fn new(enabled: bool, upload_sample_rate: u32) -> Self {
        Self {
            enabled,
            upload_sample_rate,
            source_sample_rate: upload_sample_rate,
            buffer: Arc::new(Mutex::new(Vec::new())),
            active: Arc::new(Mutex::new(false)),
            #[cfg(feature = "audio-io")]
            stream: None,
        }
    }

    /// Acquire the microphone and begin buffering audio.
    pub fn start(&mut self) -> Result<()> {
        if *self.active.lock() {
            warn!("Capture already active");
            return Ok(());
        }

        self.buffer.lock().clear();

        if self.enabled {
            self.open_stream()?;
        }

        *self.active.lock() = true;
        info!("Capture started");
        Ok(())
    }

    #[cfg(feature = "audio-io")]
    fn open_stream(&mut self) -> Result<()> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| TalkbackError::DeviceUnavailable("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config: cpal::StreamConfig = device
            .default_input_config()
            .map_err(|e| {
                TalkbackError::DeviceUnavailable(format!("Failed to get input config: {}", e))
            })?
            .into();

        let channels = config.channels as usize;
        let buffer = Arc::clone(&self.buffer);
        let active = Arc::clone(&self.active);

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !*active.lock() {
                        return;
                    }

                    let mut buf = buffer.lock();
                    if channels == 1 {
                        buf.extend_from_slice(data);
                    } else {
                        // Average all channels to mono
                        buf.extend(
                            data.chunks(channels)
                                .map(|frame| frame.iter().sum::<f32>() / channels as f32),
                        );
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| match e {
                cpal::BuildStreamError::DeviceNotAvailable => {
                    TalkbackError::DeviceUnavailable("Input device disappeared".into())
                }
                // A present device refusing a stream usually means the OS
                // withheld microphone access
                other => TalkbackError::PermissionDenied(format!(
                    "Failed to open input stream: {}",
                    other
                )),
            })?;

        stream.play().map_err(|e| match e {
            cpal::PlayStreamError::DeviceNotAvailable => {
                TalkbackError::DeviceUnavailable("Input device disappeared".into())
            }
            other => {
                TalkbackError::PermissionDenied(format!("Failed to start input stream: {}", other))
            }
        })?;

        self.source_sample_rate = config.sample_rate.0;
        self.stream = Some(stream);
        debug!("Input stream open at {} Hz", self.source_sample_rate);

        Ok(())
    }

    #[cfg(not(feature = "audio-io"))]
    fn open_stream(&mut self) -> Result<()> {
        warn!("Audio capture compiled out; recording an empty buffer");
        Ok(())
    }

    #[cfg(feature = "audio-io")]
    fn close_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Released input device");
        }
    }

    #[cfg(not(feature = "audio-io"))]
    fn close_stream(&mut self) {}

    /// Release the device and finalize buffered audio into an uploadable
    /// payload. A no-op returning `None` when capture is not active.
    ///
    /// The device handle is released on every stop path, including
    /// interruption, so the hardware indicator always turns off.
    pub fn stop(&mut self) -> Result<Option<CapturedAudio>> {
        if !*self.active.lock() {
            return Ok(None);
        }

        *self.active.lock() = false;
        self.close_stream();

        let samples = std::mem::take(&mut *self.buffer.lock());
        let samples = downsample(&samples, self.source_sample_rate, self.upload_sample_rate)?;
        let data = encode_wav(&samples, self.upload_sample_rate)?;

        info!(
            "Finalized capture: {} samples ({:.2}s), {} bytes",
            samples.len(),
            samples.len() as f32 / self.upload_sample_rate as f32,
            data.len()
        );

        Ok(Some(CapturedAudio::wav(data)))
    }

    /// Whether capture is currently active
    pub fn is_active(&self) -> bool {
        *self.active.lock()
    }

    /// Append samples to the capture buffer as a stream callback would.
    #[cfg(test)]
    pub(crate) fn push_samples(&self, samples: &[f32]) {
        if *self.active.lock() {
            self.buffer.lock().extend_from_slice(samples);
        }
    }
}
