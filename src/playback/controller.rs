use crate::{Result, TalkbackError};
use crossbeam_channel::{bounded, Receiver, Sender};
use reqwest::Url;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Events emitted by playback workers
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// The sound reached its natural end, or never managed to start.
    /// Force-stopped sounds emit nothing.
    Completed { handle_id: Uuid },
}

struct ActiveSound {
    id: Uuid,
    sink: Arc<Sink>,
    stopped: Arc<AtomicBool>,
}

/// Owns the single audio-output handle.
///
/// At most one sound is active at a time; starting a new one force-stops the
/// previous sink first. Output-device trouble is reported as immediate
/// completion, never as a conversation failure.
pub struct PlaybackController {
    enabled: bool,
    event_tx: Sender<PlaybackEvent>,
    event_rx: Receiver<PlaybackEvent>,
    output: Option<(OutputStream, OutputStreamHandle)>,
    current: Option<ActiveSound>,
}

impl PlaybackController {
    /// Create a playback controller. With `enabled = false` every `play()`
    /// reports immediate completion without touching a device.
    pub fn new(enabled: bool) -> Self {
        let (event_tx, event_rx) = bounded(100);

        Self {
            enabled,
            event_tx,
            event_rx,
            output: None,
            current: None,
        }
    }

    /// Start playing the resource at `url`, force-stopping any active sound
    /// first. Returns the new handle id immediately; fetching and decoding
    /// happen on a worker thread.
    pub fn play(&mut self, url: Url) -> Uuid {
        self.stop();

        let handle_id = Uuid::new_v4();

        if !self.enabled {
            debug!("Audio output disabled, playback {} completes immediately", handle_id);
            let _ = self.event_tx.send(PlaybackEvent::Completed { handle_id });
            return handle_id;
        }

        let sink = match self.build_sink() {
            Ok(sink) => Arc::new(sink),
            Err(e) => {
                warn!("Playback unavailable: {}", e);
                let _ = self.event_tx.send(PlaybackEvent::Completed { handle_id });
                return handle_id;
            }
        };

        let stopped = Arc::new(AtomicBool::new(false));
        self.current = Some(ActiveSound {
            id: handle_id,
            sink: Arc::clone(&sink),
            stopped: Arc::clone(&stopped),
        });

        let event_tx = self.event_tx.clone();
        thread::spawn(move || {
            stream_and_watch(url, sink, stopped, handle_id, event_tx);
        });

        info!("Playback {} started", handle_id);
        handle_id
    }

    /// Force-stop and discard the active sound, immediately and
    /// synchronously. Its worker emits no completion afterwards.
    pub fn stop(&mut self) {
        if let Some(active) = self.current.take() {
            active.stopped.store(true, Ordering::SeqCst);
            active.sink.stop();
            info!("Playback {} force-stopped", active.id);
        }
    }

    /// Discard the active handle if `handle_id` is the current one
    pub fn finish(&mut self, handle_id: Uuid) {
        if let Some(active) = &self.current {
            if active.id == handle_id {
                self.current = None;
            }
        }
    }

    /// Whether a sink is currently held
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Try to receive a playback event
    pub fn try_recv_event(&self) -> Option<PlaybackEvent> {
        self.event_rx.try_recv().ok()
    }

    fn build_sink(&mut self) -> Result<Sink> {
        if self.output.is_none() {
            let pair = OutputStream::try_default()
                .map_err(|e| TalkbackError::Playback(format!("No output device: {}", e)))?;
            self.output = Some(pair);
        }

        let Some((_, handle)) = self.output.as_ref() else {
            return Err(TalkbackError::Playback("No output device".into()));
        };

        Sink::try_new(handle)
            .map_err(|e| TalkbackError::Playback(format!("Failed to create sink: {}", e)))
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Fetch, decode, and watch one sound to its end.
fn stream_and_watch(
    url: Url,
    sink: Arc<Sink>,
    stopped: Arc<AtomicBool>,
    handle_id: Uuid,
    event_tx: Sender<PlaybackEvent>,
) {
    let bytes = match fetch(&url) {
        Ok(bytes) => bytes,
        Err(e) => {
            if !stopped.load(Ordering::SeqCst) {
                warn!("Failed to fetch audio from {}: {}", url, e);
                let _ = event_tx.send(PlaybackEvent::Completed { handle_id });
            }
            return;
        }
    };

    let source = match Decoder::new(Cursor::new(bytes)) {
        Ok(source) => source,
        Err(e) => {
            if !stopped.load(Ordering::SeqCst) {
                warn!("Failed to decode audio from {}: {}", url, e);
                let _ = event_tx.send(PlaybackEvent::Completed { handle_id });
            }
            return;
        }
    };

    if stopped.load(Ordering::SeqCst) {
        return;
    }

    sink.append(source);

    // A force-stop can race the append; make sure it sticks
    if stopped.load(Ordering::SeqCst) {
        sink.stop();
        return;
    }

    sink.sleep_until_end();

    if !stopped.load(Ordering::SeqCst) {
        debug!("Playback {} completed", handle_id);
        let _ = event_tx.send(PlaybackEvent::Completed { handle_id });
    }
}

fn fetch(url: &Url) -> Result<Vec<u8>> {
    let runtime = Runtime::new()
        .map_err(|e| TalkbackError::Playback(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(async {
        let response = reqwest::get(url.clone())
            .await
            .map_err(|e| TalkbackError::Playback(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TalkbackError::Playback(format!(
                "Audio fetch returned status {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TalkbackError::Playback(e.to_string()))?;

        Ok(bytes.to_vec())
    })
}
