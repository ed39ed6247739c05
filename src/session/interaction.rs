//! Interaction state machine
//!
//! Owns the four-phase interaction lifecycle and the interruption protocol.
//! The single user trigger is interpreted against the current phase, and
//! whatever is in flight is always torn down before anything new starts, so
//! at most one of {capture, pending request, playback} is ever active.
//!
//! Collaborators deliver completions as events; each one is re-checked for
//! relevance before it is applied, so a stale completion (a cancelled request
//! resolving late, a force-stopped sound reporting in) changes nothing.

use crate::audio::CaptureController;
use crate::playback::{PlaybackController, PlaybackEvent};
use crate::session::config::SessionConfig;
use crate::session::phase::Phase;
use crate::transcript::TranscriptStore;
use crate::transport::{
    PendingRequest, ReplyPayload, TransportClient, TransportEvent, TransportHandle,
};
use crate::{Result, TalkbackError};
use tracing::{debug, warn};
use uuid::Uuid;

pub struct InteractionSession {
    config: SessionConfig,
    phase: Phase,
    capture: CaptureController,
    transport: TransportHandle,
    playback: PlaybackController,
    transcript: TranscriptStore,
    pending: Option<PendingRequest>,
    playing: Option<Uuid>,
    notice: Option<String>,
    /// Keeps a detached pipeline's channels open in tests
    #[cfg(test)]
    _detached_transport: Option<TransportClient>,
}

impl InteractionSession {
    /// Create a session and start its transport worker
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;

        let client = TransportClient::new(config.transport.clone());
        let transport = client.handle();
        client.spawn_worker()?;

        Ok(Self::assemble(config, transport))
    }

    /// A session whose transport worker never runs: uploads stay queued and
    /// transport events are injected by hand.
    #[cfg(test)]
    fn detached(config: SessionConfig) -> Self {
        let client = TransportClient::new(config.transport.clone());
        let transport = client.handle();
        let mut session = Self::assemble(config, transport);
        session._detached_transport = Some(client);
        session
    }

    fn assemble(config: SessionConfig, transport: TransportHandle) -> Self {
        Self {
            phase: Phase::Idle,
            capture: CaptureController::new(config.enable_audio_input, config.upload_sample_rate),
            playback: PlaybackController::new(config.enable_audio_output),
            transcript: TranscriptStore::new(config.reveal_interval),
            pending: None,
            playing: None,
            notice: None,
            transport,
            config,
            #[cfg(test)]
            _detached_transport: None,
        }
    }

    /// The single user control.
    ///
    /// Idle starts a recording; Recording finalizes and uploads it; during
    /// Processing or Playing the trigger is an interruption that tears the
    /// active work down and starts a fresh recording.
    pub fn activate(&mut self) {
        match self.phase {
            Phase::Idle => self.begin_recording(),
            Phase::Recording => self.finish_recording(),
            Phase::Processing => {
                if let Some(mut pending) = self.pending.take() {
                    pending.cancel();
                }
                self.begin_recording();
            }
            Phase::Playing => {
                self.playback.stop();
                self.playing = None;
                self.begin_recording();
            }
        }
    }

    /// Drain collaborator events and apply the ones still relevant
    pub fn poll_events(&mut self) {
        while let Some(event) = self.transport.try_recv_event() {
            self.handle_transport_event(event);
        }
        while let Some(event) = self.playback.try_recv_event() {
            self.handle_playback_event(event);
        }
    }

    /// Current interaction phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Status line for the current phase
    pub fn status_text(&self) -> &'static str {
        self.phase.status_text()
    }

    /// The conversation log
    pub fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    /// Take the most recent user-facing notice, if any
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Release devices and stop the transport worker; called on exit
    pub fn shutdown(&mut self) {
        self.playback.stop();
        self.playing = None;
        if let Err(e) = self.capture.stop() {
            warn!("Failed to release capture on shutdown: {}", e);
        }
        self.transport.shutdown();
    }

    fn begin_recording(&mut self) {
        match self.capture.start() {
            Ok(()) => {
                self.phase = Phase::Recording;
                debug!("Recording started");
            }
            Err(e) => {
                warn!("Could not start capture: {}", e);
                self.notice = Some(e.user_message());
                self.phase = Phase::Idle;
            }
        }
    }

    fn finish_recording(&mut self) {
        let payload = match self.capture.stop() {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                self.phase = Phase::Idle;
                return;
            }
            Err(e) => {
                warn!("Failed to finalize capture: {}", e);
                self.notice = Some(e.user_message());
                self.phase = Phase::Idle;
                return;
            }
        };

        match self.transport.send(payload) {
            Ok(request) => {
                debug!("Request {} in flight", request.id());
                self.pending = Some(request);
                self.phase = Phase::Processing;
            }
            Err(e) => {
                warn!("Failed to queue upload: {}", e);
                self.notice = Some(e.user_message());
                self.phase = Phase::Idle;
            }
        }
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Completed { request_id, reply } => {
                if !self.is_current_request(request_id) {
                    debug!("Discarding stale reply for request {}", request_id);
                    return;
                }
                self.pending = None;
                self.apply_reply(reply);
            }

            TransportEvent::Failed { request_id, error } => {
                if error.is_cancellation() {
                    // User interruption: the phase already moved on when this
                    // request was cancelled, and nothing reaches the transcript.
                    debug!("Request {} cancelled", request_id);
                    return;
                }
                if !self.is_current_request(request_id) {
                    debug!("Discarding stale failure for request {}", request_id);
                    return;
                }
                self.pending = None;
                warn!("Request {} failed: {}", request_id, error);
                self.transcript.push_assistant(error.user_message());
                self.phase = Phase::Idle;
            }

            TransportEvent::Shutdown => {
                if self.pending.take().is_some() {
                    warn!("Transport worker stopped with a request in flight");
                    self.transcript.push_assistant(
                        TalkbackError::Network("transport worker stopped".into()).user_message(),
                    );
                    self.phase = Phase::Idle;
                } else {
                    debug!("Transport worker stopped");
                }
            }
        }
    }

    fn apply_reply(&mut self, reply: ReplyPayload) {
        if let Some(text) = reply.user_text {
            self.transcript.push_user(text);
        }
        if let Some(text) = reply.ai_text {
            self.transcript.push_assistant(text);
        }

        let Some(raw_url) = reply.audio_url else {
            self.phase = Phase::Idle;
            return;
        };

        match self.config.transport.resolve_audio_url(&raw_url) {
            Ok(url) => {
                let handle_id = self.playback.play(url);
                self.playing = Some(handle_id);
                self.phase = Phase::Playing;
            }
            Err(e) => {
                warn!("Ignoring unplayable audio URL: {}", e);
                self.phase = Phase::Idle;
            }
        }
    }

    fn handle_playback_event(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Completed { handle_id } => {
                self.playback.finish(handle_id);
                if self.playing == Some(handle_id) {
                    self.playing = None;
                    self.phase = Phase::Idle;
                    debug!("Playback finished, back to idle");
                } else {
                    debug!("Discarding stale playback completion {}", handle_id);
                }
            }
        }
    }

    fn is_current_request(&self, request_id: Uuid) -> bool {
        self.pending.as_ref().map(PendingRequest::id) == Some(request_id)
    }

    #[cfg(test)]
    fn active_resources(&self) -> usize {
        let playback_active = self.playback.is_active() || self.playing.is_some();
        [
            self.capture.is_active(),
            self.pending.is_some(),
            playback_active,
        ]
        .iter()
        .filter(|&&active| active)
        .count()
    }
}
