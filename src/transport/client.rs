//! Upload pipeline for captured audio
//!
//! Channel-based worker in the same shape as the rest of the app: commands
//! in, events out, with the HTTP work done on a dedicated thread so the UI
//! thread never blocks on the network.

use crate::audio::CapturedAudio;
use crate::transport::config::TransportConfig;
use crate::transport::reply::ReplyPayload;
use crate::{Result, TalkbackError};
use crossbeam_channel::{bounded, Receiver, Sender};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Form field carrying the audio payload
const AUDIO_FIELD: &str = "audio";

/// Commands handled by the transport worker
enum TransportCommand {
    /// Upload a finalized capture
    Send {
        payload: CapturedAudio,
        request_id: Uuid,
        cancel: oneshot::Receiver<()>,
    },

    /// Shut the worker down
    Shutdown,
}

/// Events emitted by the transport worker
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The server answered with a parsed reply
    Completed {
        request_id: Uuid,
        reply: ReplyPayload,
    },

    /// The request did not produce a reply. Carries `Cancelled` when the
    /// user interrupted the exchange; anything else is a genuine failure.
    Failed {
        request_id: Uuid,
        error: TalkbackError,
    },

    /// The worker has stopped
    Shutdown,
}

/// Handle to the single in-flight upload.
///
/// Each request gets its own cancellation channel; handles are never reused.
/// Cancelling twice, or after the request resolved, is a no-op. Dropping the
/// handle without cancelling also signals cancellation to the worker.
#[derive(Debug)]
pub struct PendingRequest {
    id: Uuid,
    cancel: Option<oneshot::Sender<()>>,
}

impl PendingRequest {
    fn new(id: Uuid, cancel: oneshot::Sender<()>) -> Self {
        Self {
            id,
            cancel: Some(cancel),
        }
    }

    /// Unique id of this request
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Signal cancellation. The worker suppresses the reply; the remote
    /// service may still finish processing on its own.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            // A send error means the request already resolved
            let _ = tx.send(());
            debug!("Cancellation signalled for request {}", self.id);
        }
    }
}

/// Cloneable endpoint for issuing uploads and draining transport events
#[derive(Clone)]
pub struct TransportHandle {
    command_tx: Sender<TransportCommand>,
    event_rx: Receiver<TransportEvent>,
}

impl TransportHandle {
    /// Queue an upload and return its request handle immediately.
    ///
    /// The caller is responsible for keeping at most one request pending and
    /// for cancelling the previous handle before issuing a new one.
    pub fn send(&self, payload: CapturedAudio) -> Result<PendingRequest> {
        let request_id = Uuid::new_v4();
        let (cancel_tx, cancel_rx) = oneshot::channel();

        self.command_tx
            .try_send(TransportCommand::Send {
                payload,
                request_id,
                cancel: cancel_rx,
            })
            .map_err(|e| TalkbackError::Channel(format!("Failed to queue upload: {}", e)))?;

        Ok(PendingRequest::new(request_id, cancel_tx))
    }

    /// Try to receive an event from the worker
    pub fn try_recv_event(&self) -> Option<TransportEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Ask the worker to stop
    pub fn shutdown(&self) {
        let _ = self.command_tx.try_send(TransportCommand::Shutdown);
    }
}

/// Transport pipeline with channel-based communication
pub struct TransportClient {
    config: TransportConfig,
    command_tx: Sender<TransportCommand>,
    command_rx: Receiver<TransportCommand>,
    event_tx: Sender<TransportEvent>,
    event_rx: Receiver<TransportEvent>,
}

impl TransportClient {
    /// Create a new transport pipeline
    pub fn new(config: TransportConfig) -> Self {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);

        Self {
            config,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Get a handle for issuing uploads and receiving events
    pub fn handle(&self) -> TransportHandle {
        TransportHandle {
            command_tx: self.command_tx.clone(),
            event_rx: self.event_rx.clone(),
        }
    }

    /// Start the worker thread that performs uploads.
    pub fn spawn_worker(self) -> Result<()> {
        let config = self.config.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        std::thread::spawn(move || {
            info!("Transport worker starting");

            let runtime = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {}", e);
                    let _ = event_tx.send(TransportEvent::Shutdown);
                    return;
                }
            };

            let endpoint = match config.endpoint() {
                Ok(url) => url,
                Err(e) => {
                    error!("Invalid transport configuration: {}", e);
                    let _ = event_tx.send(TransportEvent::Shutdown);
                    return;
                }
            };

            let client = match reqwest::Client::builder()
                .connect_timeout(config.connect_timeout)
                .timeout(config.request_timeout)
                .build()
            {
                Ok(client) => client,
                Err(e) => {
                    error!("Failed to build HTTP client: {}", e);
                    let _ = event_tx.send(TransportEvent::Shutdown);
                    return;
                }
            };

            info!("Transport worker ready, endpoint {}", endpoint);

            loop {
                match command_rx.recv() {
                    Ok(TransportCommand::Send {
                        payload,
                        request_id,
                        cancel,
                    }) => {
                        debug!(
                            "Uploading {} bytes for request {}",
                            payload.len(),
                            request_id
                        );

                        let event =
                            runtime.block_on(run_upload(&client, &endpoint, payload, request_id, cancel));
                        let _ = event_tx.send(event);
                    }

                    Ok(TransportCommand::Shutdown) => {
                        info!("Transport worker shutting down");
                        let _ = event_tx.send(TransportEvent::Shutdown);
                        break;
                    }

                    Err(e) => {
                        error!("Command channel error: {}", e);
                        break;
                    }
                }
            }

            info!("Transport worker stopped");
        });

        Ok(())
    }
}

/// Race the upload against its cancellation signal.
///
/// A cancelled upload performs no reply parsing; whatever the server sends
/// afterwards is dropped on the floor.
async fn run_upload(
    client: &reqwest::Client,
    endpoint: &Url,
    payload: CapturedAudio,
    request_id: Uuid,
    mut cancel: oneshot::Receiver<()>,
) -> TransportEvent {
    tokio::select! {
        _ = &mut cancel => {
            debug!("Request {} cancelled by user", request_id);
            TransportEvent::Failed {
                request_id,
                error: TalkbackError::Cancelled,
            }
        }
        result = upload(client, endpoint, payload) => match result {
            Ok(reply) => TransportEvent::Completed { request_id, reply },
            Err(error) => TransportEvent::Failed { request_id, error },
        }
    }
}

async fn upload(
    client: &reqwest::Client,
    endpoint: &Url,
    payload: CapturedAudio,
) -> Result<ReplyPayload> {
    let part = Part::bytes(payload.data)
        .file_name(payload.file_name)
        .mime_str(&payload.mime_type)
        .map_err(|e| TalkbackError::Network(format!("Failed to build audio part: {}", e)))?;

    let form = Form::new().part(AUDIO_FIELD, part);

    let response = client
        .post(endpoint.clone())
        .multipart(form)
        .send()
        .await
        .map_err(|e| TalkbackError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TalkbackError::Server(status.as_u16()));
    }

    response
        .json::<ReplyPayload>()
        .await
        .map_err(|e| TalkbackError::Network(format!("Failed to parse reply: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pipeline whose worker is intentionally not spawned; commands stay
    /// queued. The client must stay alive to keep the channels open.
    fn detached() -> (TransportClient, TransportHandle) {
        let client = TransportClient::new(TransportConfig::default());
        let handle = client.handle();
        (client, handle)
    }

    #[test]
    fn test_send_returns_unique_request_handles() {
        let (_client, handle) = detached();

        let first = handle.send(CapturedAudio::wav(vec![0; 4])).unwrap();
        let second = handle.send(CapturedAudio::wav(vec![0; 4])).unwrap();

        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (_client, handle) = detached();
        let mut request = handle.send(CapturedAudio::wav(vec![0; 4])).unwrap();

        request.cancel();
        request.cancel();
    }

    #[test]
    fn test_cancel_wakes_the_receiver() {
        let (tx, mut rx) = oneshot::channel();
        let mut request = PendingRequest::new(Uuid::new_v4(), tx);

        assert!(rx.try_recv().is_err());
        request.cancel();
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_dropping_the_handle_signals_cancellation() {
        let (tx, mut rx) = oneshot::channel();
        let request = PendingRequest::new(Uuid::new_v4(), tx);

        drop(request);
        // A closed channel wakes the select arm just like an explicit cancel
        assert!(rx.try_recv().is_err());
        assert!(rx.blocking_recv().is_err());
    }

    #[test]
    fn test_no_events_before_worker_runs() {
        let (_client, handle) = detached();
        let _request = handle.send(CapturedAudio::wav(vec![0; 4])).unwrap();

        assert!(handle.try_recv_event().is_none());
    }
}
