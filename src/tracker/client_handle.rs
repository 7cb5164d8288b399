//! Tracker Handle - Unified API for the gesture service connection
//!
//! Provides a high-level interface for the websocket client subsystem:
//! spawning the connection task, injecting debug gestures, and shutting the
//! connection down. The handle is the only piece the rest of the application
//! needs to touch.
//!

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::client::{TrackerClient, TrackerError};
use super::event::{LinkStatus, OutboundEvent, TrackerEvent};

/// Configuration settings for the tracker client subsystem
///
/// # Examples
///
/// ```rust
/// use gesturenav::tracker::TrackerSettings;
///
/// // Local tracker with default buffering
/// let local = TrackerSettings::default();
///
/// // Tracker on another machine in the workshop network
/// let remote = TrackerSettings {
///     server_url: "ws://192.168.0.40:5050/events".to_string(),
///     event_buffer: 256,
/// };
/// ```
#[derive(Clone, Debug)]
pub struct TrackerSettings {
    /// Websocket URL of the gesture tracking service
    pub server_url: String,

    /// Capacity of the outbound event channel
    ///
    /// Outbound traffic is only the occasional `test_gesture` frame, so a
    /// small buffer is plenty; sends are non-blocking and drop on overflow.
    pub event_buffer: usize,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:5050/events".to_string(),
            event_buffer: 32,
        }
    }
}

/// Handle for the running tracker connection task
///
/// Spawns the client as a single tokio task and keeps the two control
/// surfaces: the outbound channel for debug gestures and a cancellation
/// token for shutdown.
///
/// # Threading Model
///
/// One task owns the websocket exclusively; inbound events flow out through
/// the `mpsc::Sender<TrackerEvent>` given to [`TrackerHandle::spawn`]. When
/// the transport closes the task ends on its own - there is no reconnect -
/// and the final `Disconnected` lifecycle event tells the UI about it.
pub struct TrackerHandle {
    outbound_sender: mpsc::Sender<OutboundEvent>,
    cancel: CancellationToken,
    task_handle: Option<JoinHandle<Result<(), TrackerError>>>,
}

impl TrackerHandle {
    /// Spawns the tracker client task with the given settings.
    ///
    /// The connection is established inside the task; a handshake failure is
    /// reported through the event channel as a lifecycle error, so `spawn`
    /// itself only fails if task setup is impossible.
    ///
    /// # Arguments
    ///
    /// * `settings` - Optional configuration; uses defaults if None
    /// * `sender` - Channel for decoded tracker events towards the router
    pub fn spawn(
        settings: Option<TrackerSettings>,
        sender: mpsc::Sender<TrackerEvent>,
    ) -> Result<Self, TrackerError> {
        let settings = settings.unwrap_or_default();
        info!("Initializing tracker client with settings: {:?}", settings);

        let (outbound_sender, outbound_receiver) = mpsc::channel(settings.event_buffer);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let error_sender = sender.clone();

        let task_handle = tokio::spawn(async move {
            let client =
                TrackerClient::create(settings, sender, outbound_receiver, task_cancel);

            match client.connect().await {
                Ok(connected) => {
                    let closed = connected.run_until_closed().await?;
                    closed.finish();
                    Ok(())
                }
                Err(e) => {
                    warn!("Tracker connection failed: {}", e);
                    let status = LinkStatus::Error(format!(
                        "Could not reach gesture tracker: {}",
                        e
                    ));
                    let _ = error_sender.send(TrackerEvent::Link(status)).await;
                    Err(e)
                }
            }
        });

        info!("Tracker client task spawned");
        Ok(Self {
            outbound_sender,
            cancel,
            task_handle: Some(task_handle),
        })
    }

    /// Clone of the outbound channel for UI components.
    ///
    /// The debug panel uses it to send `test_gesture` frames, which the
    /// service echoes back as regular gesture events.
    pub fn outbound_sender(&self) -> mpsc::Sender<OutboundEvent> {
        self.outbound_sender.clone()
    }

    /// Gracefully shuts the connection down and waits for the task.
    pub async fn shutdown(&mut self) -> Result<(), TrackerError> {
        debug!("Sending shutdown signal to tracker client");
        self.cancel.cancel();

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => {
                    debug!("Tracker client task completed");
                    result
                }
                Err(e) => Err(TrackerError::StateError(format!(
                    "Tracker client task panicked: {}",
                    e
                ))),
            }
        } else {
            debug!("Tracker client already shut down");
            Ok(())
        }
    }
}
