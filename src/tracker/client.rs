//! Websocket client for the gesture tracking service.
//!
//! Implements the connection lifecycle as a statum typestate machine so the
//! read loop can only run on an established connection.
//!
//! # State Machine
//!
//! ```text
//! Connecting ──► Connected ──► Closed
//!     │                          ▲
//!     └──────(connect error)─────┘
//! ```
//!
//! # Data Flow
//!
//! ```text
//! tracker service ─[JSON text frames]→ TrackerClient ─[TrackerEvent]→ router
//!                                           ▲
//!                                     [OutboundEvent]
//!                                      (test_gesture)
//! ```
//!
//! There is deliberately no reconnect loop: when the transport closes the
//! client emits a final `Disconnected` lifecycle event and the task ends.
//! The keyboard fallback keeps the UI usable without the tracker.

use futures_util::{SinkExt, StreamExt};
use statum::{machine, state};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::event::{decode_frame, LinkStatus, OutboundEvent, TrackerEvent};
use super::client_handle::TrackerSettings;

/// Errors raised by the tracker client task.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Websocket handshake or transport failure.
    #[error("Connection error: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),

    /// The event channel towards the router is gone.
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// Internal lifecycle inconsistency.
    #[error("Client state error: {0}")]
    StateError(String),
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection lifecycle states using statum.
#[state]
#[derive(Debug, Clone)]
pub enum ClientState {
    Connecting, // Handshake in progress
    Connected,  // Read/write loop running
    Closed,     // Transport gone, task winding down
}

/// Tracker connection with compile-time state safety via statum.
#[machine]
pub struct TrackerClient<S: ClientState> {
    settings: TrackerSettings,
    event_sender: mpsc::Sender<TrackerEvent>,
    outbound_receiver: mpsc::Receiver<OutboundEvent>,
    cancel: CancellationToken,
    socket: Option<WsStream>,
}

impl TrackerClient<Connecting> {
    pub fn create(
        settings: TrackerSettings,
        event_sender: mpsc::Sender<TrackerEvent>,
        outbound_receiver: mpsc::Receiver<OutboundEvent>,
        cancel: CancellationToken,
    ) -> Self {
        info!("Creating tracker client for {}", settings.server_url);

        Self::new(
            settings,
            event_sender,
            outbound_receiver,
            cancel,
            None, // socket
        )
    }

    /// Performs the websocket handshake and transitions to Connected.
    ///
    /// Emits the `Connected` lifecycle event on success. A handshake failure
    /// is returned to the caller, which surfaces it as a status message.
    pub async fn connect(mut self) -> Result<TrackerClient<Connected>, TrackerError> {
        info!("Connecting to gesture tracker: {}", self.settings.server_url);

        let (socket, response) = connect_async(self.settings.server_url.as_str()).await?;
        debug!("Handshake complete, status: {}", response.status());

        if self
            .event_sender
            .send(TrackerEvent::Link(LinkStatus::Connected))
            .await
            .is_err()
        {
            return Err(TrackerError::ChannelError(
                "Event channel closed during connect".to_string(),
            ));
        }

        self.socket = Some(socket);
        Ok(self.transition())
    }
}

impl TrackerClient<Connected> {
    /// Main read/write loop, runs until the transport closes or the
    /// cancellation token fires.
    ///
    /// Inbound text frames are decoded into [`TrackerEvent`]s; a frame that
    /// fails to decode becomes a lifecycle error event rather than ending
    /// the loop, so one malformed payload never takes the connection down.
    pub async fn run_until_closed(mut self) -> Result<TrackerClient<Closed>, TrackerError> {
        let socket = match self.socket.take() {
            Some(socket) => socket,
            None => {
                return Err(TrackerError::StateError(
                    "Connected client without a socket".to_string(),
                ))
            }
        };

        let (mut sink, mut stream) = socket.split();
        let events = self.event_sender.clone();
        let cancel = self.cancel.clone();

        info!("Tracker client entering read loop");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Shutdown requested, closing tracker connection");
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }

                outbound = self.outbound_receiver.recv() => {
                    match outbound {
                        Some(event) => {
                            debug!("Sending outbound event: {:?}", event);
                            if let Err(e) = sink.send(Message::text(event.to_wire())).await {
                                warn!("Failed to send outbound event: {}", e);
                            }
                        }
                        None => {
                            info!("Outbound channel closed, shutting down client");
                            let _ = sink.send(Message::Close(None)).await;
                            break;
                        }
                    }
                }

                frame = stream.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            match decode_frame(text.as_str()) {
                                Ok(Some(event)) => {
                                    if events.send(event).await.is_err() {
                                        error!("Event channel closed, stopping client");
                                        break;
                                    }
                                }
                                Ok(None) => {}
                                Err(e) => {
                                    warn!("Dropping malformed frame: {}", e);
                                    let status = LinkStatus::Error(format!(
                                        "Bad frame from tracker: {}",
                                        e
                                    ));
                                    if events.send(TrackerEvent::Link(status)).await.is_err() {
                                        break;
                                    }
                                }
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("Tracker closed the connection");
                            let _ = events
                                .send(TrackerEvent::Link(LinkStatus::Disconnected))
                                .await;
                            break;
                        }
                        Some(Ok(other)) => {
                            debug!("Ignoring non-text frame: {:?}", other);
                        }
                        Some(Err(e)) => {
                            warn!("Transport error: {}", e);
                            let _ = events
                                .send(TrackerEvent::Link(LinkStatus::Error(e.to_string())))
                                .await;
                            break;
                        }
                    }
                }
            }
        }

        info!("Tracker client leaving read loop");
        Ok(self.transition())
    }
}

impl TrackerClient<Closed> {
    /// Final state; nothing left to release beyond dropping the machine.
    pub fn finish(self) {
        debug!("Tracker client closed");
    }
}
