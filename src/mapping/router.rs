//! Fans tracker events out to the mapping engine and the UI channels.
//!
//! Gestures go through the engine (and its debounce gate) and come back as
//! navigation commands; camera frames and lifecycle events are passed to
//! their UI channels untouched. All sends towards the UI are non-blocking -
//! the UI drains its channels once per frame, and a dropped camera frame is
//! cheaper than a stalled router.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::mapping::{MappingConfig, MappingEngineHandle, MappingError};
use crate::nav::NavCommand;
use crate::tracker::{CameraFramePayload, GestureEvent, LinkStatus, TrackerEvent};

/// Routes [`TrackerEvent`]s between the client, the engine and the UI.
pub struct EventRouter {
    tracker_rx: mpsc::Receiver<TrackerEvent>,

    nav_tx: mpsc::Sender<NavCommand>,
    frame_tx: mpsc::Sender<CameraFramePayload>,
    status_tx: mpsc::Sender<LinkStatus>,

    engine: Option<EngineSlot>,
}

struct EngineSlot {
    handle: MappingEngineHandle,
    command_rx: mpsc::Receiver<NavCommand>,
    gesture_tx: mpsc::Sender<GestureEvent>,
}

impl EventRouter {
    pub fn new(
        tracker_rx: mpsc::Receiver<TrackerEvent>,
        nav_tx: mpsc::Sender<NavCommand>,
        frame_tx: mpsc::Sender<CameraFramePayload>,
        status_tx: mpsc::Sender<LinkStatus>,
    ) -> Self {
        info!("Creating new EventRouter");

        Self {
            tracker_rx,
            nav_tx,
            frame_tx,
            status_tx,
            engine: None,
        }
    }

    /// Starts a mapping engine from the given configuration.
    ///
    /// An already-active engine is shut down first, so the router never
    /// feeds two engines at once.
    pub async fn activate_mapping(
        &mut self,
        config: Box<dyn MappingConfig>,
    ) -> Result<(), MappingError> {
        if let Err(e) = config.validate() {
            return Err(MappingError::ConfigError(format!(
                "Invalid configuration: {}",
                e
            )));
        }

        if let Some(mut slot) = self.engine.take() {
            info!("Deactivating existing mapping engine: {}", slot.handle.name);
            if let Err(e) = slot.handle.shutdown().await {
                warn!("Error shutting down existing engine: {}", e);
            }
        }

        info!("Activating mapping: {}", config.name());
        let strategy = config.create_strategy()?;
        let mut handle = MappingEngineHandle::new(config.name());
        let (command_rx, gesture_tx) = handle.start(strategy)?;

        self.engine = Some(EngineSlot {
            handle,
            command_rx,
            gesture_tx,
        });
        Ok(())
    }

    /// Main routing loop; ends when the tracker channel closes.
    pub async fn run(mut self) -> Result<(), MappingError> {
        let mut engine = self.engine.take().ok_or_else(|| {
            MappingError::InitializationError("Router started without a mapping engine".to_string())
        })?;

        info!("Start event routing");
        loop {
            tokio::select! {
                event = self.tracker_rx.recv() => {
                    match event {
                        Some(TrackerEvent::Gesture(gesture)) => {
                            debug!("Routing gesture to engine: {}", gesture.kind);
                            if let Err(e) = engine.gesture_tx.try_send(gesture) {
                                warn!("Engine input full, dropping gesture: {}", e);
                            }
                        }
                        Some(TrackerEvent::CameraFrame(payload)) => {
                            if self.frame_tx.try_send(payload).is_err() {
                                // UI is behind; newer frames supersede this one.
                                debug!("Frame channel full, dropping camera frame");
                            }
                        }
                        Some(TrackerEvent::Link(status)) => {
                            info!("Link status: {:?}", status);
                            if let Err(e) = self.status_tx.try_send(status) {
                                warn!("Status channel full: {}", e);
                            }
                        }
                        None => {
                            info!("Tracker channel closed, stopping router");
                            break;
                        }
                    }
                }

                command = engine.command_rx.recv() => {
                    match command {
                        Some(command) => {
                            if let Err(e) = self.nav_tx.try_send(command) {
                                warn!("Navigation channel full, dropping command: {}", e);
                            }
                        }
                        None => {
                            warn!("Engine output closed, stopping router");
                            break;
                        }
                    }
                }
            }
        }

        if let Err(e) = engine.handle.shutdown().await {
            warn!("Error shutting down engine: {}", e);
        }

        info!("Event routing stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::GestureMappingConfig;
    use crate::tracker::GestureKind;
    use std::time::Duration;

    struct Channels {
        tracker_tx: mpsc::Sender<TrackerEvent>,
        nav_rx: mpsc::Receiver<NavCommand>,
        frame_rx: mpsc::Receiver<CameraFramePayload>,
        status_rx: mpsc::Receiver<LinkStatus>,
    }

    async fn start_router(debounce_ms: u64) -> Channels {
        let (tracker_tx, tracker_rx) = mpsc::channel(100);
        let (nav_tx, nav_rx) = mpsc::channel(100);
        let (frame_tx, frame_rx) = mpsc::channel(100);
        let (status_tx, status_rx) = mpsc::channel(100);

        let mut router = EventRouter::new(tracker_rx, nav_tx, frame_tx, status_tx);
        router
            .activate_mapping(Box::new(
                GestureMappingConfig::default_config().with_debounce(debounce_ms),
            ))
            .await
            .unwrap();
        tokio::spawn(router.run());

        Channels {
            tracker_tx,
            nav_rx,
            frame_rx,
            status_rx,
        }
    }

    fn gesture(kind: GestureKind) -> TrackerEvent {
        TrackerEvent::Gesture(GestureEvent { kind, count: None })
    }

    #[tokio::test]
    async fn gestures_come_back_as_navigation_commands() {
        let mut ch = start_router(0).await;

        ch.tracker_tx
            .send(gesture(GestureKind::TiltRight))
            .await
            .unwrap();

        let command = tokio::time::timeout(Duration::from_secs(2), ch.nav_rx.recv())
            .await
            .expect("timed out waiting for command");
        assert_eq!(command, Some(NavCommand::Next));
    }

    #[tokio::test]
    async fn camera_frames_bypass_the_engine() {
        let mut ch = start_router(0).await;

        let payload = CameraFramePayload {
            frame: "AAAA".to_string(),
            head_direction: "Left".to_string(),
            blink_count: 2,
        };
        ch.tracker_tx
            .send(TrackerEvent::CameraFrame(payload.clone()))
            .await
            .unwrap();

        let routed = tokio::time::timeout(Duration::from_secs(2), ch.frame_rx.recv())
            .await
            .expect("timed out waiting for frame");
        assert_eq!(routed, Some(payload));
    }

    #[tokio::test]
    async fn lifecycle_events_reach_the_status_channel() {
        let mut ch = start_router(0).await;

        ch.tracker_tx
            .send(TrackerEvent::Link(LinkStatus::Connected))
            .await
            .unwrap();

        let status = tokio::time::timeout(Duration::from_secs(2), ch.status_rx.recv())
            .await
            .expect("timed out waiting for status");
        assert_eq!(status, Some(LinkStatus::Connected));
    }

    #[tokio::test]
    async fn burst_inside_the_debounce_window_yields_one_command() {
        let mut ch = start_router(10_000).await;

        ch.tracker_tx
            .send(gesture(GestureKind::TiltRight))
            .await
            .unwrap();
        ch.tracker_tx
            .send(gesture(GestureKind::TiltRight))
            .await
            .unwrap();

        let first = tokio::time::timeout(Duration::from_secs(2), ch.nav_rx.recv())
            .await
            .expect("timed out waiting for command");
        assert_eq!(first, Some(NavCommand::Next));

        // Give the engine ample time to (not) map the second gesture.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(ch.nav_rx.try_recv().is_err());
    }
}
