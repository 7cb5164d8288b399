//! Debug panel for injecting gestures without a camera.
//!
//! Sends `test_gesture` frames to the tracker, which echoes them back as
//! regular gesture events, so the injected gesture exercises the full
//! pipeline including the debounce gate. Toggled with F12.

use eframe::egui::Ui;
use tokio::sync::mpsc;
use tracing::warn;

use crate::tracker::{GestureKind, OutboundEvent};

pub struct DebugMenuData {
    outbound_sender: mpsc::Sender<OutboundEvent>,
    pub open: bool,
}

impl DebugMenuData {
    pub fn new(outbound_sender: mpsc::Sender<OutboundEvent>) -> Self {
        Self {
            outbound_sender,
            open: false,
        }
    }

    pub fn render(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label("Inject gesture:");
            for kind in [
                GestureKind::TiltLeft,
                GestureKind::TiltRight,
                GestureKind::Blink,
            ] {
                if ui.button(kind.label()).clicked() {
                    self.send_test_gesture(kind);
                }
            }
        });
    }

    fn send_test_gesture(&self, kind: GestureKind) {
        if let Err(e) = self
            .outbound_sender
            .try_send(OutboundEvent::TestGesture(kind))
        {
            warn!("Failed to queue test gesture: {}", e);
        }
    }
}
