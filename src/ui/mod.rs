//! # GestureNav User Interface Module
//!
//! eframe/egui front end for gesture-driven navigation. The UI is the sink
//! of the whole pipeline: it drains the navigation, camera and status
//! channels once per frame, applies them to the [`NavModel`] and renders
//! the three-panel layout:
//!
//! - **Top panel**: the navigation button row with the highlighted cursor
//! - **Central panel**: camera placeholder, swapped for live frames
//! - **Bottom panel**: status line and tracker connection badge
//!
//! Keyboard input (ArrowLeft/ArrowRight/Enter/Space) is the local fallback
//! path and lands on the same [`NavModel`] methods as mapped gestures, so
//! both input paths derive identical navigation targets. All channel reads
//! are non-blocking; the frame loop never waits on the backend.

pub mod camera_view;
pub mod common;
pub mod debug_menu;

use eframe::egui::{self, Button, Key, Vec2};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::nav::{NavCommand, NavModel};
use crate::tracker::{CameraFramePayload, LinkStatus, OutboundEvent};

use self::camera_view::CameraView;
use self::common::{link_badge, LinkIndicator, UiColors};
use self::debug_menu::DebugMenuData;

/// Central UI component; owns the navigation model and all channel sinks.
pub struct GestureNavUI {
    /// The single piece of navigation state (cursor, status, pendings)
    nav: NavModel,

    /// Camera placeholder / live frame panel
    camera: CameraView,

    /// Gesture injection panel, toggled with F12
    debug_menu: DebugMenuData,

    /// Mapped navigation commands from the gesture pipeline
    nav_receiver: mpsc::Receiver<NavCommand>,

    /// Camera frames, routed past the mapping engine
    frame_receiver: mpsc::Receiver<CameraFramePayload>,

    /// Transport lifecycle events
    status_receiver: mpsc::Receiver<LinkStatus>,

    /// Connection badge state for the bottom panel
    link: LinkIndicator,
}

impl GestureNavUI {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &AppConfig,
        nav_receiver: mpsc::Receiver<NavCommand>,
        frame_receiver: mpsc::Receiver<CameraFramePayload>,
        status_receiver: mpsc::Receiver<LinkStatus>,
        outbound_sender: mpsc::Sender<OutboundEvent>,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        GestureNavUI {
            nav: NavModel::new(
                config.ui.buttons.clone(),
                Duration::from_millis(config.ui.navigation_delay_ms),
            ),
            camera: CameraView::new(),
            debug_menu: DebugMenuData::new(outbound_sender),
            nav_receiver,
            frame_receiver,
            status_receiver,
            link: LinkIndicator::Waiting,
        }
    }

    /// Applies everything the backend produced since the last frame.
    fn drain_channels(&mut self, ctx: &egui::Context, now: Instant) {
        while let Ok(command) = self.nav_receiver.try_recv() {
            self.nav.apply(command, now);
        }

        // Only the newest camera frame matters; decode once per UI frame.
        let mut latest_frame = None;
        while let Ok(payload) = self.frame_receiver.try_recv() {
            latest_frame = Some(payload);
        }
        if let Some(payload) = latest_frame {
            let status = self.camera.push_frame(ctx, &payload);
            self.nav.set_status(status);
        }

        while let Ok(status) = self.status_receiver.try_recv() {
            match status {
                LinkStatus::Connected => {
                    self.link = LinkIndicator::Connected;
                    self.nav.set_status("Connected to gesture tracker!");
                }
                LinkStatus::Disconnected => {
                    self.link = LinkIndicator::Disconnected;
                    self.nav.set_status("Disconnected from gesture tracker");
                }
                LinkStatus::Error(message) => {
                    self.link = LinkIndicator::Disconnected;
                    self.nav.set_status(format!("Error: {}", message));
                }
            }
        }
    }

    /// Keyboard fallback mirroring the gesture bindings.
    fn handle_keyboard(&mut self, ctx: &egui::Context, now: Instant) {
        let (left, right, activate, toggle_debug) = ctx.input(|i| {
            (
                i.key_pressed(Key::ArrowLeft),
                i.key_pressed(Key::ArrowRight),
                i.key_pressed(Key::Enter) || i.key_pressed(Key::Space),
                i.key_pressed(Key::F12),
            )
        });

        if left {
            self.nav.select_prev();
        }
        if right {
            self.nav.select_next();
        }
        if activate {
            self.nav.activate(now);
        }
        if toggle_debug {
            self.debug_menu.open = !self.debug_menu.open;
        }
    }
}

impl eframe::App for GestureNavUI {
    /// Main UI update loop: drain channels, fire due navigations, render.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.drain_channels(ctx, now);
        self.handle_keyboard(ctx, now);
        self.nav.tick(now);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.ctx().request_repaint_after(Duration::from_millis(33));
            let width = ui.available_width() - 60.0;

            // Top navigation panel with the button row
            egui::TopBottomPanel::top("top_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    let count = self.nav.buttons().len();
                    let cursor = self.nav.cursor();
                    let mut clicked = None;

                    ui.horizontal_centered(|ui| {
                        for (index, button) in self.nav.buttons().iter().enumerate() {
                            let mut nav_button =
                                Button::new(button.label.as_str()).min_size(Vec2 {
                                    x: width / count as f32,
                                    y: 28.0,
                                });
                            if index == cursor {
                                nav_button = nav_button.fill(UiColors::HIGHLIGHT);
                            }
                            if ui.add(nav_button).clicked() {
                                clicked = Some(index);
                            }
                        }
                    });

                    // A mouse click both moves the cursor and activates.
                    if let Some(index) = clicked {
                        self.nav.select(index);
                        self.nav.activate(now);
                    }
                });

            // Central content panel with the camera view
            egui::CentralPanel::default().show_inside(ui, |ui| {
                self.camera.render(ui);
            });

            // Bottom status panel
            egui::TopBottomPanel::bottom("bottom_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal_centered(|ui| {
                        link_badge(ui, self.link);
                        ui.separator();
                        ui.label(self.nav.status());
                        if self.camera.is_live() {
                            ui.separator();
                            ui.label(format!("Blinks: {}", self.camera.blink_count()));
                        }
                        if let Some(at) = self.camera.last_frame_at() {
                            ui.separator();
                            ui.label(format!("Last frame: {}", at.format("%H:%M:%S")));
                        }
                    });
                });
        });

        if self.debug_menu.open {
            let mut open = true;
            egui::Window::new("Gesture Debug")
                .open(&mut open)
                .resizable(false)
                .show(ctx, |ui| {
                    self.debug_menu.render(ui);
                });
            self.debug_menu.open = open;
        }
    }
}
