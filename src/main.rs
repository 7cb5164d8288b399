pub mod config;
pub mod mapping;
pub mod nav;
pub mod tracker;
pub mod ui;

use crate::mapping::{EventRouter, GestureMappingConfig};
use crate::tracker::{TrackerHandle, TrackerSettings};
use crate::ui::GestureNavUI;
use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    info!("Loading configuration");
    if let Err(e) = config::ensure_default_config() {
        warn!("Could not write default configuration: {}", e);
    }
    let app_config = config::load_or_default();

    let tracker_settings = TrackerSettings {
        server_url: app_config.tracker.server_url.clone(),
        ..TrackerSettings::default()
    };

    // Channels between the pipeline stages
    let (tracker_tx, tracker_rx) = mpsc::channel(1000);
    let (nav_tx, nav_rx) = mpsc::channel(100);
    let (frame_tx, frame_rx) = mpsc::channel(8);
    let (status_tx, status_rx) = mpsc::channel(100);

    info!("Spawning tracker client");
    let mut tracker_handle = TrackerHandle::spawn(Some(tracker_settings), tracker_tx)
        .map_err(|e| eyre!("Failed to spawn tracker client: {}", e))?;
    let outbound_sender = tracker_handle.outbound_sender();

    let mut router = EventRouter::new(tracker_rx, nav_tx, frame_tx, status_tx);
    let mapping_config = Box::new(
        GestureMappingConfig::default_config().with_debounce(app_config.mapping.debounce_ms),
    );
    router
        .activate_mapping(mapping_config)
        .await
        .map_err(|e| eyre!("Failed to activate gesture mapping: {}", e))?;

    let _router_handle = tokio::spawn(async move {
        let _res = router.run().await;
    });

    info!("Starting UI");
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_inner_size([960.0, 720.0])
        .with_title("GestureNav");

    let ui_config = app_config.clone();
    eframe::run_native(
        "GestureNav",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(GestureNavUI::new(
                cc,
                &ui_config,
                nav_rx,
                frame_rx,
                status_rx,
                outbound_sender,
            )))
        }),
    )
    .map_err(|e| eyre!("UI error: {}", e))?;

    info!("UI closed, shutting down tracker client");
    if let Err(e) = tracker_handle.shutdown().await {
        warn!("Tracker client shutdown: {}", e);
    }

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
