//! # Gesture Tracker Integration Module
//!
//! Connects gesturenav to the external gesture tracking service. The service
//! watches the webcam, classifies head gestures (tilts and blinks) and pushes
//! them, together with annotated camera frames, over a persistent websocket.
//! This module owns that connection end-to-end:
//!
//! ```text
//! tracker/
//! ├── event.rs         - Wire envelope, payload types, frame decoding
//! ├── client.rs        - Connection state machine and read/write loop
//! └── client_handle.rs - Spawn API and settings
//! ```
//!
//! Everything downstream consumes typed [`TrackerEvent`]s; no other module
//! touches the wire format or the transport.

pub mod client;
pub mod client_handle;
pub mod event;

pub use client::TrackerError;
pub use client_handle::{TrackerHandle, TrackerSettings};
pub use event::{
    CameraFramePayload, GestureEvent, GestureKind, LinkStatus, OutboundEvent, TrackerEvent,
};
