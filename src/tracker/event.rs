//! Wire-level event types for the gesture tracking service.
//!
//! The tracker pushes JSON text frames shaped as `{"event": <name>, "data":
//! <object>}`. Two event names carry payloads we act on (`gesture` and
//! `camera_frame`); everything else is logged and dropped. Transport-level
//! connect/disconnect/error are surfaced as [`LinkStatus`] values so the UI
//! can show them on the status line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Classified gesture labels the navigation layer reacts to.
///
/// The backend also emits head-direction labels such as `Up`, `Down` and
/// `Center`; those parse as [`WireError::UnknownGesture`] and are dropped.
/// Only these three labels drive navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    TiltLeft,
    TiltRight,
    Blink,
}

impl GestureKind {
    /// Wire label for this gesture, as emitted by the tracker.
    pub fn label(&self) -> &'static str {
        match self {
            GestureKind::TiltLeft => "tilt_left",
            GestureKind::TiltRight => "tilt_right",
            GestureKind::Blink => "blink",
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for GestureKind {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tilt_left" => Ok(GestureKind::TiltLeft),
            "tilt_right" => Ok(GestureKind::TiltRight),
            "blink" => Ok(GestureKind::Blink),
            other => Err(WireError::UnknownGesture(other.to_string())),
        }
    }
}

/// A single accepted gesture notification.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,

    /// Running blink count, present on blink events from the backend.
    pub count: Option<u64>,
}

/// Payload of a `camera_frame` event.
///
/// `frame` is a base64-encoded JPEG; decoding happens in the UI layer so a
/// bad frame degrades to a status message instead of killing the client task.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CameraFramePayload {
    pub frame: String,
    pub head_direction: String,
    pub blink_count: u64,
}

/// Transport lifecycle notifications.
#[derive(Clone, Debug, PartialEq)]
pub enum LinkStatus {
    Connected,
    Disconnected,
    Error(String),
}

/// Everything the tracker client can hand to the rest of the application.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackerEvent {
    Gesture(GestureEvent),
    CameraFrame(CameraFramePayload),
    Link(LinkStatus),
}

/// Outbound frames, currently only the manual-debugging gesture injection.
#[derive(Clone, Debug, PartialEq)]
pub enum OutboundEvent {
    TestGesture(GestureKind),
}

impl OutboundEvent {
    /// Serializes the event into the tracker's JSON envelope.
    pub fn to_wire(&self) -> String {
        match self {
            OutboundEvent::TestGesture(kind) => serde_json::json!({
                "event": "test_gesture",
                "data": { "gesture": kind.label() },
            })
            .to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WireError {
    #[error("Malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown gesture label: {0}")]
    UnknownGesture(String),
}

#[derive(Debug, Deserialize)]
struct WireEnvelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GesturePayload {
    gesture: String,
    #[serde(default)]
    count: Option<u64>,
}

/// Decodes one inbound text frame.
///
/// Returns `Ok(None)` for event names we do not handle and for gesture
/// labels outside the three navigation gestures; both are normal traffic
/// from the backend, not errors worth surfacing.
pub fn decode_frame(text: &str) -> Result<Option<TrackerEvent>, WireError> {
    let envelope: WireEnvelope = serde_json::from_str(text)?;

    match envelope.event.as_str() {
        "gesture" => {
            let payload: GesturePayload = serde_json::from_value(envelope.data)?;
            match payload.gesture.parse::<GestureKind>() {
                Ok(kind) => Ok(Some(TrackerEvent::Gesture(GestureEvent {
                    kind,
                    count: payload.count,
                }))),
                Err(WireError::UnknownGesture(label)) => {
                    debug!("Ignoring unhandled gesture label: {}", label);
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        }
        "camera_frame" => {
            let payload: CameraFramePayload = serde_json::from_value(envelope.data)?;
            Ok(Some(TrackerEvent::CameraFrame(payload)))
        }
        other => {
            debug!("Ignoring unhandled event: {}", other);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_gesture_frame() {
        let frame = r#"{"event":"gesture","data":{"gesture":"tilt_right"}}"#;
        let event = decode_frame(frame).unwrap().unwrap();
        assert_eq!(
            event,
            TrackerEvent::Gesture(GestureEvent {
                kind: GestureKind::TiltRight,
                count: None,
            })
        );
    }

    #[test]
    fn decodes_blink_with_count() {
        let frame = r#"{"event":"gesture","data":{"gesture":"blink","count":7}}"#;
        let event = decode_frame(frame).unwrap().unwrap();
        assert_eq!(
            event,
            TrackerEvent::Gesture(GestureEvent {
                kind: GestureKind::Blink,
                count: Some(7),
            })
        );
    }

    #[test]
    fn decodes_camera_frame() {
        let frame = r#"{"event":"camera_frame","data":{"frame":"AAAA","head_direction":"Left","blink_count":3}}"#;
        let event = decode_frame(frame).unwrap().unwrap();
        match event {
            TrackerEvent::CameraFrame(payload) => {
                assert_eq!(payload.frame, "AAAA");
                assert_eq!(payload.head_direction, "Left");
                assert_eq!(payload.blink_count, 3);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn head_direction_labels_are_dropped() {
        // The backend emits raw head directions the navigation layer ignores.
        let frame = r#"{"event":"gesture","data":{"gesture":"Center"}}"#;
        assert_eq!(decode_frame(frame).unwrap(), None);
    }

    #[test]
    fn unknown_event_names_are_dropped() {
        let frame = r#"{"event":"heartbeat","data":{}}"#;
        assert_eq!(decode_frame(frame).unwrap(), None);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(decode_frame("not json").is_err());
    }

    #[test]
    fn malformed_camera_payload_is_an_error() {
        let frame = r#"{"event":"camera_frame","data":{"frame":"AAAA"}}"#;
        assert!(decode_frame(frame).is_err());
    }

    #[test]
    fn test_gesture_round_trips_through_the_envelope() {
        let wire = OutboundEvent::TestGesture(GestureKind::Blink).to_wire();
        let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(value["event"], "test_gesture");
        assert_eq!(value["data"]["gesture"], "blink");
    }
}
