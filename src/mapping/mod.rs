//! Mapping of tracker gestures onto navigation commands.
//!
//! The mapping engine wraps a pluggable [`MappingStrategy`] in a statum
//! state machine running on its own task. A [`DebounceGate`] in front of the
//! strategy drops gestures that arrive too soon after the last accepted one;
//! camera frames and lifecycle events bypass the engine entirely and are
//! routed straight to the UI by the [`EventRouter`].

pub mod engine;
pub mod error;
pub mod gesture;
pub mod router;
pub mod strategy;

pub use engine::{MappingEngine, MappingEngineHandle, MappingEngineState};
pub use error::MappingError;
pub use gesture::GestureMappingConfig;
pub use router::EventRouter;
pub use strategy::{MappingConfig, MappingStrategy};

use std::time::{Duration, Instant};

/// Drops events arriving within a fixed window of the last accepted event.
///
/// The window is measured from the previous ACCEPTED event; a dropped event
/// does not reset it. The first event is always accepted.
#[derive(Debug, Clone)]
pub struct DebounceGate {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl DebounceGate {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window: Duration::from_millis(window_ms),
            last_accepted: None,
        }
    }

    /// Checks the gate against the current time.
    pub fn should_accept(&mut self) -> bool {
        self.accept_at(Instant::now())
    }

    /// Checks the gate against an explicit clock reading.
    ///
    /// Split out from [`DebounceGate::should_accept`] so the timing behavior
    /// is testable with synthetic instants.
    pub fn accept_at(&mut self, now: Instant) -> bool {
        match self.last_accepted {
            Some(last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_event_is_always_accepted() {
        let mut gate = DebounceGate::new(300);
        assert!(gate.accept_at(Instant::now()));
    }

    #[test]
    fn second_event_inside_the_window_is_dropped() {
        let start = Instant::now();
        let mut gate = DebounceGate::new(300);

        assert!(gate.accept_at(start));
        assert!(!gate.accept_at(start + Duration::from_millis(299)));
    }

    #[test]
    fn event_at_the_window_boundary_is_accepted() {
        let start = Instant::now();
        let mut gate = DebounceGate::new(300);

        assert!(gate.accept_at(start));
        assert!(gate.accept_at(start + Duration::from_millis(300)));
    }

    #[test]
    fn dropped_events_do_not_extend_the_window() {
        let start = Instant::now();
        let mut gate = DebounceGate::new(300);

        assert!(gate.accept_at(start));
        // A burst inside the window is dropped wholesale...
        assert!(!gate.accept_at(start + Duration::from_millis(100)));
        assert!(!gate.accept_at(start + Duration::from_millis(200)));
        // ...and does not push the next acceptance out.
        assert!(gate.accept_at(start + Duration::from_millis(300)));
    }

    #[test]
    fn zero_window_accepts_everything() {
        let start = Instant::now();
        let mut gate = DebounceGate::new(0);

        assert!(gate.accept_at(start));
        assert!(gate.accept_at(start));
    }
}
