//! Gesture mapping strategy: tracker gestures to navigation commands.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::mapping::{MappingConfig, MappingError, MappingStrategy};
use crate::nav::NavCommand;
use crate::tracker::{GestureEvent, GestureKind};

/// Default debounce window between accepted gestures, in milliseconds.
///
/// Matches the tracker's classification cadence; shorter windows let a
/// single sustained head tilt register as several navigation steps.
pub const GESTURE_DEBOUNCE_MS: u64 = 300;

/// Binding table from gesture kinds to navigation commands.
#[derive(Debug, Clone)]
pub struct GestureMappingConfig {
    bindings: HashMap<GestureKind, NavCommand>,
    debounce_ms: u64,
    name: String,
}

impl GestureMappingConfig {
    /// Standard bindings: tilt right/left step the cursor, blink activates.
    pub fn default_config() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(GestureKind::TiltRight, NavCommand::Next);
        bindings.insert(GestureKind::TiltLeft, NavCommand::Prev);
        bindings.insert(GestureKind::Blink, NavCommand::Activate);

        Self {
            bindings,
            debounce_ms: GESTURE_DEBOUNCE_MS,
            name: "Gesture Navigation".to_string(),
        }
    }

    /// Overrides the debounce window (from the config file).
    pub fn with_debounce(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }
}

impl MappingConfig for GestureMappingConfig {
    fn validate(&self) -> Result<(), MappingError> {
        if self.bindings.is_empty() {
            return Err(MappingError::ConfigError(
                "Gesture mapping has no bindings".to_string(),
            ));
        }
        Ok(())
    }

    fn create_strategy(&self) -> Result<Box<dyn MappingStrategy>, MappingError> {
        self.validate()?;
        Ok(Box::new(GestureMapping {
            bindings: self.bindings.clone(),
            debounce_ms: self.debounce_ms,
            name: self.name.clone(),
        }))
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Runtime strategy built from a [`GestureMappingConfig`].
pub struct GestureMapping {
    bindings: HashMap<GestureKind, NavCommand>,
    debounce_ms: u64,
    name: String,
}

impl MappingStrategy for GestureMapping {
    fn map(&mut self, input: &GestureEvent) -> Option<NavCommand> {
        let command = self.bindings.get(&input.kind).copied();
        match command {
            Some(cmd) => debug!("Mapped {} to {:?}", input.kind, cmd),
            None => debug!("No binding for gesture: {}", input.kind),
        }
        command
    }

    fn initialize(&mut self) -> Result<(), MappingError> {
        info!(
            "Gesture mapping initialized with {} bindings, {}ms debounce",
            self.bindings.len(),
            self.debounce_ms
        );
        Ok(())
    }

    fn shutdown(&mut self) {
        info!("Gesture mapping shut down");
    }

    fn debounce_window(&self) -> Option<u64> {
        Some(self.debounce_ms)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy() -> Box<dyn MappingStrategy> {
        GestureMappingConfig::default_config()
            .create_strategy()
            .unwrap()
    }

    fn gesture(kind: GestureKind) -> GestureEvent {
        GestureEvent { kind, count: None }
    }

    #[test]
    fn tilts_step_the_cursor() {
        let mut mapping = strategy();
        assert_eq!(
            mapping.map(&gesture(GestureKind::TiltRight)),
            Some(NavCommand::Next)
        );
        assert_eq!(
            mapping.map(&gesture(GestureKind::TiltLeft)),
            Some(NavCommand::Prev)
        );
    }

    #[test]
    fn blink_activates() {
        let mut mapping = strategy();
        assert_eq!(
            mapping.map(&gesture(GestureKind::Blink)),
            Some(NavCommand::Activate)
        );
    }

    #[test]
    fn default_config_requests_the_standard_debounce() {
        let mapping = strategy();
        assert_eq!(mapping.debounce_window(), Some(GESTURE_DEBOUNCE_MS));
    }

    #[test]
    fn debounce_override_is_honored() {
        let mapping = GestureMappingConfig::default_config()
            .with_debounce(150)
            .create_strategy()
            .unwrap();
        assert_eq!(mapping.debounce_window(), Some(150));
    }

    #[test]
    fn empty_bindings_fail_validation() {
        let config = GestureMappingConfig {
            bindings: HashMap::new(),
            debounce_ms: GESTURE_DEBOUNCE_MS,
            name: "empty".to_string(),
        };
        assert!(config.validate().is_err());
    }
}
