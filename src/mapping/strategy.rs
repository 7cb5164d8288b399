//! Trait seams for gesture-to-navigation mapping strategies.

use crate::mapping::MappingError;
use crate::nav::NavCommand;
use crate::tracker::GestureEvent;

/// Configuration that can validate itself and build a strategy.
///
/// Mirrors the split between a serializable binding table and the runtime
/// strategy built from it: the config is what lives in the TOML file, the
/// strategy is what the engine runs.
pub trait MappingConfig: Send + Sync + 'static {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), MappingError>;

    /// Builds a strategy from this configuration.
    fn create_strategy(&self) -> Result<Box<dyn MappingStrategy>, MappingError>;

    /// Human-readable name for logs and the engine handle.
    fn name(&self) -> String;
}

/// Converts accepted gesture events into navigation commands.
pub trait MappingStrategy: Send + Sync + 'static {
    /// Maps one gesture. `None` means the gesture is not bound.
    fn map(&mut self, input: &GestureEvent) -> Option<NavCommand>;

    /// Called once before the engine starts processing.
    fn initialize(&mut self) -> Result<(), MappingError>;

    /// Called once during engine shutdown.
    fn shutdown(&mut self);

    /// Debounce window in milliseconds, if the strategy wants one.
    ///
    /// Events arriving within the window of the last accepted event are
    /// dropped before `map` is called.
    fn debounce_window(&self) -> Option<u64> {
        None
    }

    /// Strategy name for logs.
    fn name(&self) -> &str;
}
