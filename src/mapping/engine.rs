//! Mapping engine with statum state machine for strategy execution.
//!
//! Runs one strategy in its own tokio task with compile-time state safety.
//! The debounce gate sits in front of the strategy, so a gesture burst
//! inside the window produces exactly one navigation command.
//!
//! # State Machine
//!
//! ```text
//! Initializing ──► Configured ──► Active ──► Deactivating ──► Deactivated
//! ```
//!
//! # Data Flow
//!
//! ```text
//! GestureEvent ──► [Debounce Gate] ──► [Strategy] ──► NavCommand
//!       ▲                                                 │
//!   Input Channel                                   Output Channel
//! ```

use statum::{machine, state};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::mapping::{DebounceGate, MappingError, MappingStrategy};
use crate::nav::NavCommand;
use crate::tracker::GestureEvent;

/// States for the mapping engine lifecycle using statum.
#[state]
#[derive(Debug, Clone)]
pub enum MappingEngineState {
    Initializing, // Setting up engine structure
    Configured,   // Strategy loaded and validated
    Active,       // Processing events in main loop
    Deactivating, // Shutting down gracefully
    Deactivated,  // Fully stopped, ready for cleanup
}

/// Mapping engine with compile-time state safety via statum.
#[machine]
pub struct MappingEngine<S: MappingEngineState> {
    input_receiver: mpsc::Receiver<GestureEvent>,
    output_sender: mpsc::Sender<NavCommand>,
    name: String,
    strategy: Option<Box<dyn MappingStrategy>>,
    debounce: Option<DebounceGate>,
}

impl<S: MappingEngineState> MappingEngine<S> {
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

impl MappingEngine<Initializing> {
    pub fn create(
        input_receiver: mpsc::Receiver<GestureEvent>,
        output_sender: mpsc::Sender<NavCommand>,
        name: String,
    ) -> Self {
        info!("Initializing new mapping engine: {}", name);

        Self::new(
            input_receiver,
            output_sender,
            name,
            None, // strategy
            None, // debounce
        )
    }

    /// Configures the engine with a strategy and transitions to Configured.
    ///
    /// Initializes the strategy and sets up the debounce gate if the
    /// strategy requests one.
    pub fn configure(
        mut self,
        mut strategy: Box<dyn MappingStrategy>,
    ) -> Result<MappingEngine<Configured>, MappingError> {
        info!("Configuring mapping engine: {}", self.name);

        match strategy.initialize() {
            Ok(_) => {
                debug!("Strategy initialized successfully");

                let debounce = strategy.debounce_window().map(DebounceGate::new);
                if let Some(window) = strategy.debounce_window() {
                    debug!("Debounce gate configured with {}ms window", window);
                }

                self.strategy = Some(strategy);
                self.debounce = debounce;

                info!("Engine configured successfully: {}", self.name);
                Ok(self.transition())
            }
            Err(e) => {
                error!("Failed to initialize strategy: {}", e);
                Err(MappingError::InitializationError(format!(
                    "Failed to initialize strategy: {}",
                    e
                )))
            }
        }
    }
}

impl MappingEngine<Configured> {
    pub fn activate(self) -> MappingEngine<Active> {
        info!("Activating mapping engine: {}", self.name);
        self.transition()
    }
}

impl MappingEngine<Active> {
    /// Processes a single gesture through the debounce gate and strategy.
    ///
    /// Returns None if no input is available, the gate dropped the gesture,
    /// or the strategy has no binding for it.
    pub fn process_event(&mut self) -> Result<Option<NavCommand>, MappingError> {
        let strategy = match &mut self.strategy {
            Some(s) => s,
            None => {
                return Err(MappingError::StrategyError(
                    "No strategy available".to_string(),
                ))
            }
        };

        if let Ok(gesture) = self.input_receiver.try_recv() {
            if let Some(gate) = &mut self.debounce {
                if !gate.should_accept() {
                    debug!("Gesture dropped by debounce gate: {}", gesture.kind);
                    return Ok(None);
                }
            }

            match strategy.map(&gesture) {
                Some(command) => {
                    info!("Mapped {} to {:?}", gesture.kind, command);
                    return Ok(Some(command));
                }
                None => {
                    debug!("No command mapped for this gesture");
                    return Ok(None);
                }
            }
        }
        Ok(None)
    }

    /// Sends a mapped command to the output channel.
    pub fn send_command(&self, command: NavCommand) -> Result<(), MappingError> {
        match self.output_sender.try_send(command) {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Failed to send navigation command: {}", e);
                Err(MappingError::ChannelError(format!(
                    "Failed to send navigation command: {}",
                    e
                )))
            }
        }
    }

    /// Main processing loop with graceful shutdown support.
    ///
    /// Runs until a shutdown signal is received. Individual mapping errors
    /// do not stop the loop.
    pub async fn run_until_shutdown(
        mut self,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> Result<MappingEngine<Deactivating>, MappingError> {
        info!("Starting event processing loop for: {}", self.name);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Shutdown signal received for: {}", self.name);
                    break;
                }

                _ = tokio::time::sleep(Duration::from_millis(10)) => {
                    match self.process_event() {
                        Ok(Some(command)) => {
                            if let Err(e) = self.send_command(command) {
                                warn!("Failed to send command: {}", e);
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            error!("Error processing event: {}", e);
                        }
                    }
                }
            }
        }

        info!("Transitioning to Deactivating state: {}", self.name);
        Ok(self.transition())
    }
}

impl MappingEngine<Deactivating> {
    /// Shuts down the strategy and transitions to Deactivated.
    pub async fn shutdown(mut self) -> MappingEngine<Deactivated> {
        info!("Shutting down mapping engine: {}", self.name);

        if let Some(strategy) = &mut self.strategy {
            debug!("Shutting down strategy");
            strategy.shutdown();
        }

        info!("Engine shut down successfully: {}", self.name);
        self.transition()
    }
}

impl MappingEngine<Deactivated> {}

/// Handle for managing a mapping engine in a tokio task.
///
/// Handles task spawning, graceful shutdown, and resource cleanup.
#[derive(Debug)]
pub struct MappingEngineHandle {
    pub name: String,

    task_handle: Option<JoinHandle<Result<(), MappingError>>>,

    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MappingEngineHandle {
    pub fn new(name: String) -> Self {
        Self {
            name,
            task_handle: None,
            shutdown_tx: None,
        }
    }

    /// Starts the engine in a tokio task and returns its channels.
    ///
    /// # Returns
    ///
    /// * Output receiver for navigation commands
    /// * Input sender for gesture events
    pub fn start(
        &mut self,
        strategy: Box<dyn MappingStrategy>,
    ) -> Result<(mpsc::Receiver<NavCommand>, mpsc::Sender<GestureEvent>), MappingError> {
        let (gesture_sender, gesture_receiver) = mpsc::channel(100);
        let (command_sender, command_receiver) = mpsc::channel(100);
        let engine_name = self.name.clone();

        let engine = MappingEngine::create(gesture_receiver, command_sender, engine_name.clone())
            .configure(strategy)?;

        let active_engine = engine.activate();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.shutdown_tx = Some(shutdown_tx);
        let task_handle = tokio::spawn(async move {
            info!("Spawning running engine: {}", engine_name);
            match active_engine.run_until_shutdown(shutdown_rx).await {
                Ok(deactivating_engine) => {
                    info!("Engine entering deactivating state: {}", engine_name);
                    let _ = deactivating_engine.shutdown().await;
                    Ok(())
                }
                Err(e) => {
                    error!("Error running engine: {} - {}", engine_name, e);
                    Err(e)
                }
            }
        });

        self.task_handle = Some(task_handle);

        info!("Mapping engine activated: {}", self.name);
        Ok((command_receiver, gesture_sender))
    }

    /// Gracefully shuts down the engine and waits for task completion.
    pub async fn shutdown(&mut self) -> Result<(), MappingError> {
        debug!("Sending shutdown signal to engine: {}", self.name);

        if let Some(tx) = self.shutdown_tx.take() {
            if tx.send(()).is_err() {
                warn!("Engine task already terminated: {}", self.name);
            }
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => {
                    debug!("Engine task completed: {}", self.name);
                    result
                }
                Err(e) => {
                    error!("Engine task panicked: {} - {}", self.name, e);
                    Err(MappingError::TaskError(format!(
                        "Engine task panicked: {}",
                        e
                    )))
                }
            }
        } else {
            debug!("Engine already shut down: {}", self.name);
            Ok(())
        }
    }
}
