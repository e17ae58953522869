//! Host state shared between the caller and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use bitfit_core::commands::BattleCommand;
use bitfit_core::error::SetupError;
use bitfit_core::input::RawInputEvent;
use bitfit_core::state::BattleSnapshot;
use bitfit_sim::{BattleConfig, BattleEngine};

use crate::config::EnvConfigError;
use crate::game_loop;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A battle command to forward to the engine.
    Battle(BattleCommand),
    StartMatch,
    NextRound,
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

impl From<BattleCommand> for GameLoopCommand {
    fn from(command: BattleCommand) -> Self {
        GameLoopCommand::Battle(command)
    }
}

/// Host errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] EnvConfigError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("battle already running")]
    AlreadyRunning,

    #[error("battle not started")]
    NotStarted,

    #[error("game loop has stopped")]
    LoopStopped,

    #[error("shared state lock poisoned")]
    LockPoisoned,

    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Shared host state.
///
/// - `command_tx` is `None` until [`AppState::start`] succeeds.
/// - `latest_snapshot` is written by the loop thread after every frame that ran a tick.
pub struct AppState {
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    pub latest_snapshot: Arc<Mutex<Option<BattleSnapshot>>>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            loop_handle: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `config` and start the game loop thread. Every snapshot the
    /// loop produces is also sent to `observer`, if one is given.
    pub fn start(
        &self,
        config: BattleConfig,
        observer: Option<mpsc::Sender<BattleSnapshot>>,
    ) -> Result<(), AppError> {
        let mut tx_lock = self.command_tx.lock().map_err(|_| AppError::LockPoisoned)?;
        if tx_lock.is_some() {
            return Err(AppError::AlreadyRunning);
        }

        let engine = BattleEngine::new(config)?;
        let (cmd_tx, handle) = game_loop::spawn_game_loop(engine, self.latest_snapshot.clone(), observer)?;

        *tx_lock = Some(cmd_tx);
        *self.loop_handle.lock().map_err(|_| AppError::LockPoisoned)? = Some(handle);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.command_tx.lock().map(|tx| tx.is_some()).unwrap_or(false)
    }

    pub fn send(&self, command: impl Into<GameLoopCommand>) -> Result<(), AppError> {
        let tx_lock = self.command_tx.lock().map_err(|_| AppError::LockPoisoned)?;
        match tx_lock.as_ref() {
            Some(tx) => tx.send(command.into()).map_err(|_| AppError::LoopStopped),
            None => Err(AppError::NotStarted),
        }
    }

    /// Forward one raw frontend input.
    pub fn send_input(&self, event: RawInputEvent) -> Result<(), AppError> {
        self.send(BattleCommand::Input { event })
    }

    /// Latest snapshot for synchronous polling.
    pub fn snapshot(&self) -> Result<Option<BattleSnapshot>, AppError> {
        let lock = self.latest_snapshot.lock().map_err(|_| AppError::LockPoisoned)?;
        Ok(lock.clone())
    }

    /// Stop the loop thread and wait for it to exit.
    pub fn shutdown(&self) -> Result<(), AppError> {
        let tx = self.command_tx.lock().map_err(|_| AppError::LockPoisoned)?.take();
        if let Some(tx) = tx {
            // A closed channel means the loop already exited.
            let _ = tx.send(GameLoopCommand::Shutdown);
        }
        let handle = self.loop_handle.lock().map_err(|_| AppError::LockPoisoned)?.take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::warn!("game loop thread panicked");
            }
        }
        Ok(())
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(!state.is_running());
        assert!(state.snapshot().unwrap().is_none());
    }

    #[test]
    fn test_send_before_start_fails() {
        let state = AppState::new();
        assert!(matches!(
            state.send(GameLoopCommand::StartMatch),
            Err(AppError::NotStarted)
        ));
    }

    #[test]
    fn test_bad_config_does_not_start() {
        let state = AppState::new();
        let config = BattleConfig {
            player_archetype: "nobody".into(),
            ..Default::default()
        };
        let err = state.start(config, None).unwrap_err();
        assert!(matches!(err, AppError::Setup(SetupError::UnknownArchetype(_))));
        assert!(!state.is_running());
    }

    #[test]
    fn test_double_start_rejected() {
        let state = AppState::new();
        state.start(BattleConfig::default(), None).unwrap();
        assert!(matches!(
            state.start(BattleConfig::default(), None),
            Err(AppError::AlreadyRunning)
        ));
        state.shutdown().unwrap();
        assert!(!state.is_running());
    }
}
