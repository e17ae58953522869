//! Game loop thread: feeds wall-clock time to the engine's fixed-timestep
//! scheduler and publishes snapshots.
//!
//! Commands arrive via `mpsc` channel. Snapshots are stored in shared state
//! for synchronous polling and optionally sent to an observer channel.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use bitfit_core::constants::TICK_RATE;
use bitfit_core::state::BattleSnapshot;
use bitfit_sim::BattleEngine;

use crate::state::GameLoopCommand;

/// Host frame pacing. The engine decides how many ticks each frame runs.
pub const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread that owns `engine`.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    engine: BattleEngine,
    latest_snapshot: Arc<Mutex<Option<BattleSnapshot>>>,
    observer: Option<mpsc::Sender<BattleSnapshot>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("bitfit-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, cmd_rx, &latest_snapshot, observer);
        })?;

    Ok((cmd_tx, handle))
}

/// Apply one host command. Returns false on shutdown.
pub fn handle_command(engine: &mut BattleEngine, command: GameLoopCommand) -> bool {
    match command {
        GameLoopCommand::Battle(cmd) => engine.queue_command(cmd),
        GameLoopCommand::StartMatch => {
            if let Err(err) = engine.start_match() {
                warn!(%err, "start match rejected");
            }
        }
        GameLoopCommand::NextRound => {
            if let Err(err) = engine.start_next_round() {
                warn!(%err, "next round rejected");
            }
        }
        GameLoopCommand::Shutdown => return false,
    }
    true
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    mut engine: BattleEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<BattleSnapshot>>,
    mut observer: Option<mpsc::Sender<BattleSnapshot>>,
) {
    let mut last_frame = Instant::now();
    let mut next_frame = last_frame + FRAME_DURATION;

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(command) => {
                    if !handle_command(&mut engine, command) {
                        debug!("game loop shutting down");
                        return;
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Run every tick due since the last frame
        let now = Instant::now();
        let delta_ms = now.duration_since(last_frame).as_secs_f64() * 1000.0;
        last_frame = now;
        let output = engine.advance(delta_ms);

        // 3. Publish
        if output.ticks_run > 0 {
            if let Some(tx) = &observer {
                if tx.send(output.snapshot.clone()).is_err() {
                    debug!("snapshot observer disconnected");
                    observer = None;
                }
            }
            if let Ok(mut lock) = latest_snapshot.lock() {
                *lock = Some(output.snapshot);
            }
        }

        // 4. Sleep until next frame
        let now = Instant::now();
        if next_frame > now {
            std::thread::sleep(next_frame - now);
            next_frame += FRAME_DURATION;
        } else {
            next_frame = now + FRAME_DURATION;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitfit_core::commands::BattleCommand;
    use bitfit_core::enums::BattlePhase;
    use bitfit_sim::BattleConfig;

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::StartMatch).unwrap();
        tx.send(BattleCommand::Pause.into()).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<GameLoopCommand> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], GameLoopCommand::StartMatch));
        assert!(matches!(commands[1], GameLoopCommand::Battle(BattleCommand::Pause)));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_handle_command_phases() {
        let mut engine = BattleEngine::new(BattleConfig::default()).unwrap();
        assert!(handle_command(&mut engine, GameLoopCommand::NextRound));
        assert_eq!(engine.phase(), BattlePhase::Idle);

        assert!(handle_command(&mut engine, GameLoopCommand::StartMatch));
        assert_eq!(engine.phase(), BattlePhase::Fighting);

        assert!(handle_command(&mut engine, BattleCommand::Pause.into()));
        let snap = engine.tick();
        assert_eq!(snap.phase, BattlePhase::Paused);

        assert!(!handle_command(&mut engine, GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_loop_publishes_snapshots() {
        let engine = BattleEngine::new(BattleConfig::default()).unwrap();
        let latest = Arc::new(Mutex::new(None));
        let (snap_tx, snap_rx) = mpsc::channel();
        let (cmd_tx, handle) = spawn_game_loop(engine, latest.clone(), Some(snap_tx)).unwrap();

        cmd_tx.send(GameLoopCommand::StartMatch).unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);
        let first = loop {
            let snap = snap_rx
                .recv_timeout(deadline.saturating_duration_since(Instant::now()))
                .unwrap();
            if snap.phase == BattlePhase::Fighting {
                break snap;
            }
        };
        assert_eq!(first.round, 1);

        cmd_tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap();

        let stored = latest.lock().unwrap().clone().unwrap();
        assert_eq!(stored.phase, BattlePhase::Fighting);
        assert!(stored.time.tick >= 1);
    }

    #[test]
    fn test_frame_duration_constant() {
        // 60Hz = 16.667ms per frame
        assert_eq!(FRAME_DURATION.as_nanos(), 1_000_000_000u128 / 60);
    }
}
