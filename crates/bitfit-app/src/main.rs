//! Headless demo host: plays a scripted player against the boss AI and logs
//! the combat events.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bitfit_app::config::EnvConfig;
use bitfit_app::state::{AppError, AppState, GameLoopCommand};
use bitfit_core::enums::BattlePhase;
use bitfit_core::events::CombatEvent;
use bitfit_core::input::{RawInputEvent, RawInputKind};
use bitfit_core::state::BattleSnapshot;

/// Wall-clock cap on the demo.
const DEMO_LIMIT: Duration = Duration::from_secs(180);

const INPUT_INTERVAL: Duration = Duration::from_millis(150);

/// Player inputs, cycled for the whole demo.
const SCRIPT: &[(RawInputKind, &str)] = &[
    (RawInputKind::Direction, "right"),
    (RawInputKind::Direction, "neutral"),
    (RawInputKind::Attack, "light_punch"),
    (RawInputKind::Attack, "medium_punch"),
    (RawInputKind::Direction, "down"),
    (RawInputKind::Direction, "downright"),
    (RawInputKind::Direction, "right"),
    (RawInputKind::Attack, "heavy_punch"),
    (RawInputKind::Direction, "neutral"),
    (RawInputKind::Block, "press"),
    (RawInputKind::Block, "release"),
    (RawInputKind::Attack, "heavy_kick"),
];

fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing("info");

    let config = EnvConfig::from_env()?.battle_config()?;
    info!(
        seed = config.seed,
        difficulty = ?config.difficulty,
        player = %config.player_archetype,
        boss = %config.boss_archetype,
        "starting demo match"
    );

    let state = AppState::new();
    let (snapshot_tx, snapshot_rx) = mpsc::channel();
    state.start(config, Some(snapshot_tx))?;
    state.send(GameLoopCommand::StartMatch)?;

    let started = Instant::now();
    let mut next_input = started;
    let mut step = 0usize;
    while started.elapsed() < DEMO_LIMIT {
        if Instant::now() >= next_input {
            let (kind, value) = SCRIPT[step % SCRIPT.len()];
            let stamp = started.elapsed().as_secs_f64() * 1000.0;
            state.send_input(RawInputEvent::new(kind, value, stamp))?;
            step += 1;
            next_input += INPUT_INTERVAL;
        }

        match snapshot_rx.recv_timeout(Duration::from_millis(20)) {
            Ok(snapshot) => {
                if report(&snapshot) {
                    break;
                }
                let round_ended = snapshot
                    .events
                    .iter()
                    .any(|e| matches!(e, CombatEvent::RoundEnded { .. }));
                if round_ended && snapshot.phase == BattlePhase::RoundOver {
                    state.send(GameLoopCommand::NextRound)?;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                warn!("game loop stopped unexpectedly");
                break;
            }
        }
    }

    if let Some(last) = state.snapshot()? {
        info!(wins = ?last.wins, round = last.round, phase = ?last.phase, "demo finished");
    }
    state.shutdown()
}

/// Log a snapshot's events. Returns true once the match is decided.
fn report(snapshot: &BattleSnapshot) -> bool {
    let mut decided = false;
    for event in &snapshot.events {
        match event {
            CombatEvent::HitLanded {
                attacker,
                move_id,
                damage,
                blocked,
                ..
            } => info!(?attacker, ?move_id, damage, blocked, "hit"),
            CombatEvent::ComboEnded {
                attacker,
                final_count,
                final_damage,
                reason,
            } if *final_count >= 2 => info!(?attacker, final_count, final_damage, ?reason, "combo"),
            CombatEvent::SpecialPerformed { fighter, move_id, .. } => info!(?fighter, ?move_id, "special"),
            CombatEvent::RoundStarted { round } => info!(round, "round start"),
            CombatEvent::RoundEnded { round, winner, reason } => {
                info!(round, ?winner, ?reason, "round end")
            }
            CombatEvent::MatchEnded { winner } => {
                info!(?winner, "match end");
                decided = true;
            }
            _ => {}
        }
    }
    decided
}

fn init_tracing(default_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
