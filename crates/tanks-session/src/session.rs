use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tanks_core::{Action, HitTarget, Winner};
use tanks_engine::TurnEngine;
use tanks_engine::observer::Checkpoint;
use tanks_engine::state::{GridState, Snapshot};

use crate::arbiter::InputArbiter;
use crate::config::SessionConfig;

/// Commands sent from the input side to the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Input(Action),
    /// Resume after a hit pause.
    Acknowledge,
    Stop,
}

/// Broadcasts sent from the session loop to whoever is displaying the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionBroadcast {
    /// Initial board, sent once before any input is processed.
    Started { snapshot: Snapshot },
    Frame {
        checkpoint: Checkpoint,
        snapshot: Snapshot,
    },
    /// Health after the hit was applied, indexed by player.
    Hit { target: HitTarget, health: [u32; 2] },
    GameOver { winner: Winner },
    /// Signal that the loop has exited.
    Ended,
}

/// Spawn a session loop as a tokio task.
/// Returns the command sender, the broadcast receiver and the task handle.
pub fn spawn_session(
    engine: TurnEngine,
    config: SessionConfig,
) -> (
    mpsc::UnboundedSender<SessionCommand>,
    mpsc::UnboundedReceiver<SessionBroadcast>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        run_session_loop(engine, config, cmd_rx, broadcast_tx).await;
    });

    (cmd_tx, broadcast_rx, handle)
}

/// Whether the loop should keep running after draining queued input.
enum Drain {
    Continue,
    GameOver,
}

async fn run_session_loop(
    mut engine: TurnEngine,
    config: SessionConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    broadcast_tx: mpsc::UnboundedSender<SessionBroadcast>,
) {
    let mut rng = match config.engine.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut arbiter = InputArbiter::with_random_priority(config.max_queued_per_player, &mut rng);
    let mut awaiting_ack = false;

    tracing::info!(first = %arbiter.priority(), "Session started");
    let _ = broadcast_tx.send(SessionBroadcast::Started {
        snapshot: engine.state().snapshot(),
    });

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            SessionCommand::Input(action) => {
                arbiter.push(action);
            },
            SessionCommand::Acknowledge => {
                if awaiting_ack {
                    awaiting_ack = false;
                } else {
                    tracing::debug!("Acknowledge with no pending hit");
                }
            },
            SessionCommand::Stop => break,
        }

        if awaiting_ack {
            continue;
        }
        if let Drain::GameOver = drain_arbiter(
            &mut engine,
            &mut arbiter,
            &mut awaiting_ack,
            config.require_hit_ack,
            &broadcast_tx,
        ) {
            break;
        }
    }

    tracing::info!("Session ended");
    let _ = broadcast_tx.send(SessionBroadcast::Ended);
}

/// Feed queued actions into the engine one at a time until the queues are
/// empty, a hit needs acknowledging, or the game ends.
fn drain_arbiter(
    engine: &mut TurnEngine,
    arbiter: &mut InputArbiter,
    awaiting_ack: &mut bool,
    require_hit_ack: bool,
    broadcast_tx: &mpsc::UnboundedSender<SessionBroadcast>,
) -> Drain {
    let mut observer = |checkpoint: Checkpoint, state: &GridState| {
        let _ = broadcast_tx.send(SessionBroadcast::Frame {
            checkpoint,
            snapshot: state.snapshot(),
        });
    };

    while !*awaiting_ack && let Some(action) = arbiter.next() {
        tracing::trace!(%action, "Applying action");
        let report = engine.apply(action, &mut observer);

        if let Some(target) = report.hit {
            let health = engine.state().players.map(|p| p.health);
            let _ = broadcast_tx.send(SessionBroadcast::Hit { target, health });
            *awaiting_ack = require_hit_ack && report.awaiting_ack;
        }

        if report.game_over {
            if let Some(winner) = engine.winner() {
                let _ = broadcast_tx.send(SessionBroadcast::GameOver { winner });
            }
            return Drain::GameOver;
        }
    }
    Drain::Continue
}
