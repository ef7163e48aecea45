use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use tanks_engine::TurnEngine;
use tanks_session::keymap::action_for_key;
use tanks_session::{SessionBroadcast, SessionCommand, SessionConfig, SessionError, spawn_session};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Tanks session failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), SessionError> {
    let config = SessionConfig::load();
    config.validate()?;
    let layout = config.layout()?;
    tracing::info!(
        map = config.map.as_deref().unwrap_or("built-in"),
        size = layout.size(),
        max_health = layout.max_health(),
        "Tanks starting"
    );

    let engine = TurnEngine::new(layout, config.engine.clone());
    let (cmd_tx, mut broadcast_rx, handle) = spawn_session(engine, config);
    let reader = tokio::spawn(forward_stdin(cmd_tx));

    while let Some(msg) = broadcast_rx.recv().await {
        match msg {
            SessionBroadcast::Started { snapshot } => {
                tracing::info!(
                    p1 = %snapshot.players[0].position,
                    p2 = %snapshot.players[1].position,
                    "Game started"
                );
            },
            SessionBroadcast::Frame { checkpoint, snapshot } => {
                tracing::trace!(?checkpoint, ?snapshot, "Frame");
            },
            SessionBroadcast::Hit { target, health } => {
                tracing::info!(
                    %target,
                    p1_health = health[0],
                    p2_health = health[1],
                    "Hit! Press Enter to continue"
                );
            },
            SessionBroadcast::GameOver { winner } => {
                tracing::info!(?winner, "Game over");
            },
            SessionBroadcast::Ended => break,
        }
    }

    reader.abort();
    handle
        .await
        .map_err(|e| SessionError::Io(format!("session task failed: {e}")))?;
    Ok(())
}

/// Turn stdin lines into session commands. Each character is a key press;
/// an empty line acknowledges a hit.
async fn forward_stdin(cmd_tx: mpsc::UnboundedSender<SessionCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stdin");
                break;
            },
        };

        let commands: Vec<SessionCommand> = if line.trim().is_empty() {
            vec![SessionCommand::Acknowledge]
        } else {
            line.chars()
                .filter_map(|key| {
                    let action = action_for_key(key);
                    if action.is_none() {
                        tracing::debug!(?key, "Ignoring unbound key");
                    }
                    action.map(SessionCommand::Input)
                })
                .collect()
        };
        for cmd in commands {
            if cmd_tx.send(cmd).is_err() {
                return;
            }
        }
    }
    let _ = cmd_tx.send(SessionCommand::Stop);
}
