//! Lingshu Engine - turn replay entry point.
//!
//! `lingshu-engine <turn.json>` settles one recorded turn and prints the
//! settlement lines followed by the resulting state as pretty JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use lingshu_domain::{GameState, NpcId};
use lingshu_engine::infrastructure::{
    clock::SystemClock, config::EngineConfig, narrative::FixedNarrative,
};
use lingshu_engine::{PlayTurn, TurnRequest};

/// A recorded turn: the state before it, what the player typed, and the prose
/// the narrative source produced.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplayTurn {
    state: GameState,
    player_input: String,
    narrative: String,
    #[serde(default)]
    selected_npc: Option<Uuid>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging. Output goes to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lingshu_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: lingshu-engine <turn.json>")?;

    let config = EngineConfig::from_env()?;
    tracing::info!(path = %path.display(), "Replaying turn");

    let replay = load_replay(&path)?;
    let (lines, state) = replay_turn(replay, &config).await?;

    for line in &lines {
        println!("{}", line);
    }
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn load_replay(path: &Path) -> anyhow::Result<ReplayTurn> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid turn file {}", path.display()))
}

async fn replay_turn(
    replay: ReplayTurn,
    config: &EngineConfig,
) -> anyhow::Result<(Vec<String>, GameState)> {
    let turn = PlayTurn::new(
        Arc::new(FixedNarrative::new(replay.narrative)),
        Arc::new(SystemClock::new()),
        config.narrative_timeout,
    );
    let mut request = TurnRequest::new(replay.player_input);
    if let Some(npc) = replay.selected_npc {
        request = request.with_selected_npc(NpcId::from_uuid(npc));
    }

    let mut state = replay.state;
    let outcome = turn
        .execute(&mut state, request, CancellationToken::new())
        .await?;
    Ok((outcome.lines, state))
}

fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
