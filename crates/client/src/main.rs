//! Headless combat simulator binary.
//!
//! Plays the scripted skirmish and prints the event transcript to stdout.
//! Logs go to stderr and follow `RUST_LOG`.
//!
//! ```bash
//! # Default configuration
//! cargo run -p combat-client
//!
//! # From a RON file, with a faster tick
//! COMBAT_TICK_MS=50 cargo run -p combat-client -- combat.ron
//! ```

use anyhow::{Context, Result};
use combat_client::{logging, scenario};
use combat_core::CoreEvent;
use combat_runtime::{
    CombatSession, CombatSessionBuilder, FileSnapshotRepository, RuntimeConfig, Topic,
};
use tokio::sync::broadcast::{self, error::TryRecvError};

const FRAMES: usize = 300;
const TURN_LIMIT: u32 = 3;
const SAVE_SLOT: &str = "autosave";

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::setup_logging()?;

    let config = match std::env::args().nth(1) {
        Some(path) => RuntimeConfig::load(&path)?,
        None => RuntimeConfig::default(),
    }
    .with_env_overrides()?;

    tracing::info!(
        tick_ms = config.core.tick_ms,
        cell_ms = config.core.cell_duration_ms,
        vision_radius = config.vision_radius,
        "starting skirmish"
    );

    let vision = scenario::arena_vision(config.vision_radius);
    let mut session = CombatSessionBuilder::new()
        .config(config.clone())
        .build(vision)?;

    let mut receivers = session.bus().subscribe_multiple(&Topic::ALL);
    let mut ai = scenario::setup(&mut session, TURN_LIMIT)?;
    print_events(&mut receivers);

    let summary = scenario::run(&mut session, &mut ai, scenario::frame_deltas(FRAMES), |_| {
        print_events(&mut receivers)
    })?;

    tracing::info!(
        frames = summary.frames,
        ticks = summary.ticks,
        cells = summary.cells_advanced,
        turns = summary.turns_resolved,
        "skirmish finished"
    );
    for (actor, position) in &summary.positions {
        println!("final: {actor} at {position}");
    }

    autosave(&config, &session)
}

/// Writes the final state to the save directory and reads it back.
fn autosave<V: combat_core::VisionCalculator>(
    config: &RuntimeConfig,
    session: &CombatSession<V>,
) -> Result<()> {
    let Some(dir) = config.resolved_save_dir() else {
        tracing::warn!("no save directory available; skipping autosave");
        return Ok(());
    };

    let repository = FileSnapshotRepository::with_format(&dir, config.save_format)
        .with_context(|| format!("cannot open save directory {}", dir.display()))?;
    session.save(&repository, SAVE_SLOT)?;

    let reloaded = CombatSession::load(
        config.clone(),
        scenario::arena_vision(config.vision_radius),
        &repository,
        SAVE_SLOT,
    )?;
    anyhow::ensure!(
        reloaded.snapshot() == session.snapshot(),
        "autosave did not round-trip"
    );
    tracing::info!(dir = %dir.display(), slot = SAVE_SLOT, "autosave verified");
    Ok(())
}

fn print_events(receivers: &mut [(Topic, broadcast::Receiver<CoreEvent>)]) {
    for (topic, rx) in receivers.iter_mut() {
        loop {
            match rx.try_recv() {
                Ok(CoreEvent::TickElapsed { .. }) => {}
                Ok(event) => println!("[{topic:?}] {}", scenario::describe(&event)),
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::warn!(?topic, missed, "event receiver lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}
