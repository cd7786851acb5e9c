//! loot-sim: replay every built-in loot source and print a JSON drop report.
//!
//! Usage: `loot-sim [config.json|config.ron]`

use anyhow::{Context, Result};
use serde::Serialize;

use loot_core::balance::{self, DropReport, SimConfig};
use loot_core::logging;
use loot_core::{EngineConfig, LootEngine};

#[derive(Serialize)]
struct SimSummary {
    base_seed: u64,
    samples: u64,
    sources: Vec<DropReport>,
    exploration: Vec<DropReport>,
    below_floor: Vec<String>,
}

fn main() -> Result<()> {
    logging::init_tracing_default();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_file(&path)
            .with_context(|| format!("failed to load engine config from {path}"))?,
        None => EngineConfig::default(),
    };
    let engine = LootEngine::with_config(config).context("failed to build loot engine")?;
    let sim = SimConfig::from_engine(engine.config());

    let targets = balance::builtin_targets(&engine);
    let sources = balance::simulate_all(&engine, &targets, &sim)?;

    let mut exploration = Vec::new();
    for (id, area) in &engine.tables().areas {
        exploration.extend(balance::compare_exploration(&engine, id, area.level, &sim)?);
    }

    let below_floor: Vec<String> = sources
        .iter()
        .filter(|report| !report.meets_floor())
        .map(|report| report.target.clone())
        .collect();
    for target in &below_floor {
        tracing::warn!(source = %target, "loot source below scarcity floor");
    }

    let summary = SimSummary {
        base_seed: sim.base_seed,
        samples: sim.samples,
        sources,
        exploration,
        below_floor,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
