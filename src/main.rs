//! Headless simulation runner (default binary).
//!
//! Plays a scripted session against the board core for a fixed amount of
//! simulated time and prints a summary. Settings come from `BLOCKFALL_*`
//! environment variables; log output is controlled by `RUST_LOG`.

use anyhow::{Context, Result};

use blockfall::config::SimConfig;
use blockfall::sim;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::from_env().context("failed to read simulation settings")?;
    log::info!(
        "simulating {}s with seed {} (max restarts {})",
        config.seconds,
        config.seed,
        config.max_restarts
    );

    let report = sim::run(&config);

    println!("{}", report.board);
    println!(
        "frames: {}  sessions: {}  events: {}",
        report.frames,
        report.sessions.len(),
        report.events
    );
    for (i, stats) in report.sessions.iter().enumerate() {
        println!(
            "session {i}: score {} lines {} blocks {} pieces {} max chain {}",
            stats.score, stats.lines, stats.blocks_cleared, stats.pieces, stats.max_chain
        );
    }
    println!(
        "best score {}  total lines {}  longest chain {}",
        report.best_score(),
        report.total_lines(),
        report.longest_chain()
    );

    if config.snapshot_json {
        let json = serde_json::to_string_pretty(&report.snapshot)
            .context("failed to serialize final snapshot")?;
        println!("{json}");
    }

    Ok(())
}
