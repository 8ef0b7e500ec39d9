//! # Floret CLI
//!
//! Entry point for the `floret` binary: runs a REINFORCE training session
//! over the sequence-editing environment and, on request, replays the
//! trained policy to print the resulting edit history.

mod app;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Train a sequence-editing policy against a demo case.
#[derive(Parser, Debug)]
#[command(name = "floret", version, about)]
pub struct Cli {
    /// Number of training episodes.
    #[arg(long, default_value_t = 200)]
    pub episodes: usize,

    /// Maximum edit steps per episode.
    #[arg(long, default_value_t = 10)]
    pub horizon: usize,

    /// Demo case identifier (defaults to the built-in case).
    #[arg(long)]
    pub case: Option<String>,

    /// JSON file with additional demo cases.
    #[arg(long)]
    pub cases_file: Option<PathBuf>,

    /// Per-position substitution noise applied on every reset.
    #[arg(long, default_value_t = 0.1)]
    pub noise: f32,

    /// Seed for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Discount factor for episode returns.
    #[arg(long, default_value_t = 0.99)]
    pub gamma: f32,

    /// Learning rate of the policy optimizer.
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f32,

    /// Emit a progress line every N episodes.
    #[arg(long, default_value_t = 20)]
    pub log_every: usize,

    /// List available demo cases and exit.
    #[arg(long)]
    pub list_cases: bool,

    /// Replay the trained policy once and print its edit history.
    #[arg(long)]
    pub replay: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    app::run(&cli)
}
