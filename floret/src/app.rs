//! Wires the registry, environment, and trainer together for one run.

use std::fs;

use anyhow::{Context, Result};
use rl::{rollout, train, TrainConfig};
use seqenv::{CaseRegistry, EnvConfig, SequenceEnv};

use crate::Cli;

/// Runs one training session (and optionally a replay) as configured.
///
/// # Errors
///
/// Returns any error from case-file loading, environment construction, or
/// training itself.
pub fn run(cli: &Cli) -> Result<()> {
    tracing_subscriber::fmt::init();

    let registry = load_registry(cli)?;
    if cli.list_cases {
        for id in registry.ids() {
            let case = registry.get(id)?;
            tracing::info!("{id}: {}", case.title);
        }
        return Ok(());
    }

    let cfg = TrainConfig {
        episodes: cli.episodes,
        horizon: cli.horizon,
        gamma: cli.gamma,
        lr: cli.lr,
        log_every: cli.log_every,
        noise_prob: cli.noise,
        case_id: cli.case.clone(),
        seq_len: None,
        seed: cli.seed,
    };

    tracing::info!(
        "training for {} episodes (horizon {}, noise {})...",
        cfg.episodes,
        cfg.horizon,
        cfg.noise_prob
    );
    let run = train(&cfg, None, &registry)?;

    let best = run
        .scores
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    let last = run.scores.last().copied().unwrap_or(0.0);
    tracing::info!(
        "done: final score {last:+.4}, best score {best:+.4}, final seq {}",
        run.trainer.env().sequence()
    );

    if cli.replay {
        replay(cli, &run, &registry)?;
    }
    Ok(())
}

fn load_registry(cli: &Cli) -> Result<CaseRegistry> {
    match &cli.cases_file {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading case file {}", path.display()))?;
            Ok(CaseRegistry::from_json(&json)?)
        }
        None => Ok(CaseRegistry::builtin()),
    }
}

fn replay(cli: &Cli, run: &rl::TrainRun, registry: &CaseRegistry) -> Result<()> {
    let cfg = EnvConfig {
        horizon: cli.horizon,
        noise_prob: cli.noise,
        case_id: cli.case.clone(),
        ..EnvConfig::default()
    };
    let mut env = SequenceEnv::from_config(&cfg, registry)?;
    let report = rollout(run.trainer.agent(), &mut env, run.trainer.reward())?;

    tracing::info!(
        "replay: {} -> {} (score {:+.4}, {} edits)",
        report.initial_sequence,
        report.final_sequence,
        report.score,
        report.edits
    );
    for record in &report.history {
        tracing::info!(
            "  step {:2}: pos {:2} {} -> {}",
            record.step,
            record.pos,
            record.from,
            record.to
        );
    }
    Ok(())
}
