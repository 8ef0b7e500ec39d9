//! Episodic training with potential-based reward shaping.
//!
//! Each step's shaped reward is the difference of the composite score
//! before and after the step, so the per-episode shaped rewards telescope
//! to `final_score - initial_score` and the agent sees incremental
//! progress instead of absolute position.

use seqenv::{
    Action, CaseRegistry, EditRecord, EnvConfig, EnvError, RewardModel, SequenceEnv,
};

use crate::agent::{ReinforceAgent, SelectedAction, Trajectory, Transition};

/// Knobs for a training run.
#[derive(Clone, Debug)]
pub struct TrainConfig {
    pub episodes: usize,
    pub horizon: usize,
    pub gamma: f32,
    pub lr: f32,
    /// Emit a progress line every this many episodes.
    pub log_every: usize,
    pub noise_prob: f32,
    pub case_id: Option<String>,
    pub seq_len: Option<usize>,
    /// Seeds the process-wide RNG for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            episodes: 200,
            horizon: 10,
            gamma: 0.99,
            lr: 1e-3,
            log_every: 20,
            noise_prob: 0.1,
            case_id: None,
            seq_len: None,
            seed: None,
        }
    }
}

/// Final state of one episode. Append-only history entries, never mutated
/// after the episode completes.
#[derive(Clone, Debug)]
pub struct EpisodeOutcome {
    pub episode: usize,
    /// Final un-shaped composite score.
    pub score: f32,
    /// Edit actions applied (redundant substitutions included).
    pub edits: usize,
    pub sequence: String,
}

/// Owns the environment, the agent, and the outcome history for one
/// sequential training run.
pub struct ReinforceTrainer {
    env: SequenceEnv,
    agent: ReinforceAgent,
    reward: RewardModel,
    gamma: f32,
    outcomes: Vec<EpisodeOutcome>,
}

impl ReinforceTrainer {
    /// Builds a trainer with a fresh agent sized to the environment and a
    /// reward model picking up the environment's case motifs.
    #[must_use]
    pub fn new(env: SequenceEnv, lr: f32, gamma: f32) -> Self {
        let agent = ReinforceAgent::new(env.seq_len(), env.alphabet(), lr);
        let reward = RewardModel::for_env(&env);
        Self::with_parts(env, agent, reward, gamma)
    }

    /// Assembles a trainer from explicit parts.
    #[must_use]
    pub fn with_parts(
        env: SequenceEnv,
        agent: ReinforceAgent,
        reward: RewardModel,
        gamma: f32,
    ) -> Self {
        Self {
            env,
            agent,
            reward,
            gamma,
            outcomes: Vec::new(),
        }
    }

    /// Rolls out one episode and returns its trajectory without updating
    /// the agent.
    ///
    /// Stop steps change nothing and defer their reward, so they add no
    /// transition; an episode that stops immediately gets a single
    /// synthesized terminal entry carrying the final composite score, so
    /// the update step never sees an empty reward list.
    ///
    /// # Errors
    ///
    /// Propagates [`EnvError`] from the environment (unreachable for
    /// in-range decoded actions).
    pub fn collect_episode(&mut self) -> Result<Trajectory, EnvError> {
        self.env.reset();
        let mut trajectory = Trajectory::new();
        let mut prev_score = self.reward.score_env(&self.env, 0);
        let mut last_selected: Option<SelectedAction> = None;

        loop {
            let obs = self.agent.encode(self.env.symbols());
            let selected = self.agent.select_action(self.env.symbols());
            let action = self.agent.decode_action(selected.index);
            let (_, _, done) = self.env.step(action)?;

            if matches!(action, Action::Stop) {
                last_selected = Some(selected);
            } else {
                trajectory.edits += 1;
                let score = self.reward.score_env(&self.env, trajectory.edits);
                let shaped = score - prev_score;
                prev_score = score;
                trajectory.push(Transition {
                    obs,
                    action: selected.index,
                    log_prob: selected.log_prob,
                    reward: shaped,
                });
            }
            if done {
                break;
            }
        }

        if trajectory.is_empty() {
            // degenerate episode: substitute a terminal reward from the
            // final state instead of updating on nothing
            let selected = last_selected.unwrap_or(SelectedAction {
                index: self.agent.stop_index(),
                log_prob: 0.0,
            });
            trajectory.push(Transition {
                obs: self.agent.encode(self.env.symbols()),
                action: selected.index,
                log_prob: selected.log_prob,
                reward: prev_score,
            });
        }
        Ok(trajectory)
    }

    /// Runs one full episode: rollout, agent update, outcome bookkeeping.
    ///
    /// # Errors
    ///
    /// Propagates [`EnvError`] from the rollout.
    pub fn run_episode(&mut self) -> Result<EpisodeOutcome, EnvError> {
        let trajectory = self.collect_episode()?;
        let score = self.reward.score_env(&self.env, trajectory.edits);
        self.agent.update(&trajectory, self.gamma);

        let outcome = EpisodeOutcome {
            episode: self.outcomes.len(),
            score,
            edits: trajectory.edits,
            sequence: self.env.sequence(),
        };
        self.outcomes.push(outcome.clone());
        Ok(outcome)
    }

    /// Trains for `episodes` episodes, logging progress every `log_every`.
    ///
    /// # Errors
    ///
    /// Propagates [`EnvError`] from any episode.
    pub fn train(&mut self, episodes: usize, log_every: usize) -> Result<(), EnvError> {
        self.train_with(episodes, |outcome| {
            if log_every > 0 && outcome.episode % log_every == 0 {
                tracing::info!(
                    "episode {:3}: score={:+.4} edits={} seq={}",
                    outcome.episode,
                    outcome.score,
                    outcome.edits,
                    outcome.sequence
                );
            }
            true
        })
    }

    /// Trains with a per-episode callback. Returning `false` stops before
    /// the next episode starts; episodes are never interrupted mid-flight.
    ///
    /// # Errors
    ///
    /// Propagates [`EnvError`] from any episode.
    pub fn train_with(
        &mut self,
        episodes: usize,
        mut on_episode: impl FnMut(&EpisodeOutcome) -> bool,
    ) -> Result<(), EnvError> {
        for _ in 0..episodes {
            let outcome = self.run_episode()?;
            if !on_episode(&outcome) {
                break;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn env(&self) -> &SequenceEnv {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut SequenceEnv {
        &mut self.env
    }

    #[must_use]
    pub fn agent(&self) -> &ReinforceAgent {
        &self.agent
    }

    #[must_use]
    pub fn reward(&self) -> &RewardModel {
        &self.reward
    }

    /// Append-only history of completed episodes.
    #[must_use]
    pub fn outcomes(&self) -> &[EpisodeOutcome] {
        &self.outcomes
    }

    /// Per-episode final scores, in order.
    #[must_use]
    pub fn scores(&self) -> Vec<f32> {
        self.outcomes.iter().map(|o| o.score).collect()
    }
}

/// A finished training run: the trainer (still owning agent and
/// environment for replay or inspection) plus the score trace.
pub struct TrainRun {
    pub trainer: ReinforceTrainer,
    pub scores: Vec<f32>,
}

/// Runs a full training session.
///
/// An already-constructed environment may be supplied (so a caller can
/// inspect the initial sequence first) without changing training
/// semantics; otherwise one is built from the config and registry.
///
/// # Errors
///
/// Returns [`EnvError`] from environment construction or stepping.
pub fn train(
    cfg: &TrainConfig,
    env: Option<SequenceEnv>,
    registry: &CaseRegistry,
) -> Result<TrainRun, EnvError> {
    if let Some(seed) = cfg.seed {
        fastrand::seed(seed);
    }
    let env = match env {
        Some(env) => env,
        None => SequenceEnv::from_config(
            &EnvConfig {
                seq_len: cfg.seq_len,
                horizon: cfg.horizon,
                noise_prob: cfg.noise_prob,
                case_id: cfg.case_id.clone(),
                ..EnvConfig::default()
            },
            registry,
        )?,
    };
    let mut trainer = ReinforceTrainer::new(env, cfg.lr, cfg.gamma);
    trainer.train(cfg.episodes, cfg.log_every)?;
    let scores = trainer.scores();
    Ok(TrainRun { trainer, scores })
}

/// Result of replaying a policy against a freshly reset environment.
#[derive(Clone, Debug)]
pub struct RolloutReport {
    pub initial_sequence: String,
    pub final_sequence: String,
    pub score: f32,
    pub edits: usize,
    pub history: Vec<EditRecord>,
}

/// Replays the agent's current policy for one episode, collecting the
/// edit history for downstream rendering.
///
/// # Errors
///
/// Propagates [`EnvError`] from the environment.
pub fn rollout(
    agent: &ReinforceAgent,
    env: &mut SequenceEnv,
    reward: &RewardModel,
) -> Result<RolloutReport, EnvError> {
    debug_assert_eq!(agent.seq_len(), env.seq_len());
    debug_assert_eq!(agent.alphabet(), env.alphabet());
    env.reset();
    let initial_sequence = env.sequence();
    let mut edits = 0;
    loop {
        let selected = agent.select_action(env.symbols());
        let action = agent.decode_action(selected.index);
        let (_, _, done) = env.step(action)?;
        if !matches!(action, Action::Stop) {
            edits += 1;
        }
        if done {
            break;
        }
    }
    Ok(RolloutReport {
        initial_sequence,
        final_sequence: env.sequence(),
        score: reward.score_env(env, edits),
        edits,
        history: env.history().to_vec(),
    })
}
