//! # rl: REINFORCE over the sequence-editing environment
//!
//! A small Monte-Carlo policy-gradient stack: [`ReinforceAgent`] maps
//! one-hot encoded sequences to a distribution over `(position, symbol)`
//! edits plus a stop action, and [`ReinforceTrainer`] runs episodic
//! training with potential-based reward shaping against a
//! [`seqenv::SequenceEnv`].
//!
//! Everything is single-threaded and synchronous; episodes run strictly
//! one after another and the agent's parameters update in place between
//! them. Callers that want non-blocking training run the whole trainer on
//! a worker of their own and consume the returned outcome history.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_precision_loss, clippy::must_use_candidate)]

pub mod agent;
pub mod trainer;

pub use agent::{
    discounted_returns, normalize_returns, ReinforceAgent, SelectedAction, Trajectory, Transition,
};
pub use trainer::{rollout, train, EpisodeOutcome, ReinforceTrainer, RolloutReport, TrainConfig, TrainRun};
