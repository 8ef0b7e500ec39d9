//! # seqenv: a sequence-editing environment
//!
//! A finite-horizon state machine over fixed-length symbol sequences. An
//! agent edits the working sequence one position at a time, steering it
//! toward a target fragment while avoiding a repressor fragment, under a
//! bounded edit budget. The crate also carries the curated demo-case
//! registry that seeds reproducible runs and the pure reward model that
//! scores candidate sequences.
//!
//! The environment itself never scores anything: [`SequenceEnv::step`]
//! returns a placeholder reward and leaves scoring to
//! [`reward::RewardModel`], which callers invoke on the observation they
//! got back. That split keeps the reward a pure function of
//! `(sequence, edit count)`, which the trainer's reward shaping relies on.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_precision_loss, clippy::must_use_candidate)]

pub mod cases;
pub mod env;
pub mod reward;

use thiserror::Error;

pub use cases::{CaseRegistry, DemoCase, DEFAULT_CASE_ID};
pub use env::{Action, EditRecord, EnvConfig, Phase, SequenceEnv, DNA_ALPHABET};
pub use reward::{kmer_score, motif_score, RewardModel, RewardWeights};

/// Errors produced by environment construction and stepping.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Sequence lengths disagree, or the configuration cannot resolve to a
    /// concrete set of sequences. Fatal to the construction call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An edit action referenced a position or symbol outside the
    /// environment's action space. A caller contract violation, never a
    /// normal episode outcome.
    #[error("invalid action: position {pos} with symbol '{symbol}'")]
    InvalidAction { pos: usize, symbol: char },

    /// The requested demo case does not exist in the registry.
    #[error("unknown demo case `{id}`; available cases: {available}")]
    UnknownCase { id: String, available: String },
}
