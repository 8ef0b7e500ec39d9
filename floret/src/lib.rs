//! # Floret
//!
//! Floret is a toy reinforcement-learning sandbox that edits fixed-length
//! symbolic sequences one position at a time, steering them from a start
//! state toward a target pattern while avoiding a repressor pattern, under
//! a bounded edit budget.
//!
//! ## The Crates
//!
//! -   **`floret`:** This crate — the command-line entry point. It wires a
//!     demo-case registry, an environment, and a trainer together, runs
//!     training, and can replay the trained policy to collect an edit
//!     history.
//! -   **[`seqenv`]:** The sequence-editing environment: a finite-horizon
//!     state machine over sequences, the curated demo-case registry, and
//!     the pure k-mer/motif reward model.
//! -   **[`rl`]:** The learning layer: a REINFORCE agent over the
//!     flattened `(position, symbol)` action space and the episodic
//!     trainer with potential-based reward shaping.
//! -   **`nn`:** A minimal dense-network toolkit (tensors, hand-written
//!     layer gradients, Adam) backing the policy network.
//!
//! ## A ten-second tour
//!
//! ```no_run
//! use rl::{train, TrainConfig};
//! use seqenv::CaseRegistry;
//!
//! let cfg = TrainConfig { episodes: 50, ..TrainConfig::default() };
//! let run = train(&cfg, None, &CaseRegistry::builtin()).unwrap();
//! println!("final score: {:+.4}", run.scores.last().unwrap());
//! ```
