//! The sequence-editing state machine.
//!
//! Observations are the current sequence. Actions either substitute one
//! symbol at one position or stop the episode. Only [`SequenceEnv::reset`]
//! is stochastic (per-position substitution noise); every step is
//! deterministic given the current state and a valid action.

use crate::cases::{CaseRegistry, DemoCase, DEFAULT_CASE_ID};
use crate::EnvError;

/// Default nucleotide alphabet.
pub const DNA_ALPHABET: [char; 4] = ['A', 'C', 'G', 'T'];

/// One discrete edit, or the stop sentinel ending the episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Replace the symbol at `pos` with `symbol`.
    Edit { pos: usize, symbol: char },
    /// End the episode without touching the sequence.
    Stop,
}

/// A recorded substitution, kept in order of application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRecord {
    pub step: usize,
    pub pos: usize,
    pub from: char,
    pub to: char,
}

/// Lifecycle of an environment instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, not yet reset.
    Ready,
    /// Accepting steps.
    Running,
    /// Horizon reached or stop issued.
    Done,
}

/// Construction parameters for [`SequenceEnv`].
///
/// Either explicit sequences, a demo-case id, or nothing at all (which
/// falls back to the default case) must resolve to one common sequence
/// length. Ad-hoc configurations may leave individual sequences out; the
/// missing ones are drawn uniformly at random over the alphabet.
#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub start: Option<String>,
    pub target: Option<String>,
    pub avoid: Option<String>,
    pub seq_len: Option<usize>,
    pub horizon: usize,
    pub noise_prob: f32,
    pub case_id: Option<String>,
    pub alphabet: Option<Vec<char>>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            start: None,
            target: None,
            avoid: None,
            seq_len: None,
            horizon: 10,
            noise_prob: 0.1,
            case_id: None,
            alphabet: None,
        }
    }
}

/// Finite-horizon environment owning the mutable working sequence.
#[derive(Debug)]
pub struct SequenceEnv {
    alphabet: Vec<char>,
    seq: Vec<char>,
    start: Vec<char>,
    initial: Vec<char>,
    target: Vec<char>,
    avoid: Vec<char>,
    horizon: usize,
    noise_prob: f32,
    steps: usize,
    history: Vec<EditRecord>,
    phase: Phase,
    case: Option<DemoCase>,
}

impl SequenceEnv {
    /// Builds an environment from a configuration and a case registry.
    ///
    /// A configuration with no explicit length and incomplete sequences
    /// resolves through the registry (named case, or the default case).
    ///
    /// # Errors
    ///
    /// [`EnvError::Configuration`] on a length mismatch or an unresolvable
    /// ad-hoc configuration, [`EnvError::UnknownCase`] for a bad case id.
    pub fn from_config(cfg: &EnvConfig, registry: &CaseRegistry) -> Result<Self, EnvError> {
        let alphabet = cfg
            .alphabet
            .clone()
            .unwrap_or_else(|| DNA_ALPHABET.to_vec());
        if alphabet.len() < 2 {
            return Err(EnvError::Configuration(
                "alphabet needs at least two symbols".to_string(),
            ));
        }

        let needs_case = cfg.seq_len.is_none()
            && (cfg.target.is_none() || cfg.avoid.is_none() || cfg.start.is_none());

        let (start, target, avoid, case) = if needs_case {
            let id = cfg.case_id.as_deref().unwrap_or(DEFAULT_CASE_ID);
            let case = registry.get(id)?.clone();
            (
                chars(&case.initial_sequence),
                chars(&case.target_sequence),
                chars(&case.avoid_sequence),
                Some(case),
            )
        } else {
            let seq_len = cfg
                .seq_len
                .or_else(|| cfg.start.as_ref().map(|s| s.chars().count()))
                .ok_or_else(|| {
                    EnvError::Configuration(
                        "seq_len or a start sequence is required for ad-hoc environments"
                            .to_string(),
                    )
                })?;
            let resolve = |seq: &Option<String>| {
                seq.as_deref()
                    .map_or_else(|| random_sequence(&alphabet, seq_len), chars)
            };
            (
                resolve(&cfg.start),
                resolve(&cfg.target),
                resolve(&cfg.avoid),
                None,
            )
        };

        let seq_len = start.len();
        if cfg.seq_len.is_some_and(|l| l != seq_len) {
            return Err(EnvError::Configuration(
                "start sequence length must match seq_len".to_string(),
            ));
        }
        if target.len() != seq_len || avoid.len() != seq_len {
            return Err(EnvError::Configuration(
                "target and avoid sequences must match the start sequence length".to_string(),
            ));
        }

        Ok(Self {
            alphabet,
            seq: start.clone(),
            start,
            initial: Vec::new(),
            target,
            avoid,
            horizon: cfg.horizon,
            noise_prob: cfg.noise_prob,
            steps: 0,
            history: Vec::new(),
            phase: Phase::Ready,
            case,
        })
    }

    /// Builds an environment directly from a demo case.
    ///
    /// # Errors
    ///
    /// [`EnvError::Configuration`] if the case sequences disagree in length.
    pub fn from_case(case: &DemoCase, horizon: usize, noise_prob: f32) -> Result<Self, EnvError> {
        let mut registry = CaseRegistry::default();
        registry.insert(case.clone())?;
        let cfg = EnvConfig {
            case_id: Some(case.id.clone()),
            horizon,
            noise_prob,
            ..EnvConfig::default()
        };
        Self::from_config(&cfg, &registry)
    }

    /// The default demo environment (built-in registry, default case).
    ///
    /// # Errors
    ///
    /// Never fails in practice; the built-in case is validated at insert.
    pub fn default_demo() -> Result<Self, EnvError> {
        Self::from_config(&EnvConfig::default(), &CaseRegistry::builtin())
    }

    /// Re-derives the working sequence from the configured start sequence
    /// with independent per-position substitution noise, clears counters
    /// and history, and returns the new observation.
    pub fn reset(&mut self) -> String {
        self.seq = mutate(&self.start, &self.alphabet, self.noise_prob);
        self.initial = self.seq.clone();
        self.steps = 0;
        self.history.clear();
        self.phase = Phase::Running;
        self.sequence()
    }

    /// Applies one action and returns `(observation, reward, done)`.
    ///
    /// The reward slot is always a neutral `0.0`; scoring is the reward
    /// model's job, invoked by the caller on the returned observation.
    /// Stepping a `Done` environment is a no-op that reports `done = true`.
    ///
    /// # Errors
    ///
    /// [`EnvError::InvalidAction`] on an out-of-range position or a symbol
    /// outside the alphabet.
    pub fn step(&mut self, action: Action) -> Result<(String, f32, bool), EnvError> {
        if self.phase == Phase::Done {
            return Ok((self.sequence(), 0.0, true));
        }
        if self.phase == Phase::Ready {
            self.phase = Phase::Running;
        }

        match action {
            Action::Stop => {
                self.phase = Phase::Done;
                Ok((self.sequence(), 0.0, true))
            }
            Action::Edit { pos, symbol } => {
                if pos >= self.seq.len() || !self.alphabet.contains(&symbol) {
                    return Err(EnvError::InvalidAction { pos, symbol });
                }
                if self.seq[pos] != symbol {
                    let from = self.seq[pos];
                    self.seq[pos] = symbol;
                    self.history.push(EditRecord {
                        step: self.steps,
                        pos,
                        from,
                        to: symbol,
                    });
                }
                self.steps += 1;
                if self.steps >= self.horizon {
                    self.phase = Phase::Done;
                }
                Ok((self.sequence(), 0.0, self.phase == Phase::Done))
            }
        }
    }

    /// Current sequence as a `String`.
    #[must_use]
    pub fn sequence(&self) -> String {
        self.seq.iter().collect()
    }

    /// Current sequence as symbols.
    #[must_use]
    pub fn symbols(&self) -> &[char] {
        &self.seq
    }

    /// The noisy sequence snapshotted by the last `reset`.
    #[must_use]
    pub fn initial_sequence(&self) -> String {
        self.initial.iter().collect()
    }

    #[must_use]
    pub fn target(&self) -> &[char] {
        &self.target
    }

    #[must_use]
    pub fn avoid(&self) -> &[char] {
        &self.avoid
    }

    /// Ordered edit records since the last reset.
    #[must_use]
    pub fn history(&self) -> &[EditRecord] {
        &self.history
    }

    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[must_use]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    #[must_use]
    pub fn seq_len(&self) -> usize {
        self.seq.len()
    }

    #[must_use]
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// The demo case this environment was seeded from, if any.
    #[must_use]
    pub fn case(&self) -> Option<&DemoCase> {
        self.case.as_ref()
    }
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn random_sequence(alphabet: &[char], len: usize) -> Vec<char> {
    (0..len)
        .map(|_| alphabet[fastrand::usize(0..alphabet.len())])
        .collect()
}

/// Flips each position to a *different* symbol with probability `prob`.
fn mutate(seq: &[char], alphabet: &[char], prob: f32) -> Vec<char> {
    seq.iter()
        .map(|&sym| {
            if fastrand::f32() < prob {
                let choices: Vec<char> =
                    alphabet.iter().copied().filter(|&c| c != sym).collect();
                if choices.is_empty() {
                    sym
                } else {
                    choices[fastrand::usize(0..choices.len())]
                }
            } else {
                sym
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutate_only_substitutes_within_alphabet() {
        fastrand::seed(7);
        let seq: Vec<char> = "AAAAAAAAAA".chars().collect();
        let out = mutate(&seq, &DNA_ALPHABET, 1.0);
        assert_eq!(out.len(), seq.len());
        for (&old, &new) in seq.iter().zip(&out) {
            assert_ne!(old, new, "prob 1.0 must flip every position");
            assert!(DNA_ALPHABET.contains(&new));
        }
    }

    #[test]
    fn mutate_with_zero_prob_is_identity() {
        let seq: Vec<char> = "ACGTACGT".chars().collect();
        assert_eq!(mutate(&seq, &DNA_ALPHABET, 0.0), seq);
    }
}
