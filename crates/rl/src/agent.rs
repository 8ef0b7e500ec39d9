//! The REINFORCE policy agent.
//!
//! Observations are one-hot encodings of the current sequence. Actions are
//! flattened position-major: index `pos * alphabet_len + symbol_idx`, with
//! one extra stop action at the end of the range. The mapping is stateless
//! and bijective over `[0, n_actions)`.

use nn::{softmax, Adam, Dense, Relu, Sequential, Tensor};
use seqenv::Action;

const HIDDEN_DIM: usize = 128;

/// A sampled action index with the log-probability the policy assigned to
/// it at sampling time.
#[derive(Clone, Copy, Debug)]
pub struct SelectedAction {
    pub index: usize,
    pub log_prob: f32,
}

/// One step of an episode.
///
/// The encoded observation is kept because the update step re-runs the
/// forward pass to push gradients through the policy network.
#[derive(Clone, Debug)]
pub struct Transition {
    pub obs: Tensor,
    pub action: usize,
    pub log_prob: f32,
    pub reward: f32,
}

/// Per-episode record of transitions plus the running edit counter.
///
/// Created fresh each episode, consumed by [`ReinforceAgent::update`],
/// then discarded.
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    pub steps: Vec<Transition>,
    pub edits: usize,
}

impl Trajectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, transition: Transition) {
        self.steps.push(transition);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn rewards(&self) -> Vec<f32> {
        self.steps.iter().map(|t| t.reward).collect()
    }
}

/// Discounted returns folded from the end of the episode:
/// `return_t = reward_t + gamma * return_{t+1}`.
#[must_use]
pub fn discounted_returns(rewards: &[f32], gamma: f32) -> Vec<f32> {
    let mut returns = vec![0.0; rewards.len()];
    let mut acc = 0.0;
    for (slot, &reward) in returns.iter_mut().zip(rewards).rev() {
        acc = reward + gamma * acc;
        *slot = acc;
    }
    returns
}

/// Normalizes returns to zero mean and unit variance in place, with a
/// small constant added to the deviation so a constant-return episode
/// yields zeros instead of NaNs.
pub fn normalize_returns(returns: &mut [f32]) {
    if returns.is_empty() {
        return;
    }
    let n = returns.len() as f32;
    let mean = returns.iter().sum::<f32>() / n;
    let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f32>() / n;
    let std = var.sqrt();
    for r in returns.iter_mut() {
        *r = (*r - mean) / (std + 1e-8);
    }
}

/// Monte-Carlo policy-gradient agent over the flattened edit action space.
pub struct ReinforceAgent {
    seq_len: usize,
    alphabet: Vec<char>,
    policy: Sequential,
    optimizer: Adam,
}

impl ReinforceAgent {
    /// Builds an agent with a fresh Glorot-initialized two-layer policy.
    #[must_use]
    pub fn new(seq_len: usize, alphabet: &[char], lr: f32) -> Self {
        let obs_dim = seq_len * alphabet.len();
        let n_actions = obs_dim + 1;
        let mut policy = Sequential::new();
        policy.push(Dense::glorot(obs_dim, HIDDEN_DIM));
        policy.push(Relu);
        policy.push(Dense::glorot(HIDDEN_DIM, n_actions));
        Self::from_policy(seq_len, alphabet, policy, lr)
    }

    /// Builds an agent around an existing policy network.
    ///
    /// The network must map `seq_len * alphabet_len` inputs to
    /// `seq_len * alphabet_len + 1` logits. Useful for replaying saved
    /// parameters or pinning the policy in tests.
    #[must_use]
    pub fn from_policy(seq_len: usize, alphabet: &[char], policy: Sequential, lr: f32) -> Self {
        Self {
            seq_len,
            alphabet: alphabet.to_vec(),
            policy,
            optimizer: Adam::new(lr),
        }
    }

    /// Total number of discrete actions, stop included.
    #[must_use]
    pub fn n_actions(&self) -> usize {
        self.seq_len * self.alphabet.len() + 1
    }

    /// Index of the stop sentinel (always the last action).
    #[must_use]
    pub fn stop_index(&self) -> usize {
        self.n_actions() - 1
    }

    /// One-hot encodes a sequence into the policy's input vector.
    ///
    /// Symbols outside the alphabet map to index 0, keeping the encoding
    /// total over arbitrary input.
    #[must_use]
    pub fn encode(&self, seq: &[char]) -> Tensor {
        let n = self.alphabet.len();
        let mut obs = Tensor::zeros(vec![self.seq_len * n]);
        for (i, ch) in seq.iter().enumerate().take(self.seq_len) {
            let idx = self.alphabet.iter().position(|a| a == ch).unwrap_or(0);
            obs.data[i * n + idx] = 1.0;
        }
        obs
    }

    /// Samples an action from the softmax distribution over the policy's
    /// logits for this observation.
    #[must_use]
    pub fn select_action(&self, seq: &[char]) -> SelectedAction {
        let obs = self.encode(seq);
        let (logits, _) = self.policy.forward(&obs);
        let probs = softmax(&logits.data);
        let index = sample_categorical(&probs);
        SelectedAction {
            index,
            log_prob: probs[index].max(f32::MIN_POSITIVE).ln(),
        }
    }

    /// Decodes a flat action index into an environment action.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `[0, n_actions)`; that is a caller
    /// bug, not an environment outcome.
    #[must_use]
    pub fn decode_action(&self, index: usize) -> Action {
        assert!(index < self.n_actions(), "action index {index} out of range");
        if index == self.stop_index() {
            Action::Stop
        } else {
            Action::Edit {
                pos: index / self.alphabet.len(),
                symbol: self.alphabet[index % self.alphabet.len()],
            }
        }
    }

    /// Performs one REINFORCE update from a finished episode and returns
    /// the scalar loss `-sum_t log_prob_t * normalized_return_t`.
    ///
    /// Returns are discounted from the end of the episode and normalized
    /// to zero mean and unit variance. An empty trajectory is a no-op;
    /// the trainer guarantees at least one entry per episode.
    pub fn update(&mut self, trajectory: &Trajectory, gamma: f32) -> f32 {
        if trajectory.is_empty() {
            return 0.0;
        }
        let mut returns = discounted_returns(&trajectory.rewards(), gamma);
        normalize_returns(&mut returns);

        let mut loss = 0.0;
        let mut total_grads: Vec<Tensor> = Vec::new();
        for (transition, &ret) in trajectory.steps.iter().zip(&returns) {
            let (logits, activations) = self.policy.forward(&transition.obs);
            let probs = softmax(&logits.data);
            loss -= probs[transition.action].max(f32::MIN_POSITIVE).ln() * ret;

            // gradient of -log p(a) * G at the logits: G * (p - onehot(a))
            let grad: Vec<f32> = probs
                .iter()
                .enumerate()
                .map(|(j, &p)| {
                    let delta = if j == transition.action { 1.0 } else { 0.0 };
                    ret * (p - delta)
                })
                .collect();
            let grad = Tensor::from_vec(logits.shape.clone(), grad);
            let (_, param_grads) = self.policy.backward(&activations, &grad);
            if total_grads.is_empty() {
                total_grads = param_grads;
            } else {
                for (acc, g) in total_grads.iter_mut().zip(&param_grads) {
                    for (a, v) in acc.data.iter_mut().zip(&g.data) {
                        *a += v;
                    }
                }
            }
        }

        let params = self.policy.params_mut();
        let mut pairs: Vec<(&mut Tensor, &Tensor)> =
            params.into_iter().zip(total_grads.iter()).collect();
        self.optimizer.step(&mut pairs);
        loss
    }

    #[must_use]
    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    #[must_use]
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }
}

/// Samples an index from a probability vector by inverse CDF.
fn sample_categorical(probs: &[f32]) -> usize {
    let r = fastrand::f32();
    let mut acc = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        acc += p;
        if r < acc {
            return i;
        }
    }
    probs.len() - 1
}
