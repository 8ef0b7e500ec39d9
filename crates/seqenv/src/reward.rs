//! Pure scoring of candidate sequences.
//!
//! Every function here is total over valid sequences and free of hidden
//! state: the same arguments always produce the same score. The trainer's
//! potential-based shaping subtracts successive scores, so this purity is
//! load-bearing, not cosmetic.

use std::collections::HashMap;

use crate::env::SequenceEnv;

/// Motifs used when neither the caller nor a demo case supplies any.
pub const DEFAULT_MOTIFS: [&str; 3] = ["ATG", "TATA", "GATA"];

/// Normalized multiset k-mer overlap between `seq` and `reference`.
///
/// Both sequences are split into overlapping length-`k` windows; the score
/// is the multiset intersection size divided by the reference's window
/// count. Always in `[0, 1]`, and exactly `0.0` when either side is
/// shorter than `k` (or `k` is zero).
#[must_use]
pub fn kmer_score(seq: &[char], reference: &[char], k: usize) -> f32 {
    if k == 0 || seq.len() < k || reference.len() < k {
        return 0.0;
    }
    let mut ref_counts: HashMap<&[char], u32> = HashMap::new();
    for window in reference.windows(k) {
        *ref_counts.entry(window).or_insert(0) += 1;
    }
    let mut seq_counts: HashMap<&[char], u32> = HashMap::new();
    for window in seq.windows(k) {
        *seq_counts.entry(window).or_insert(0) += 1;
    }
    let intersection: u32 = seq_counts
        .iter()
        .map(|(window, &count)| count.min(ref_counts.get(window).copied().unwrap_or(0)))
        .sum();
    let denom = (reference.len() - k + 1) as f32;
    intersection as f32 / denom
}

/// Fraction of `motifs` present as contiguous substrings of `seq`.
///
/// In `[0, 1]`; an empty motif set scores `0.0`.
#[must_use]
pub fn motif_score(seq: &[char], motifs: &[String]) -> f32 {
    if motifs.is_empty() {
        return 0.0;
    }
    let hits = motifs
        .iter()
        .filter(|motif| {
            let pattern: Vec<char> = motif.chars().collect();
            !pattern.is_empty()
                && pattern.len() <= seq.len()
                && seq.windows(pattern.len()).any(|w| w == pattern.as_slice())
        })
        .count();
    hits as f32 / motifs.len() as f32
}

/// Weights of the composite reward terms.
#[derive(Clone, Copy, Debug)]
pub struct RewardWeights {
    /// Reward for k-mer resemblance to the target.
    pub target: f32,
    /// Penalty for k-mer resemblance to the avoid sequence.
    pub avoid: f32,
    /// Penalty per edit, normalized by sequence length.
    pub edit: f32,
    /// Reward for known functional motifs.
    pub motif: f32,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            target: 1.0,
            avoid: 0.9,
            edit: 0.4,
            motif: 0.6,
        }
    }
}

/// The composite reward
/// `R = w_t * overlap(seq, target) - w_a * overlap(seq, avoid)
///    - w_e * edits / len + w_m * motif_score(seq)`.
#[derive(Clone, Debug)]
pub struct RewardModel {
    pub weights: RewardWeights,
    pub k: usize,
    motifs: Vec<String>,
}

impl Default for RewardModel {
    fn default() -> Self {
        Self {
            weights: RewardWeights::default(),
            k: 4,
            motifs: DEFAULT_MOTIFS.iter().map(|&m| m.to_string()).collect(),
        }
    }
}

impl RewardModel {
    #[must_use]
    pub fn new(weights: RewardWeights, k: usize, motifs: Vec<String>) -> Self {
        Self { weights, k, motifs }
    }

    /// A model using the environment's case motifs when it has any,
    /// falling back to [`DEFAULT_MOTIFS`].
    #[must_use]
    pub fn for_env(env: &SequenceEnv) -> Self {
        match env.case() {
            Some(case) if !case.motifs.is_empty() => Self {
                motifs: case.motifs.clone(),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn motifs(&self) -> &[String] {
        &self.motifs
    }

    /// Scores a candidate sequence against the target and avoid patterns.
    #[must_use]
    pub fn score(&self, seq: &[char], target: &[char], avoid: &[char], edits: usize) -> f32 {
        let s_target = kmer_score(seq, target, self.k);
        let s_avoid = kmer_score(seq, avoid, self.k);
        let motif = motif_score(seq, &self.motifs);
        let edit_penalty = edits as f32 / seq.len().max(1) as f32;
        self.weights.target * s_target - self.weights.avoid * s_avoid
            - self.weights.edit * edit_penalty
            + self.weights.motif * motif
    }

    /// Scores the environment's current sequence.
    #[must_use]
    pub fn score_env(&self, env: &SequenceEnv, edits: usize) -> f32 {
        self.score(env.symbols(), env.target(), env.avoid(), edits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn identical_sequences_score_one() {
        let seq = chars("AAAAAAAAAA");
        assert!((kmer_score(&seq, &seq, 3) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn short_inputs_score_zero() {
        assert_eq!(kmer_score(&chars("AC"), &chars("ACGTACGT"), 3), 0.0);
        assert_eq!(kmer_score(&chars("ACGTACGT"), &chars("AC"), 3), 0.0);
        assert_eq!(kmer_score(&chars("ACGT"), &chars("ACGT"), 0), 0.0);
    }

    #[test]
    fn kmer_score_is_bounded() {
        let a = chars("ACGTACGTAC");
        let b = chars("TTTTACGTTT");
        let s = kmer_score(&a, &b, 4);
        assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn equal_target_and_avoid_score_equally() {
        let target = chars("AAAAAAAAAA");
        let avoid = chars("AAAAAAAAAA");
        for seq in ["ACGTACGTAC", "AAAAAAAAAA", "GGGGGGGGGG"] {
            let s = chars(seq);
            assert_eq!(kmer_score(&s, &target, 4), kmer_score(&s, &avoid, 4));
        }
    }

    #[test]
    fn motif_score_counts_fraction_present() {
        let motifs: Vec<String> = DEFAULT_MOTIFS.iter().map(|&m| m.to_string()).collect();
        let seq = chars("CCATGCCTATACC");
        // contains ATG and TATA, not GATA
        let s = motif_score(&seq, &motifs);
        assert!((s - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(motif_score(&seq, &[]), 0.0);
    }

    #[test]
    fn for_env_picks_up_case_motifs() {
        let env = SequenceEnv::default_demo().unwrap();
        let model = RewardModel::for_env(&env);
        assert_eq!(model.motifs(), env.case().unwrap().motifs.as_slice());
    }

    #[test]
    fn composite_reward_is_pure() {
        let model = RewardModel::default();
        let seq = chars("ACGTACGTAC");
        let target = chars("ACGTACGTAC");
        let avoid = chars("TTTTTTTTTT");
        let a = model.score(&seq, &target, &avoid, 3);
        let b = model.score(&seq, &target, &avoid, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn edit_penalty_lowers_the_score() {
        let model = RewardModel::default();
        let seq = chars("ACGTACGTAC");
        let target = chars("ACGTACGTAC");
        let avoid = chars("TTTTTTTTTT");
        let none = model.score(&seq, &target, &avoid, 0);
        let some = model.score(&seq, &target, &avoid, 5);
        assert!(some < none);
    }
}
