use seqenv::{
    kmer_score, Action, CaseRegistry, EnvConfig, EnvError, Phase, SequenceEnv,
};

fn adhoc(start: &str, target: &str, avoid: &str, horizon: usize) -> SequenceEnv {
    let cfg = EnvConfig {
        start: Some(start.to_string()),
        target: Some(target.to_string()),
        avoid: Some(avoid.to_string()),
        horizon,
        noise_prob: 0.0,
        ..EnvConfig::default()
    };
    SequenceEnv::from_config(&cfg, &CaseRegistry::builtin()).unwrap()
}

#[test]
fn lengths_stay_equal_across_reset_and_step() {
    let mut env = SequenceEnv::default_demo().unwrap();
    let obs = env.reset();
    assert_eq!(obs.len(), env.target().len());
    assert_eq!(obs.len(), env.avoid().len());
    let (obs, _, _) = env.step(Action::Edit { pos: 0, symbol: 'C' }).unwrap();
    assert_eq!(obs.len(), env.target().len());
}

#[test]
fn edit_substitutes_and_records_history() {
    let mut env = adhoc("AAAA", "AAAA", "TTTT", 10);
    env.reset();
    let (obs, _, done) = env.step(Action::Edit { pos: 0, symbol: 'C' }).unwrap();
    assert_eq!(obs, "CAAA");
    assert!(!done);
    assert_eq!(env.history().len(), 1);
    let record = &env.history()[0];
    assert_eq!(record.step, 0);
    assert_eq!(record.pos, 0);
    assert_eq!(record.from, 'A');
    assert_eq!(record.to, 'C');
}

#[test]
fn redundant_edit_counts_a_step_but_leaves_no_record() {
    let mut env = adhoc("AAAA", "AAAA", "TTTT", 10);
    env.reset();
    let (obs, _, _) = env.step(Action::Edit { pos: 2, symbol: 'A' }).unwrap();
    assert_eq!(obs, "AAAA");
    assert_eq!(env.steps(), 1);
    assert!(env.history().is_empty());
}

#[test]
fn identical_states_step_identically() {
    let mut a = adhoc("ACGTACGTAC", "AAAAAAAAAA", "TTTTTTTTTT", 5);
    let mut b = adhoc("ACGTACGTAC", "AAAAAAAAAA", "TTTTTTTTTT", 5);
    a.reset();
    b.reset();
    let action = Action::Edit { pos: 3, symbol: 'G' };
    let ra = a.step(action).unwrap();
    let rb = b.step(action).unwrap();
    assert_eq!(ra, rb);
    assert_eq!(a.history(), b.history());
}

#[test]
fn stop_never_edits_and_always_finishes() {
    let mut env = adhoc("ACGT", "ACGT", "TTTT", 10);
    let before = env.reset();
    let (obs, _, done) = env.step(Action::Stop).unwrap();
    assert_eq!(obs, before);
    assert!(done);
    assert_eq!(env.phase(), Phase::Done);
    // stop consumes no step budget and a finished environment stays put
    assert_eq!(env.steps(), 0);
    let (obs2, _, done2) = env.step(Action::Edit { pos: 0, symbol: 'T' }).unwrap();
    assert_eq!(obs2, before);
    assert!(done2);
    assert_eq!(env.steps(), 0);
}

#[test]
fn horizon_finishes_the_episode_even_without_changes() {
    let mut env = adhoc("AAAA", "AAAA", "TTTT", 3);
    env.reset();
    for i in 0..3 {
        let (_, _, done) = env.step(Action::Edit { pos: 0, symbol: 'A' }).unwrap();
        assert_eq!(done, i == 2, "done only on the step reaching the horizon");
    }
    assert!(env.is_done());
}

#[test]
fn out_of_range_actions_are_contract_violations() {
    let mut env = adhoc("ACGT", "ACGT", "TTTT", 5);
    env.reset();
    let err = env.step(Action::Edit { pos: 9, symbol: 'A' }).unwrap_err();
    assert!(matches!(err, EnvError::InvalidAction { pos: 9, .. }));
    let err = env.step(Action::Edit { pos: 0, symbol: 'Z' }).unwrap_err();
    assert!(matches!(err, EnvError::InvalidAction { symbol: 'Z', .. }));
    // the failed calls must not have advanced the episode
    assert_eq!(env.steps(), 0);
}

#[test]
fn mismatched_lengths_fail_construction() {
    let cfg = EnvConfig {
        start: Some("ACGT".to_string()),
        target: Some("ACG".to_string()),
        avoid: Some("ACGT".to_string()),
        ..EnvConfig::default()
    };
    let err = SequenceEnv::from_config(&cfg, &CaseRegistry::builtin()).unwrap_err();
    assert!(matches!(err, EnvError::Configuration(_)));
}

#[test]
fn seq_len_alone_builds_a_random_environment() {
    fastrand::seed(11);
    let cfg = EnvConfig {
        seq_len: Some(12),
        horizon: 4,
        ..EnvConfig::default()
    };
    let mut env = SequenceEnv::from_config(&cfg, &CaseRegistry::builtin()).unwrap();
    let obs = env.reset();
    assert_eq!(obs.len(), 12);
    assert!(obs.chars().all(|c| "ACGT".contains(c)));
    assert!(env.case().is_none());
}

#[test]
fn unknown_case_id_propagates_with_available_ids() {
    let cfg = EnvConfig {
        case_id: Some("missing".to_string()),
        ..EnvConfig::default()
    };
    let err = SequenceEnv::from_config(&cfg, &CaseRegistry::builtin()).unwrap_err();
    match err {
        EnvError::UnknownCase { available, .. } => {
            assert!(available.contains("mdtfl1_to_mdft1"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn identical_target_and_avoid_always_tie() {
    // horizon/length per the canonical scenario: length 10, horizon 5
    let mut env = adhoc("ACGTACGTAC", "AAAAAAAAAA", "AAAAAAAAAA", 5);
    env.reset();
    for action in [
        Action::Edit { pos: 0, symbol: 'G' },
        Action::Edit { pos: 5, symbol: 'A' },
        Action::Edit { pos: 9, symbol: 'T' },
    ] {
        env.step(action).unwrap();
        let seq = env.symbols();
        assert_eq!(
            kmer_score(seq, env.target(), 4),
            kmer_score(seq, env.avoid(), 4)
        );
    }
}

#[test]
fn from_case_starts_ready() {
    let registry = CaseRegistry::builtin();
    let case = registry.get(seqenv::DEFAULT_CASE_ID).unwrap();
    let mut env = SequenceEnv::from_case(case, 5, 0.0).unwrap();
    assert_eq!(env.phase(), Phase::Ready);
    assert_eq!(env.horizon(), 5);
    assert_eq!(env.reset(), case.initial_sequence);
    assert_eq!(env.phase(), Phase::Running);
    assert!(env.case().is_some());
}

#[test]
fn custom_alphabets_are_supported() {
    fastrand::seed(19);
    let cfg = EnvConfig {
        seq_len: Some(6),
        alphabet: Some(vec!['0', '1']),
        noise_prob: 1.0,
        ..EnvConfig::default()
    };
    let mut env = SequenceEnv::from_config(&cfg, &CaseRegistry::builtin()).unwrap();
    let obs = env.reset();
    assert!(obs.chars().all(|c| c == '0' || c == '1'));
    let err = env.step(Action::Edit { pos: 0, symbol: 'A' }).unwrap_err();
    assert!(matches!(err, EnvError::InvalidAction { .. }));
}

#[test]
fn reset_noise_respects_the_alphabet() {
    fastrand::seed(3);
    let cfg = EnvConfig {
        noise_prob: 1.0,
        ..EnvConfig::default()
    };
    let mut env = SequenceEnv::from_config(&cfg, &CaseRegistry::builtin()).unwrap();
    let case_start = env.case().unwrap().initial_sequence.clone();
    let obs = env.reset();
    assert_eq!(obs.len(), case_start.len());
    assert!(obs.chars().all(|c| "ACGT".contains(c)));
    // with certain noise, every position differs from the configured start
    for (a, b) in case_start.chars().zip(obs.chars()) {
        assert_ne!(a, b);
    }
    assert_eq!(env.initial_sequence(), obs);
}
