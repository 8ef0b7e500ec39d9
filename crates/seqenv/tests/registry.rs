use std::fs;

use seqenv::{CaseRegistry, EnvConfig, SequenceEnv};

#[test]
fn loads_cases_from_json() {
    let json = fs::read_to_string("tests/data/cases.json").unwrap();
    let registry = CaseRegistry::from_json(&json).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.ids(), vec!["gc_rich", "toy_palindrome"]);

    let case = registry.get("toy_palindrome").unwrap();
    assert_eq!(case.motifs, vec!["ACGT", "TGCA"]);
    // optional fields default cleanly
    let sparse = registry.get("gc_rich").unwrap();
    assert!(sparse.motifs.is_empty());
    assert!(sparse.description.is_empty());
}

#[test]
fn json_registry_seeds_environments() {
    let json = fs::read_to_string("tests/data/cases.json").unwrap();
    let registry = CaseRegistry::from_json(&json).unwrap();
    let cfg = EnvConfig {
        case_id: Some("gc_rich".to_string()),
        noise_prob: 0.0,
        ..EnvConfig::default()
    };
    let mut env = SequenceEnv::from_config(&cfg, &registry).unwrap();
    assert_eq!(env.reset(), "ATATATATATAT");
    assert_eq!(env.target().iter().collect::<String>(), "GCGCGCGCGCGC");
}

#[test]
fn malformed_json_is_a_configuration_error() {
    let err = CaseRegistry::from_json("{ not json").unwrap_err();
    assert!(err.to_string().contains("invalid case file"));
}
