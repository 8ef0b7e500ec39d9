//! Curated demo sequences for reproducible runs.
//!
//! The built-in case ships short, GC-balanced fragments resembling a
//! repressor segment being steered toward a flowering-locus motif cluster.
//! They are synthetic snippets that provide stable data for demos; nothing
//! here claims biological accuracy.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::EnvError;

/// Identifier of the case used when the caller does not name one.
pub const DEFAULT_CASE_ID: &str = "mdtfl1_to_mdft1";

const MDFT1_SEGMENT: &str = "AAGCCCAATAAACCACTCTGACTGGCCGAATAGGGATATAGGCAACGACATGTGCGGCGA";
const MDTFL1_SEGMENT: &str = "AAGGCCAATAGACCTATATGCCTGCCCGATTAGGCGTAAACGCGGCAACATGTGCAGTTA";

/// An immutable bundle of sequences and motifs seeding one environment.
///
/// All three sequences are the same length; the registry enforces this on
/// insert so an environment built from a case never fails validation.
#[derive(Clone, Debug, Deserialize)]
pub struct DemoCase {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub initial_name: String,
    pub initial_sequence: String,
    pub target_name: String,
    pub target_sequence: String,
    pub avoid_name: String,
    pub avoid_sequence: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub motifs: Vec<String>,
}

/// An explicit, immutable lookup table of demo cases.
///
/// Registries are plain values passed into environment constructors, so
/// several environments seeded from different case sets can coexist.
#[derive(Clone, Debug, Default)]
pub struct CaseRegistry {
    cases: BTreeMap<String, DemoCase>,
}

impl CaseRegistry {
    /// The registry of compiled-in cases.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry
            .insert(DemoCase {
                id: DEFAULT_CASE_ID.to_string(),
                title: "MdTFL1a \u{2192} MdFT1 flowering boost".to_string(),
                description: "Start from a MdTFL1-like repressor fragment and edit toward \
                              the flowering MdFT1 motif cluster. Rewarding FT-like k-mers \
                              while penalizing TFL1 motifs produces a meaningful training \
                              signal."
                    .to_string(),
                initial_name: "MdTFL1a fragment".to_string(),
                initial_sequence: MDTFL1_SEGMENT.to_string(),
                target_name: "MdFT1 promoter fragment".to_string(),
                target_sequence: MDFT1_SEGMENT.to_string(),
                avoid_name: "MdTFL1a reference".to_string(),
                avoid_sequence: MDTFL1_SEGMENT.to_string(),
                objectives: vec!["flowers".to_string(), "height".to_string()],
                motifs: vec![
                    "AAGCCCA".to_string(),
                    "GACTGG".to_string(),
                    "GGATAT".to_string(),
                ],
            })
            .expect("built-in case is well formed");
        registry
    }

    /// Loads a registry from a JSON array of cases.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Configuration`] if the JSON does not parse or a
    /// case's sequences disagree in length.
    pub fn from_json(json: &str) -> Result<Self, EnvError> {
        let cases: Vec<DemoCase> = serde_json::from_str(json)
            .map_err(|e| EnvError::Configuration(format!("invalid case file: {e}")))?;
        let mut registry = Self::default();
        for case in cases {
            registry.insert(case)?;
        }
        Ok(registry)
    }

    /// Adds a case, validating that its sequences share one length.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Configuration`] on a length mismatch.
    pub fn insert(&mut self, case: DemoCase) -> Result<(), EnvError> {
        let len = case.initial_sequence.chars().count();
        if case.target_sequence.chars().count() != len
            || case.avoid_sequence.chars().count() != len
        {
            return Err(EnvError::Configuration(format!(
                "case `{}`: initial, target and avoid sequences must share one length",
                case.id
            )));
        }
        self.cases.insert(case.id.clone(), case);
        Ok(())
    }

    /// Looks up a case by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::UnknownCase`] carrying the sorted list of known
    /// identifiers when the key is absent.
    pub fn get(&self, id: &str) -> Result<&DemoCase, EnvError> {
        self.cases.get(id).ok_or_else(|| EnvError::UnknownCase {
            id: id.to_string(),
            available: self.ids().join(", "),
        })
    }

    /// Sorted case identifiers.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.cases.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_default_case() {
        let registry = CaseRegistry::builtin();
        let case = registry.get(DEFAULT_CASE_ID).unwrap();
        assert_eq!(case.initial_sequence.len(), case.target_sequence.len());
        assert_eq!(case.initial_sequence.len(), case.avoid_sequence.len());
        assert!(!case.motifs.is_empty());
    }

    #[test]
    fn unknown_case_lists_available_ids() {
        let registry = CaseRegistry::builtin();
        let err = registry.get("nope").unwrap_err();
        match err {
            EnvError::UnknownCase { id, available } => {
                assert_eq!(id, "nope");
                assert!(available.contains(DEFAULT_CASE_ID));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mismatched_case_is_rejected() {
        let mut registry = CaseRegistry::default();
        let err = registry.insert(DemoCase {
            id: "bad".to_string(),
            title: "bad".to_string(),
            description: String::new(),
            initial_name: String::new(),
            initial_sequence: "ACGT".to_string(),
            target_name: String::new(),
            target_sequence: "ACG".to_string(),
            avoid_name: String::new(),
            avoid_sequence: "ACGT".to_string(),
            objectives: Vec::new(),
            motifs: Vec::new(),
        });
        assert!(matches!(err, Err(EnvError::Configuration(_))));
    }
}
