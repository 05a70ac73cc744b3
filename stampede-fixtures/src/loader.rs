//! Fixture set loading and random access

use crate::error::FixtureError;
use crate::types::{CodeSample, CodeVariant, Identity, Problem};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

const IDENTITIES_FILE: &str = "identities.json";
const PROBLEMS_FILE: &str = "problems.json";
const CODE_SAMPLES_FILE: &str = "code_samples.json";

/// The complete read-only fixture pool for a run.
///
/// Never written after load; safe for unsynchronized concurrent reads.
#[derive(Debug, Clone)]
pub struct FixtureSet {
    identities: Vec<Identity>,
    problems: Vec<Problem>,
    samples: Vec<CodeSample>,
    languages: Vec<String>,
}

impl FixtureSet {
    /// Load all fixture files from a directory
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let dir = dir.as_ref();

        let identities: Vec<Identity> = read_json(&dir.join(IDENTITIES_FILE))?;
        let problems: Vec<Problem> = read_json(&dir.join(PROBLEMS_FILE))?;
        let samples: Vec<CodeSample> = read_json(&dir.join(CODE_SAMPLES_FILE))?;

        let set = Self::from_parts(identities, problems, samples)?;

        info!(
            identities = set.identities.len(),
            problems = set.problems.len(),
            samples = set.samples.len(),
            languages = set.languages.len(),
            "fixture set loaded"
        );

        Ok(set)
    }

    /// Build a fixture set from already-materialized pools
    pub fn from_parts(
        identities: Vec<Identity>,
        problems: Vec<Problem>,
        samples: Vec<CodeSample>,
    ) -> Result<Self, FixtureError> {
        if identities.is_empty() {
            return Err(FixtureError::EmptyPool("identities"));
        }
        if problems.is_empty() {
            return Err(FixtureError::EmptyPool("problems"));
        }
        if samples.is_empty() {
            return Err(FixtureError::EmptyPool("code_samples"));
        }

        let mut languages: Vec<String> = samples.iter().map(|s| s.language.clone()).collect();
        languages.sort();
        languages.dedup();

        Ok(Self {
            identities,
            problems,
            samples,
            languages,
        })
    }

    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn random_identity<R: Rng + ?Sized>(&self, rng: &mut R) -> &Identity {
        self.identities.choose(rng).expect("identity pool is non-empty")
    }

    pub fn random_problem<R: Rng + ?Sized>(&self, rng: &mut R) -> &Problem {
        self.problems.choose(rng).expect("problem pool is non-empty")
    }

    pub fn random_language<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.languages.choose(rng).expect("language pool is non-empty")
    }

    /// A random sample for the given language and variant. Falls back to
    /// any-language samples of that variant when the exact pairing is not
    /// in the pool, so a sparse fixture set still produces load.
    pub fn random_sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        language: &str,
        variant: CodeVariant,
    ) -> &CodeSample {
        let exact: Vec<&CodeSample> = self
            .samples
            .iter()
            .filter(|s| s.language == language && s.variant == variant)
            .collect();
        if let Some(sample) = exact.choose(rng) {
            return sample;
        }

        let by_variant: Vec<&CodeSample> =
            self.samples.iter().filter(|s| s.variant == variant).collect();
        if let Some(sample) = by_variant.choose(rng) {
            return sample;
        }

        self.samples.choose(rng).expect("sample pool is non-empty")
    }
}

fn read_json<T: DeserializeOwned>(path: &PathBuf) -> Result<T, FixtureError> {
    if !path.exists() {
        return Err(FixtureError::Missing(path.clone()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
        path: path.clone(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| FixtureError::Parse {
        path: path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampede_core::selection::seeded_rng;

    fn sample_pools() -> (Vec<Identity>, Vec<Problem>, Vec<CodeSample>) {
        let identities = vec![
            Identity {
                team_id: 1,
                name: "team-alpha".into(),
                token: "tok-alpha".into(),
            },
            Identity {
                team_id: 2,
                name: "team-beta".into(),
                token: "tok-beta".into(),
            },
        ];
        let problems = vec![Problem {
            id: 10,
            contest_id: 1,
            title: "Two Sum".into(),
        }];
        let samples = vec![
            CodeSample {
                language: "rust".into(),
                variant: CodeVariant::Correct,
                source: "fn main() {}".into(),
            },
            CodeSample {
                language: "python".into(),
                variant: CodeVariant::WrongAnswer,
                source: "print(0)".into(),
            },
        ];
        (identities, problems, samples)
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (identities, problems, samples) = sample_pools();

        std::fs::write(
            dir.path().join(IDENTITIES_FILE),
            serde_json::to_string(&identities).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(PROBLEMS_FILE),
            serde_json::to_string(&problems).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(CODE_SAMPLES_FILE),
            serde_json::to_string(&samples).unwrap(),
        )
        .unwrap();

        let set = FixtureSet::load(dir.path()).unwrap();
        assert_eq!(set.identities().len(), 2);
        assert_eq!(set.languages(), &["python", "rust"]);
    }

    #[test]
    fn test_missing_file_is_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FixtureSet::load(dir.path()).unwrap_err();
        assert!(matches!(err, FixtureError::Missing(_)));
    }

    #[test]
    fn test_empty_pool_rejected() {
        let (identities, problems, _) = sample_pools();
        let err = FixtureSet::from_parts(identities, problems, vec![]).unwrap_err();
        assert!(matches!(err, FixtureError::EmptyPool("code_samples")));
    }

    #[test]
    fn test_sample_fallback_across_languages() {
        let (identities, problems, samples) = sample_pools();
        let set = FixtureSet::from_parts(identities, problems, samples).unwrap();
        let mut rng = seeded_rng(Some(1), 0);

        // No rust/timeout sample exists; fallback still returns something
        let sample = set.random_sample(&mut rng, "rust", CodeVariant::Timeout);
        assert!(!sample.source.is_empty());

        let exact = set.random_sample(&mut rng, "rust", CodeVariant::Correct);
        assert_eq!(exact.language, "rust");
        assert_eq!(exact.variant, CodeVariant::Correct);
    }
}
