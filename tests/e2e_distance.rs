//! End-to-end tests for the pairwise distance engine.
//!
//! Every test goes: profiles -> one oracle batch -> condensed distances ->
//! square matrix, and checks the matrix against the mock oracle directly.

use parking_lot::Mutex;

use phenodist::model::{condensed_index, pair_indices};
use phenodist::{DistanceEngine, Error, OracleViolation, Profile, ScoringParams, SimilarityOracle, TermId};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn profile(ids: &[&str]) -> Profile {
    Profile::from_terms(ids.iter().map(|s| TermId::parse(s).unwrap())).unwrap()
}

/// Similarity from profile contents: a deterministic function of the term
/// numbers, symmetric in its arguments and inside [0, 1].
fn content_similarity(a: &Profile, b: &Profile) -> f64 {
    let sum = |p: &Profile| -> u64 { p.terms().iter().map(|t| u64::from(t.number().unwrap())).sum() };
    let (x, y) = (sum(a), sum(b));
    1.0 / (1.0 + x.abs_diff(y) as f64)
}

struct ContentOracle;

impl SimilarityOracle for ContentOracle {
    fn similarity(&self, pairs: &[(&Profile, &Profile)], _: &ScoringParams) -> phenodist::Result<Vec<f64>> {
        Ok(pairs.iter().map(|(a, b)| content_similarity(a, b)).collect())
    }
}

/// Scores by explicit term-set lookup, like the scenario table.
struct ScenarioOracle;

impl SimilarityOracle for ScenarioOracle {
    fn similarity(&self, pairs: &[(&Profile, &Profile)], _: &ScoringParams) -> phenodist::Result<Vec<f64>> {
        pairs
            .iter()
            .map(|(a, b)| {
                let key = |p: &Profile| p.terms().iter().map(TermId::as_str).collect::<Vec<_>>().join("+");
                let (mut ka, mut kb) = (key(a), key(b));
                if ka > kb {
                    std::mem::swap(&mut ka, &mut kb);
                }
                match (ka.as_str(), kb.as_str()) {
                    ("HP:0001", "HP:0002") => Ok(0.2),
                    ("HP:0001", "HP:0001+HP:0002") => Ok(0.6),
                    ("HP:0001+HP:0002", "HP:0002") => Ok(0.4),
                    other => Err(Error::Source(format!("unexpected pair {other:?}"))),
                }
            })
            .collect()
    }
}

/// Records the batch it received and the params it was called with.
#[derive(Default)]
struct RecordingOracle {
    batches: Mutex<Vec<Vec<(Profile, Profile)>>>,
    params: Mutex<Vec<ScoringParams>>,
}

impl SimilarityOracle for RecordingOracle {
    fn similarity(&self, pairs: &[(&Profile, &Profile)], params: &ScoringParams) -> phenodist::Result<Vec<f64>> {
        self.batches
            .lock()
            .push(pairs.iter().map(|(a, b)| ((*a).clone(), (*b).clone())).collect());
        self.params.lock().push(*params);
        // Encode the batch position so misplaced values are easy to spot.
        Ok((0..pairs.len()).map(|k| k as f64 / (pairs.len() as f64 + 1.0)).collect())
    }
}

// ============================================================================
// Scenario from the phenotype example
// ============================================================================

#[test]
fn test_three_profile_scenario() {
    let profiles = vec![
        profile(&["HP:0001"]),
        profile(&["HP:0002"]),
        profile(&["HP:0001", "HP:0002"]),
    ];
    let m = DistanceEngine::new(&ScenarioOracle).distances(&profiles).unwrap();

    let expected = [[0.0, 0.8, 0.4], [0.8, 0.0, 0.6], [0.4, 0.6, 0.0]];
    for i in 0..3 {
        for j in 0..3 {
            let got = m.get(i, j).unwrap();
            assert!(
                (got - expected[i][j]).abs() < 1e-12,
                "matrix[{i}][{j}] = {got}, expected {}",
                expected[i][j]
            );
        }
    }
}

// ============================================================================
// Batch shape: one call, lexicographic pair order
// ============================================================================

#[test]
fn test_batch_is_single_and_lexicographic() {
    let profiles: Vec<Profile> = (1..=5).map(|k| profile(&[&format!("HP:{k:07}")])).collect();
    let oracle = RecordingOracle::default();
    let m = DistanceEngine::new(&oracle).distances(&profiles).unwrap();

    let batches = oracle.batches.lock();
    assert_eq!(batches.len(), 1, "exactly one batch call");
    let batch = &batches[0];
    assert_eq!(batch.len(), 10);

    for (k, (i, j)) in pair_indices(5).enumerate() {
        assert_eq!(batch[k].0, profiles[i], "batch[{k}].0");
        assert_eq!(batch[k].1, profiles[j], "batch[{k}].1");
        let s = k as f64 / 11.0;
        assert_eq!(m.get(i, j), Some(1.0 - s));
        assert_eq!(m.get(j, i), Some(1.0 - s));
        assert_eq!(condensed_index(5, i, j), Some(k));
    }
}

#[test]
fn test_scoring_params_reach_the_oracle() {
    let params: ScoringParams =
        serde_json::from_str(r#"{"kind": "gene", "method": "lin", "combine": "funSimMax"}"#).unwrap();
    let oracle = RecordingOracle::default();
    DistanceEngine::new(&oracle)
        .with_params(params)
        .distances(&[profile(&["HP:1"]), profile(&["HP:2"])])
        .unwrap();
    assert_eq!(oracle.params.lock().as_slice(), &[params]);
}

#[test]
fn test_out_of_range_reports_pair_and_stage() {
    struct Bad;
    impl SimilarityOracle for Bad {
        fn similarity(&self, pairs: &[(&Profile, &Profile)], _: &ScoringParams) -> phenodist::Result<Vec<f64>> {
            Ok((0..pairs.len()).map(|k| if k == 1 { 1.4 } else { 0.5 }).collect())
        }
    }
    let profiles = vec![profile(&["HP:1"]), profile(&["HP:2"]), profile(&["HP:3"])];
    let err = DistanceEngine::new(&Bad).with_stage("hpo").distances(&profiles).unwrap_err();
    assert_eq!(err.to_string(), "Oracle contract violation in hpo: similarity 1.4 for pair (0, 2) is outside [0, 1]");
    assert!(matches!(
        err,
        Error::OracleContract { violation: OracleViolation::OutOfRange { pair: (0, 2), .. }, .. }
    ));
}

// ============================================================================
// Universal properties
// ============================================================================

fn profiles_strategy() -> impl Strategy<Value = Vec<Profile>> {
    prop::collection::vec(prop::collection::vec(1u32..500, 1..4), 2..12).prop_map(|sets| {
        sets.into_iter()
            .map(|nums| {
                Profile::from_terms(nums.into_iter().map(|n| TermId::parse(&format!("HP:{n:07}")).unwrap()))
                    .unwrap()
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal(profiles in profiles_strategy()) {
        let m = DistanceEngine::new(&ContentOracle).distances(&profiles).unwrap();
        prop_assert_eq!(m.dim(), profiles.len());
        prop_assert!(m.is_symmetric());
        prop_assert!(m.has_zero_diagonal());
        prop_assert!(m.values().iter().all(|d| (0.0..=1.0).contains(d)));
    }

    #[test]
    fn every_cell_matches_its_own_pair(profiles in profiles_strategy()) {
        let m = DistanceEngine::new(&ContentOracle).distances(&profiles).unwrap();
        for i in 0..profiles.len() {
            for j in 0..profiles.len() {
                if i == j {
                    continue;
                }
                let expected = 1.0 - content_similarity(&profiles[i], &profiles[j]);
                prop_assert_eq!(m.get(i, j).unwrap().to_bits(), expected.to_bits());
            }
        }
    }

    #[test]
    fn repeated_runs_are_identical(profiles in profiles_strategy()) {
        let engine = DistanceEngine::new(&ContentOracle);
        let a = engine.distances(&profiles).unwrap();
        let b = engine.distances(&profiles).unwrap();
        let bits = |m: &phenodist::DistanceMatrix| m.values().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        prop_assert_eq!(bits(&a), bits(&b));
    }
}
