//! Property tests for matrix/metadata alignment across the whole pipeline.
//!
//! Random record sets go through `Pipeline::analyze` and `build_container`;
//! row `i` of every metadata table must describe row/column `i` of its matrix.

use phenodist::container::{Data, build_container};
use phenodist::{Pipeline, PipelineConfig, Profile, RawRecord, ScoringParams, SimilarityOracle, TermTable};
use proptest::prelude::*;

const TERMS: u32 = 30;

fn ontology() -> TermTable {
    let ids: Vec<String> = (1..=TERMS).map(|n| format!("HP:{n:07}")).collect();
    let names: Vec<String> = (1..=TERMS).map(|n| format!("term {n}")).collect();
    TermTable::from_terms(ids.iter().map(String::as_str).zip(names.iter().map(String::as_str)))
}

fn jaccard(a: &Profile, b: &Profile) -> f64 {
    let shared = a.terms().iter().filter(|t| b.terms().contains(t)).count();
    shared as f64 / (a.len() + b.len() - shared) as f64
}

struct JaccardOracle;

impl SimilarityOracle for JaccardOracle {
    fn similarity(&self, pairs: &[(&Profile, &Profile)], _: &ScoringParams) -> phenodist::Result<Vec<f64>> {
        Ok(pairs.iter().map(|(a, b)| jaccard(a, b)).collect())
    }
}

/// Records for 2..8 subjects, each with 1..5 terms out of `TERMS`, interleaved.
fn records_strategy() -> impl Strategy<Value = Vec<RawRecord>> {
    prop::collection::vec(prop::collection::vec(1..=TERMS, 1..5), 2..8)
        .prop_flat_map(|subjects| {
            let records: Vec<RawRecord> = subjects
                .iter()
                .enumerate()
                .flat_map(|(s, terms)| {
                    terms.iter().map(move |t| {
                        RawRecord::new(format!("GENE{}", s % 3), "Disease", format!("S{s}"), format!("HP:{t:07}"))
                    })
                })
                .collect();
            Just(records).prop_shuffle()
        })
        // Make sure at least two distinct terms exist for the term-level matrix.
        .prop_filter("needs two distinct terms", |records| {
            records.iter().any(|r| r.identifier != records[0].identifier)
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn metadata_rows_describe_matrix_rows(records in records_strategy()) {
        let ontology = ontology();
        let pipeline = Pipeline::new(&ontology, &JaccardOracle, PipelineConfig::new("unused"));
        let analysis = pipeline.analyze(&records).unwrap();

        // Subject level
        let n = analysis.subjects.len();
        prop_assert_eq!(analysis.subject_matrix.dim(), n);
        prop_assert_eq!(analysis.subject_metadata.len(), n);
        let labels = analysis.subject_metadata.text("proband_id").unwrap();
        let genes = analysis.subject_metadata.text("gene").unwrap();
        for i in 0..n {
            prop_assert_eq!(&labels[i], &analysis.subjects[i].key.label);
            prop_assert_eq!(&genes[i], &analysis.subjects[i].key.gene);
            for j in 0..n {
                let expected = if i == j {
                    0.0
                } else {
                    1.0 - jaccard(&analysis.subjects[i].profile, &analysis.subjects[j].profile)
                };
                prop_assert_eq!(analysis.subject_matrix.get(i, j).unwrap(), expected);
            }
        }

        // Term level
        let ids = analysis.term_metadata.text("hpo_id").unwrap();
        let names = analysis.term_metadata.text("hpo_name").unwrap();
        prop_assert_eq!(ids.len(), analysis.term_matrix.dim());
        for (i, term) in analysis.terms.iter().enumerate() {
            prop_assert_eq!(ids[i].as_str(), term.first().as_str());
            prop_assert_eq!(&names[i], &format!("term {}", term.first().number().unwrap()));
        }

        // Container index datasets
        let container = build_container(&analysis.pairs(), 4).unwrap();
        for (group, dim) in [("hpo_metadata", analysis.term_matrix.dim()), ("proband_metadata", n)] {
            let index = &container.dataset(&format!("{group}/index")).unwrap().data;
            let expected: Vec<i64> = (0..dim as i64).collect();
            prop_assert_eq!(index, &Data::Int { values: expected });
        }
    }

    #[test]
    fn subject_order_is_first_appearance(records in records_strategy()) {
        let ontology = ontology();
        let pipeline = Pipeline::new(&ontology, &JaccardOracle, PipelineConfig::new("unused"));
        let analysis = pipeline.analyze(&records).unwrap();

        let mut first_seen: Vec<String> = Vec::new();
        for r in &records {
            if !first_seen.contains(&r.label) {
                first_seen.push(r.label.clone());
            }
        }
        let labels: Vec<String> = analysis.subjects.iter().map(|s| s.key.label.clone()).collect();
        prop_assert_eq!(labels, first_seen);
    }
}
