//! End-to-end run: records → profiles → matrices + metadata → container.
//!
//! ```text
//! RecordSource ─► TermValidator ─┬─► term_profiles ────► DistanceEngine("hpo") ─────► term_metadata ─────┐
//!                                └─► subject_profiles ─► DistanceEngine("proband") ─► subject_metadata ──┴─► ContainerWriter
//! ```
//!
//! Everything is computed in memory first. The container is written only
//! after both matrices and both tables exist, so any failure leaves the
//! output path untouched.

use std::path::PathBuf;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::aggregate::{distinct_terms, group_subjects};
use crate::config::PipelineConfig;
use crate::container::{Container, NamedPair, build_container};
use crate::distance::DistanceEngine;
use crate::metadata::{subject_metadata, term_metadata};
use crate::model::{DistanceMatrix, MetadataTable, Profile, RawRecord, SubjectProfile, TermId};
use crate::ontology::Ontology;
use crate::oracle::SimilarityOracle;
use crate::source::RecordSource;
use crate::validate::{TermValidator, ValidationReport};
use crate::Result;

/// Container name of the term-level pair.
pub const TERM_GROUP: &str = "hpo";

/// Container name of the subject-level pair.
pub const SUBJECT_GROUP: &str = "proband";

/// Both matrices with their metadata, before persistence.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub terms: Vec<Profile>,
    pub term_matrix: DistanceMatrix,
    pub term_metadata: MetadataTable,
    pub subjects: Vec<SubjectProfile>,
    pub subject_matrix: DistanceMatrix,
    pub subject_metadata: MetadataTable,
    pub validation: ValidationReport,
}

impl Analysis {
    /// Pairs in container order.
    pub fn pairs(&self) -> [NamedPair<'_>; 2] {
        [
            NamedPair::new(TERM_GROUP, &self.term_matrix, &self.term_metadata),
            NamedPair::new(SUBJECT_GROUP, &self.subject_matrix, &self.subject_metadata),
        ]
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub n_terms: usize,
    pub n_subjects: usize,
    pub validation: ValidationReport,
    pub output: PathBuf,
}

/// Pipeline over a shared ontology and oracle.
pub struct Pipeline<'a> {
    ontology: &'a dyn Ontology,
    oracle: &'a dyn SimilarityOracle,
    config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        ontology: &'a dyn Ontology,
        oracle: &'a dyn SimilarityOracle,
        config: PipelineConfig,
    ) -> Self {
        Self { ontology, oracle, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Compute profiles, matrices and metadata without touching the filesystem.
    pub fn analyze(&self, records: &[RawRecord]) -> Result<Analysis> {
        let validator = TermValidator::new(self.ontology);

        let (resolved, validation) = validator.classify(records);
        tracing::info!(
            records = records.len(),
            valid = validation.valid,
            malformed = validation.malformed,
            unknown = validation.unknown,
            "identifiers validated"
        );

        let terms = distinct_terms(resolved.iter().flatten().cloned());
        let upstream_names = first_term_names(records, &resolved);
        let subjects = group_subjects(records.iter().zip(resolved))?;
        tracing::info!(terms = terms.len(), subjects = subjects.len(), "profiles aggregated");

        let params = self.config.scoring;
        let term_matrix = DistanceEngine::new(self.oracle)
            .with_params(params)
            .with_stage(TERM_GROUP)
            .distances(&terms)?;
        let subject_matrix = DistanceEngine::new(self.oracle)
            .with_params(params)
            .with_stage(SUBJECT_GROUP)
            .distances(&subjects)?;

        let term_metadata = term_metadata(&terms, |id| {
            self.ontology
                .term_name(id)
                .or_else(|| upstream_names.get(id).cloned())
                .unwrap_or_default()
        })?;
        let subject_metadata = subject_metadata(&subjects)?;

        Ok(Analysis {
            terms,
            term_matrix,
            term_metadata,
            subjects,
            subject_matrix,
            subject_metadata,
            validation,
        })
    }

    /// Analyze and lay the result out as a container.
    pub fn build(&self, records: &[RawRecord]) -> Result<Container> {
        let analysis = self.analyze(records)?;
        build_container(&analysis.pairs(), self.config.compression)
    }

    /// Full run: read the source, compute, and overwrite the configured output.
    pub fn run<S: RecordSource + ?Sized>(&self, source: &S) -> Result<RunSummary> {
        self.config.validate()?;
        let writer = self.config.format.writer(self.config.compression)?;

        let records = source.records()?;
        let analysis = self.analyze(&records)?;
        let container = build_container(&analysis.pairs(), self.config.compression)?;
        writer.write(&self.config.output, &container)?;

        tracing::info!(
            output = %self.config.output.display(),
            format = ?self.config.format,
            terms = analysis.terms.len(),
            subjects = analysis.subjects.len(),
            "pipeline finished"
        );

        Ok(RunSummary {
            n_terms: analysis.terms.len(),
            n_subjects: analysis.subjects.len(),
            validation: analysis.validation,
            output: self.config.output.clone(),
        })
    }
}

/// First upstream name seen per resolved identifier; used when the ontology has none.
fn first_term_names(records: &[RawRecord], resolved: &[Option<TermId>]) -> HashMap<TermId, String> {
    let mut names = HashMap::new();
    for (record, id) in records.iter().zip(resolved) {
        let (Some(id), Some(name)) = (id, &record.term_name) else {
            continue;
        };
        names.entry(id.clone()).or_insert_with(|| name.clone());
    }
    names
}
