//! # phenodist — Phenotype Distance Matrices
//!
//! Turns clinical phenotype annotations (HPO term identifiers) into pairwise
//! semantic distance matrices, once over individual terms and once over
//! per-subject phenotype profiles, and persists each matrix together with a
//! positionally aligned metadata table.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `Ontology` and `SimilarityOracle` are the contracts to the term graph
//! 2. **Clean DTOs**: `Profile`, `DistanceMatrix`, `MetadataTable` cross all stages
//! 3. **Explicit pair order**: `pair_indices` drives both the oracle batch and matrix expansion
//! 4. **All or nothing**: the container is written only after every stage succeeded
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use phenodist::{Pipeline, PipelineConfig, RawRecord, TermTable};
//! # use phenodist::{Profile, ScoringParams, SimilarityOracle};
//! # struct MyOracle;
//! # impl SimilarityOracle for MyOracle {
//! #     fn similarity(&self, p: &[(&Profile, &Profile)], _: &ScoringParams) -> phenodist::Result<Vec<f64>> {
//! #         Ok(vec![0.5; p.len()])
//! #     }
//! # }
//!
//! # fn example() -> phenodist::Result<()> {
//! let ontology = TermTable::from_terms([
//!     ("HP:0001250", "Seizure"),
//!     ("HP:0001263", "Global developmental delay"),
//! ]);
//! let records = vec![
//!     RawRecord::new("SCN1A", "Dravet syndrome", "P1", "HP:0001250"),
//!     RawRecord::new("SCN1A", "Dravet syndrome", "P2", "HP:0001263"),
//! ];
//!
//! let pipeline = Pipeline::new(&ontology, &MyOracle, PipelineConfig::new("out.json.gz"));
//! let summary = pipeline.run(&records)?;
//! println!("{} terms, {} subjects", summary.n_terms, summary.n_subjects);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | (default) | In-memory `TermTable` ontology, gzip-JSON containers |
//! | `hpo` | `HpoOntology`: HPO graph + batch similarity via the `hpo` crate |
//! | `hdf5` | `Hdf5Writer`: containers as HDF5 files |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod ontology;
pub mod validate;
pub mod aggregate;
pub mod oracle;
pub mod distance;
pub mod metadata;
pub mod container;
pub mod source;
pub mod config;
pub mod pipeline;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    AggregationKey, Cell, Column, ColumnValues, DistanceMatrix, MetadataTable,
    Profile, RawRecord, SubjectProfile, Term, TermId,
};

// ============================================================================
// Re-exports: Capabilities
// ============================================================================

pub use ontology::{Ontology, OntologyHandle, Resolution, TermTable};
#[cfg(feature = "hpo")]
pub use ontology::HpoOntology;
pub use oracle::{Combiner, IcKind, ScoringParams, SimilarityMethod, SimilarityOracle};
pub use source::{RecordSource, Snapshot};

// ============================================================================
// Re-exports: Stages
// ============================================================================

pub use validate::{TermValidator, ValidationReport};
pub use distance::DistanceEngine;
pub use container::{Container, ContainerFormat, ContainerWriter, JsonGzWriter, NamedPair};
pub use config::PipelineConfig;
pub use pipeline::{Analysis, Pipeline, RunSummary};

// ============================================================================
// Error Types
// ============================================================================

/// How the similarity oracle broke its contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OracleViolation {
    #[error("similarity {value} for pair {pair:?} is outside [0, 1]")]
    OutOfRange { pair: (usize, usize), value: f64 },

    #[error("expected {expected} similarities, got {got}")]
    CountMismatch { expected: usize, got: usize },

    #[error("oracle failed: {0}")]
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Aggregation error in {stage}: subject {key} has no valid identifiers")]
    Aggregation { stage: String, key: String },

    #[error("Insufficient input in {stage}: {count} profile(s), need at least 2")]
    InsufficientInput { stage: String, count: usize },

    #[error("Oracle contract violation in {stage}: {violation}")]
    OracleContract { stage: String, violation: OracleViolation },

    #[error("Persistence error at {path}: {message}")]
    Persistence { path: String, message: String },

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Ontology error: {0}")]
    Ontology(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
