//! # Ontology Capability
//!
//! This is the contract between the pipeline and whatever owns the term graph.
//! The pipeline only needs two things from it: does an identifier resolve,
//! and what is the term called.
//!
//! ## Implementations
//!
//! | Ontology | Module | Description |
//! |----------|--------|-------------|
//! | `TermTable` | `term_table` | In-memory id → name table for testing/embedding |
//! | `HpoOntology` | `hpo_graph` | Full HPO graph via the `hpo` crate (feature `hpo`) |
//!
//! ## Process-wide handle
//!
//! Loading a real ontology is expensive, so a process installs it once with
//! [`init`] and passes the returned [`OntologyHandle`] to every component.
//! Nothing in the crate looks the handle up implicitly; tests build their own
//! `TermTable` and never touch the global.

pub mod term_table;
#[cfg(feature = "hpo")]
pub mod hpo_graph;

use std::sync::{Arc, OnceLock};

use crate::model::{Term, TermId};
use crate::{Error, Result};

pub use term_table::TermTable;
#[cfg(feature = "hpo")]
pub use hpo_graph::HpoOntology;

/// Outcome of resolving an untrusted identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Well-formed and present in the ontology.
    Valid(TermId),
    /// Not a syntactically valid identifier.
    Malformed,
    /// Well-formed but not a term of this ontology.
    Unknown,
}

impl Resolution {
    pub fn is_valid(&self) -> bool {
        matches!(self, Resolution::Valid(_))
    }

    pub fn term_id(self) -> Option<TermId> {
        match self {
            Resolution::Valid(id) => Some(id),
            _ => None,
        }
    }
}

/// Read-only term graph capability.
///
/// Implementations must not panic on any input to `resolve`; every failure
/// is reported as `Malformed` or `Unknown`.
pub trait Ontology: Send + Sync {
    /// Resolve a raw identifier string.
    fn resolve(&self, raw: &str) -> Resolution;

    /// Display name of a resolved term.
    fn term_name(&self, id: &TermId) -> Option<String>;

    /// Resolve and name in one step.
    fn term(&self, raw: &str) -> Option<Term> {
        let id = self.resolve(raw).term_id()?;
        let name = self.term_name(&id)?;
        Some(Term { id, name })
    }
}

impl<O: Ontology + ?Sized> Ontology for Arc<O> {
    fn resolve(&self, raw: &str) -> Resolution {
        (**self).resolve(raw)
    }

    fn term_name(&self, id: &TermId) -> Option<String> {
        (**self).term_name(id)
    }
}

/// Shared, immutable ontology handle.
pub type OntologyHandle = Arc<dyn Ontology>;

static GLOBAL: OnceLock<OntologyHandle> = OnceLock::new();

/// Install the process-wide ontology. Fails if one is already installed.
pub fn init<O: Ontology + 'static>(ontology: O) -> Result<OntologyHandle> {
    let handle: OntologyHandle = Arc::new(ontology);
    GLOBAL
        .set(handle.clone())
        .map_err(|_| Error::Config("ontology already initialized".into()))?;
    tracing::info!("ontology initialized");
    Ok(handle)
}

/// The process-wide ontology, if [`init`] has run.
pub fn handle() -> Option<OntologyHandle> {
    GLOBAL.get().cloned()
}
