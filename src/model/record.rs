//! Raw phenotype observations as delivered by a record source.

use serde::{Deserialize, Serialize};

use super::AggregationKey;

/// One (gene, disease, subject, identifier) observation.
///
/// `identifier` is untrusted: it has not been checked against the ontology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub gene: String,
    pub disease: String,
    pub label: String,
    pub identifier: String,
    /// Term name as written in the upstream record, if any.
    pub term_name: Option<String>,
}

impl RawRecord {
    pub fn new(
        gene: impl Into<String>,
        disease: impl Into<String>,
        label: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            gene: gene.into(),
            disease: disease.into(),
            label: label.into(),
            identifier: identifier.into(),
            term_name: None,
        }
    }

    pub fn with_term_name(mut self, name: impl Into<String>) -> Self {
        self.term_name = Some(name.into());
        self
    }

    pub fn key(&self) -> AggregationKey {
        AggregationKey::new(self.gene.clone(), self.disease.clone(), self.label.clone())
    }
}
