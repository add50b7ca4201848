//! Phenotype profiles — the analysis units a distance matrix is built over.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::TermId;

/// Ordered, deduplicated set of one or more term identifiers.
///
/// Most profiles are single terms or a handful of proband annotations,
/// so the terms live inline up to four entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<TermId>", into = "Vec<TermId>")]
pub struct Profile {
    terms: SmallVec<[TermId; 4]>,
}

impl Profile {
    /// Profile holding exactly one term.
    pub fn single(term: TermId) -> Self {
        let mut terms = SmallVec::new();
        terms.push(term);
        Self { terms }
    }

    /// Build a profile from terms, keeping first-appearance order and dropping repeats.
    /// Returns `None` for an empty input: a profile always has at least one term.
    pub fn from_terms(terms: impl IntoIterator<Item = TermId>) -> Option<Self> {
        let mut out: SmallVec<[TermId; 4]> = SmallVec::new();
        for term in terms {
            if !out.contains(&term) {
                out.push(term);
            }
        }
        if out.is_empty() { None } else { Some(Self { terms: out }) }
    }

    pub fn terms(&self) -> &[TermId] {
        &self.terms
    }

    /// First term; term-level profiles are described by it.
    pub fn first(&self) -> &TermId {
        &self.terms[0]
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Never true for a constructed profile.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl TryFrom<Vec<TermId>> for Profile {
    type Error = &'static str;

    fn try_from(terms: Vec<TermId>) -> Result<Self, Self::Error> {
        Self::from_terms(terms).ok_or("a profile needs at least one term")
    }
}

impl From<Profile> for Vec<TermId> {
    fn from(profile: Profile) -> Self {
        profile.terms.into_vec()
    }
}

impl AsRef<Profile> for Profile {
    fn as_ref(&self) -> &Profile {
        self
    }
}

/// (gene, disease, subject label) — identifies one subject-level profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregationKey {
    pub gene: String,
    pub disease: String,
    pub label: String,
}

impl AggregationKey {
    pub fn new(
        gene: impl Into<String>,
        disease: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            gene: gene.into(),
            disease: disease.into(),
            label: label.into(),
        }
    }

    /// Concatenated identifier `gene__disease__label`.
    pub fn proband_id(&self) -> String {
        format!("{}__{}__{}", self.gene, self.disease, self.label)
    }
}

impl std::fmt::Display for AggregationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.gene, self.disease, self.label)
    }
}

/// One subject's full phenotype together with the key it was grouped under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub key: AggregationKey,
    pub profile: Profile,
}

impl AsRef<Profile> for SubjectProfile {
    fn as_ref(&self) -> &Profile {
        &self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> TermId {
        TermId::parse(s).unwrap()
    }

    #[test]
    fn from_terms_dedups_in_order() {
        let p = Profile::from_terms([id("HP:2"), id("HP:1"), id("HP:2"), id("HP:3")]).unwrap();
        let got: Vec<&str> = p.terms().iter().map(TermId::as_str).collect();
        assert_eq!(got, ["HP:2", "HP:1", "HP:3"]);
        assert_eq!(p.first().as_str(), "HP:2");
    }

    #[test]
    fn empty_profile_is_rejected() {
        assert!(Profile::from_terms(Vec::new()).is_none());
    }

    #[test]
    fn deserialize_rejects_empty_profile() {
        assert!(serde_json::from_str::<Profile>("[]").is_err());
        let p: Profile = serde_json::from_str(r#"["HP:1", "HP:2", "HP:1"]"#).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"["HP:1","HP:2"]"#);
    }

    #[test]
    fn proband_id_joins_key_parts() {
        let key = AggregationKey::new("BRCA1", "Breast cancer", "P1");
        assert_eq!(key.proband_id(), "BRCA1__Breast cancer__P1");
    }
}
