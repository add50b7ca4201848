//! Ontology term identifiers.

use serde::{Deserialize, Serialize};

/// Prefix every well-formed HPO identifier starts with.
pub const TERM_PREFIX: &str = "HP:";

/// Opaque ontology term identifier (e.g. `"HP:0001250"`).
///
/// Construction through [`TermId::parse`] only checks syntax. Whether the
/// identifier exists is decided by an [`Ontology`](crate::ontology::Ontology).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TermId(String);

impl TermId {
    /// Parse a well-formed identifier: `HP:` followed by one or more ASCII digits.
    /// Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let digits = raw.strip_prefix(TERM_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric part of the identifier.
    pub fn number(&self) -> Option<u32> {
        self.0.strip_prefix(TERM_PREFIX)?.parse().ok()
    }
}

impl std::fmt::Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TermId {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| format!("malformed term identifier {raw:?}"))
    }
}

impl From<TermId> for String {
    fn from(id: TermId) -> Self {
        id.0
    }
}

impl AsRef<str> for TermId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A resolved ontology term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub name: String,
}
