//! In-memory ontology.
//!
//! This is the reference implementation of `Ontology`.
//! It is a flat `TermId → name` table with no hierarchy.
//!
//! ## Limitations
//!
//! - **No graph**: parents, ancestors and information content are unknown,
//!   so a `TermTable` cannot act as a similarity oracle.
//! - **Exact ids only**: alternate ids and obsolete terms are not mapped.
//!
//! Use this ontology for:
//! - Testing the validator, aggregator and metadata aligner
//! - Embedding the pipeline with a precomputed similarity oracle
//! - Loading a term list exported from another tool (`id<TAB>name` per line)

use std::io::BufRead;

use hashbrown::HashMap;

use crate::model::TermId;
use crate::{Error, Result};
use super::{Ontology, Resolution};

/// Flat in-memory term table.
#[derive(Debug, Clone, Default)]
pub struct TermTable {
    names: HashMap<TermId, String>,
}

impl TermTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a term. Returns false if `id` is not well-formed.
    pub fn insert(&mut self, id: &str, name: impl Into<String>) -> bool {
        match TermId::parse(id) {
            Some(id) => {
                self.names.insert(id, name.into());
                true
            }
            None => false,
        }
    }

    /// Build a table from `(id, name)` pairs, skipping malformed ids.
    pub fn from_terms<'a>(terms: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut table = Self::new();
        for (id, name) in terms {
            table.insert(id, name);
        }
        table
    }

    /// Parse `id<TAB>name` lines. Blank lines and lines starting with `#` are skipped.
    pub fn from_tsv<R: BufRead>(reader: R) -> Result<Self> {
        let mut table = Self::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let (id, name) = line.split_once('\t').ok_or_else(|| {
                Error::Source(format!("term table line {}: expected id<TAB>name", lineno + 1))
            })?;
            if !table.insert(id, name.trim()) {
                return Err(Error::Source(format!(
                    "term table line {}: malformed term id '{}'",
                    lineno + 1,
                    id
                )));
            }
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Ontology for TermTable {
    fn resolve(&self, raw: &str) -> Resolution {
        match TermId::parse(raw) {
            None => Resolution::Malformed,
            Some(id) if self.names.contains_key(&id) => Resolution::Valid(id),
            Some(_) => Resolution::Unknown,
        }
    }

    fn term_name(&self, id: &TermId) -> Option<String> {
        self.names.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_outcomes() {
        let table = TermTable::from_terms([("HP:0001250", "Seizure")]);
        assert!(table.resolve("HP:0001250").is_valid());
        assert_eq!(table.resolve("HP:9999999"), Resolution::Unknown);
        assert_eq!(table.resolve("Seizure"), Resolution::Malformed);
        assert_eq!(table.resolve(""), Resolution::Malformed);
    }

    #[test]
    fn test_term_lookup() {
        let table = TermTable::from_terms([("HP:0001250", "Seizure")]);
        let term = table.term("HP:0001250").unwrap();
        assert_eq!(term.name, "Seizure");
        assert!(table.term("HP:0000001").is_none());
    }

    #[test]
    fn test_from_tsv() {
        let input = "# id\tname\nHP:0000001\tAll\n\nHP:0001250\tSeizure\r\n";
        let table = TermTable::from_tsv(input.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        let id = TermId::parse("HP:0001250").unwrap();
        assert_eq!(table.term_name(&id).as_deref(), Some("Seizure"));
    }

    #[test]
    fn test_from_tsv_rejects_bad_lines() {
        assert!(matches!(
            TermTable::from_tsv("HP:0000001 All\n".as_bytes()),
            Err(Error::Source(_))
        ));
        assert!(matches!(
            TermTable::from_tsv("XX:1\tAll\n".as_bytes()),
            Err(Error::Source(_))
        ));
    }
}
