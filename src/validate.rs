//! Term validation.
//!
//! Upstream phenotype records are noisy: free text where an identifier was
//! expected, retired ids, typos. Invalid identifiers are dropped here and
//! never abort a run. The cause is kept as a [`Resolution`] so tests and
//! logs can tell malformed input from unknown terms; the public boolean
//! check collapses it.

use serde::{Deserialize, Serialize};

use crate::model::{RawRecord, TermId};
use crate::ontology::{Ontology, Resolution};

/// Per-cause counts of a validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: usize,
    pub malformed: usize,
    pub unknown: usize,
}

impl ValidationReport {
    pub fn record(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Valid(_) => self.valid += 1,
            Resolution::Malformed => self.malformed += 1,
            Resolution::Unknown => self.unknown += 1,
        }
    }

    /// Identifiers dropped for any reason.
    pub fn dropped(&self) -> usize {
        self.malformed + self.unknown
    }

    pub fn total(&self) -> usize {
        self.valid + self.dropped()
    }
}

/// Checks identifiers against an ontology.
#[derive(Clone, Copy)]
pub struct TermValidator<'o> {
    ontology: &'o dyn Ontology,
}

impl<'o> TermValidator<'o> {
    pub fn new(ontology: &'o dyn Ontology) -> Self {
        Self { ontology }
    }

    /// Resolve with cause.
    pub fn check(&self, raw: &str) -> Resolution {
        let resolution = self.ontology.resolve(raw);
        if !resolution.is_valid() {
            tracing::debug!(identifier = raw, ?resolution, "dropping identifier");
        }
        resolution
    }

    /// True iff `raw` resolves in the ontology. Never fails.
    pub fn is_valid(&self, raw: &str) -> bool {
        self.check(raw).is_valid()
    }

    /// Resolved id for `raw`, or `None` for any kind of failure.
    pub fn resolve(&self, raw: &str) -> Option<TermId> {
        self.check(raw).term_id()
    }

    /// Resolve every record's identifier exactly once.
    ///
    /// The result is positionally aligned with `records`: entry `i` is the
    /// resolved id of `records[i]`, or `None` if it was dropped.
    pub fn classify(&self, records: &[RawRecord]) -> (Vec<Option<TermId>>, ValidationReport) {
        let mut report = ValidationReport::default();
        let resolved = records
            .iter()
            .map(|record| {
                let resolution = self.check(&record.identifier);
                report.record(&resolution);
                resolution.term_id()
            })
            .collect();
        (resolved, report)
    }

    /// Keep records whose identifier resolves, in input order.
    pub fn filter<'r>(&self, records: &'r [RawRecord]) -> (Vec<(&'r RawRecord, TermId)>, ValidationReport) {
        let (resolved, report) = self.classify(records);
        let kept = records
            .iter()
            .zip(resolved)
            .filter_map(|(record, id)| Some((record, id?)))
            .collect();
        (kept, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::TermTable;

    fn table() -> TermTable {
        TermTable::from_terms([("HP:0000001", "All"), ("HP:0001250", "Seizure")])
    }

    #[test]
    fn test_is_valid_never_fails() {
        let table = table();
        let v = TermValidator::new(&table);
        assert!(v.is_valid("HP:0001250"));
        assert!(!v.is_valid(""));
        assert!(!v.is_valid("Seizure (no id)"));
        assert!(!v.is_valid("HP:7654321"));
    }

    #[test]
    fn test_check_keeps_cause() {
        let table = table();
        let v = TermValidator::new(&table);
        assert_eq!(v.check(""), Resolution::Malformed);
        assert_eq!(v.check("not an id"), Resolution::Malformed);
        assert_eq!(v.check("HP:7654321"), Resolution::Unknown);
    }

    #[test]
    fn test_filter_reports_counts() {
        let table = table();
        let v = TermValidator::new(&table);
        let records = vec![
            RawRecord::new("G", "D", "P1", "HP:0001250"),
            RawRecord::new("G", "D", "P1", "garbage"),
            RawRecord::new("G", "D", "P2", "HP:0000002"),
            RawRecord::new("G", "D", "P2", "HP:0000001"),
        ];
        let (kept, report) = v.filter(&records);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].1.as_str(), "HP:0001250");
        assert_eq!(kept[1].0.label, "P2");
        assert_eq!(report, ValidationReport { valid: 2, malformed: 1, unknown: 1 });
        assert_eq!(report.dropped(), 2);
        assert_eq!(report.total(), 4);
    }

    #[test]
    fn test_classify_is_aligned_with_records() {
        let table = table();
        let v = TermValidator::new(&table);
        let records = vec![
            RawRecord::new("G", "D", "P1", "garbage"),
            RawRecord::new("G", "D", "P1", "HP:0001250"),
            RawRecord::new("G", "D", "P2", "HP:0000002"),
        ];
        let (resolved, report) = v.classify(&records);
        assert_eq!(resolved, vec![None, TermId::parse("HP:0001250"), None]);
        assert_eq!(report, ValidationReport { valid: 1, malformed: 1, unknown: 1 });
    }
}
