//! Raw record sources.
//!
//! The pipeline consumes `(gene, disease, label, identifier)` observations
//! from anything implementing [`RecordSource`]. The bundled source reads a
//! curation-registry snapshot (GCEP JSON) that has already been downloaded:
//!
//! ```text
//! [
//!   {"Gene": "PIK3CD", "Disease": "APDS",
//!    "probands": [{"label": "P1", "HPO terms": ["Recurrent infections (HP:0002719)", ...]}]},
//!   ...
//! ]
//! ```
//!
//! Each annotation is written as `"Term name (HP:0000000)"`. Annotations
//! that do not follow that shape carry no identifier and are skipped.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::model::RawRecord;
use crate::{Error, Result};

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*\((HP:\d+)\)").expect("annotation pattern is valid")
});

/// Split `"Seizure (HP:0001250)"` into `("HP:0001250", "Seizure")`.
pub fn parse_hpo_annotation(annotation: &str) -> Option<(String, String)> {
    let caps = ANNOTATION.captures(annotation)?;
    Some((caps[2].to_string(), caps[1].trim().to_string()))
}

/// Supplier of raw phenotype observations.
pub trait RecordSource {
    fn records(&self) -> Result<Vec<RawRecord>>;
}

impl RecordSource for [RawRecord] {
    fn records(&self) -> Result<Vec<RawRecord>> {
        Ok(self.to_vec())
    }
}

impl RecordSource for Vec<RawRecord> {
    fn records(&self) -> Result<Vec<RawRecord>> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SnapshotEntry {
    #[serde(rename = "Gene")]
    gene: String,
    #[serde(rename = "Disease")]
    disease: String,
    #[serde(default)]
    probands: Vec<ProbandEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ProbandEntry {
    #[serde(default)]
    label: Value,
    #[serde(rename = "HPO terms", default)]
    hpo_terms: Value,
}

/// A parsed registry snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let entries: Vec<SnapshotEntry> = serde_json::from_reader(reader)
            .map_err(|e| Error::Source(format!("snapshot: {e}")))?;
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::Source(format!("{}: {e}", path.display())))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Genes covered by the snapshot, in file order.
    pub fn genes(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.gene.as_str()).collect()
    }
}

impl RecordSource for Snapshot {
    fn records(&self) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for entry in &self.entries {
            for proband in &entry.probands {
                let label = label_text(&proband.label);
                for annotation in annotations(&proband.hpo_terms) {
                    match parse_hpo_annotation(annotation) {
                        Some((id, name)) => records.push(
                            RawRecord::new(&*entry.gene, &*entry.disease, label.clone(), id)
                                .with_term_name(name),
                        ),
                        None => skipped += 1,
                    }
                }
            }
        }
        tracing::debug!(records = records.len(), skipped, "snapshot records extracted");
        Ok(records)
    }
}

fn label_text(label: &Value) -> String {
    match label {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn annotations(terms: &Value) -> Vec<&str> {
    match terms {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}
