//! Metadata alignment.
//!
//! Builds the table that rides along with a distance matrix. Row `i` of the
//! table is produced from `items[i]`, the same list the matrix was computed
//! from, and nothing reorders it afterwards.

use crate::model::{Cell, Column, ColumnValues, MetadataTable, Profile, SubjectProfile, TermId};
use crate::{Error, Result};

/// Reserved for the implicit row index written next to the columns.
pub const INDEX_COLUMN: &str = "index";

/// Column layout of term-level metadata.
pub const TERM_COLUMNS: [&str; 2] = ["hpo_id", "hpo_name"];

/// Column layout of subject-level metadata.
pub const SUBJECT_COLUMNS: [&str; 3] = ["gene", "disease", "proband_id"];

/// Describe each item with one row of cells, in item order.
///
/// Every row must have one cell per column, and a column's cells must share a
/// type (taken from the first row). With no items, every column is an empty
/// text column.
pub fn align<T, F>(items: &[T], columns: &[&str], mut describe: F) -> Result<MetadataTable>
where
    F: FnMut(&T) -> Vec<Cell>,
{
    for (i, name) in columns.iter().enumerate() {
        if *name == INDEX_COLUMN {
            return Err(Error::Metadata(format!("column name '{INDEX_COLUMN}' is reserved")));
        }
        if columns[..i].contains(name) {
            return Err(Error::Metadata(format!("duplicate column '{name}'")));
        }
    }

    let mut values: Vec<Option<ColumnValues>> = vec![None; columns.len()];
    for (row, item) in items.iter().enumerate() {
        let cells = describe(item);
        if cells.len() != columns.len() {
            return Err(Error::Metadata(format!(
                "row {row}: {} cells for {} columns",
                cells.len(),
                columns.len()
            )));
        }
        for (col, cell) in cells.into_iter().enumerate() {
            let slot = values[col].get_or_insert_with(|| match &cell {
                Cell::Text(_) => ColumnValues::Text(Vec::with_capacity(items.len())),
                Cell::Int(_) => ColumnValues::Int(Vec::with_capacity(items.len())),
            });
            match (slot, cell) {
                (ColumnValues::Text(v), Cell::Text(s)) => v.push(s),
                (ColumnValues::Int(v), Cell::Int(i)) => v.push(i),
                (_, cell) => {
                    return Err(Error::Metadata(format!(
                        "row {row}: column '{}' got a {} cell",
                        columns[col],
                        cell.type_name()
                    )));
                }
            }
        }
    }

    let columns = columns
        .iter()
        .zip(values)
        .map(|(name, values)| Column {
            name: (*name).to_string(),
            values: values.unwrap_or(ColumnValues::Text(Vec::new())),
        })
        .collect();
    Ok(MetadataTable::from_columns(columns, items.len()))
}

/// `hpo_id`, `hpo_name` per single-term profile.
pub fn term_metadata<F>(profiles: &[Profile], mut name_of: F) -> Result<MetadataTable>
where
    F: FnMut(&TermId) -> String,
{
    align(profiles, &TERM_COLUMNS, |p| {
        let id = p.first();
        vec![Cell::from(id.as_str()), Cell::from(name_of(id))]
    })
}

/// `gene`, `disease`, `proband_id` per subject profile.
pub fn subject_metadata(subjects: &[SubjectProfile]) -> Result<MetadataTable> {
    align(subjects, &SUBJECT_COLUMNS, |s| {
        vec![
            Cell::from(s.key.gene.as_str()),
            Cell::from(s.key.disease.as_str()),
            Cell::from(s.key.label.as_str()),
        ]
    })
}
