//! Metadata tables — one row per profile, positionally aligned with a matrix.

use serde::{Deserialize, Serialize};

use crate::metadata::INDEX_COLUMN;

/// A single metadata cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    Int(i64),
}

impl Cell {
    pub fn type_name(&self) -> &'static str {
        match self {
            Cell::Text(_) => "text",
            Cell::Int(_) => "int",
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

/// Values of one column, homogeneous in type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnValues {
    Text(Vec<String>),
    Int(Vec<i64>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Text(v) => v.len(),
            ColumnValues::Int(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named metadata column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

/// Column-oriented metadata table.
///
/// Row `i` describes row/column `i` of the paired distance matrix. The table
/// carries no explicit index; the index is always `0..len()` and is derived
/// on demand so it can never disagree with the row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTable", into = "RawTable")]
pub struct MetadataTable {
    columns: Vec<Column>,
    rows: usize,
}

/// Unchecked wire form of [`MetadataTable`].
#[derive(Serialize, Deserialize)]
struct RawTable {
    columns: Vec<Column>,
    rows: usize,
}

impl TryFrom<RawTable> for MetadataTable {
    type Error = String;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        for (k, column) in raw.columns.iter().enumerate() {
            if column.name == INDEX_COLUMN {
                return Err(format!("column name '{INDEX_COLUMN}' is reserved"));
            }
            if raw.columns[..k].iter().any(|c| c.name == column.name) {
                return Err(format!("duplicate column '{}'", column.name));
            }
            if column.values.len() != raw.rows {
                return Err(format!(
                    "column '{}' has {} values, table has {} rows",
                    column.name,
                    column.values.len(),
                    raw.rows
                ));
            }
        }
        Ok(Self { columns: raw.columns, rows: raw.rows })
    }
}

impl From<MetadataTable> for RawTable {
    fn from(table: MetadataTable) -> Self {
        Self { columns: table.columns, rows: table.rows }
    }
}

impl MetadataTable {
    /// Only the aligner builds tables; it guarantees equal column lengths.
    pub(crate) fn from_columns(columns: Vec<Column>, rows: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == rows));
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Columns in table order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in table order (the index is not a column).
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Text column by name, `None` if absent or numeric.
    pub fn text(&self, name: &str) -> Option<&[String]> {
        match &self.column(name)?.values {
            ColumnValues::Text(v) => Some(v),
            ColumnValues::Int(_) => None,
        }
    }

    /// Row index, `0..len()`.
    pub fn index(&self) -> Vec<i64> {
        (0..self.rows as i64).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_checks_column_lengths() {
        let ok = r#"{"columns": [{"name": "gene", "values": {"Text": ["A", "B"]}}], "rows": 2}"#;
        let table: MetadataTable = serde_json::from_str(ok).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.index(), vec![0, 1]);

        let short = r#"{"columns": [{"name": "gene", "values": {"Text": ["A"]}}], "rows": 2}"#;
        assert!(serde_json::from_str::<MetadataTable>(short).is_err());
    }

    #[test]
    fn deserialize_rejects_reserved_and_duplicate_names() {
        let reserved = r#"{"columns": [{"name": "index", "values": {"Int": [0]}}], "rows": 1}"#;
        assert!(serde_json::from_str::<MetadataTable>(reserved).is_err());

        let dup = r#"{"columns": [
            {"name": "a", "values": {"Int": [1]}},
            {"name": "a", "values": {"Int": [2]}}
        ], "rows": 1}"#;
        assert!(serde_json::from_str::<MetadataTable>(dup).is_err());
    }
}
