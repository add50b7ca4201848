//! # Hierarchical Container
//!
//! Distance matrices and their metadata are persisted together as a tree of
//! groups, datasets and attributes:
//!
//! ```text
//! /hpo_distance                 float [n × n], compressed
//! /hpo_metadata/hpo_id          text  [n]
//! /hpo_metadata/hpo_name        text  [n]
//! /hpo_metadata/index           int   [n]    0..n-1
//! /hpo_metadata @columns        ["hpo_id", "hpo_name"]
//! /proband_distance             ...
//! /proband_metadata/...         ...
//! ```
//!
//! [`build_container`] turns `(name, matrix, metadata)` pairs into that tree
//! in memory. A [`ContainerWriter`] then persists the whole tree at once.
//!
//! ## Writers
//!
//! | Writer | Format | Description |
//! |--------|--------|-------------|
//! | `JsonGzWriter` | `json_gz` | gzip-compressed JSON, pure Rust (default) |
//! | `Hdf5Writer` | `hdf5` | HDF5 file via libhdf5 (feature `hdf5`) |
//!
//! Writers never leave a half-written file at the target path: they fill a
//! temporary file next to it and rename it into place.

pub mod json_gz;
#[cfg(feature = "hdf5")]
pub mod h5;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::metadata::INDEX_COLUMN;
use crate::model::{ColumnValues, DistanceMatrix, MetadataTable};
use crate::{Error, Result};

pub use json_gz::{JsonGzWriter, read_json_gz};
#[cfg(feature = "hdf5")]
pub use h5::Hdf5Writer;

/// Attribute listing metadata column names in table order.
pub const COLUMNS_ATTR: &str = "columns";

/// gzip level used when none is configured (h5py's default).
pub const DEFAULT_COMPRESSION: u32 = 4;

// ============================================================================
// Tree model
// ============================================================================

/// Dataset payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", rename_all = "snake_case")]
pub enum Data {
    /// Row-major 2-D floats.
    Float { shape: [usize; 2], values: Vec<f64> },
    Text { values: Vec<String> },
    Int { values: Vec<i64> },
}

impl Data {
    /// Number of rows (first dimension).
    pub fn len(&self) -> usize {
        match self {
            Data::Float { shape, .. } => shape[0],
            Data::Text { values } => values.len(),
            Data::Int { values } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named array, optionally gzip-compressed at the given level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub data: Data,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<u32>,
}

/// A string-list attribute on a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Group(Group),
    Dataset(Dataset),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub node: Node,
}

/// Ordered group of entries plus attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub attrs: Vec<Attribute>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Group {
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.node)
    }

    pub fn attr(&self, name: &str) -> Option<&[String]> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.values.as_slice())
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn push(&mut self, name: impl Into<String>, node: Node) {
        self.entries.push(Entry { name: name.into(), node });
    }
}

/// Whole container: a root group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub root: Group,
}

impl Container {
    /// Look up a node by `/`-separated path (leading `/` optional).
    pub fn get(&self, path: &str) -> Option<&Node> {
        let mut parts = path.split('/').filter(|p| !p.is_empty());
        let mut node = self.root.get(parts.next()?)?;
        for part in parts {
            match node {
                Node::Group(g) => node = g.get(part)?,
                Node::Dataset(_) => return None,
            }
        }
        Some(node)
    }

    pub fn group(&self, path: &str) -> Option<&Group> {
        match self.get(path)? {
            Node::Group(g) => Some(g),
            Node::Dataset(_) => None,
        }
    }

    pub fn dataset(&self, path: &str) -> Option<&Dataset> {
        match self.get(path)? {
            Node::Dataset(d) => Some(d),
            Node::Group(_) => None,
        }
    }
}

// ============================================================================
// Building
// ============================================================================

/// One matrix with its metadata, persisted as `{name}_distance` and `{name}_metadata`.
#[derive(Debug, Clone, Copy)]
pub struct NamedPair<'a> {
    pub name: &'a str,
    pub matrix: &'a DistanceMatrix,
    pub metadata: &'a MetadataTable,
}

impl<'a> NamedPair<'a> {
    pub fn new(name: &'a str, matrix: &'a DistanceMatrix, metadata: &'a MetadataTable) -> Self {
        Self { name, matrix, metadata }
    }
}

/// Lay out every pair as a distance dataset plus a metadata group.
///
/// Fails if a table's row count differs from its matrix dimension or a
/// name is used twice; nothing is built in that case.
pub fn build_container(pairs: &[NamedPair<'_>], compression: u32) -> Result<Container> {
    let mut root = Group::default();
    for (i, pair) in pairs.iter().enumerate() {
        if pairs[..i].iter().any(|p| p.name == pair.name) {
            return Err(Error::Metadata(format!("duplicate container entry '{}'", pair.name)));
        }
        let dim = pair.matrix.dim();
        if pair.metadata.len() != dim {
            return Err(Error::Metadata(format!(
                "'{}': {} metadata rows for a {dim}×{dim} matrix",
                pair.name,
                pair.metadata.len()
            )));
        }

        root.push(
            format!("{}_distance", pair.name),
            Node::Dataset(Dataset {
                data: Data::Float {
                    shape: [dim, dim],
                    values: pair.matrix.values().to_vec(),
                },
                compression: Some(compression),
            }),
        );
        root.push(format!("{}_metadata", pair.name), Node::Group(metadata_group(pair.metadata)));
    }
    Ok(Container { root })
}

fn metadata_group(table: &MetadataTable) -> Group {
    let mut group = Group::default();
    for column in table.columns() {
        let data = match &column.values {
            ColumnValues::Text(v) => Data::Text { values: v.clone() },
            ColumnValues::Int(v) => Data::Int { values: v.clone() },
        };
        group.push(column.name.clone(), Node::Dataset(Dataset { data, compression: None }));
    }
    group.push(
        INDEX_COLUMN,
        Node::Dataset(Dataset {
            data: Data::Int { values: table.index() },
            compression: None,
        }),
    );
    group.attrs.push(Attribute {
        name: COLUMNS_ATTR.into(),
        values: table.column_names().into_iter().map(String::from).collect(),
    });
    group
}

// ============================================================================
// Writing
// ============================================================================

/// Output format of a container file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerFormat {
    /// gzip-compressed JSON
    #[default]
    JsonGz,
    /// HDF5 (requires the `hdf5` feature)
    Hdf5,
}

impl ContainerFormat {
    /// Writer for this format.
    pub fn writer(self, compression: u32) -> Result<Box<dyn ContainerWriter>> {
        match self {
            ContainerFormat::JsonGz => Ok(Box::new(JsonGzWriter::new(compression))),
            #[cfg(feature = "hdf5")]
            ContainerFormat::Hdf5 => Ok(Box::new(Hdf5Writer)),
            #[cfg(not(feature = "hdf5"))]
            ContainerFormat::Hdf5 => Err(Error::Config(
                "hdf5 output requires the `hdf5` feature".into(),
            )),
        }
    }
}

/// Persists a complete container at a path, replacing whatever is there.
pub trait ContainerWriter {
    fn write(&self, path: &Path, container: &Container) -> Result<()>;
}

/// Build and persist in one step.
pub fn write(
    path: &Path,
    pairs: &[NamedPair<'_>],
    format: ContainerFormat,
    compression: u32,
) -> Result<()> {
    let container = build_container(pairs, compression)?;
    format.writer(compression)?.write(path, &container)
}

pub(crate) fn persistence(path: &Path, message: impl std::fmt::Display) -> Error {
    Error::Persistence {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Fill a temporary file next to `path`, then rename it over `path`.
///
/// The result carries the permissions of the file it replaces. A new file
/// gets `0o666` filtered by the process umask, like a plain `File::create`.
pub(crate) fn atomic_write<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    builder.prefix(".phenodist-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(|e| persistence(path, e))?;
    fill(&mut tmp)?;
    if let Ok(existing) = std::fs::metadata(path) {
        std::fs::set_permissions(tmp.path(), existing.permissions())
            .map_err(|e| persistence(path, e))?;
    }
    tmp.persist(path).map_err(|e| persistence(path, e.error))?;
    tracing::info!(path = %path.display(), "container written");
    Ok(())
}
