//! gzip-compressed JSON containers.
//!
//! The file is a single gzip stream wrapping
//!
//! ```text
//! {"format": "phenodist-container", "version": 1, "root": { attrs, entries }}
//! ```
//!
//! Entries keep their insertion order, so a reader sees exactly the layout
//! `build_container` produced. Output is deterministic: the gzip header
//! carries no timestamp and floats are written in shortest round-trip form.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};

use crate::Result;
use super::{Container, ContainerWriter, DEFAULT_COMPRESSION, Group, atomic_write, persistence};

/// Format tag stored in every file.
pub const FORMAT_TAG: &str = "phenodist-container";

/// Current layout version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format: &'a str,
    version: u32,
    root: &'a Group,
}

#[derive(Deserialize)]
struct Envelope {
    format: String,
    version: u32,
    root: Group,
}

/// Writes containers as gzip-compressed JSON.
#[derive(Debug, Clone, Copy)]
pub struct JsonGzWriter {
    level: u32,
}

impl JsonGzWriter {
    /// `level` is a gzip level; values above 9 are capped.
    pub fn new(level: u32) -> Self {
        Self { level: level.min(9) }
    }

    /// Encode into any writer.
    pub fn encode<W: Write>(&self, writer: W, container: &Container) -> std::io::Result<W> {
        let mut encoder = GzEncoder::new(writer, Compression::new(self.level));
        let envelope = EnvelopeRef {
            format: FORMAT_TAG,
            version: FORMAT_VERSION,
            root: &container.root,
        };
        serde_json::to_writer(&mut encoder, &envelope)?;
        encoder.finish()
    }
}

impl Default for JsonGzWriter {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION)
    }
}

impl ContainerWriter for JsonGzWriter {
    fn write(&self, path: &Path, container: &Container) -> Result<()> {
        atomic_write(path, |tmp| {
            let writer = self
                .encode(BufWriter::new(tmp.as_file_mut()), container)
                .map_err(|e| persistence(path, e))?;
            writer
                .into_inner()
                .map_err(|e| persistence(path, e.error()))?
                .sync_all()
                .map_err(|e| persistence(path, e))
        })
    }
}

/// Load a container written by [`JsonGzWriter`].
pub fn read_json_gz(path: &Path) -> Result<Container> {
    let file = File::open(path).map_err(|e| persistence(path, e))?;
    let envelope: Envelope = serde_json::from_reader(BufReader::new(GzDecoder::new(file)))
        .map_err(|e| persistence(path, e))?;
    if envelope.format != FORMAT_TAG {
        return Err(persistence(path, format!("not a container file (format '{}')", envelope.format)));
    }
    if envelope.version != FORMAT_VERSION {
        return Err(persistence(path, format!("unsupported container version {}", envelope.version)));
    }
    Ok(Container { root: envelope.root })
}
