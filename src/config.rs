//! Pipeline configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::container::{ContainerFormat, DEFAULT_COMPRESSION};
use crate::oracle::ScoringParams;
use crate::{Error, Result};

/// Settings for one pipeline run.
///
/// ```json
/// {
///   "output": "data/pird_hpo.json.gz",
///   "format": "json_gz",
///   "compression": 4,
///   "scoring": {"kind": "omim", "method": "graphic", "combine": "funSimAvg"}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Container path; overwritten on every run.
    pub output: PathBuf,
    #[serde(default)]
    pub format: ContainerFormat,
    /// gzip level, 0..=9.
    #[serde(default = "default_compression")]
    pub compression: u32,
    #[serde(default)]
    pub scoring: ScoringParams,
}

fn default_compression() -> u32 {
    DEFAULT_COMPRESSION
}

impl PipelineConfig {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            format: ContainerFormat::default(),
            compression: DEFAULT_COMPRESSION,
            scoring: ScoringParams::default(),
        }
    }

    pub fn with_format(mut self, format: ContainerFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringParams) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| Error::Config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.compression > 9 {
            return Err(Error::Config(format!(
                "compression must be 0..=9, got {}",
                self.compression
            )));
        }
        if self.output.as_os_str().is_empty() {
            return Err(Error::Config("output path is empty".into()));
        }
        Ok(())
    }
}
