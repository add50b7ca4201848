//! # Pairwise Distance Engine
//!
//! ```text
//! profiles[0..n] ──► pair_indices(n) ──► one oracle batch ──► s ∈ [0,1]
//!                                                             │
//!        DistanceMatrix ◄── from_condensed(n, ·) ◄── d = 1 − s
//! ```
//!
//! The batch is built from [`pair_indices`] and expanded with
//! [`DistanceMatrix::from_condensed`], which walks the same enumeration, so
//! similarity `k` of the oracle reply always lands on pair `k`.
//!
//! A similarity outside `[0, 1]` (or NaN) aborts the computation instead of
//! being clamped: one bad value would appear twice in a symmetric matrix and
//! skew every downstream clustering.

use crate::model::{DistanceMatrix, Profile, pair_count, pair_indices};
use crate::oracle::{ScoringParams, SimilarityOracle};
use crate::{Error, OracleViolation, Result};

pub use crate::model::condensed_index;

/// Computes square distance matrices over ordered profile lists.
pub struct DistanceEngine<'a> {
    oracle: &'a dyn SimilarityOracle,
    params: ScoringParams,
    stage: String,
}

impl<'a> DistanceEngine<'a> {
    pub fn new(oracle: &'a dyn SimilarityOracle) -> Self {
        Self {
            oracle,
            params: ScoringParams::default(),
            stage: "distance".into(),
        }
    }

    pub fn with_params(mut self, params: ScoringParams) -> Self {
        self.params = params;
        self
    }

    /// Stage name used in error reports (e.g. `"hpo"`, `"proband"`).
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = stage.into();
        self
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// Distance matrix over `profiles`; row/column `i` is `profiles[i]`.
    ///
    /// Requires at least two profiles.
    pub fn distances<P: AsRef<Profile>>(&self, profiles: &[P]) -> Result<DistanceMatrix> {
        let n = profiles.len();
        if n < 2 {
            return Err(Error::InsufficientInput {
                stage: self.stage.clone(),
                count: n,
            });
        }

        let pairs: Vec<(usize, usize)> = pair_indices(n).collect();
        let batch: Vec<(&Profile, &Profile)> = pairs
            .iter()
            .map(|&(i, j)| (profiles[i].as_ref(), profiles[j].as_ref()))
            .collect();

        tracing::debug!(
            stage = %self.stage,
            profiles = n,
            pairs = batch.len(),
            params = %self.params,
            "submitting similarity batch"
        );

        let similarities = self
            .oracle
            .similarity(&batch, &self.params)
            .map_err(|e| self.violation(OracleViolation::Failed(e.to_string())))?;

        if similarities.len() != pairs.len() {
            return Err(self.violation(OracleViolation::CountMismatch {
                expected: pairs.len(),
                got: similarities.len(),
            }));
        }

        let mut condensed = Vec::with_capacity(pairs.len());
        for (&pair, &s) in pairs.iter().zip(&similarities) {
            if !(0.0..=1.0).contains(&s) {
                return Err(self.violation(OracleViolation::OutOfRange { pair, value: s }));
            }
            condensed.push(1.0 - s);
        }

        DistanceMatrix::from_condensed(n, &condensed).ok_or_else(|| {
            self.violation(OracleViolation::CountMismatch {
                expected: pair_count(n),
                got: condensed.len(),
            })
        })
    }

    fn violation(&self, violation: OracleViolation) -> Error {
        Error::OracleContract {
            stage: self.stage.clone(),
            violation,
        }
    }
}
