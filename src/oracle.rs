//! Similarity oracle contract.
//!
//! The oracle scores pairs of profiles with a semantic similarity in `[0, 1]`.
//! It is called once per matrix with every pair in the batch, so an
//! implementation is free to amortize graph traversal or fan out internally.

use serde::{Deserialize, Serialize};

use crate::model::Profile;
use crate::Result;

/// Which annotation corpus information content is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IcKind {
    #[default]
    Omim,
    Gene,
    Orpha,
}

impl IcKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IcKind::Omim => "omim",
            IcKind::Gene => "gene",
            IcKind::Orpha => "orpha",
        }
    }
}

/// Term-to-term similarity method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SimilarityMethod {
    #[default]
    #[serde(rename = "graphic")]
    GraphIc,
    #[serde(rename = "resnik")]
    Resnik,
    #[serde(rename = "lin")]
    Lin,
    #[serde(rename = "jc")]
    JiangConrath,
    #[serde(rename = "rel")]
    Relevance,
    #[serde(rename = "ic")]
    InformationCoefficient,
}

impl SimilarityMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMethod::GraphIc => "graphic",
            SimilarityMethod::Resnik => "resnik",
            SimilarityMethod::Lin => "lin",
            SimilarityMethod::JiangConrath => "jc",
            SimilarityMethod::Relevance => "rel",
            SimilarityMethod::InformationCoefficient => "ic",
        }
    }
}

/// Strategy combining term-to-term scores into a profile-to-profile score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Combiner {
    #[default]
    #[serde(rename = "funSimAvg")]
    FunSimAvg,
    #[serde(rename = "funSimMax")]
    FunSimMax,
    #[serde(rename = "BMA")]
    BestMatchAverage,
}

impl Combiner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combiner::FunSimAvg => "funSimAvg",
            Combiner::FunSimMax => "funSimMax",
            Combiner::BestMatchAverage => "BMA",
        }
    }
}

/// Scoring parameters handed to the oracle with every batch.
///
/// Defaults: `omim` information content, `graphic` method, `funSimAvg` combiner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    pub kind: IcKind,
    pub method: SimilarityMethod,
    pub combine: Combiner,
}

impl std::fmt::Display for ScoringParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "kind={} method={} combine={}",
            self.kind.as_str(),
            self.method.as_str(),
            self.combine.as_str(),
        )
    }
}

/// Batch pairwise similarity capability.
pub trait SimilarityOracle: Send + Sync {
    /// Score every pair. The result must have one entry per input pair, in
    /// input order, each in `[0, 1]`.
    fn similarity(&self, pairs: &[(&Profile, &Profile)], params: &ScoringParams) -> Result<Vec<f64>>;
}

impl<T: SimilarityOracle + ?Sized> SimilarityOracle for &T {
    fn similarity(&self, pairs: &[(&Profile, &Profile)], params: &ScoringParams) -> Result<Vec<f64>> {
        (**self).similarity(pairs, params)
    }
}

impl<T: SimilarityOracle + ?Sized> SimilarityOracle for std::sync::Arc<T> {
    fn similarity(&self, pairs: &[(&Profile, &Profile)], params: &ScoringParams) -> Result<Vec<f64>> {
        (**self).similarity(pairs, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_serialize_to_original_names() {
        let json = serde_json::to_value(ScoringParams::default()).unwrap();
        assert_eq!(json, serde_json::json!({
            "kind": "omim",
            "method": "graphic",
            "combine": "funSimAvg",
        }));
    }

    #[test]
    fn test_params_parse_partial() {
        let p: ScoringParams = serde_json::from_str(r#"{"method": "resnik"}"#).unwrap();
        assert_eq!(p.method, SimilarityMethod::Resnik);
        assert_eq!(p.kind, IcKind::Omim);
        assert_eq!(p.combine, Combiner::FunSimAvg);
    }

    #[test]
    fn test_params_display() {
        assert_eq!(
            ScoringParams::default().to_string(),
            "kind=omim method=graphic combine=funSimAvg"
        );
    }
}
