//! HPO ontology backed by the `hpo` crate (feature `hpo`).
//!
//! One value serves as both capabilities the pipeline consumes: identifier
//! resolution and batch set similarity. The batch is scored on the rayon
//! pool; the pipeline itself stays single-threaded.

use std::path::Path;

use hpo::similarity::{Builtins, GroupSimilarity, StandardCombiner};
use hpo::term::{HpoGroup, InformationContentKind};
use hpo::{HpoSet, HpoTermId};
use rayon::prelude::*;

use crate::model::{Profile, TermId};
use crate::oracle::{Combiner, IcKind, ScoringParams, SimilarityMethod, SimilarityOracle};
use crate::{Error, Result};
use super::{Ontology, Resolution};

/// The full HPO graph with annotations.
pub struct HpoOntology {
    graph: hpo::Ontology,
}

impl HpoOntology {
    pub fn new(graph: hpo::Ontology) -> Self {
        Self { graph }
    }

    /// Load the binary ontology format produced by the `hpo` crate tooling.
    pub fn from_binary(path: &Path) -> Result<Self> {
        let graph = hpo::Ontology::from_binary(path)
            .map_err(|e| Error::Ontology(format!("{}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), terms = graph.len(), "HPO ontology loaded");
        Ok(Self { graph })
    }

    /// Load the standard JAX download folder (`hp.obo` plus annotation files).
    pub fn from_standard(folder: &Path) -> Result<Self> {
        let graph = hpo::Ontology::from_standard(&folder.to_string_lossy())
            .map_err(|e| Error::Ontology(format!("{}: {e}", folder.display())))?;
        tracing::info!(path = %folder.display(), terms = graph.len(), "HPO ontology loaded");
        Ok(Self { graph })
    }

    fn set(&self, profile: &Profile) -> Result<HpoSet<'_>> {
        let mut group = HpoGroup::new();
        for term in profile.terms() {
            let id = HpoTermId::try_from(term.as_str())
                .map_err(|e| Error::Ontology(format!("{term}: {e}")))?;
            group.insert(id);
        }
        Ok(HpoSet::new(&self.graph, group))
    }
}

impl Ontology for HpoOntology {
    fn resolve(&self, raw: &str) -> Resolution {
        let Some(id) = TermId::parse(raw) else {
            return Resolution::Malformed;
        };
        let Ok(hpo_id) = HpoTermId::try_from(id.as_str()) else {
            return Resolution::Malformed;
        };
        // `HP:1250` and `HP:0001250` name the same term; keep the graph's spelling.
        match self.graph.hpo(hpo_id) {
            Some(term) => TermId::parse(&term.id().to_string())
                .map_or(Resolution::Malformed, Resolution::Valid),
            None => Resolution::Unknown,
        }
    }

    fn term_name(&self, id: &TermId) -> Option<String> {
        let hpo_id = HpoTermId::try_from(id.as_str()).ok()?;
        self.graph.hpo(hpo_id).map(|t| t.name().to_string())
    }
}

impl SimilarityOracle for HpoOntology {
    fn similarity(&self, pairs: &[(&Profile, &Profile)], params: &ScoringParams) -> Result<Vec<f64>> {
        let scorer = GroupSimilarity::new(combiner(params.combine), builtin(params.method, params.kind));
        pairs
            .par_iter()
            .map(|(a, b)| {
                let (a, b) = (self.set(a)?, self.set(b)?);
                Ok(f64::from(scorer.calculate(&a, &b)))
            })
            .collect()
    }
}

fn ic_kind(kind: IcKind) -> InformationContentKind {
    match kind {
        IcKind::Omim => InformationContentKind::Omim,
        IcKind::Gene => InformationContentKind::Gene,
        IcKind::Orpha => InformationContentKind::Orpha,
    }
}

fn builtin(method: SimilarityMethod, kind: IcKind) -> Builtins {
    let kind = ic_kind(kind);
    match method {
        SimilarityMethod::GraphIc => Builtins::GraphIc(kind),
        SimilarityMethod::Resnik => Builtins::Resnik(kind),
        SimilarityMethod::Lin => Builtins::Lin(kind),
        SimilarityMethod::JiangConrath => Builtins::Jc(kind),
        SimilarityMethod::Relevance => Builtins::Relevance(kind),
        SimilarityMethod::InformationCoefficient => Builtins::InformationCoefficient(kind),
    }
}

fn combiner(combine: Combiner) -> StandardCombiner {
    match combine {
        Combiner::FunSimAvg => StandardCombiner::FunSimAvg,
        Combiner::FunSimMax => StandardCombiner::FunSimMax,
        Combiner::BestMatchAverage => StandardCombiner::Bma,
    }
}
