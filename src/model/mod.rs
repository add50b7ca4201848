//! # Phenotype Data Model
//!
//! Plain DTOs shared by every stage: identifiers, profiles, raw records,
//! matrices and metadata tables.
//!
//! Design rule: no ontology handles, no oracle calls, no I/O here.

pub mod term;
pub mod profile;
pub mod record;
pub mod matrix;
pub mod table;

pub use term::{Term, TermId, TERM_PREFIX};
pub use profile::{AggregationKey, Profile, SubjectProfile};
pub use record::RawRecord;
pub use matrix::{DistanceMatrix, condensed_index, pair_count, pair_indices};
pub use table::{Cell, Column, ColumnValues, MetadataTable};
