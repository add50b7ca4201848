//! Profile aggregation.
//!
//! Turns validated observations into analysis units:
//! - **term profiles**: one single-term profile per distinct valid identifier;
//! - **subject profiles**: one profile per (gene, disease, label) key holding
//!   every valid identifier observed for that subject.
//!
//! Both keep first-appearance order, which later becomes metadata row order.

use hashbrown::{HashMap, HashSet};

use crate::model::{AggregationKey, Profile, RawRecord, SubjectProfile, TermId};
use crate::validate::TermValidator;
use crate::{Error, Result};

/// Stage name reported by aggregation errors.
pub const STAGE: &str = "subject_profiles";

/// One profile per distinct valid identifier. Invalid identifiers are dropped.
pub fn term_profiles<'a>(
    validator: &TermValidator<'_>,
    identifiers: impl IntoIterator<Item = &'a str>,
) -> Vec<Profile> {
    distinct_terms(identifiers.into_iter().filter_map(|raw| validator.resolve(raw)))
}

/// [`term_profiles`] over identifiers that are already resolved.
pub fn distinct_terms(ids: impl IntoIterator<Item = TermId>) -> Vec<Profile> {
    let mut seen: HashSet<TermId> = HashSet::new();
    let mut profiles = Vec::new();
    for id in ids {
        if seen.insert(id.clone()) {
            profiles.push(Profile::single(id));
        }
    }
    profiles
}

/// Group records by aggregation key.
///
/// Every key that appears in `records` yields exactly one profile, including
/// keys whose identifiers are all invalid; such a key fails the whole call
/// with [`Error::Aggregation`].
pub fn subject_profiles(
    validator: &TermValidator<'_>,
    records: &[RawRecord],
) -> Result<Vec<SubjectProfile>> {
    let (resolved, _) = validator.classify(records);
    group_subjects(records.iter().zip(resolved))
}

/// [`subject_profiles`] over records paired with their resolved ids
/// (`None` for a dropped identifier).
pub fn group_subjects<'r>(
    resolved: impl IntoIterator<Item = (&'r RawRecord, Option<TermId>)>,
) -> Result<Vec<SubjectProfile>> {
    let mut slots: HashMap<AggregationKey, usize> = HashMap::new();
    let mut groups: Vec<(AggregationKey, Vec<TermId>)> = Vec::new();

    for (record, id) in resolved {
        let key = record.key();
        let slot = match slots.get(&key) {
            Some(&slot) => slot,
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push((key, Vec::new()));
                groups.len() - 1
            }
        };
        if let Some(id) = id {
            groups[slot].1.push(id);
        }
    }

    groups
        .into_iter()
        .map(|(key, ids)| match Profile::from_terms(ids) {
            Some(profile) => Ok(SubjectProfile { key, profile }),
            None => Err(Error::Aggregation {
                stage: STAGE.into(),
                key: key.to_string(),
            }),
        })
        .collect()
}
