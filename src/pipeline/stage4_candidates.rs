use std::collections::{BTreeMap, BTreeSet};

use crate::input::hits::RawHitRecord;
use crate::model::candidate::CandidateHit;
use crate::model::group::CoreSet;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AdapterError {
    #[error("hit for {query_protein} references unknown core group {group_id}")]
    UnknownGroup {
        group_id: String,
        query_protein: String,
    },
    #[error("hit for {query_protein} references species {ref_species} outside group {group_id}")]
    UnknownRefSpecies {
        group_id: String,
        query_protein: String,
        ref_species: String,
    },
}

#[derive(Debug)]
pub struct Stage4Output {
    /// Candidate hits keyed by group id; groups without hits are absent.
    pub candidates: BTreeMap<String, Vec<CandidateHit>>,
    /// Malformed rows, dropped with the run continuing.
    pub dropped: Vec<AdapterError>,
    /// Groups that lost at least one row, for the verdict evidence trail.
    pub dropped_groups: BTreeSet<String>,
}

/// Normalize raw search-tool hits into candidate hits, validating every
/// row against the loaded core set. Pure adaptation: no scoring logic,
/// no deduplication.
pub fn run_stage4(core_set: &CoreSet, raw_hits: &[RawHitRecord]) -> Stage4Output {
    let mut candidates: BTreeMap<String, Vec<CandidateHit>> = BTreeMap::new();
    let mut dropped = Vec::new();
    let mut dropped_groups = BTreeSet::new();

    for hit in raw_hits {
        let error = match core_set.get(&hit.group_id) {
            None => Some(AdapterError::UnknownGroup {
                group_id: hit.group_id.clone(),
                query_protein: hit.query_protein.clone(),
            }),
            Some(group) if !group.has_species(&hit.ref_species) => {
                Some(AdapterError::UnknownRefSpecies {
                    group_id: hit.group_id.clone(),
                    query_protein: hit.query_protein.clone(),
                    ref_species: hit.ref_species.clone(),
                })
            }
            Some(_) => None,
        };
        if let Some(error) = error {
            tracing::warn!(%error, "dropping malformed hit");
            if core_set.get(&hit.group_id).is_some() {
                dropped_groups.insert(hit.group_id.clone());
            }
            dropped.push(error);
            continue;
        }

        candidates
            .entry(hit.group_id.clone())
            .or_default()
            .push(CandidateHit {
                query_protein: hit.query_protein.clone(),
                ref_species: hit.ref_species.clone(),
                scores: hit.scores,
                reciprocal_best: hit.reciprocal_best,
            });
    }

    if !dropped.is_empty() {
        tracing::warn!(dropped = dropped.len(), "malformed hits dropped");
    }

    Stage4Output {
        candidates,
        dropped,
        dropped_groups,
    }
}
