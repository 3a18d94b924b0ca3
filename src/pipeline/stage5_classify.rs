use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use crate::model::candidate::CandidateHit;
use crate::model::cutoffs::{CutoffProfile, GroupCutoffs};
use crate::model::group::CoreSet;
use crate::model::modes::ScoringMode;
use crate::model::scores::ScoreKind;
use crate::model::status::GroupStatus;
use crate::model::verdict::{CheckResult, HitEvidence, Verdict, VerdictFlag, flag_order};

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("no cutoff profile entry for core group {0}; cutoff profile and core set are out of sync")]
    ProfileNotFound(String),
}

#[derive(Debug, Clone)]
pub struct Stage5Inputs<'a> {
    pub core_set: &'a CoreSet,
    pub profile: &'a CutoffProfile,
    pub candidates: &'a BTreeMap<String, Vec<CandidateHit>>,
    pub dropped_groups: &'a BTreeSet<String>,
    pub mode: ScoringMode,
}

/// Classify every core group under one mode. Groups are independent, so
/// classification fans out across the rayon pool; the collect preserves
/// core-set order. A profile miss is an integration error and aborts.
pub fn run_stage5(inputs: &Stage5Inputs<'_>) -> Result<Vec<Verdict>, ClassifyError> {
    let groups: Vec<_> = inputs.core_set.iter().collect();
    groups
        .par_iter()
        .map(|group| {
            let cutoffs = inputs
                .profile
                .group(&group.id)
                .ok_or_else(|| ClassifyError::ProfileNotFound(group.id.clone()))?;
            let candidates = inputs
                .candidates
                .get(&group.id)
                .map(|v| v.as_slice())
                .unwrap_or(&[]);
            Ok(classify_group(
                &group.id,
                candidates,
                cutoffs,
                inputs.mode,
                inputs.dropped_groups.contains(&group.id),
            ))
        })
        .collect()
}

/// Pure function of one group's candidates and cutoffs under one mode.
pub fn classify_group(
    group_id: &str,
    candidates: &[CandidateHit],
    cutoffs: &GroupCutoffs,
    mode: ScoringMode,
    hits_dropped: bool,
) -> Verdict {
    let mut flags = Vec::new();
    if hits_dropped {
        flags.push(VerdictFlag::MalformedHitsDropped);
    }
    if candidates.is_empty() {
        flags.push(VerdictFlag::NoCandidates);
    }

    // A group without derivable cutoffs is excluded from every
    // cutoff-dependent decision: conservatively Missing, with the flag
    // separating it from a genuine absence.
    if !cutoffs.usable() {
        flags.push(VerdictFlag::CutoffUnavailable);
        return verdict(group_id, mode, GroupStatus::Missing, flags, Vec::new(), candidates.len());
    }
    let seq_needed = mode.checks().contains(&ScoreKind::SeqSim);
    if seq_needed && cutoffs.seq_sim.is_none() {
        flags.push(VerdictFlag::SeqEvidenceMissing);
        return verdict(group_id, mode, GroupStatus::Missing, flags, Vec::new(), candidates.len());
    }

    if candidates.is_empty() {
        return verdict(group_id, mode, GroupStatus::Missing, flags, Vec::new(), 0);
    }

    let mut evidence: Vec<HitEvidence> = candidates
        .iter()
        .map(|hit| evaluate_candidate(hit, cutoffs, mode))
        .collect();

    // Deterministic evidence order: full passes first, then reciprocal
    // best hits, then higher mode-score sums; stable sort keeps input
    // order on exact ties.
    evidence.sort_by(|a, b| {
        b.full_pass
            .cmp(&a.full_pass)
            .then(b.reciprocal_best.cmp(&a.reciprocal_best))
            .then(
                score_sum(b)
                    .partial_cmp(&score_sum(a))
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    let full: Vec<&HitEvidence> = evidence.iter().filter(|e| e.full_pass).collect();
    let status = match full.len() {
        0 => {
            if evidence.iter().any(|e| e.checks_passed() > 0) {
                GroupStatus::Partial
            } else {
                GroupStatus::Missing
            }
        }
        1 => GroupStatus::Complete,
        _ => {
            let rbh_full = full.iter().filter(|e| e.reciprocal_best).count();
            if rbh_full == 1 {
                // a single reciprocal best hit dominates its co-hits
                flags.push(VerdictFlag::RbhDominant);
                GroupStatus::Complete
            } else {
                if unresolved_tie(&full) {
                    flags.push(VerdictFlag::UnresolvedTie);
                }
                GroupStatus::Duplicated
            }
        }
    };

    verdict(group_id, mode, status, flags, evidence, candidates.len())
}

fn evaluate_candidate(hit: &CandidateHit, cutoffs: &GroupCutoffs, mode: ScoringMode) -> HitEvidence {
    let mut checks = Vec::with_capacity(mode.checks().len());
    let mut all_passed = true;
    for &kind in mode.checks() {
        let cutoff = cutoffs.get(kind);
        let value = hit.scores.get(kind);
        let passed = match (value, cutoff) {
            (Some(v), Some(c)) => v >= c.lower,
            _ => false,
        };
        all_passed &= passed;
        checks.push(CheckResult {
            kind,
            value,
            cutoff: cutoff.map(|c| c.lower),
            passed,
        });
    }
    let full_pass = all_passed && (!mode.requires_reciprocal_best() || hit.reciprocal_best);
    HitEvidence {
        query_protein: hit.query_protein.clone(),
        ref_species: hit.ref_species.clone(),
        reciprocal_best: hit.reciprocal_best,
        checks,
        full_pass,
    }
}

fn score_sum(evidence: &HitEvidence) -> f32 {
    evidence.checks.iter().filter_map(|c| c.value).sum()
}

/// Top two full passers indistinguishable even by score sum.
fn unresolved_tie(full: &[&HitEvidence]) -> bool {
    match full {
        [first, second, ..] => {
            first.reciprocal_best == second.reciprocal_best
                && score_sum(first) == score_sum(second)
        }
        _ => false,
    }
}

fn verdict(
    group_id: &str,
    mode: ScoringMode,
    status: GroupStatus,
    flags: Vec<VerdictFlag>,
    evidence: Vec<HitEvidence>,
    candidate_count: usize,
) -> Verdict {
    // stable flag ordering
    let mut ordered = Vec::new();
    for flag in flag_order() {
        if flags.contains(flag) {
            ordered.push(*flag);
        }
    }
    Verdict {
        group_id: group_id.to_string(),
        mode,
        status,
        flags: ordered,
        evidence,
        candidate_count,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_classify.rs"]
mod tests;
