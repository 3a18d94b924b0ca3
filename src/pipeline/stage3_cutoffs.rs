use rayon::prelude::*;

use crate::model::cutoffs::{CutoffParams, CutoffProfile, GroupCutoffs, ScoreCutoff};
use crate::model::group::CoreSet;
use crate::model::scores::{ScoreKind, clip01};
use crate::pipeline::stage2_evidence::{EvidenceStore, GroupEvidence};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CutoffError {
    #[error("insufficient evidence: {kind} has {got} reference comparisons, need at least 2")]
    InsufficientEvidence { kind: &'static str, got: usize },
}

#[derive(Debug)]
pub struct SkippedGroup {
    pub group_id: String,
    pub reason: CutoffError,
}

#[derive(Debug)]
pub struct Stage3Output {
    pub profile: CutoffProfile,
    /// Groups whose required cutoffs could not be derived. They keep an
    /// empty profile entry and classify as Missing with a distinguishing
    /// flag; the run continues.
    pub skipped: Vec<SkippedGroup>,
}

/// Derive per-group acceptance thresholds from the evidence store.
/// Every core group receives a profile entry; cutoff computation is
/// independent per group and runs in parallel.
pub fn run_stage3(core_set: &CoreSet, store: &EvidenceStore, params: CutoffParams) -> Stage3Output {
    let results: Vec<(String, Result<GroupCutoffs, CutoffError>)> = core_set
        .iter()
        .collect::<Vec<_>>()
        .par_iter()
        .map(|group| {
            let cutoffs = match store.group(&group.id) {
                Some(evidence) => compute_group_cutoffs(evidence, params),
                None => Err(CutoffError::InsufficientEvidence {
                    kind: ScoreKind::FasForward.label(),
                    got: 0,
                }),
            };
            (group.id.clone(), cutoffs)
        })
        .collect();

    let mut profile = CutoffProfile::new(params);
    let mut skipped = Vec::new();
    for (group_id, result) in results {
        match result {
            Ok(cutoffs) => profile.insert(group_id, cutoffs),
            Err(reason) => {
                tracing::warn!(group = group_id.as_str(), %reason, "cutoffs unavailable");
                profile.insert(group_id.clone(), GroupCutoffs::default());
                skipped.push(SkippedGroup { group_id, reason });
            }
        }
    }

    if !skipped.is_empty() {
        tracing::warn!(
            skipped = skipped.len(),
            "groups without derivable cutoffs will classify as missing"
        );
    }

    Stage3Output { profile, skipped }
}

/// Thresholds for one group. Required kinds (both architecture
/// directions) need at least two reference comparisons; sequence
/// similarity is derived only where the core set provides it.
pub fn compute_group_cutoffs(
    evidence: &GroupEvidence,
    params: CutoffParams,
) -> Result<GroupCutoffs, CutoffError> {
    let mut cutoffs = GroupCutoffs::default();
    for kind in ScoreKind::ALL {
        let values = evidence.values(kind);
        if values.len() < 2 {
            if kind.is_required() {
                return Err(CutoffError::InsufficientEvidence {
                    kind: kind.label(),
                    got: values.len(),
                });
            }
            continue;
        }
        cutoffs.set(kind, score_cutoff(values, params.k_for(kind), params.min_margin));
    }
    Ok(cutoffs)
}

/// lower = clamp(mean - k*sd); zero dispersion falls back to the
/// configured margin below the mean so a single outlier query is not
/// rejected against a degenerate threshold.
fn score_cutoff(values: &[f32], k: f32, min_margin: f32) -> ScoreCutoff {
    let n = values.len();
    let mean = values.iter().sum::<f32>() / n as f32;
    let var = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f32>()
        / (n - 1) as f32;
    let stddev = var.sqrt();

    let spread = if stddev > 0.0 { k * stddev } else { min_margin };
    ScoreCutoff {
        lower: clip01(mean - spread),
        upper: Some(clip01(mean + spread)),
        mean,
        stddev,
        n_pairs: n as u32,
    }
}
