use std::collections::BTreeMap;

use crate::model::scores::ScoreKind;

/// Strictness constants for cutoff derivation. Passed into the cutoff
/// stage explicitly so concurrent runs can use different settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoffParams {
    pub k_fas_forward: f32,
    pub k_fas_reverse: f32,
    pub k_seq_sim: f32,
    /// Fallback margin below the mean when reference pairs show zero
    /// dispersion; the lower bound never collapses onto the raw mean.
    pub min_margin: f32,
}

impl CutoffParams {
    pub fn default_v1() -> Self {
        Self {
            k_fas_forward: 2.0,
            k_fas_reverse: 2.0,
            k_seq_sim: 2.0,
            min_margin: 0.05,
        }
    }

    pub fn strict_v1() -> Self {
        Self {
            k_fas_forward: 1.0,
            k_fas_reverse: 1.0,
            k_seq_sim: 1.0,
            min_margin: 0.02,
        }
    }

    pub fn k_for(&self, kind: ScoreKind) -> f32 {
        match kind {
            ScoreKind::FasForward => self.k_fas_forward,
            ScoreKind::FasReverse => self.k_fas_reverse,
            ScoreKind::SeqSim => self.k_seq_sim,
        }
    }
}

/// Acceptance threshold for one score kind of one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCutoff {
    pub lower: f32,
    pub upper: Option<f32>,
    pub mean: f32,
    pub stddev: f32,
    pub n_pairs: u32,
}

/// Per-group thresholds. A kind is `None` when the core set carried no
/// usable pair evidence for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupCutoffs {
    pub fas_forward: Option<ScoreCutoff>,
    pub fas_reverse: Option<ScoreCutoff>,
    pub seq_sim: Option<ScoreCutoff>,
}

impl GroupCutoffs {
    pub fn get(&self, kind: ScoreKind) -> Option<&ScoreCutoff> {
        match kind {
            ScoreKind::FasForward => self.fas_forward.as_ref(),
            ScoreKind::FasReverse => self.fas_reverse.as_ref(),
            ScoreKind::SeqSim => self.seq_sim.as_ref(),
        }
    }

    pub fn set(&mut self, kind: ScoreKind, cutoff: ScoreCutoff) {
        match kind {
            ScoreKind::FasForward => self.fas_forward = Some(cutoff),
            ScoreKind::FasReverse => self.fas_reverse = Some(cutoff),
            ScoreKind::SeqSim => self.seq_sim = Some(cutoff),
        }
    }

    /// True when the required architecture-similarity cutoffs exist.
    pub fn usable(&self) -> bool {
        self.fas_forward.is_some() && self.fas_reverse.is_some()
    }
}

/// Read-only threshold map for one core set. Every group of the core set
/// has an entry, including groups whose cutoffs could not be derived;
/// a lookup miss therefore signals a core-set version mismatch, not a
/// data condition.
#[derive(Debug, Clone)]
pub struct CutoffProfile {
    pub params: CutoffParams,
    groups: BTreeMap<String, GroupCutoffs>,
}

impl CutoffProfile {
    pub fn new(params: CutoffParams) -> Self {
        Self {
            params,
            groups: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, group_id: String, cutoffs: GroupCutoffs) {
        self.groups.insert(group_id, cutoffs);
    }

    pub fn group(&self, group_id: &str) -> Option<&GroupCutoffs> {
        self.groups.get(group_id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
