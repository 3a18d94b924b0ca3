use std::collections::BTreeMap;

use crate::input::pair_scores::RefPairRecord;
use crate::model::group::CoreSet;
use crate::model::scores::{ScoreKind, ScoreSet};

/// Pooled reference-pair observations for one core group.
#[derive(Debug, Clone, Default)]
pub struct GroupEvidence {
    pub fas_forward: Vec<f32>,
    pub fas_reverse: Vec<f32>,
    pub seq_sim: Vec<f32>,
    /// Per reference species: every architecture-similarity value the
    /// species participated in, either direction. Feeds the per-species
    /// mean table of the report.
    pub per_species: BTreeMap<String, Vec<f32>>,
    pub n_pairs: usize,
}

impl GroupEvidence {
    pub fn values(&self, kind: ScoreKind) -> &[f32] {
        match kind {
            ScoreKind::FasForward => &self.fas_forward,
            ScoreKind::FasReverse => &self.fas_reverse,
            ScoreKind::SeqSim => &self.seq_sim,
        }
    }

    fn push(&mut self, record: &RefPairRecord) {
        let ScoreSet {
            fas_forward,
            fas_reverse,
            seq_sim,
        } = record.scores;
        if let Some(v) = fas_forward {
            self.fas_forward.push(v);
        }
        if let Some(v) = fas_reverse {
            self.fas_reverse.push(v);
        }
        if let Some(v) = seq_sim {
            self.seq_sim.push(v);
        }

        // Pool the directional values onto both participating species.
        let pooled = match (fas_forward, fas_reverse) {
            (Some(f), Some(r)) => Some((f + r) / 2.0),
            (Some(f), None) => Some(f),
            (None, Some(r)) => Some(r),
            (None, None) => None,
        };
        if let Some(v) = pooled {
            for species in [&record.species_a, &record.species_b] {
                self.per_species.entry(species.clone()).or_default().push(v);
            }
        }
        self.n_pairs += 1;
    }

    /// Mean pooled architecture similarity per reference species, in
    /// stable species order.
    pub fn species_means(&self) -> BTreeMap<String, f32> {
        let mut out = BTreeMap::new();
        for (species, values) in &self.per_species {
            if values.is_empty() {
                continue;
            }
            let mean = values.iter().sum::<f32>() / values.len() as f32;
            out.insert(species.clone(), mean);
        }
        out
    }
}

/// Read-only store of reference comparison evidence, one entry per core
/// group that had any usable pair rows.
#[derive(Debug, Clone, Default)]
pub struct EvidenceStore {
    groups: BTreeMap<String, GroupEvidence>,
}

impl EvidenceStore {
    pub fn group(&self, group_id: &str) -> Option<&GroupEvidence> {
        self.groups.get(group_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &GroupEvidence)> {
        self.groups.iter()
    }
}

#[derive(Debug)]
pub struct Stage2Output {
    pub store: EvidenceStore,
    /// Pair rows referencing groups or species outside the core set.
    pub orphaned_rows: usize,
}

/// Fold reference pair records into the per-group evidence store,
/// dropping rows that do not match the loaded core set.
pub fn run_stage2(core_set: &CoreSet, pair_scores: &[RefPairRecord]) -> Stage2Output {
    let mut store = EvidenceStore::default();
    let mut orphaned = 0usize;

    for record in pair_scores {
        let Some(group) = core_set.get(&record.group_id) else {
            tracing::warn!(
                group = record.group_id.as_str(),
                "pair score references unknown core group; dropping row"
            );
            orphaned += 1;
            continue;
        };
        if !group.has_species(&record.species_a) || !group.has_species(&record.species_b) {
            tracing::warn!(
                group = record.group_id.as_str(),
                species_a = record.species_a.as_str(),
                species_b = record.species_b.as_str(),
                "pair score references species outside the group; dropping row"
            );
            orphaned += 1;
            continue;
        }
        store
            .groups
            .entry(record.group_id.clone())
            .or_default()
            .push(record);
    }

    if orphaned > 0 {
        tracing::warn!(orphaned, "dropped pair rows not matching the core set");
    }

    Stage2Output {
        store,
        orphaned_rows: orphaned,
    }
}
