pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::modes::ScoringMode;
use crate::model::status::{GroupStatus, status_order};
use crate::model::verdict::{Verdict, VerdictFlag};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub complete: usize,
    pub duplicated: usize,
    pub partial: usize,
    pub missing: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: GroupStatus) {
        match status {
            GroupStatus::Complete => self.complete += 1,
            GroupStatus::Duplicated => self.duplicated += 1,
            GroupStatus::Partial => self.partial += 1,
            GroupStatus::Missing => self.missing += 1,
        }
    }

    pub fn get(&self, status: GroupStatus) -> usize {
        match status {
            GroupStatus::Complete => self.complete,
            GroupStatus::Duplicated => self.duplicated,
            GroupStatus::Partial => self.partial,
            GroupStatus::Missing => self.missing,
        }
    }

    pub fn total(&self) -> usize {
        self.complete + self.duplicated + self.partial + self.missing
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusStat {
    pub name: &'static str,
    pub count: usize,
    pub fraction: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeSummary {
    pub mode: &'static str,
    pub mode_index: u8,
    pub total_groups: usize,
    /// Groups excluded from this mode for lack of derivable cutoffs;
    /// they are counted inside `missing`.
    pub skipped_groups: usize,
    pub counts: StatusCounts,
    pub statuses: Vec<StatusStat>,
}

/// Fold one mode's verdicts into summary counts. Every verdict counts
/// exactly once, so the four statuses always sum to the group total.
pub fn aggregate_mode(mode: ScoringMode, verdicts: &[Verdict]) -> ModeSummary {
    let mut counts = StatusCounts::default();
    let mut skipped = 0usize;
    for verdict in verdicts {
        counts.add(verdict.status);
        if verdict.flags.contains(&VerdictFlag::CutoffUnavailable)
            || verdict.flags.contains(&VerdictFlag::SeqEvidenceMissing)
        {
            skipped += 1;
        }
    }
    let total = verdicts.len();
    let statuses = status_order()
        .iter()
        .map(|&status| StatusStat {
            name: status.label(),
            count: counts.get(status),
            fraction: fraction(counts.get(status), total),
        })
        .collect();
    ModeSummary {
        mode: mode.label(),
        mode_index: mode.index(),
        total_groups: total,
        skipped_groups: skipped,
        counts,
        statuses,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CutoffSettings {
    pub profile: &'static str,
    pub k_fas_forward: f32,
    pub k_fas_reverse: f32,
    pub k_seq_sim: f32,
    pub min_margin: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvidenceSummary {
    pub pair_rows_orphaned: usize,
    pub hits_total: usize,
    pub hits_dropped: usize,
    pub groups_without_cutoffs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub query_id: String,
    pub core_set_groups: usize,
    pub cutoffs: CutoffSettings,
    pub evidence: EvidenceSummary,
    pub modes: Vec<ModeSummary>,
}

pub fn fraction(count: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    count as f32 / total as f32
}

/// Scores and fractions print with four decimals throughout.
pub fn format_f32_4(v: f32) -> String {
    format!("{:.4}", v)
}
