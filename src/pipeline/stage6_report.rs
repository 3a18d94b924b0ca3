use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::cutoffs::CutoffProfile;
use crate::model::group::CoreSet;
use crate::model::modes::ScoringMode;
use crate::model::scores::ScoreKind;
use crate::model::verdict::{Verdict, flag_label};
use crate::pipeline::stage2_evidence::EvidenceStore;
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{
    CutoffSettings, EvidenceSummary, ModeSummary, SummaryData, ToolMeta, aggregate_mode,
    format_f32_4,
};

#[derive(Debug, Clone)]
pub struct Stage6Input<'a> {
    pub query_id: &'a str,
    pub core_set: &'a CoreSet,
    pub profile: &'a CutoffProfile,
    pub profile_name: &'static str,
    pub store: &'a EvidenceStore,
    /// Verdict lists in core-set order, one per requested mode.
    pub mode_verdicts: &'a [(ScoringMode, Vec<Verdict>)],
    pub pair_rows_orphaned: usize,
    pub hits_total: usize,
    pub hits_dropped: usize,
    pub groups_without_cutoffs: usize,
}

/// Aggregate all modes into the summary structure. Pure; file writing
/// stays in `write_reports`.
pub fn build_summary(input: &Stage6Input<'_>) -> SummaryData {
    let modes: Vec<ModeSummary> = input
        .mode_verdicts
        .iter()
        .map(|(mode, verdicts)| aggregate_mode(*mode, verdicts))
        .collect();

    SummaryData {
        tool: ToolMeta {
            name: "coreset-qc",
            version: env!("CARGO_PKG_VERSION"),
        },
        query_id: input.query_id.to_string(),
        core_set_groups: input.core_set.len(),
        cutoffs: CutoffSettings {
            profile: input.profile_name,
            k_fas_forward: input.profile.params.k_fas_forward,
            k_fas_reverse: input.profile.params.k_fas_reverse,
            k_seq_sim: input.profile.params.k_seq_sim,
            min_margin: input.profile.params.min_margin,
        },
        evidence: EvidenceSummary {
            pair_rows_orphaned: input.pair_rows_orphaned,
            hits_total: input.hits_total,
            hits_dropped: input.hits_dropped,
            groups_without_cutoffs: input.groups_without_cutoffs,
        },
        modes,
    }
}

pub fn write_reports(input: &Stage6Input<'_>, out_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(out_dir)?;

    write_completeness_tsv(input, &out_dir.join("completeness.tsv"))?;
    write_cutoffs_tsv(input, &out_dir.join("cutoffs.tsv"))?;
    write_ref_means_tsv(input, &out_dir.join("ref_means.tsv"))?;

    let summary = build_summary(input);
    let json = render_summary_json(&summary).map_err(std::io::Error::other)?;
    fs::write(out_dir.join("summary.json"), json)?;
    fs::write(out_dir.join("report.txt"), render_report_text(&summary))?;

    tracing::info!(out = %out_dir.display(), "reports written");
    Ok(())
}

fn write_completeness_tsv(input: &Stage6Input<'_>, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let header = [
        "group_id",
        "mode",
        "status",
        "candidates",
        "query_protein",
        "ref_species",
        "reciprocal_best",
        "fas_forward",
        "fas_forward_cutoff",
        "fas_reverse",
        "fas_reverse_cutoff",
        "seq_sim",
        "seq_sim_cutoff",
        "flags",
    ]
    .join("\t");
    writeln!(w, "{}", header)?;

    // Core-set order is lexicographic; verdict lists share it per mode.
    for (idx, group) in input.core_set.iter().enumerate() {
        for (_, verdicts) in input.mode_verdicts {
            let verdict = &verdicts[idx];
            debug_assert_eq!(verdict.group_id, group.id);
            writeln!(w, "{}", render_row(input, verdict))?;
        }
    }
    Ok(())
}

fn render_row(input: &Stage6Input<'_>, verdict: &Verdict) -> String {
    let cutoffs = input.profile.group(&verdict.group_id);
    let primary = verdict.primary();

    let mut cols = vec![
        verdict.group_id.clone(),
        verdict.mode.label().to_string(),
        verdict.status.label().to_string(),
        verdict.candidate_count.to_string(),
        primary.map_or("NA".to_string(), |p| p.query_protein.clone()),
        primary.map_or("NA".to_string(), |p| p.ref_species.clone()),
        primary.map_or("NA".to_string(), |p| u8::from(p.reciprocal_best).to_string()),
    ];
    for kind in ScoreKind::ALL {
        let value = primary
            .and_then(|p| p.checks.iter().find(|c| c.kind == kind))
            .and_then(|c| c.value);
        let cutoff = cutoffs.and_then(|c| c.get(kind)).map(|c| c.lower);
        cols.push(value.map_or("NA".to_string(), format_f32_4));
        cols.push(cutoff.map_or("NA".to_string(), format_f32_4));
    }
    let flags: Vec<&str> = verdict.flags.iter().map(|&f| flag_label(f)).collect();
    cols.push(if flags.is_empty() {
        "NA".to_string()
    } else {
        flags.join(";")
    });

    cols.join("\t")
}

/// The full threshold descriptor per (group, score kind), for audit and
/// for substitute cutoff estimators to reproduce.
fn write_cutoffs_tsv(input: &Stage6Input<'_>, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "group_id\tscore_kind\tlower\tupper\tmean\tstddev\tn_pairs")?;
    for group in input.core_set.iter() {
        let Some(cutoffs) = input.profile.group(&group.id) else {
            continue;
        };
        for kind in ScoreKind::ALL {
            let Some(cutoff) = cutoffs.get(kind) else {
                continue;
            };
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                group.id,
                kind.label(),
                format_f32_4(cutoff.lower),
                cutoff.upper.map_or("NA".to_string(), format_f32_4),
                format_f32_4(cutoff.mean),
                format_f32_4(cutoff.stddev),
                cutoff.n_pairs
            )?;
        }
    }
    Ok(())
}

/// Per-species mean reference architecture similarity, one row per
/// (group, reference species).
fn write_ref_means_tsv(input: &Stage6Input<'_>, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "group_id\tspecies_id\tmean_fas")?;
    for (group_id, evidence) in input.store.iter() {
        for (species, mean) in evidence.species_means() {
            writeln!(w, "{}\t{}\t{}", group_id, species, format_f32_4(mean))?;
        }
    }
    Ok(())
}
