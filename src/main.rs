mod input;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::input::load_input;
use crate::model::cutoffs::CutoffParams;
use crate::model::modes::ScoringMode;
use crate::pipeline::stage2_evidence::run_stage2;
use crate::pipeline::stage3_cutoffs::run_stage3;
use crate::pipeline::stage4_candidates::run_stage4;
use crate::pipeline::stage5_classify::{Stage5Inputs, run_stage5};
use crate::pipeline::stage6_report::{Stage6Input, write_reports};

#[derive(Parser, Debug)]
#[command(
    name = "coreset-qc",
    version,
    about = "Assess gene-set completeness against curated core ortholog groups"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a completeness assessment for one query gene set.
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Core set definition TSV: group_id, species_id, protein_id.
    #[arg(long)]
    groups: PathBuf,
    /// Reference pair score TSV for the core set.
    #[arg(long = "ref-scores")]
    ref_scores: PathBuf,
    /// Ortholog search hit TSV for the query gene set.
    #[arg(long)]
    hits: PathBuf,
    /// Identifier of the query gene set (e.g. HUMAN@9606@3).
    #[arg(long = "query-id")]
    query_id: String,
    /// Output directory for the report files.
    #[arg(long)]
    out: PathBuf,
    /// Comma-separated mode numbers to evaluate (1-4). Default: all.
    #[arg(long, value_delimiter = ',')]
    modes: Option<Vec<u8>>,
    /// Use the tighter strict_v1 cutoff parameters.
    #[arg(long)]
    strict: bool,
    /// Override the strictness constant for both architecture directions.
    #[arg(long = "k-arch")]
    k_arch: Option<f32>,
    /// Override the strictness constant for sequence similarity.
    #[arg(long = "k-seq")]
    k_seq: Option<f32>,
    /// Override the zero-dispersion fallback margin.
    #[arg(long = "min-margin")]
    min_margin: Option<f32>,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter =
        EnvFilter::try_from_env("CORESET_QC_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let Command::Run(args) = cli.command;

    let (params, profile_name) = resolve_params(&args)?;
    let modes = resolve_modes(args.modes.as_deref())?;

    let bundle = load_input(&args.groups, &args.ref_scores, &args.hits, &args.query_id)
        .map_err(|e| e.to_string())?;

    let stage2 = run_stage2(&bundle.core_set, &bundle.pair_scores);
    let stage3 = run_stage3(&bundle.core_set, &stage2.store, params);
    let stage4 = run_stage4(&bundle.core_set, &bundle.raw_hits);

    // Cutoffs for the whole core set exist before any classification
    // starts; each mode then classifies all groups independently.
    let mut mode_verdicts = Vec::with_capacity(modes.len());
    for mode in &modes {
        let verdicts = run_stage5(&Stage5Inputs {
            core_set: &bundle.core_set,
            profile: &stage3.profile,
            candidates: &stage4.candidates,
            dropped_groups: &stage4.dropped_groups,
            mode: *mode,
        })
        .map_err(|e| e.to_string())?;
        mode_verdicts.push((*mode, verdicts));
    }

    let input = Stage6Input {
        query_id: &bundle.query_id,
        core_set: &bundle.core_set,
        profile: &stage3.profile,
        profile_name,
        store: &stage2.store,
        mode_verdicts: &mode_verdicts,
        pair_rows_orphaned: stage2.orphaned_rows,
        hits_total: bundle.raw_hits.len(),
        hits_dropped: stage4.dropped.len(),
        groups_without_cutoffs: stage3.skipped.len(),
    };
    write_reports(&input, &args.out).map_err(|e| e.to_string())?;

    Ok(())
}

fn resolve_params(args: &RunArgs) -> Result<(CutoffParams, &'static str), String> {
    let mut params = if args.strict {
        CutoffParams::strict_v1()
    } else {
        CutoffParams::default_v1()
    };
    let mut name = if args.strict { "strict_v1" } else { "default_v1" };

    for (label, value) in [
        ("--k-arch", args.k_arch),
        ("--k-seq", args.k_seq),
        ("--min-margin", args.min_margin),
    ] {
        if let Some(v) = value {
            if !v.is_finite() || v <= 0.0 {
                return Err(format!("{label} must be a positive number, got {v}"));
            }
        }
    }
    if let Some(k) = args.k_arch {
        params.k_fas_forward = k;
        params.k_fas_reverse = k;
        name = "custom";
    }
    if let Some(k) = args.k_seq {
        params.k_seq_sim = k;
        name = "custom";
    }
    if let Some(margin) = args.min_margin {
        params.min_margin = margin;
        name = "custom";
    }

    Ok((params, name))
}

fn resolve_modes(requested: Option<&[u8]>) -> Result<Vec<ScoringMode>, String> {
    let Some(requested) = requested else {
        return Ok(ScoringMode::ALL.to_vec());
    };
    if requested.is_empty() {
        return Err("--modes given without any mode numbers".to_string());
    }
    let mut modes = Vec::new();
    for &index in requested {
        let mode = ScoringMode::from_index(index)
            .ok_or_else(|| format!("invalid mode {index} (use 1-4)"))?;
        if !modes.contains(&mode) {
            modes.push(mode);
        }
    }
    modes.sort_by_key(|m| m.index());
    Ok(modes)
}
