use crate::report::{ModeSummary, SummaryData, format_f32_4};

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Gene Set Completeness Report\n");
    out.push_str("============================\n\n");

    out.push_str("1. Run\n");
    out.push_str(&format!("Query gene set: {}\n", data.query_id));
    out.push_str(&format!("Core groups assessed: {}\n", data.core_set_groups));
    out.push_str(&format!(
        "Cutoff profile: {} (k_fwd={}, k_rev={}, k_seq={}, min_margin={})\n\n",
        data.cutoffs.profile,
        format_f32_4(data.cutoffs.k_fas_forward),
        format_f32_4(data.cutoffs.k_fas_reverse),
        format_f32_4(data.cutoffs.k_seq_sim),
        format_f32_4(data.cutoffs.min_margin)
    ));

    out.push_str("2. Completeness by mode\n");
    for mode in &data.modes {
        out.push_str(&format!(
            "{}: complete={} duplicated={} partial={} missing={} ({} found)\n",
            mode.mode,
            mode.counts.complete,
            mode.counts.duplicated,
            mode.counts.partial,
            mode.counts.missing,
            format_f32_4(found_fraction(mode))
        ));
    }
    if let Some(strictest) = data.modes.last() {
        out.push_str(&format!("Assessment: {}\n", completeness_statement(strictest)));
    }
    out.push('\n');

    out.push_str("3. Caveats\n");
    out.push_str(&format!(
        "Groups without derivable cutoffs: {} (reported missing)\n",
        data.evidence.groups_without_cutoffs
    ));
    out.push_str(&format!(
        "Malformed hits dropped: {} of {}\n",
        data.evidence.hits_dropped, data.evidence.hits_total
    ));
    if data.evidence.pair_rows_orphaned > 0 {
        out.push_str(&format!(
            "Reference pair rows outside the core set: {}\n",
            data.evidence.pair_rows_orphaned
        ));
    }

    out
}

fn found_fraction(mode: &ModeSummary) -> f32 {
    if mode.total_groups == 0 {
        return 0.0;
    }
    (mode.counts.complete + mode.counts.duplicated) as f32 / mode.total_groups as f32
}

fn completeness_statement(mode: &ModeSummary) -> &'static str {
    let found = found_fraction(mode);
    if found >= 0.95 {
        "gene set is essentially complete under the strictest mode"
    } else if found >= 0.80 {
        "gene set is largely complete; inspect partial and missing groups"
    } else if found >= 0.50 {
        "substantial fraction of core groups unaccounted for"
    } else {
        "gene set is badly incomplete or evidence is inadequate"
    }
}
