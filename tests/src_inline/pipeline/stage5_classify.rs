use super::*;

use crate::model::cutoffs::{CutoffParams, ScoreCutoff};
use crate::model::group::{CoreGroup, GroupMember};
use crate::model::scores::ScoreSet;

fn cutoff(lower: f32) -> ScoreCutoff {
    ScoreCutoff {
        lower,
        upper: Some(1.0),
        mean: (lower + 0.1).min(1.0),
        stddev: 0.05,
        n_pairs: 3,
    }
}

fn full_cutoffs() -> GroupCutoffs {
    GroupCutoffs {
        fas_forward: Some(cutoff(0.8)),
        fas_reverse: Some(cutoff(0.8)),
        seq_sim: Some(cutoff(0.6)),
    }
}

fn hit(protein: &str, fwd: f32, rev: f32, seq: f32, rbh: bool) -> CandidateHit {
    CandidateHit {
        query_protein: protein.to_string(),
        ref_species: "HUMAN@9606@3".to_string(),
        scores: ScoreSet {
            fas_forward: Some(fwd),
            fas_reverse: Some(rev),
            seq_sim: Some(seq),
        },
        reciprocal_best: rbh,
    }
}

#[test]
fn test_no_candidates_missing_all_modes() {
    for mode in ScoringMode::ALL {
        let v = classify_group("g1", &[], &full_cutoffs(), mode, false);
        assert_eq!(v.status, GroupStatus::Missing);
        assert!(v.flags.contains(&VerdictFlag::NoCandidates));
        assert_eq!(v.candidate_count, 0);
    }
}

#[test]
fn test_single_strong_candidate_complete() {
    // cutoffs derived from reference scores {0.9, 0.85, 0.88}
    let ev = crate::pipeline::stage2_evidence::GroupEvidence {
        fas_forward: vec![0.9, 0.85, 0.88],
        fas_reverse: vec![0.9, 0.85, 0.88],
        seq_sim: vec![0.7, 0.75],
        per_species: Default::default(),
        n_pairs: 3,
    };
    let cutoffs =
        crate::pipeline::stage3_cutoffs::compute_group_cutoffs(&ev, CutoffParams::default_v1())
            .unwrap();
    let candidates = vec![hit("qp1", 0.92, 0.91, 0.8, true)];
    for mode in ScoringMode::ALL {
        let v = classify_group("g1", &candidates, &cutoffs, mode, false);
        assert_eq!(v.status, GroupStatus::Complete, "{mode:?}");
        assert_eq!(v.primary().unwrap().query_protein, "qp1");
    }
}

#[test]
fn test_below_cutoff_missing_all_modes() {
    let candidates = vec![hit("qp1", 0.60, 0.55, 0.3, false)];
    for mode in ScoringMode::ALL {
        let v = classify_group("g1", &candidates, &full_cutoffs(), mode, false);
        assert_eq!(v.status, GroupStatus::Missing, "{mode:?}");
        assert!(!v.flags.contains(&VerdictFlag::NoCandidates));
        assert_eq!(v.candidate_count, 1);
    }
}

#[test]
fn test_two_rbh_passes_duplicated() {
    let candidates = vec![
        hit("qp1", 0.91, 0.90, 0.9, true),
        hit("qp2", 0.90, 0.90, 0.9, true),
    ];
    let v = classify_group("g1", &candidates, &full_cutoffs(), ScoringMode::StrictOrtholog, false);
    assert_eq!(v.status, GroupStatus::Duplicated);
    // higher score sum is surfaced first but does not win the verdict
    assert_eq!(v.primary().unwrap().query_protein, "qp1");
}

#[test]
fn test_single_rbh_dominates_co_hits() {
    let candidates = vec![
        hit("qp1", 0.95, 0.95, 0.9, false),
        hit("qp2", 0.90, 0.90, 0.9, true),
    ];
    let v = classify_group("g1", &candidates, &full_cutoffs(), ScoringMode::ForwardOnly, false);
    assert_eq!(v.status, GroupStatus::Complete);
    assert!(v.flags.contains(&VerdictFlag::RbhDominant));
    assert_eq!(v.primary().unwrap().query_protein, "qp2");
}

#[test]
fn test_two_non_rbh_passes_duplicated() {
    let candidates = vec![
        hit("qp1", 0.95, 0.95, 0.9, false),
        hit("qp2", 0.90, 0.90, 0.9, false),
    ];
    let v = classify_group("g1", &candidates, &full_cutoffs(), ScoringMode::Bidirectional, false);
    assert_eq!(v.status, GroupStatus::Duplicated);
    assert!(!v.flags.contains(&VerdictFlag::UnresolvedTie));
}

#[test]
fn test_exact_tie_flagged_unresolved() {
    let candidates = vec![
        hit("qp1", 0.90, 0.90, 0.9, true),
        hit("qp2", 0.90, 0.90, 0.9, true),
    ];
    let v = classify_group("g1", &candidates, &full_cutoffs(), ScoringMode::ForwardOnly, false);
    assert_eq!(v.status, GroupStatus::Duplicated);
    assert!(v.flags.contains(&VerdictFlag::UnresolvedTie));
    // stable sort keeps input order on the exact tie
    assert_eq!(v.primary().unwrap().query_protein, "qp1");
}

#[test]
fn test_partial_when_reverse_fails() {
    let candidates = vec![hit("qp1", 0.92, 0.40, 0.9, true)];
    let v = classify_group("g1", &candidates, &full_cutoffs(), ScoringMode::Bidirectional, false);
    assert_eq!(v.status, GroupStatus::Partial);
    let checks = &v.primary().unwrap().checks;
    assert!(checks.iter().any(|c| c.kind == ScoreKind::FasForward && c.passed));
    assert!(checks.iter().any(|c| c.kind == ScoreKind::FasReverse && !c.passed));
}

#[test]
fn test_partial_when_seq_score_absent_on_hit() {
    let mut candidate = hit("qp1", 0.92, 0.91, 0.9, true);
    candidate.scores.seq_sim = None;
    let v = classify_group(
        "g1",
        &[candidate],
        &full_cutoffs(),
        ScoringMode::TripleEvidence,
        false,
    );
    assert_eq!(v.status, GroupStatus::Partial);
}

#[test]
fn test_strict_mode_demotes_non_rbh_to_partial() {
    // all score checks pass but the candidate is not the reciprocal best
    let candidates = vec![hit("qp1", 0.92, 0.91, 0.9, false)];
    let v = classify_group("g1", &candidates, &full_cutoffs(), ScoringMode::StrictOrtholog, false);
    assert_eq!(v.status, GroupStatus::Partial);
}

#[test]
fn test_cutoff_unavailable_missing_with_flag() {
    let candidates = vec![hit("qp1", 0.99, 0.99, 0.99, true)];
    let v = classify_group(
        "g1",
        &candidates,
        &GroupCutoffs::default(),
        ScoringMode::ForwardOnly,
        false,
    );
    assert_eq!(v.status, GroupStatus::Missing);
    assert!(v.flags.contains(&VerdictFlag::CutoffUnavailable));
    assert_eq!(v.candidate_count, 1);
    assert!(v.evidence.is_empty());
}

#[test]
fn test_seq_cutoff_missing_excludes_triple_modes_only() {
    let cutoffs = GroupCutoffs {
        fas_forward: Some(cutoff(0.8)),
        fas_reverse: Some(cutoff(0.8)),
        seq_sim: None,
    };
    let candidates = vec![hit("qp1", 0.92, 0.91, 0.9, true)];

    let v = classify_group("g1", &candidates, &cutoffs, ScoringMode::Bidirectional, false);
    assert_eq!(v.status, GroupStatus::Complete);

    for mode in [ScoringMode::TripleEvidence, ScoringMode::StrictOrtholog] {
        let v = classify_group("g1", &candidates, &cutoffs, mode, false);
        assert_eq!(v.status, GroupStatus::Missing);
        assert!(v.flags.contains(&VerdictFlag::SeqEvidenceMissing));
    }
}

#[test]
fn test_malformed_drop_recorded_on_verdict() {
    let candidates = vec![hit("qp1", 0.92, 0.91, 0.9, true)];
    let v = classify_group("g1", &candidates, &full_cutoffs(), ScoringMode::ForwardOnly, true);
    assert_eq!(v.status, GroupStatus::Complete);
    assert!(v.flags.contains(&VerdictFlag::MalformedHitsDropped));
}

#[test]
fn test_mode_acceptance_monotonic() {
    // a strict-mode Complete is Complete-or-better in every looser mode
    let cases = vec![
        vec![hit("qp1", 0.92, 0.91, 0.8, true)],
        vec![hit("qp1", 0.92, 0.91, 0.8, true), hit("qp2", 0.85, 0.85, 0.7, false)],
        vec![hit("qp1", 0.92, 0.91, 0.8, true), hit("qp2", 0.85, 0.85, 0.7, true)],
    ];
    for candidates in cases {
        let strict = classify_group(
            "g1",
            &candidates,
            &full_cutoffs(),
            ScoringMode::StrictOrtholog,
            false,
        );
        if strict.status != GroupStatus::Complete {
            continue;
        }
        for mode in [
            ScoringMode::ForwardOnly,
            ScoringMode::Bidirectional,
            ScoringMode::TripleEvidence,
        ] {
            let v = classify_group("g1", &candidates, &full_cutoffs(), mode, false);
            assert!(
                v.status.rank() >= GroupStatus::Complete.rank(),
                "{mode:?} regressed below Complete"
            );
        }
    }
}

#[test]
fn test_run_stage5_profile_not_found_fatal() {
    let core_set = CoreSet::new(vec![CoreGroup {
        id: "g1".to_string(),
        members: vec![
            GroupMember {
                species: "HUMAN@9606@3".to_string(),
                protein: "p1".to_string(),
            },
            GroupMember {
                species: "YEAST@559292@3".to_string(),
                protein: "p2".to_string(),
            },
        ],
    }]);
    let profile = CutoffProfile::new(CutoffParams::default_v1());
    let inputs = Stage5Inputs {
        core_set: &core_set,
        profile: &profile,
        candidates: &BTreeMap::new(),
        dropped_groups: &BTreeSet::new(),
        mode: ScoringMode::ForwardOnly,
    };
    let err = run_stage5(&inputs).unwrap_err();
    assert!(matches!(err, ClassifyError::ProfileNotFound(ref g) if g == "g1"));
}

#[test]
fn test_run_stage5_core_set_order_and_determinism() {
    let core_set = CoreSet::new(vec![
        CoreGroup {
            id: "g2".to_string(),
            members: vec![GroupMember {
                species: "HUMAN@9606@3".to_string(),
                protein: "p1".to_string(),
            }],
        },
        CoreGroup {
            id: "g1".to_string(),
            members: vec![GroupMember {
                species: "HUMAN@9606@3".to_string(),
                protein: "p2".to_string(),
            }],
        },
    ]);
    let mut profile = CutoffProfile::new(CutoffParams::default_v1());
    profile.insert("g1".to_string(), full_cutoffs());
    profile.insert("g2".to_string(), full_cutoffs());
    let mut candidates = BTreeMap::new();
    candidates.insert("g1".to_string(), vec![hit("qp1", 0.92, 0.91, 0.9, true)]);
    let inputs = Stage5Inputs {
        core_set: &core_set,
        profile: &profile,
        candidates: &candidates,
        dropped_groups: &BTreeSet::new(),
        mode: ScoringMode::ForwardOnly,
    };
    let a = run_stage5(&inputs).unwrap();
    let b = run_stage5(&inputs).unwrap();
    let ids: Vec<&str> = a.iter().map(|v| v.group_id.as_str()).collect();
    assert_eq!(ids, vec!["g1", "g2"]);
    assert_eq!(a[0].status, b[0].status);
    assert_eq!(a[0].flags, b[0].flags);
    assert_eq!(a[1].status, GroupStatus::Missing);
}
