use crate::model::scores::ScoreKind;

/// The four completeness policies, ordered from most permissive to
/// strictest. Each mode carries its predicate as data: the ordered list
/// of score checks plus the reciprocal-best requirement. Adding a mode
/// means adding a variant and its data, not a new type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScoringMode {
    /// Forward architecture similarity only.
    ForwardOnly,
    /// Forward and reverse architecture similarity (reciprocal consistency).
    Bidirectional,
    /// Bidirectional plus sequence-similarity agreement.
    TripleEvidence,
    /// Triple evidence plus the candidate must be the reciprocal best hit.
    StrictOrtholog,
}

impl ScoringMode {
    pub const ALL: [ScoringMode; 4] = [
        ScoringMode::ForwardOnly,
        ScoringMode::Bidirectional,
        ScoringMode::TripleEvidence,
        ScoringMode::StrictOrtholog,
    ];

    /// Score comparisons a candidate must win against the group cutoffs.
    pub fn checks(self) -> &'static [ScoreKind] {
        match self {
            ScoringMode::ForwardOnly => &[ScoreKind::FasForward],
            ScoringMode::Bidirectional => &[ScoreKind::FasForward, ScoreKind::FasReverse],
            ScoringMode::TripleEvidence | ScoringMode::StrictOrtholog => {
                &[ScoreKind::FasForward, ScoreKind::FasReverse, ScoreKind::SeqSim]
            }
        }
    }

    pub fn requires_reciprocal_best(self) -> bool {
        matches!(self, ScoringMode::StrictOrtholog)
    }

    /// Stable one-based index used in file names and report columns.
    pub fn index(self) -> u8 {
        match self {
            ScoringMode::ForwardOnly => 1,
            ScoringMode::Bidirectional => 2,
            ScoringMode::TripleEvidence => 3,
            ScoringMode::StrictOrtholog => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoringMode::ForwardOnly => "mode1",
            ScoringMode::Bidirectional => "mode2",
            ScoringMode::TripleEvidence => "mode3",
            ScoringMode::StrictOrtholog => "mode4",
        }
    }

    pub fn from_index(index: u8) -> Option<ScoringMode> {
        ScoringMode::ALL.into_iter().find(|m| m.index() == index)
    }
}
