use crate::model::scores::ScoreSet;

/// One normalized ortholog-search hit for a (group, query species) pair.
/// Owned by the adapter stage; classification only reads these.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateHit {
    pub query_protein: String,
    pub ref_species: String,
    pub scores: ScoreSet,
    pub reciprocal_best: bool,
}
