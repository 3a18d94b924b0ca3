use std::path::Path;

use crate::input::reader::{parse_score_cell, read_rows};
use crate::input::InputError;
use crate::model::scores::ScoreSet;

/// One raw ortholog-search hit as reported by the search tool, before
/// validation against the core set. Several rows per group are expected;
/// multiplicity is preserved here and resolved during classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHitRecord {
    pub group_id: String,
    pub query_protein: String,
    pub ref_species: String,
    pub scores: ScoreSet,
    pub reciprocal_best: bool,
}

/// Parse the hit report for one query species:
/// `group_id  query_protein  ref_species  fas_forward  fas_reverse  seq_sim  reciprocal_best`.
pub fn parse_hits(path: &Path) -> Result<Vec<RawHitRecord>, InputError> {
    let rows = read_rows(path)?;
    let mut records = Vec::with_capacity(rows.len());

    for (line_no, line) in &rows {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 7 {
            return Err(InputError::Parse {
                path: path.display().to_string(),
                line: *line_no,
                message: format!("expected 7 columns, got {}", cols.len()),
            });
        }
        let group_id = cols[0].trim().to_string();
        let query_protein = cols[1].trim().to_string();
        let ref_species = cols[2].trim().to_string();
        if group_id.is_empty() || query_protein.is_empty() || ref_species.is_empty() {
            return Err(InputError::Parse {
                path: path.display().to_string(),
                line: *line_no,
                message: "empty group, protein or species id".to_string(),
            });
        }
        let scores = ScoreSet {
            fas_forward: parse_score_cell(cols[3], path, *line_no, "fas_forward")?,
            fas_reverse: parse_score_cell(cols[4], path, *line_no, "fas_reverse")?,
            seq_sim: parse_score_cell(cols[5], path, *line_no, "seq_sim")?,
        };
        let reciprocal_best = match cols[6].trim() {
            "1" | "true" => true,
            "0" | "false" => false,
            other => {
                return Err(InputError::Parse {
                    path: path.display().to_string(),
                    line: *line_no,
                    message: format!("reciprocal_best must be 0/1, got {other:?}"),
                });
            }
        };
        records.push(RawHitRecord {
            group_id,
            query_protein,
            ref_species,
            scores,
            reciprocal_best,
        });
    }

    Ok(records)
}
