use std::path::Path;

use crate::input::reader::{parse_score_cell, read_rows};
use crate::input::InputError;
use crate::model::scores::ScoreSet;

/// One reference-species comparison row of the core set evidence table.
#[derive(Debug, Clone, PartialEq)]
pub struct RefPairRecord {
    pub group_id: String,
    pub species_a: String,
    pub species_b: String,
    pub scores: ScoreSet,
}

/// Parse the reference pair score table:
/// `group_id  species_a  species_b  fas_forward  fas_reverse  seq_sim`.
/// `fas_reverse` and `seq_sim` may be NA.
pub fn parse_pair_scores(path: &Path) -> Result<Vec<RefPairRecord>, InputError> {
    let rows = read_rows(path)?;
    let mut records = Vec::with_capacity(rows.len());

    for (line_no, line) in &rows {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 6 {
            return Err(InputError::Parse {
                path: path.display().to_string(),
                line: *line_no,
                message: format!("expected 6 columns, got {}", cols.len()),
            });
        }
        let group_id = cols[0].trim().to_string();
        let species_a = cols[1].trim().to_string();
        let species_b = cols[2].trim().to_string();
        if group_id.is_empty() || species_a.is_empty() || species_b.is_empty() {
            return Err(InputError::Parse {
                path: path.display().to_string(),
                line: *line_no,
                message: "empty group or species id".to_string(),
            });
        }
        if species_a == species_b {
            tracing::warn!(
                group = group_id.as_str(),
                species = species_a.as_str(),
                line = *line_no,
                "self comparison in pair scores; skipping row"
            );
            continue;
        }
        let scores = ScoreSet {
            fas_forward: parse_score_cell(cols[3], path, *line_no, "fas_forward")?,
            fas_reverse: parse_score_cell(cols[4], path, *line_no, "fas_reverse")?,
            seq_sim: parse_score_cell(cols[5], path, *line_no, "seq_sim")?,
        };
        records.push(RefPairRecord {
            group_id,
            species_a,
            species_b,
            scores,
        });
    }

    if records.is_empty() {
        return Err(InputError::Parse {
            path: path.display().to_string(),
            line: 0,
            message: "no reference pair scores found".to_string(),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_pair_scores_basic() {
        let file = write_tmp(
            "group_id\tspecies_a\tspecies_b\tfas_forward\tfas_reverse\tseq_sim\n\
             530670\tHUMAN@9606@3\tYEAST@559292@3\t0.9000\t0.8800\t0.7500\n\
             530670\tYEAST@559292@3\tHUMAN@9606@3\t0.8500\tNA\tNA\n",
        );
        let records = parse_pair_scores(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].scores.fas_forward, Some(0.9));
        assert_eq!(records[1].scores.fas_reverse, None);
        assert_eq!(records[1].scores.seq_sim, None);
    }

    #[test]
    fn test_parse_pair_scores_rejects_out_of_range() {
        let file = write_tmp(
            "group_id\tspecies_a\tspecies_b\tfas_forward\tfas_reverse\tseq_sim\n\
             530670\tHUMAN@9606@3\tYEAST@559292@3\t1.2\tNA\tNA\n",
        );
        let err = parse_pair_scores(file.path()).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_parse_pair_scores_skips_self_comparison() {
        let file = write_tmp(
            "group_id\tspecies_a\tspecies_b\tfas_forward\tfas_reverse\tseq_sim\n\
             530670\tHUMAN@9606@3\tHUMAN@9606@3\t0.99\tNA\tNA\n\
             530670\tHUMAN@9606@3\tYEAST@559292@3\t0.9\t0.9\tNA\n",
        );
        let records = parse_pair_scores(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].species_b, "YEAST@559292@3");
    }
}
