use std::path::Path;

pub mod groups;
pub mod hits;
pub mod pair_scores;
pub mod reader;

use groups::parse_groups;
use hits::{RawHitRecord, parse_hits};
use pair_scores::{RefPairRecord, parse_pair_scores};

use crate::model::group::CoreSet;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("parse error in {path} line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },
}

/// Everything the pipeline needs, fully materialized before any stage
/// runs: the core set, its reference pair evidence, and the raw hit
/// report for one query species.
#[derive(Debug, Clone)]
pub struct InputBundle {
    pub core_set: CoreSet,
    pub pair_scores: Vec<RefPairRecord>,
    pub raw_hits: Vec<RawHitRecord>,
    pub query_id: String,
}

pub fn load_input(
    groups_path: &Path,
    ref_scores_path: &Path,
    hits_path: &Path,
    query_id: &str,
) -> Result<InputBundle, InputError> {
    for (name, path) in [
        ("groups", groups_path),
        ("ref-scores", ref_scores_path),
        ("hits", hits_path),
    ] {
        if !path.exists() {
            return Err(InputError::MissingInput(format!(
                "{name} file {} does not exist",
                path.display()
            )));
        }
    }

    let core_set = parse_groups(groups_path)?;
    let pair_scores = parse_pair_scores(ref_scores_path)?;
    let raw_hits = parse_hits(hits_path)?;

    tracing::info!(
        groups = core_set.len(),
        pair_scores = pair_scores.len(),
        hits = raw_hits.len(),
        query = query_id,
        "loaded core set and query evidence"
    );

    Ok(InputBundle {
        core_set,
        pair_scores,
        raw_hits,
        query_id: query_id.to_string(),
    })
}
