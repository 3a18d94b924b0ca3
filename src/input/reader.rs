use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::input::InputError;

/// Open a TSV input, decompressing transparently when the path ends in .gz.
pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path).map_err(|e| InputError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Iterate non-empty lines with their 1-based line numbers, skipping the
/// header row. All TSV inputs carry one header line.
pub fn read_rows(path: &Path) -> Result<Vec<(usize, String)>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut rows = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf).map_err(|e| InputError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end();
        if line.is_empty() || line_no == 1 {
            continue;
        }
        rows.push((line_no, line.to_string()));
    }

    Ok(rows)
}

/// Parse one score cell. `NA` (and empty) mean the producer did not
/// compute this score; numeric values must sit in [0,1].
pub fn parse_score_cell(
    cell: &str,
    path: &Path,
    line_no: usize,
    column: &str,
) -> Result<Option<f32>, InputError> {
    let cell = cell.trim();
    if cell.is_empty() || cell == "NA" {
        return Ok(None);
    }
    let value: f32 = cell.parse().map_err(|_| InputError::Parse {
        path: path.display().to_string(),
        line: line_no,
        message: format!("{column} is not a number: {cell:?}"),
    })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(InputError::Parse {
            path: path.display().to_string(),
            line: line_no,
            message: format!("{column} out of range [0,1]: {value}"),
        });
    }
    Ok(Some(value))
}
