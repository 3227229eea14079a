//! Basin query list reader.
//!
//! The query list is a plain-text file with one segment id per line; blank
//! lines and `#` comments are skipped. The file is read fully before any
//! traversal begins, so a malformed line aborts the run before work starts.

use crate::model::{SegmentId, TableError};
use std::fs;
use std::path::Path;

/// Read and parse a basin query list from disk.
pub fn load_basin_list(path: &Path) -> Result<Vec<SegmentId>, TableError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| TableError::Io(format!("{}: {}", path.display(), e)))?;
    parse_basin_list(&contents)
}

/// Parse basin list text into ids, preserving file order.
pub fn parse_basin_list(text: &str) -> Result<Vec<SegmentId>, TableError> {
    let mut basins = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let id = trimmed.parse::<SegmentId>().map_err(|_| TableError::ParseError {
            line: i + 1,
            message: format!("invalid basin id '{}'", trimmed),
        })?;
        basins.push(id);
    }

    Ok(basins)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
