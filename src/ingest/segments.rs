//! Segment table parser.
//!
//! The segment table is a delimited text export with one row per stream
//! segment: `segment id`, `downstream target id`, and an optional
//! fixed-width `gauge tag` column that is blank for ungauged segments.
//! Both comma- and whitespace-delimited files are accepted, and a leading
//! header row is detected and skipped.

use crate::logging::{self, Stage};
use crate::model::{SegmentId, SegmentRecord, TableError};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Read and parse a segment table from disk.
///
/// Any read failure is fatal; the pipeline writes no partial output.
pub fn load_segment_table(path: &Path) -> Result<Vec<SegmentRecord>, TableError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| TableError::Io(format!("{}: {}", path.display(), e)))?;
    parse_segment_table(&contents)
}

/// Parse segment table text into records.
///
/// Records come back keyed and sorted by segment id. Duplicate ids are
/// last-write-wins, with a warning per collision; an unparseable id or
/// downstream field is a fatal error carrying the line number.
pub fn parse_segment_table(text: &str) -> Result<Vec<SegmentRecord>, TableError> {
    let mut by_id: BTreeMap<SegmentId, SegmentRecord> = BTreeMap::new();
    let mut header_allowed = true;

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = split_row(trimmed);
        if fields.len() < 2 {
            return Err(TableError::ParseError {
                line: line_no,
                message: format!("expected at least 2 columns, got {}", fields.len()),
            });
        }

        let id = match fields[0].parse::<SegmentId>() {
            Ok(id) => id,
            // The first non-blank row may be a column-name header.
            Err(_) if header_allowed => {
                header_allowed = false;
                continue;
            }
            Err(_) => {
                return Err(TableError::ParseError {
                    line: line_no,
                    message: format!("invalid segment id '{}'", fields[0]),
                });
            }
        };
        header_allowed = false;

        let downstream = fields[1].parse::<SegmentId>().map_err(|_| TableError::ParseError {
            line: line_no,
            message: format!("invalid downstream target '{}'", fields[1]),
        })?;

        let gauge_id = fields
            .get(2)
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(String::from);

        let record = SegmentRecord {
            id,
            downstream,
            gauge_id,
        };
        if by_id.insert(id, record).is_some() {
            logging::warn(
                Stage::Ingest,
                Some(&id.to_string()),
                "duplicate segment id, keeping the last occurrence",
            );
        }
    }

    if by_id.is_empty() {
        return Err(TableError::Empty);
    }
    Ok(by_id.into_values().collect())
}

/// Split a row on commas when present, otherwise on whitespace.
fn split_row(line: &str) -> Vec<&str> {
    if line.contains(',') {
        line.split(',').map(|field| field.trim()).collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Ids of all segments carrying a gauge tag, in ascending id order.
///
/// When no basin list is supplied, this is the basin query set: the gauge
/// tags are the reason those segments are of interest at all.
pub fn gauged_segments(records: &[SegmentRecord]) -> Vec<SegmentId> {
    records
        .iter()
        .filter(|r| r.gauge_id.is_some())
        .map(|r| r.id)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_delimited_rows() {
        let records = parse_segment_table("1,2,\n2,3,06191500\n3,0,\n").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], SegmentRecord { id: 1, downstream: 2, gauge_id: None });
        assert_eq!(
            records[1],
            SegmentRecord {
                id: 2,
                downstream: 3,
                gauge_id: Some("06191500".to_string())
            }
        );
    }

    #[test]
    fn test_parse_whitespace_delimited_rows() {
        let records = parse_segment_table("10 20\n20 0 06192500\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].gauge_id.as_deref(), Some("06192500"));
    }

    #[test]
    fn test_header_row_is_skipped() {
        let records = parse_segment_table("seg_id,tosegment,gauge_id\n1,2,\n2,0,\n").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_non_numeric_id_past_the_header_is_an_error() {
        let result = parse_segment_table("1,2,\nnot_an_id,3,\n");
        match result {
            Err(TableError::ParseError { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected a parse error with line number, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_downstream_target_is_an_error() {
        let result = parse_segment_table("1,abc,\n");
        assert!(matches!(result, Err(TableError::ParseError { line: 1, .. })));
    }

    #[test]
    fn test_whitespace_only_gauge_tag_is_ungauged() {
        let records = parse_segment_table("1,2,   \n").unwrap();
        assert_eq!(records[0].gauge_id, None);
    }

    #[test]
    fn test_duplicate_id_is_last_write_wins() {
        let records = parse_segment_table("5,1,\n5,2,06190000\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].downstream, 2, "the later row should win");
        assert_eq!(records[0].gauge_id.as_deref(), Some("06190000"));
    }

    #[test]
    fn test_blank_lines_and_comments_are_skipped() {
        let records = parse_segment_table("# national extract\n\n1,0,\n").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert_eq!(parse_segment_table(""), Err(TableError::Empty));
        assert_eq!(parse_segment_table("# only a comment\n"), Err(TableError::Empty));
    }

    #[test]
    fn test_records_come_back_sorted_by_id() {
        let records = parse_segment_table("30,0,\n10,30,\n20,30,\n").unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_gauged_segments_filters_and_keeps_order() {
        let records = parse_segment_table("1,2,\n2,3,06191500\n3,0,06192500\n").unwrap();
        assert_eq!(gauged_segments(&records), vec![2, 3]);
    }
}
