/// Core data types for the drainage preparation pipeline.
///
/// This module defines the shared domain model imported by all other
/// modules. It contains no I/O and no external dependencies, only types
/// and small identifier helpers.

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// National-network stream segment identifier.
///
/// Real segments carry positive identifiers. Negative values are reserved
/// for outlet sentinels (see `outlet_sentinel`).
pub type SegmentId = i64;

/// Default downstream-target code meaning "flows out of the domain".
pub const OUTLET_CODE: SegmentId = 0;

/// Sentinel downstream target for a true basin outlet: the negative of the
/// segment's own id.
///
/// The sentinel must stay recognizable as non-traversable and must never
/// collide with a real segment id; negation of a positive id satisfies
/// both.
pub fn outlet_sentinel(id: SegmentId) -> SegmentId {
    -id
}

/// True if a downstream target can never be followed as a graph edge
/// (the outlet code itself, or any outlet sentinel).
pub fn is_non_traversable(target: SegmentId) -> bool {
    target <= 0
}

// ---------------------------------------------------------------------------
// Segment records
// ---------------------------------------------------------------------------

/// A single row of the river-network segment table.
///
/// Produced by `ingest::segments` from the tabular source. Identifiers are
/// unique after ingest; duplicate rows in the source are last-write-wins.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRecord {
    pub id: SegmentId,
    /// Immediate downstream target. `OUTLET_CODE` in the raw table, or an
    /// outlet sentinel after normalization, when the segment drains out of
    /// the modeled domain.
    pub downstream: SegmentId,
    /// Gauge-station tag. `None` for ungauged segments (blank or
    /// whitespace-only in the source column).
    pub gauge_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while reading the segment table or basin list.
#[derive(Debug, PartialEq)]
pub enum TableError {
    /// The file could not be read at all.
    Io(String),
    /// A row could not be parsed; carries the 1-based line number.
    ParseError { line: usize, message: String },
    /// The file parsed but contained no usable rows.
    Empty,
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::Io(msg) => write!(f, "I/O error: {}", msg),
            TableError::ParseError { line, message } => {
                write!(f, "Parse error at line {}: {}", line, message)
            }
            TableError::Empty => write!(f, "No usable rows in input"),
        }
    }
}

impl std::error::Error for TableError {}
