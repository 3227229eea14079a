//! Result persistence and the end-of-run summary.
//!
//! The primary artifact is a key-value text file consumed by the
//! downstream data-preparation steps: one line per basin,
//! `basin:up1,up2,...`, basins in ascending id order. A JSON form of the
//! same mapping is available for consumers that prefer it.

use crate::model::SegmentId;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Basin id → upstream segment ids, in order of first discovery.
pub type UpstreamMapping = BTreeMap<SegmentId, Vec<SegmentId>>;

/// Render the mapping as the key-value text artifact.
///
/// An empty upstream set serializes as `basin:` so every queried basin is
/// visible in the artifact.
pub fn render_text(mapping: &UpstreamMapping) -> String {
    let mut out = String::new();
    for (basin, upstream) in mapping {
        let joined = upstream
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&format!("{}:{}\n", basin, joined));
    }
    out
}

/// Render the mapping as pretty-printed JSON.
pub fn render_json(mapping: &UpstreamMapping) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(mapping)
}

/// Write the artifact via a temporary file and rename.
///
/// A failed run must never leave a truncated artifact where the complete
/// one is expected.
pub fn write_artifact(path: &Path, contents: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension("writing");
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// Counters and timings for a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub segment_count: usize,
    pub gauged_count: usize,
    pub basin_count: usize,
    pub headwater_count: usize,
    /// The queried basin with the most upstream segments, if any had one.
    pub largest_basin: Option<(SegmentId, usize)>,
    pub parse_secs: f64,
    pub build_secs: f64,
    pub traverse_secs: f64,
    pub output_path: String,
}

pub fn print_summary(summary: &RunSummary) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 DRAINAGE PREP SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Segments loaded:    {}  ({} gauged)", summary.segment_count, summary.gauged_count);
    println!(
        "Basins queried:     {}  ({} headwater)",
        summary.basin_count, summary.headwater_count
    );
    if let Some((basin, count)) = summary.largest_basin {
        println!("Largest basin:      {} ({} upstream segments)", basin, count);
    }
    println!("Artifact:           {}", summary.output_path);
    println!();
    println!("Parse Time:         {:.2}s", summary.parse_secs);
    println!("Build Time:         {:.2}s", summary.build_secs);
    println!("Traverse Time:      {:.2}s", summary.traverse_secs);
    println!("═══════════════════════════════════════════════════════════");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
