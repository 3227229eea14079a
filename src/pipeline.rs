//! The end-to-end preparation pipeline.
//!
//! Each stage is a pure function of its inputs: load segments, normalize
//! downstream targets, build the forward adjacency, derive the reverse
//! adjacency, run the basin queries, serialize the results. Nothing holds
//! hidden state between stages, and the adjacency mappings are read-only
//! once built.

use crate::config::PrepConfig;
use crate::ingest::{basins, segments};
use crate::logging::{self, Stage};
use crate::model::SegmentId;
use crate::network::{topology, upstream};
use crate::report::{self, RunSummary, UpstreamMapping};
use crate::verify;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::error::Error;
use std::path::Path;
use std::time::Instant;

/// Run the full pipeline and return the run summary.
///
/// Any file-read failure aborts the run before the artifact is touched.
pub fn run(config: &PrepConfig) -> Result<RunSummary, Box<dyn Error>> {
    let segments_path = config
        .segments_path
        .as_deref()
        .ok_or("no segment table configured; pass --segments or set segments_path")?;

    // Ingest: segment table first, then the basin query set, both read
    // fully before any graph work starts.
    let parse_start = Instant::now();
    let mut records = segments::load_segment_table(Path::new(segments_path))?;
    logging::info(
        Stage::Ingest,
        None,
        &format!("loaded {} segments from {}", records.len(), segments_path),
    );

    let gauged = segments::gauged_segments(&records);
    let basin_ids: Vec<SegmentId> = match config.basins_path.as_deref() {
        Some(path) => {
            let ids = basins::load_basin_list(Path::new(path))?;
            logging::info(
                Stage::Ingest,
                None,
                &format!("loaded {} basin ids from {}", ids.len(), path),
            );
            ids
        }
        None => {
            logging::info(
                Stage::Ingest,
                None,
                &format!("no basin list supplied; querying {} gauged segments", gauged.len()),
            );
            gauged.clone()
        }
    };
    if basin_ids.is_empty() {
        logging::warn(
            Stage::Ingest,
            None,
            "basin query set is empty; the artifact will have no entries",
        );
    }
    let parse_secs = parse_start.elapsed().as_secs_f64();

    // Topology: normalize, build forward, derive reverse.
    let build_start = Instant::now();
    let terminal_codes: BTreeSet<SegmentId> = config.terminal_codes.iter().copied().collect();
    topology::normalize_downstream(&mut records, &terminal_codes);
    let forward = topology::build_forward(&records, &terminal_codes);
    let reversed = topology::reverse(&forward);
    logging::info(
        Stage::Network,
        None,
        &format!(
            "forward adjacency: {} segments; reverse adjacency: {} entries",
            forward.len(),
            reversed.len()
        ),
    );
    let build_secs = build_start.elapsed().as_secs_f64();

    if config.verify {
        let verification = verify::verify_network(&forward, &reversed);
        verify::print_summary(&verification);
        if verification.summary.failed > 0 {
            return Err("network verification failed".into());
        }
    }

    // Traversal: one independent query per basin over the shared mapping.
    let traverse_start = Instant::now();
    let pb = ProgressBar::new(basin_ids.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} basins {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut mapping = UpstreamMapping::new();
    for &basin in &basin_ids {
        mapping.insert(basin, upstream::upstream_of(&reversed, basin));
        pb.inc(1);
    }
    pb.finish_with_message("done");

    let headwater_count = mapping.values().filter(|v| v.is_empty()).count();
    logging::log_traversal_summary(mapping.len(), headwater_count);
    let traverse_secs = traverse_start.elapsed().as_secs_f64();

    // Serialize.
    let contents = if config.json_output {
        report::render_json(&mapping)?
    } else {
        report::render_text(&mapping)
    };
    report::write_artifact(Path::new(&config.output_path), &contents)?;
    logging::info(
        Stage::Output,
        None,
        &format!("wrote {} basin entries to {}", mapping.len(), config.output_path),
    );

    let largest_basin = mapping
        .iter()
        .filter(|(_, ups)| !ups.is_empty())
        .max_by_key(|(_, ups)| ups.len())
        .map(|(&basin, ups)| (basin, ups.len()));

    Ok(RunSummary {
        segment_count: records.len(),
        gauged_count: gauged.len(),
        basin_count: mapping.len(),
        headwater_count,
        largest_basin,
        parse_secs,
        build_secs,
        traverse_secs,
        output_path: config.output_path.clone(),
    })
}
