/// Input parsing for the drainage preparation pipeline.
///
/// Submodules:
/// - `segments` — the national river-network segment table.
/// - `basins` — the basin query list (gauge locations of interest).

pub mod basins;
pub mod segments;
