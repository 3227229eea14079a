//! Upstream traversal over the reverse adjacency mapping.
//!
//! The collector is an explicit work-list walk rather than natural
//! recursion: a large basin can sit tens of thousands of hops from its
//! headwaters, far beyond a comfortable call-stack depth. The visited set
//! is checked before a segment is expanded, so the walk terminates even if
//! the underlying network were cyclic.

use crate::model::SegmentId;
use crate::network::topology::ReverseAdjacency;
use std::collections::{BTreeMap, HashSet};

/// Collect every segment whose flow eventually reaches `basin`.
///
/// Returns the ancestor ids deduplicated, in order of first discovery. A
/// basin with no entry in the reverse mapping yields an empty result: a
/// headwater with no known predecessors, not a missing-key fault. The
/// basin itself only appears in its own result when a cycle leads back to
/// it, which a valid river network never contains.
pub fn upstream_of(reverse: &ReverseAdjacency, basin: SegmentId) -> Vec<SegmentId> {
    let mut found = Vec::new();
    let mut seen: HashSet<SegmentId> = HashSet::new();

    let mut pending: Vec<SegmentId> = match reverse.get(&basin) {
        Some(direct) => direct.clone(),
        None => return found,
    };

    while let Some(segment) = pending.pop() {
        if !seen.insert(segment) {
            continue;
        }
        found.push(segment);
        if let Some(predecessors) = reverse.get(&segment) {
            pending.extend(predecessors.iter().copied());
        }
    }

    found
}

/// Run the collector once per queried basin.
///
/// The reverse mapping is shared read-only across queries; each basin's
/// entry is independent and final once its traversal completes.
pub fn collect_upstream(
    reverse: &ReverseAdjacency,
    basins: &[SegmentId],
) -> BTreeMap<SegmentId, Vec<SegmentId>> {
    let mut results = BTreeMap::new();
    for &basin in basins {
        results.insert(basin, upstream_of(reverse, basin));
    }
    results
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
