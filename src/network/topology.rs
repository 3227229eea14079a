//! Forward and reverse adjacency construction.
//!
//! Both mappings are ordered (`BTreeMap`) so construction, iteration, and
//! everything serialized from them are deterministic. The forward mapping
//! is built once from the segment table and treated as read-only
//! afterwards; the reverse mapping is derived from it and shared by every
//! basin query.

use crate::model::{SegmentId, SegmentRecord, is_non_traversable, outlet_sentinel};
use std::collections::{BTreeMap, BTreeSet};

/// Segment id → immediate downstream segment ids.
///
/// In this domain each segment drains into at most one downstream segment,
/// but the mapping supports multiple targets.
pub type ForwardAdjacency = BTreeMap<SegmentId, Vec<SegmentId>>;

/// Segment id → immediate upstream segment ids.
pub type ReverseAdjacency = BTreeMap<SegmentId, Vec<SegmentId>>;

/// Remap terminal-coded downstream targets to the outlet sentinel for the
/// segment's own id.
///
/// After this pass a record with `downstream == outlet_sentinel(id)` is a
/// true basin outlet, while a dangling positive target is an edge leading
/// outside the loaded extent. Both are non-traversable; keeping them
/// distinct preserves the information needed to stitch extracts together.
pub fn normalize_downstream(records: &mut [SegmentRecord], terminal_codes: &BTreeSet<SegmentId>) {
    for record in records.iter_mut() {
        if terminal_codes.contains(&record.downstream) {
            record.downstream = outlet_sentinel(record.id);
        }
    }
}

/// Build the forward adjacency mapping.
///
/// Every segment id present in `records` is guaranteed a key, possibly
/// mapping to an empty list. The downstream target is appended only when
/// it is traversable: not a terminal code, not an outlet sentinel, and
/// present as a segment id in the dataset. Dangling references are
/// excluded from adjacency, never raised as errors.
pub fn build_forward(
    records: &[SegmentRecord],
    terminal_codes: &BTreeSet<SegmentId>,
) -> ForwardAdjacency {
    let known: BTreeSet<SegmentId> = records.iter().map(|r| r.id).collect();

    let mut forward = ForwardAdjacency::new();
    for record in records {
        let targets = forward.entry(record.id).or_default();
        let target = record.downstream;

        if terminal_codes.contains(&target) || is_non_traversable(target) {
            continue;
        }
        if !known.contains(&target) {
            // Dangling reference: the edge leads outside the loaded extent.
            continue;
        }
        targets.push(target);
    }
    forward
}

/// Invert the forward mapping.
///
/// Guarantees a (possibly empty) entry for every source key of `forward`,
/// and appends the source id to the reverse entry of each of its targets,
/// creating the target's entry on demand. Entries are never removed, so
/// segment B appears in `reverse[A]` exactly when A appears in
/// `forward[B]`.
pub fn reverse(forward: &ForwardAdjacency) -> ReverseAdjacency {
    let mut reversed = ReverseAdjacency::new();
    for (&source, targets) in forward {
        reversed.entry(source).or_default();
        for &target in targets {
            reversed.entry(target).or_default().push(source);
        }
    }
    reversed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: SegmentId, downstream: SegmentId) -> SegmentRecord {
        SegmentRecord {
            id,
            downstream,
            gauge_id: None,
        }
    }

    fn default_terminals() -> BTreeSet<SegmentId> {
        BTreeSet::from([0])
    }

    #[test]
    fn test_chain_forward_adjacency() {
        // 1 drains into 2 drains into 3 drains out of the domain.
        let records = vec![record(1, 2), record(2, 3), record(3, 0)];
        let forward = build_forward(&records, &default_terminals());

        assert_eq!(forward.get(&1), Some(&vec![2]));
        assert_eq!(forward.get(&2), Some(&vec![3]));
        assert_eq!(forward.get(&3), Some(&vec![]), "outlets still get a key");
    }

    #[test]
    fn test_chain_reverse_adjacency() {
        let records = vec![record(1, 2), record(2, 3), record(3, 0)];
        let forward = build_forward(&records, &default_terminals());
        let reversed = reverse(&forward);

        assert_eq!(reversed.get(&2), Some(&vec![1]));
        assert_eq!(reversed.get(&3), Some(&vec![2]));
        assert_eq!(reversed.get(&1), Some(&vec![]), "headwaters get an empty entry");
    }

    #[test]
    fn test_confluence_collects_both_tributaries() {
        let records = vec![record(10, 30), record(20, 30), record(30, 0)];
        let forward = build_forward(&records, &default_terminals());
        let reversed = reverse(&forward);

        assert_eq!(reversed.get(&30), Some(&vec![10, 20]));
    }

    #[test]
    fn test_dangling_target_is_treated_as_terminal() {
        // 77 is not a segment of the loaded extract.
        let records = vec![record(1, 77), record(2, 1)];
        let forward = build_forward(&records, &default_terminals());

        assert_eq!(forward.get(&1), Some(&vec![]));
        assert_eq!(forward.get(&2), Some(&vec![1]));
        assert!(!forward.contains_key(&77), "dangling targets never become keys");
    }

    #[test]
    fn test_custom_terminal_codes_are_excluded() {
        let terminals = BTreeSet::from([0, 9999]);
        let records = vec![record(1, 9999), record(2, 1), record(9999, 0)];
        let forward = build_forward(&records, &terminals);

        // 9999 exists as a segment id, but as a terminal code it is still
        // excluded from adjacency.
        assert_eq!(forward.get(&1), Some(&vec![]));
        assert_eq!(forward.get(&2), Some(&vec![1]));
    }

    #[test]
    fn test_normalize_remaps_terminal_targets_to_own_sentinel() {
        let mut records = vec![record(1, 2), record(2, 0)];
        normalize_downstream(&mut records, &default_terminals());

        assert_eq!(records[0].downstream, 2, "real edges are untouched");
        assert_eq!(records[1].downstream, outlet_sentinel(2));
    }

    #[test]
    fn test_normalize_leaves_dangling_targets_distinguishable() {
        // A dangling positive target is an edge out of the loaded extent,
        // not a true outlet; normalization must not collapse the two.
        let mut records = vec![record(1, 77), record(2, 0)];
        normalize_downstream(&mut records, &default_terminals());

        assert_eq!(records[0].downstream, 77);
        assert_eq!(records[1].downstream, outlet_sentinel(2));
    }

    #[test]
    fn test_sentinel_targets_are_excluded_from_adjacency() {
        let mut records = vec![record(1, 2), record(2, 0)];
        normalize_downstream(&mut records, &default_terminals());
        let forward = build_forward(&records, &default_terminals());

        assert_eq!(forward.get(&2), Some(&vec![]));
        assert!(!forward.contains_key(&outlet_sentinel(2)));
    }

    #[test]
    fn test_inverse_membership_law() {
        let records = vec![
            record(10, 30),
            record(20, 30),
            record(30, 40),
            record(40, 0),
            record(50, 40),
        ];
        let forward = build_forward(&records, &default_terminals());
        let reversed = reverse(&forward);

        for (&source, targets) in &forward {
            for target in targets {
                let ups = reversed.get(target).expect("every target must have an entry");
                assert!(
                    ups.contains(&source),
                    "edge {} -> {} missing from reverse mapping",
                    source,
                    target
                );
            }
        }
        for (&target, sources) in &reversed {
            for source in sources {
                assert!(
                    forward.get(source).is_some_and(|downs| downs.contains(&target)),
                    "reverse edge {} <- {} has no forward counterpart",
                    target,
                    source
                );
            }
        }
    }

    #[test]
    fn test_reverse_twice_reproduces_non_terminal_edges() {
        let records = vec![record(10, 30), record(20, 30), record(30, 0)];
        let forward = build_forward(&records, &default_terminals());
        let round_trip = reverse(&reverse(&forward));

        for (id, targets) in &forward {
            let mut expected = targets.clone();
            expected.sort_unstable();
            let mut actual = round_trip.get(id).cloned().unwrap_or_default();
            actual.sort_unstable();
            assert_eq!(actual, expected, "round trip diverged for segment {}", id);
        }
        // Any entries the round trip added beyond forward's keys must be empty.
        for (id, targets) in &round_trip {
            if !forward.contains_key(id) {
                assert!(targets.is_empty(), "round trip invented edges for {}", id);
            }
        }
    }
}
