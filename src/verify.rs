//! Network Invariant Verification Module
//!
//! Framework for checking the structural laws of freshly built adjacency
//! mappings: the reverse mapping must be the exact inverse of the forward
//! mapping, reversing twice must reproduce the forward mapping's
//! non-terminal edges, and every source key must have a reverse entry.
//!
//! Run this after building a new network extract before handing the
//! mapping to downstream steps.

use crate::network::topology::{ForwardAdjacency, ReverseAdjacency, reverse};
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkVerification {
    pub timestamp: String,
    pub checks: Vec<CheckResult>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub status: VerificationStatus,
    /// Present on failure: the first counterexample found.
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Passed,
    Failed,
}

fn passed(name: &str) -> CheckResult {
    CheckResult {
        name: name.to_string(),
        status: VerificationStatus::Passed,
        detail: None,
    }
}

fn failed(name: &str, detail: String) -> CheckResult {
    CheckResult {
        name: name.to_string(),
        status: VerificationStatus::Failed,
        detail: Some(detail),
    }
}

// ============================================================================
// Individual Checks
// ============================================================================

/// B ∈ reverse[A] exactly when A ∈ forward[B], in both directions.
pub fn check_inverse_membership(
    forward: &ForwardAdjacency,
    reversed: &ReverseAdjacency,
) -> CheckResult {
    const NAME: &str = "inverse_membership";

    for (&source, targets) in forward {
        for &target in targets {
            let present = reversed
                .get(&target)
                .is_some_and(|ups| ups.contains(&source));
            if !present {
                return failed(
                    NAME,
                    format!("forward edge {} -> {} is missing from the reverse mapping", source, target),
                );
            }
        }
    }

    for (&target, sources) in reversed {
        for &source in sources {
            let present = forward
                .get(&source)
                .is_some_and(|downs| downs.contains(&target));
            if !present {
                return failed(
                    NAME,
                    format!("reverse edge {} <- {} has no forward counterpart", target, source),
                );
            }
        }
    }

    passed(NAME)
}

/// Every source key of the forward mapping has a reverse entry.
pub fn check_source_coverage(
    forward: &ForwardAdjacency,
    reversed: &ReverseAdjacency,
) -> CheckResult {
    const NAME: &str = "source_coverage";

    for &source in forward.keys() {
        if !reversed.contains_key(&source) {
            return failed(NAME, format!("segment {} has no reverse entry", source));
        }
    }
    passed(NAME)
}

/// Reversing twice reproduces the forward mapping's non-terminal edges,
/// modulo empty-entry normalization.
pub fn check_round_trip(forward: &ForwardAdjacency) -> CheckResult {
    const NAME: &str = "round_trip";

    let round_trip = reverse(&reverse(forward));

    for (id, targets) in forward {
        let mut expected = targets.clone();
        expected.sort_unstable();
        let mut actual = round_trip.get(id).cloned().unwrap_or_default();
        actual.sort_unstable();
        if actual != expected {
            return failed(
                NAME,
                format!(
                    "segment {}: forward targets {:?} became {:?} after double reversal",
                    id, expected, actual
                ),
            );
        }
    }
    for (id, targets) in &round_trip {
        if !forward.contains_key(id) && !targets.is_empty() {
            return failed(
                NAME,
                format!("double reversal invented edges {:?} for segment {}", targets, id),
            );
        }
    }

    passed(NAME)
}

// ============================================================================
// Full Verification Runner
// ============================================================================

pub fn verify_network(
    forward: &ForwardAdjacency,
    reversed: &ReverseAdjacency,
) -> NetworkVerification {
    let checks = vec![
        check_inverse_membership(forward, reversed),
        check_source_coverage(forward, reversed),
        check_round_trip(forward),
    ];

    let total = checks.len();
    let passed = checks
        .iter()
        .filter(|c| c.status == VerificationStatus::Passed)
        .count();

    NetworkVerification {
        timestamp: Utc::now().to_rfc3339(),
        summary: VerificationSummary {
            total,
            passed,
            failed: total - passed,
        },
        checks,
    }
}

pub fn print_summary(report: &NetworkVerification) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 NETWORK VERIFICATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for check in &report.checks {
        match check.status {
            VerificationStatus::Passed => println!("  ✓ {}", check.name),
            VerificationStatus::Failed => println!(
                "  ✗ {}: {}",
                check.name,
                check.detail.as_deref().unwrap_or("unknown")
            ),
        }
    }

    println!();
    println!(
        "Checks: {}/{} passed ({} failed)",
        report.summary.passed, report.summary.total, report.summary.failed
    );
    println!("═══════════════════════════════════════════════════════════");
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SegmentId, SegmentRecord};
    use crate::network::topology::build_forward;
    use std::collections::BTreeSet;

    fn built_network() -> (ForwardAdjacency, ReverseAdjacency) {
        let records = vec![
            SegmentRecord { id: 1, downstream: 2, gauge_id: None },
            SegmentRecord { id: 2, downstream: 3, gauge_id: None },
            SegmentRecord { id: 3, downstream: 0, gauge_id: None },
        ];
        let forward = build_forward(&records, &BTreeSet::from([0]));
        let reversed = reverse(&forward);
        (forward, reversed)
    }

    #[test]
    fn test_built_network_passes_all_checks() {
        let (forward, reversed) = built_network();
        let report = verify_network(&forward, &reversed);

        assert_eq!(report.summary.failed, 0, "report: {:?}", report.checks);
        assert_eq!(report.summary.passed, report.summary.total);
    }

    #[test]
    fn test_missing_reverse_edge_fails_inverse_membership() {
        let (forward, mut reversed) = built_network();
        reversed.get_mut(&2).unwrap().clear();

        let result = check_inverse_membership(&forward, &reversed);
        assert_eq!(result.status, VerificationStatus::Failed);
        assert!(result.detail.unwrap().contains("1 -> 2"));
    }

    #[test]
    fn test_phantom_reverse_edge_fails_inverse_membership() {
        let (forward, mut reversed) = built_network();
        reversed.get_mut(&1).unwrap().push(3);

        let result = check_inverse_membership(&forward, &reversed);
        assert_eq!(result.status, VerificationStatus::Failed);
    }

    #[test]
    fn test_dropped_entry_fails_source_coverage() {
        let (forward, mut reversed) = built_network();
        reversed.remove(&1);

        let result = check_source_coverage(&forward, &reversed);
        assert_eq!(result.status, VerificationStatus::Failed);
    }

    #[test]
    fn test_round_trip_holds_for_confluence() {
        let records = vec![
            SegmentRecord { id: 10, downstream: 30, gauge_id: None },
            SegmentRecord { id: 20, downstream: 30, gauge_id: None },
            SegmentRecord { id: 30, downstream: 0, gauge_id: None },
        ];
        let forward = build_forward(&records, &BTreeSet::from([0]));

        let result = check_round_trip(&forward);
        assert_eq!(result.status, VerificationStatus::Passed, "{:?}", result.detail);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let (forward, reversed) = built_network();
        let report = verify_network(&forward, &reversed);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("inverse_membership"));
        assert!(json.contains("round_trip"));
    }
}
