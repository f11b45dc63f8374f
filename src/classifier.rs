// 🧭 Classifier - Assign one disposition per transfer group
//
// Conservative by contract: a group that cannot be classified unambiguously
// is skipped, never guessed. False negatives (unmigrated groups) are
// acceptable; false merges are not.

use serde::{Deserialize, Serialize};

use crate::store::{TransferCandidate, TYPE_GASTO, TYPE_INGRESO};

// ============================================================================
// DISPOSITION
// ============================================================================

/// Classification outcome for one group. Pure function of group contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Disposition {
    /// Exactly one modern record, no legacy legs - nothing to do
    AlreadyModern,

    /// Two legacy legs forming a complete income/expense pair
    ConvertPair {
        incoming: TransferCandidate,
        outgoing: TransferCandidate,
    },

    /// One modern record plus one redundant legacy leg to retire
    CleanupPartial {
        modern: TransferCandidate,
        legacy: TransferCandidate,
    },

    /// Any other shape, or a pair whose legs cannot be told apart
    SkippedAmbiguous,
}

impl Disposition {
    pub fn label(&self) -> &'static str {
        match self {
            Disposition::AlreadyModern => "already_modern",
            Disposition::ConvertPair { .. } => "convert_pair",
            Disposition::CleanupPartial { .. } => "cleanup_partial",
            Disposition::SkippedAmbiguous => "skipped_ambiguous",
        }
    }
}

// ============================================================================
// LEG ROLES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegRole {
    Incoming,
    Outgoing,
}

fn matches_incoming(tx: &TransferCandidate) -> bool {
    tx.amount > 0.0 || tx.record_type.as_deref() == Some(TYPE_INGRESO)
}

fn matches_outgoing(tx: &TransferCandidate) -> bool {
    tx.amount < 0.0 || tx.record_type.as_deref() == Some(TYPE_GASTO)
}

/// Role of a single legacy leg, when exactly one role applies.
/// A leg matching both predicates (positive amount but GASTO type) or
/// neither (zero amount, no type) has no determinable role.
pub fn leg_role(tx: &TransferCandidate) -> Option<LegRole> {
    match (matches_incoming(tx), matches_outgoing(tx)) {
        (true, false) => Some(LegRole::Incoming),
        (false, true) => Some(LegRole::Outgoing),
        _ => None,
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Classify one group. The group is immutable input; members are cloned
/// into the disposition so planning never reaches back into the group map.
pub fn classify_group(members: &[TransferCandidate]) -> Disposition {
    let modern: Vec<&TransferCandidate> = members.iter().filter(|tx| tx.is_transfer).collect();
    let legacy: Vec<&TransferCandidate> = members.iter().filter(|tx| tx.is_legacy()).collect();

    match (modern.len(), legacy.len()) {
        (1, 0) => Disposition::AlreadyModern,
        (0, 2) => split_pair(&legacy),
        (1, 1) => Disposition::CleanupPartial {
            modern: modern[0].clone(),
            legacy: legacy[0].clone(),
        },
        // singles, 3+ legs, multiple moderns: never infer missing legs
        _ => Disposition::SkippedAmbiguous,
    }
}

/// Split two legacy legs into incoming/outgoing. Each role must resolve to
/// exactly one leg and the two legs must be distinct records.
fn split_pair(legacy: &[&TransferCandidate]) -> Disposition {
    let incoming: Vec<&&TransferCandidate> =
        legacy.iter().filter(|tx| matches_incoming(tx)).collect();
    let outgoing: Vec<&&TransferCandidate> =
        legacy.iter().filter(|tx| matches_outgoing(tx)).collect();

    if incoming.len() != 1 || outgoing.len() != 1 {
        return Disposition::SkippedAmbiguous;
    }

    let incoming = *incoming[0];
    let outgoing = *outgoing[0];

    if incoming.id == outgoing.id {
        return Disposition::SkippedAmbiguous;
    }

    Disposition::ConvertPair {
        incoming: incoming.clone(),
        outgoing: outgoing.clone(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{legacy_leg, modern_transfer};

    #[test]
    fn test_single_modern_is_already_modern() {
        let members = vec![modern_transfer("m1", "u", "g", 5000.0)];

        assert_eq!(classify_group(&members), Disposition::AlreadyModern);
    }

    #[test]
    fn test_pair_split_by_sign() {
        // Roles carried by sign alone: +5000 untyped and -5000 untyped
        let members = vec![
            legacy_leg("a", "u", "g", 5000.0, None),
            legacy_leg("b", "u", "g", -5000.0, None),
        ];

        match classify_group(&members) {
            Disposition::ConvertPair { incoming, outgoing } => {
                assert_eq!(incoming.id, "a");
                assert_eq!(outgoing.id, "b");
            }
            other => panic!("expected ConvertPair, got {}", other.label()),
        }
    }

    #[test]
    fn test_pair_split_by_type_marker() {
        // Zero amounts, roles carried by the type markers alone
        let members = vec![
            legacy_leg("out", "u", "g", 0.0, Some(TYPE_GASTO)),
            legacy_leg("in", "u", "g", 0.0, Some(TYPE_INGRESO)),
        ];

        match classify_group(&members) {
            Disposition::ConvertPair { incoming, outgoing } => {
                assert_eq!(incoming.id, "in");
                assert_eq!(outgoing.id, "out");
            }
            other => panic!("expected ConvertPair, got {}", other.label()),
        }
    }

    #[test]
    fn test_both_positive_is_ambiguous() {
        let members = vec![
            legacy_leg("a", "u", "g", 100.0, None),
            legacy_leg("b", "u", "g", 200.0, None),
        ];

        assert_eq!(classify_group(&members), Disposition::SkippedAmbiguous);
    }

    #[test]
    fn test_conflicting_sign_and_type_is_ambiguous() {
        // Positive amount but GASTO marker matches both roles
        let members = vec![
            legacy_leg("a", "u", "g", 100.0, Some(TYPE_GASTO)),
            legacy_leg("b", "u", "g", -100.0, None),
        ];

        assert_eq!(classify_group(&members), Disposition::SkippedAmbiguous);
    }

    #[test]
    fn test_single_legacy_is_ambiguous() {
        // Never infer the missing leg
        let members = vec![legacy_leg("a", "u", "g", 100.0, Some(TYPE_INGRESO))];

        assert_eq!(classify_group(&members), Disposition::SkippedAmbiguous);
    }

    #[test]
    fn test_three_legs_is_ambiguous() {
        let members = vec![
            legacy_leg("a", "u", "g", 100.0, None),
            legacy_leg("b", "u", "g", -100.0, None),
            legacy_leg("c", "u", "g", -100.0, None),
        ];

        assert_eq!(classify_group(&members), Disposition::SkippedAmbiguous);
    }

    #[test]
    fn test_modern_plus_legacy_is_cleanup_partial() {
        let members = vec![
            modern_transfer("m", "u", "g", 5000.0),
            legacy_leg("l", "u", "g", -5000.0, Some(TYPE_GASTO)),
        ];

        match classify_group(&members) {
            Disposition::CleanupPartial { modern, legacy } => {
                assert_eq!(modern.id, "m");
                assert_eq!(legacy.id, "l");
            }
            other => panic!("expected CleanupPartial, got {}", other.label()),
        }
    }

    #[test]
    fn test_two_moderns_is_ambiguous() {
        let members = vec![
            modern_transfer("m1", "u", "g", 100.0),
            modern_transfer("m2", "u", "g", 100.0),
        ];

        assert_eq!(classify_group(&members), Disposition::SkippedAmbiguous);
    }

    #[test]
    fn test_leg_role_assignment() {
        assert_eq!(
            leg_role(&legacy_leg("a", "u", "g", 10.0, None)),
            Some(LegRole::Incoming)
        );
        assert_eq!(
            leg_role(&legacy_leg("a", "u", "g", -10.0, None)),
            Some(LegRole::Outgoing)
        );
        assert_eq!(
            leg_role(&legacy_leg("a", "u", "g", 0.0, Some(TYPE_GASTO))),
            Some(LegRole::Outgoing)
        );
        // No signal at all
        assert_eq!(leg_role(&legacy_leg("a", "u", "g", 0.0, None)), None);
        // Conflicting signals
        assert_eq!(
            leg_role(&legacy_leg("a", "u", "g", 10.0, Some(TYPE_GASTO))),
            None
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let members = vec![
            legacy_leg("a", "u", "g", 5000.0, None),
            legacy_leg("b", "u", "g", -5000.0, None),
        ];

        assert_eq!(classify_group(&members), classify_group(&members));
    }
}
