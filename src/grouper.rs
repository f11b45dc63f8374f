// 🔗 Grouper - Partition candidates by (owner, group) key
//
// Pure in-memory step: no I/O, no failure modes. Members keep their load
// order inside each group (only preview readability depends on it).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::store::TransferCandidate;

// ============================================================================
// GROUP KEY
// ============================================================================

/// Composite key identifying one transfer group.
///
/// The original store keyed groups by the concatenation `owner::group`
/// with no escaping, so identifiers containing the separator could collide.
/// A typed pair makes that impossible; `Display` keeps the legacy spelling
/// for log lines only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub owner_id: String,
    pub group_id: String,
}

impl GroupKey {
    pub fn new(owner_id: &str, group_id: &str) -> Self {
        GroupKey {
            owner_id: owner_id.to_string(),
            group_id: group_id.to_string(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner_id, self.group_id)
    }
}

// ============================================================================
// GROUPING
// ============================================================================

/// Partition loaded candidates into groups.
///
/// A missing owner id becomes an empty-string key component - the record
/// still groups instead of crashing the run. BTreeMap gives a stable group
/// order, so the same snapshot always plans in the same order.
pub fn group_by_transfer_key(
    candidates: Vec<TransferCandidate>,
) -> BTreeMap<GroupKey, Vec<TransferCandidate>> {
    let mut groups: BTreeMap<GroupKey, Vec<TransferCandidate>> = BTreeMap::new();

    for tx in candidates {
        let key = GroupKey::new(&tx.owner_id, &tx.group_id);
        groups.entry(key).or_default().push(tx);
    }

    groups
}

// ============================================================================
// TESTS
// ============================================================================
