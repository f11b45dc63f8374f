// 🗺️ Action Planner - Turn classified groups into an executable plan
//
// The plan and its stats always cover every eligible group; the execution
// ceiling (--limit) truncates only at execution time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::classifier::{classify_group, leg_role, Disposition, LegRole};
use crate::grouper::GroupKey;
use crate::merge::{build_merge, MergePayload};
use crate::store::TransferCandidate;

// ============================================================================
// ACTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionMode {
    ConvertPair,
    CleanupPartial,
}

impl ActionMode {
    pub fn label(&self) -> &'static str {
        match self {
            ActionMode::ConvertPair => "convert_pair",
            ActionMode::CleanupPartial => "cleanup_partial",
        }
    }
}

/// One unit of change: update the keeper, delete the superseded records.
/// Created by the planner, consumed once by the executor, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub mode: ActionMode,
    pub key: GroupKey,
    pub keeper_id: String,
    pub delete_ids: Vec<String>,
    pub update: MergePayload,
}

// ============================================================================
// PLAN STATS
// ============================================================================

/// Aggregate counters for one planning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStats {
    pub groups_scanned: usize,
    pub already_modern: usize,
    pub convert_pair: usize,
    pub cleanup_partial: usize,
    pub skipped_ambiguous: usize,
    pub planned_actions: usize,
}

// ============================================================================
// MIGRATION PLAN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationPlan {
    pub actions: Vec<Action>,
    pub stats: PlanStats,
}

/// Classify every group and emit the ordered action list.
///
/// Group order is the map's key order (stable), so replanning the same
/// snapshot always yields the identical plan.
pub fn build_plan(groups: &BTreeMap<GroupKey, Vec<TransferCandidate>>) -> MigrationPlan {
    let mut actions = Vec::new();
    let mut stats = PlanStats::default();

    for (key, members) in groups {
        stats.groups_scanned += 1;

        match classify_group(members) {
            Disposition::AlreadyModern => {
                stats.already_modern += 1;
            }
            Disposition::SkippedAmbiguous => {
                stats.skipped_ambiguous += 1;
            }
            Disposition::ConvertPair { incoming, outgoing } => {
                stats.convert_pair += 1;
                let update = build_merge(Some(&incoming), Some(&outgoing), None);
                actions.push(Action {
                    mode: ActionMode::ConvertPair,
                    key: key.clone(),
                    keeper_id: incoming.id,
                    delete_ids: vec![outgoing.id],
                    update,
                });
            }
            Disposition::CleanupPartial { modern, legacy } => {
                stats.cleanup_partial += 1;
                // The lone legacy leg feeds the merge through whichever role
                // it resolves to; with no determinable role the modern record
                // supplies everything
                let (incoming, outgoing) = match leg_role(&legacy) {
                    Some(LegRole::Incoming) => (Some(&legacy), None),
                    Some(LegRole::Outgoing) => (None, Some(&legacy)),
                    None => (None, None),
                };
                let update = build_merge(incoming, outgoing, Some(&modern));
                actions.push(Action {
                    mode: ActionMode::CleanupPartial,
                    key: key.clone(),
                    keeper_id: modern.id,
                    delete_ids: vec![legacy.id],
                    update,
                });
            }
        }
    }

    stats.planned_actions = actions.len();

    MigrationPlan { actions, stats }
}

// ============================================================================
// TESTS
// ============================================================================
