// ⚙️ Executor - Apply planned actions against the store
//
// Strictly sequential, per-action failure isolation: one failed action is
// counted and logged, never aborts the batch. Two-step update-then-delete
// with no store transaction - the keeper update is idempotent, so a crash
// between the steps leaves the keeper correct and the next planning pass
// picks up the leftover delete.

use anyhow::Result;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::planner::{Action, MigrationPlan};
use crate::store::{delete_transfer, update_transfer};

// ============================================================================
// EXECUTION REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub attempted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub failures: usize,

    #[serde(skip)]
    pub elapsed: Duration,
}

// ============================================================================
// EXECUTOR
// ============================================================================

/// Execute the plan, honoring the optional action ceiling.
pub fn execute_plan(
    conn: &Connection,
    plan: &MigrationPlan,
    limit: Option<usize>,
) -> ExecutionReport {
    let started = Instant::now();
    let mut report = ExecutionReport::default();

    let ceiling = limit.unwrap_or(plan.actions.len());

    for action in plan.actions.iter().take(ceiling) {
        report.attempted += 1;

        match apply_action(conn, action) {
            Ok(outcome) => {
                report.updated += outcome.updated;
                report.deleted += outcome.deleted;
                if outcome.keeper_missing {
                    report.failures += 1;
                    eprintln!(
                        "⚠️  [{}] keeper {} not found, skipping delete",
                        action.key, action.keeper_id
                    );
                }
            }
            Err(err) => {
                report.failures += 1;
                eprintln!("⚠️  [{}] action failed: {err:#}", action.key);
            }
        }
    }

    report.elapsed = started.elapsed();
    report
}

struct ActionOutcome {
    updated: usize,
    deleted: usize,
    keeper_missing: bool,
}

/// One action: update the keeper first, then delete the superseded records.
/// A missing keeper (already deleted, identifier drift) skips the deletes -
/// the group will reclassify on the next run.
fn apply_action(conn: &Connection, action: &Action) -> Result<ActionOutcome> {
    let matched = update_transfer(conn, &action.keeper_id, &action.update)?;

    if matched == 0 {
        return Ok(ActionOutcome {
            updated: 0,
            deleted: 0,
            keeper_missing: true,
        });
    }

    let mut deleted = 0;
    for id in &action.delete_ids {
        deleted += delete_transfer(conn, id)?;
    }

    Ok(ActionOutcome {
        updated: matched,
        deleted,
        keeper_missing: false,
    })
}

// ============================================================================
// TESTS
// ============================================================================
