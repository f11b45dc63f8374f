// 🚚 Migration Engine - Load → Group → Classify → Plan → Execute
//
// Dry-run runs the identical pipeline and skips only the executor, so the
// previewed plan is exactly what execute mode would attempt.

use anyhow::Result;
use rusqlite::Connection;

use crate::config::MigrationConfig;
use crate::executor::{execute_plan, ExecutionReport};
use crate::grouper::group_by_transfer_key;
use crate::planner::{build_plan, MigrationPlan};
use crate::report::{render_plan, DEFAULT_PREVIEW};
use crate::store::load_transfer_candidates;

/// Outcome of one run: the full plan, plus the execution report when the
/// run was not a dry-run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub plan: MigrationPlan,
    pub execution: Option<ExecutionReport>,
}

/// Compute the plan for the current store snapshot. Pure apart from the
/// initial load; both modes call this exact function.
pub fn plan_migration(conn: &Connection, group_filter: Option<&str>) -> Result<MigrationPlan> {
    let candidates = load_transfer_candidates(conn, group_filter)?;
    let groups = group_by_transfer_key(candidates);
    Ok(build_plan(&groups))
}

/// Full batch pass. Prints the plan preview before any mutation.
pub fn run_migration(conn: &Connection, config: &MigrationConfig) -> Result<RunSummary> {
    let plan = plan_migration(conn, config.group.as_deref())?;

    print!("{}", render_plan(&plan, DEFAULT_PREVIEW));

    let execution = if config.execute {
        Some(execute_plan(conn, &plan, config.limit))
    } else {
        None
    };

    Ok(RunSummary { plan, execution })
}

// ============================================================================
// TESTS
// ============================================================================
