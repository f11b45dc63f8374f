// Transfer Migration Engine - Core Library
// Consolidates legacy paired transfer records into single canonical
// transfers: plan first, execute only on request.

pub mod classifier;
pub mod config;
pub mod engine;
pub mod executor;
pub mod grouper;
pub mod merge;
pub mod planner;
pub mod report;
pub mod store;

#[cfg(test)]
pub mod test_support;

// Re-export commonly used types
pub use classifier::{classify_group, leg_role, Disposition, LegRole};
pub use config::{parse_args, CliOptions, MigrationConfig, STORE_ENV_VAR, USAGE};
pub use engine::{plan_migration, run_migration, RunSummary};
pub use executor::{execute_plan, ExecutionReport};
pub use grouper::{group_by_transfer_key, GroupKey};
pub use merge::{build_merge, MergePayload, DEFAULT_DESCRIPTION, DEFAULT_TRANSFER_PURPOSE};
pub use planner::{build_plan, Action, ActionMode, MigrationPlan, PlanStats};
pub use report::{render_execution, render_plan, DEFAULT_PREVIEW};
pub use store::{
    delete_transfer, get_transfer, insert_transfer, load_transfer_candidates, setup_database,
    update_transfer, TransferCandidate, TYPE_GASTO, TYPE_INGRESO, TYPE_TRASPASO,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
