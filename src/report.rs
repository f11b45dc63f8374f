// 📋 Plan Reporter - Human-readable plan preview and result summary
//
// Output contract only: everything algorithmic lives upstream. Rendered
// before any mutation so the operator sees exactly what execute would do.

use crate::executor::ExecutionReport;
use crate::planner::MigrationPlan;

/// How many leading actions the preview shows by default
pub const DEFAULT_PREVIEW: usize = 5;

/// Render disposition counts plus a bounded preview of the first actions.
pub fn render_plan(plan: &MigrationPlan, preview: usize) -> String {
    let stats = &plan.stats;
    let mut out = String::new();

    out.push_str("📊 Plan summary\n");
    out.push_str(&format!("   Groups scanned:    {}\n", stats.groups_scanned));
    out.push_str(&format!("   Already modern:    {}\n", stats.already_modern));
    out.push_str(&format!("   Convert pair:      {}\n", stats.convert_pair));
    out.push_str(&format!("   Cleanup partial:   {}\n", stats.cleanup_partial));
    out.push_str(&format!("   Skipped ambiguous: {}\n", stats.skipped_ambiguous));
    out.push_str(&format!("   Planned actions:   {}\n", stats.planned_actions));

    if plan.actions.is_empty() {
        return out;
    }

    let shown = preview.min(plan.actions.len());
    out.push_str(&format!(
        "\n🔍 First {} of {} actions:\n",
        shown,
        plan.actions.len()
    ));

    for action in plan.actions.iter().take(shown) {
        // Payload as a JSON one-liner; falls back to Debug if serialization
        // ever fails (it cannot for these types, but the preview must not
        // abort the run)
        let payload = serde_json::to_string(&action.update)
            .unwrap_or_else(|_| format!("{:?}", action.update));

        out.push_str(&format!(
            "   [{}] {} keep={} delete={} update={}\n",
            action.mode.label(),
            action.key,
            action.keeper_id,
            action.delete_ids.join(","),
            payload,
        ));
    }

    if plan.actions.len() > shown {
        out.push_str(&format!("   ... {} more\n", plan.actions.len() - shown));
    }

    out
}

/// Render the post-execution result summary.
pub fn render_execution(report: &ExecutionReport) -> String {
    format!(
        "✅ Execution finished\n   Attempted: {}\n   Updated:   {}\n   Deleted:   {}\n   Failures:  {}\n   Elapsed:   {:.2?}\n",
        report.attempted, report.updated, report.deleted, report.failures, report.elapsed,
    )
}

// ============================================================================
// TESTS
// ============================================================================
