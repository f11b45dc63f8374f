// ⚙️ Configuration - Explicit config struct + CLI argument parsing
//
// The engine never reads the environment itself; main resolves the store
// location once and hands the engine a fully-built MigrationConfig.

use std::path::PathBuf;

/// Environment variable naming the SQLite store
pub const STORE_ENV_VAR: &str = "TRANSFER_DB";

pub const USAGE: &str = "\
transfer-migration - consolidate legacy paired transfer records

USAGE:
    transfer-migration [OPTIONS]

OPTIONS:
    --dry-run        Plan only, mutate nothing (default)
    --execute        Apply the plan to the store
    --limit=N        Execute at most N actions (ignored in dry-run;
                     non-numeric or negative values are treated as unset)
    --group=<id>     Restrict the whole run to one group identifier
    -h, --help       Print this help and exit

ENVIRONMENT:
    TRANSFER_DB      Path to the SQLite event store (required)
";

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// SQLite store location
    pub db_path: PathBuf,

    /// false = dry-run (default)
    pub execute: bool,

    /// Ceiling on executed actions; planning always covers every group
    pub limit: Option<usize>,

    /// Restrict loading through planning to one group identifier
    pub group: Option<String>,
}

/// Parsed command line, before the store location is known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub execute: bool,
    pub limit: Option<usize>,
    pub group: Option<String>,
    pub help: bool,
}

/// Parse CLI flags. Unknown flags are ignored (the original tool did the
/// same); a malformed --limit value is treated as unset rather than fatal.
pub fn parse_args<I, S>(args: I) -> CliOptions
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut opts = CliOptions::default();

    for arg in args {
        let arg = arg.as_ref();

        match arg {
            "--execute" => opts.execute = true,
            "--dry-run" => opts.execute = false,
            "--help" | "-h" => opts.help = true,
            _ => {
                if let Some(value) = arg.strip_prefix("--limit=") {
                    opts.limit = value.parse::<usize>().ok();
                } else if let Some(value) = arg.strip_prefix("--group=") {
                    if !value.is_empty() {
                        opts.group = Some(value.to_string());
                    }
                }
            }
        }
    }

    opts
}

// ============================================================================
// TESTS
// ============================================================================
