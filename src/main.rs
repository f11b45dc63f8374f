use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

// Use library instead of local modules
use transfer_migration::{
    parse_args, render_execution, run_migration, CliOptions, MigrationConfig, STORE_ENV_VAR, USAGE,
    VERSION,
};

fn main() -> ExitCode {
    let opts = parse_args(env::args().skip(1));

    // Help never touches the store
    if opts.help {
        print!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: CliOptions) -> Result<()> {
    // Resolve the store location once; the engine itself never reads the
    // environment
    let db_path: PathBuf = env::var(STORE_ENV_VAR)
        .map(PathBuf::from)
        .with_context(|| format!("{STORE_ENV_VAR} is not set (store location)"))?;

    if !db_path.exists() {
        bail!("store not found at {}", db_path.display());
    }

    let config = MigrationConfig {
        db_path,
        execute: opts.execute,
        limit: opts.limit,
        group: opts.group,
    };

    println!(
        "🚚 Transfer migration v{} ({})",
        VERSION,
        if config.execute { "EXECUTE" } else { "dry-run" }
    );
    if let Some(group) = &config.group {
        println!("   Restricted to group: {group}");
    }
    println!();

    let conn = Connection::open(&config.db_path)
        .with_context(|| format!("Failed to open store at {}", config.db_path.display()))?;

    let summary = run_migration(&conn, &config)?;

    println!();
    match &summary.execution {
        Some(report) => print!("{}", render_execution(report)),
        None => println!("💡 Dry-run: nothing changed. Re-run with --execute to apply."),
    }

    Ok(())
}
