use clap::Parser;
use simpletodo::Command;
use simpletodo_db::config::{
    DEFAULT_DATABASE, DEFAULT_NAMESPACE, DEFAULT_TAGS_TABLE, DEFAULT_TASKS_TABLE,
};
use simpletodo_db::{Database, DbConfig, DbError, Tables};
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable name for the database path
const TODO_DB_PATH_ENV: &str = "TODO_DB_PATH";

/// simpletodo - A personal task and tag manager
#[derive(Parser)]
#[command(name = "todo")]
#[command(version = "0.1.0")]
#[command(about = "A personal task and tag manager", long_about = None)]
struct Args {
    /// Path to the database directory (can also be set via TODO_DB_PATH env var)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// SurrealDB namespace
    #[arg(long, global = true, env = "TODO_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// SurrealDB database
    #[arg(long, global = true, env = "TODO_DATABASE", default_value = DEFAULT_DATABASE)]
    database: String,

    /// Table holding tasks
    #[arg(long, global = true, env = "TODO_TASKS_TABLE", default_value = DEFAULT_TASKS_TABLE)]
    tasks_table: String,

    /// Table holding tags
    #[arg(long, global = true, env = "TODO_TAGS_TABLE", default_value = DEFAULT_TAGS_TABLE)]
    tags_table: String,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

impl Args {
    /// Build the database configuration from the naming flags.
    fn db_config(&self) -> Result<DbConfig, DbError> {
        let tables = Tables::new(self.tasks_table.as_str(), self.tags_table.as_str())?;
        DbConfig::new(self.namespace.as_str(), self.database.as_str(), tables)
    }
}

/// Get the database path from command line, environment variable, or default.
///
/// Priority:
/// 1. Command line --db argument
/// 2. TODO_DB_PATH environment variable (if non-empty)
/// 3. Default path (<project root>/.simpletodo/data)
fn resolve_db_path(cli_db: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_db {
        return path;
    }

    if let Ok(env_path) = std::env::var(TODO_DB_PATH_ENV)
        && !env_path.is_empty()
    {
        return PathBuf::from(env_path);
    }

    Database::default_path()
}

/// Initialize logging from `RUST_LOG`, defaulting to warnings only.
///
/// Examples:
/// - `RUST_LOG=trace` - show all trace logs, including staged statements
/// - `RUST_LOG=simpletodo_db=debug` - show repository activity
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    match run_app().await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {}", e.full_message());
            process::exit(1);
        }
    }
}

/// Main application logic - separated for testability
async fn run_app() -> Result<bool, DbError> {
    let args = Args::parse();
    run_with_args(&args).await
}

/// Run the application with the given arguments.
///
/// Returns `Ok(false)` when the command ran but reported an error.
async fn run_with_args(args: &Args) -> Result<bool, DbError> {
    let config = args.db_config()?;
    let db_path = resolve_db_path(args.db.clone());
    debug!("Opening database at {:?}", db_path);

    let db = Database::connect(&db_path, config).await?;
    db.init().await?;

    match &args.command {
        Some(cmd) => {
            let view = cmd.execute(&db).await?;
            let output = view.output();
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(!view.has_error())
        }
        None => {
            println!("Welcome to simpletodo!");
            println!("Use 'todo --help' for usage information.");
            Ok(true)
        }
    }
}
