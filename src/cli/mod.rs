//! CLI module for suiterun
//!
//! ## Usage
//!
//! - `suiterun` - prepare the workspace in the current directory and run every suite
//! - `suiterun -k parser` - run only suites whose name contains `parser`
//! - `suiterun --list` - print the registered suites in run order
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::config::HarnessConfig;
use crate::version::SUITERUN_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run the registered test suites against a command-line tool
#[derive(Parser, Debug)]
#[command(name = "suiterun")]
#[command(version = SUITERUN_VERSION)]
#[command(about = "Run the registered test suites against a command-line tool", long_about = None)]
pub struct Cli {
    /// Workspace root (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Tool under test, relative to the root
    #[arg(long, value_name = "PATH", default_value = "lib/cli")]
    pub tool: PathBuf,

    /// Program used to launch the tool (e.g. `node`)
    #[arg(long, value_name = "CMD")]
    pub launcher: Option<String>,

    /// Output directory for suite artifacts, relative to the root
    #[arg(long = "output-dir", value_name = "DIR", default_value = "test-output")]
    pub output_dir: PathBuf,

    /// Fixture directory, relative to the root
    #[arg(long = "fixture-dir", value_name = "DIR", default_value = "test-grammars")]
    pub fixture_dir: PathBuf,

    /// Directory holding the suite case files, relative to the root
    #[arg(long = "suite-dir", value_name = "DIR", default_value = "tests")]
    pub suite_dir: PathBuf,

    /// Skip fixture seeding
    #[arg(long = "no-seed")]
    pub no_seed: bool,

    /// Seed fixtures by running this command instead of copying `<suite-dir>/fixtures`
    #[arg(long = "seed-command", value_name = "CMD", conflicts_with = "no_seed")]
    pub seed_command: Option<String>,

    /// Only run suites whose name contains EXPR
    #[arg(short = 'k', value_name = "EXPR")]
    pub filter: Option<String>,

    /// List registered suites and exit
    #[arg(long)]
    pub list: bool,

    /// Print a line for every passing case
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> HarnessConfig {
        let config = HarnessConfig::new()
            .with_tool(&self.tool)
            .with_output_dir(&self.output_dir)
            .with_fixture_dir(&self.fixture_dir)
            .with_suite_dir(&self.suite_dir);
        match &self.launcher {
            Some(launcher) => config.with_launcher(launcher),
            None => config,
        }
    }

    /// Absolute workspace root.
    pub fn root_dir(&self) -> CliResult<PathBuf> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => env::current_dir()
                .map_err(|e| CliError::failure(format!("Error: cannot determine current directory: {}", e)))?,
        };
        std::path::absolute(&root)
            .map_err(|e| CliError::failure(format!("Error: cannot resolve root {}: {}", root.display(), e)))
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let registry = commands::registry(cli.filter.as_deref());

    if cli.list {
        return commands::list_suites(&registry);
    }

    let options = commands::RunOptions {
        root: cli.root_dir()?,
        config: cli.config(),
        seeding: commands::Seeding::from_flags(cli.no_seed, cli.seed_command.clone()),
        verbose: cli.verbose,
    };
    commands::run_suites(registry, options, &mut crate::report::ConsoleReporter::stdio())
}

// ============================================================================
// Tests
// ============================================================================
