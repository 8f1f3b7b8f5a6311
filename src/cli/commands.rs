//! Command implementations

use std::path::PathBuf;

use crate::config::HarnessConfig;
use crate::fixtures::{CommandSeeder, NoopSeeder};
use crate::harness::Harness;
use crate::registry::SuiteRegistry;
use crate::report::SuiteReporter;

use super::{CliError, CliResult, ExitCode};

/// How fixtures are seeded before the first suite
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Seeding {
    /// Copy `<suite_dir>/<fixture_source>` into the fixture directory
    #[default]
    Directory,
    /// Run a setup command through the invoker
    Command(String),
    Disabled,
}

impl Seeding {
    pub fn from_flags(no_seed: bool, command: Option<String>) -> Self {
        match (no_seed, command) {
            (true, _) => Seeding::Disabled,
            (false, Some(command)) => Seeding::Command(command),
            (false, None) => Seeding::Directory,
        }
    }
}

pub struct RunOptions {
    pub root: PathBuf,
    pub config: HarnessConfig,
    pub seeding: Seeding,
    pub verbose: bool,
}

/// Built-in registry, optionally narrowed to suites whose name contains `filter`.
pub fn registry(filter: Option<&str>) -> SuiteRegistry {
    let registry = SuiteRegistry::builtin();
    match filter {
        Some(keyword) => registry.filtered(keyword),
        None => registry,
    }
}

pub fn list_suites(registry: &SuiteRegistry) -> CliResult<ExitCode> {
    for name in registry.names() {
        println!("{}", name);
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the harness and turn its totals into the process exit code.
///
/// Startup failures become a `CliError`; the report has already been printed for
/// everything else.
pub fn run_suites(registry: SuiteRegistry, options: RunOptions, reporter: &mut dyn SuiteReporter) -> CliResult<ExitCode> {
    let harness = Harness::new(options.root, options.config, registry).verbose(options.verbose);
    let harness = match options.seeding {
        Seeding::Directory => harness,
        Seeding::Command(command) => harness.with_seeder(CommandSeeder::new(command)),
        Seeding::Disabled => harness.with_seeder(NoopSeeder),
    };

    let aggregate = harness
        .run(reporter)
        .map_err(|e| CliError::failure(format!("Error: {}", e)))?;

    Ok(if aggregate.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
