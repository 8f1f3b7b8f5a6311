//! End-to-end orchestration: prepare, seed, run, report.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::config::HarnessConfig;
use crate::fixtures::{DirectorySeeder, FixtureSeeder, SeedError};
use crate::invocation::ToolInvoker;
use crate::registry::SuiteRegistry;
use crate::report::SuiteReporter;
use crate::runner::{AggregateResult, SuiteRunner};
use crate::workspace::{self, WorkspaceError};

/// Failures that abort the run before any suite executes
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("fixture seeding failed: {0}")]
    Seed(#[from] SeedError),
}

pub struct Harness {
    root: PathBuf,
    config: HarnessConfig,
    registry: SuiteRegistry,
    seeder: Option<Box<dyn FixtureSeeder>>,
    verbose: bool,
}

impl Harness {
    /// Harness over `root` using the default [`DirectorySeeder`].
    pub fn new(root: impl Into<PathBuf>, config: HarnessConfig, registry: SuiteRegistry) -> Self {
        Self {
            root: root.into(),
            config,
            registry,
            seeder: None,
            verbose: false,
        }
    }

    pub fn with_seeder(mut self, seeder: impl FixtureSeeder + 'static) -> Self {
        self.seeder = Some(Box::new(seeder));
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Prepare the workspace, seed fixtures once, then run every suite in order.
    ///
    /// Only startup failures are errors; suite failures are in the returned totals.
    pub fn run(&self, reporter: &mut dyn SuiteReporter) -> Result<AggregateResult, StartupError> {
        let paths = workspace::prepare(&self.root, &self.config)?;
        let invoker = ToolInvoker::for_workspace(&paths, &self.config);

        match &self.seeder {
            Some(seeder) => seeder.seed(&paths, &invoker)?,
            None => DirectorySeeder::for_workspace(&paths, &self.config.fixture_source).seed(&paths, &invoker)?,
        }

        info!(suites = self.registry.len(), "running suites");
        Ok(SuiteRunner::new(&self.registry)
            .verbose(self.verbose)
            .run(&paths, &invoker, reporter))
    }
}
