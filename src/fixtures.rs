//! Fixture seeding
//!
//! Seeding runs exactly once, after the invoker exists and before the first suite. The
//! orchestrator only cares whether it succeeded; any failure aborts the run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::invocation::{InvocationError, InvokeOptions, Invoker};
use crate::workspace::ResolvedPaths;

/// Errors raised while seeding fixtures
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read fixture source {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to write fixture {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("seed command failed: {0}")]
    Invocation(#[from] InvocationError),

    #[error("seed command `{command}` exited with {status}: {stderr}")]
    Command { command: String, status: String, stderr: String },
}

/// Populates the fixture directory before any suite runs.
pub trait FixtureSeeder {
    fn seed(&self, paths: &ResolvedPaths, invoker: &dyn Invoker) -> Result<(), SeedError>;
}

/// Seeder that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSeeder;

impl FixtureSeeder for NoopSeeder {
    fn seed(&self, _paths: &ResolvedPaths, _invoker: &dyn Invoker) -> Result<(), SeedError> {
        Ok(())
    }
}

/// Copies a source tree into the fixture directory.
///
/// Same-named files are overwritten and nothing is removed, so reseeding a seeded
/// directory leaves it unchanged. A missing source tree seeds nothing.
#[derive(Debug, Clone)]
pub struct DirectorySeeder {
    source: PathBuf,
}

impl DirectorySeeder {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self { source: source.into() }
    }

    /// Seed from `<suite_dir>/<fixture_source>`.
    pub fn for_workspace(paths: &ResolvedPaths, fixture_source: &Path) -> Self {
        Self::new(paths.suite_dir.join(fixture_source))
    }
}

impl FixtureSeeder for DirectorySeeder {
    fn seed(&self, paths: &ResolvedPaths, _invoker: &dyn Invoker) -> Result<(), SeedError> {
        if !self.source.is_dir() {
            debug!(source = %self.source.display(), "no fixture source, skipping seeding");
            return Ok(());
        }

        let mut copied = 0usize;
        for entry in WalkDir::new(&self.source).min_depth(1) {
            let entry = entry.map_err(|source| SeedError::Walk {
                path: self.source.clone(),
                source,
            })?;
            let Ok(relative) = entry.path().strip_prefix(&self.source) else {
                continue;
            };
            let target = paths.fixture_dir.join(relative);

            let written = if entry.file_type().is_dir() {
                fs::create_dir_all(&target)
            } else {
                fs::copy(entry.path(), &target).map(|_| copied += 1)
            };
            written.map_err(|source| SeedError::Io { path: target, source })?;
        }

        info!(count = copied, dir = %paths.fixture_dir.display(), "seeded fixtures");
        Ok(())
    }
}

/// Runs a setup command through the invoker, so it is redirected like any suite command.
#[derive(Debug, Clone)]
pub struct CommandSeeder {
    command: String,
}

impl CommandSeeder {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }
}

impl FixtureSeeder for CommandSeeder {
    fn seed(&self, paths: &ResolvedPaths, invoker: &dyn Invoker) -> Result<(), SeedError> {
        let output = invoker.invoke(&self.command, InvokeOptions::in_dir(&paths.fixture_dir))?;
        if !output.success() {
            return Err(SeedError::Command {
                command: self.command.clone(),
                status: output.status.map_or_else(|| "signal".to_string(), |c| c.to_string()),
                stderr: output.stderr.trim().to_string(),
            });
        }
        info!(command = %self.command, "seed command finished");
        Ok(())
    }
}
