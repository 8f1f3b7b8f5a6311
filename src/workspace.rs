//! Workspace preparation
//!
//! Resolves the absolute locations every suite works against and makes sure the directories
//! the harness writes into exist. Preparation is idempotent: existing directories and their
//! contents are left alone.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::HarnessConfig;

/// Errors that abort startup while preparing the workspace
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create directory {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("suite directory {} does not exist", path.display())]
    MissingSuiteDir { path: PathBuf },
}

/// Absolute paths shared by the orchestrator and every suite.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub tool_path: PathBuf,
    pub root_dir: PathBuf,
    pub output_dir: PathBuf,
    pub fixture_dir: PathBuf,
    pub suite_dir: PathBuf,
    pub lib_dir: PathBuf,
}

impl ResolvedPaths {
    /// Compute the layout under `root` without touching the filesystem.
    pub fn resolve(root: &Path, config: &HarnessConfig) -> Self {
        let tool_path = root.join(&config.tool);
        let lib_dir = tool_path.parent().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
        Self {
            tool_path,
            root_dir: root.to_path_buf(),
            output_dir: root.join(&config.output_dir),
            fixture_dir: root.join(&config.fixture_dir),
            suite_dir: root.join(&config.suite_dir),
            lib_dir,
        }
    }
}

/// Resolve the layout under `root` and create the output and fixture directories.
///
/// The suite directory is consumed, not created: a missing one is an error.
pub fn prepare(root: &Path, config: &HarnessConfig) -> Result<ResolvedPaths, WorkspaceError> {
    let paths = ResolvedPaths::resolve(root, config);

    ensure_dir(&paths.output_dir)?;
    ensure_dir(&paths.fixture_dir)?;

    if !paths.suite_dir.is_dir() {
        return Err(WorkspaceError::MissingSuiteDir {
            path: paths.suite_dir,
        });
    }

    debug!(root = %paths.root_dir.display(), tool = %paths.tool_path.display(), "workspace ready");
    Ok(paths)
}

/// Create `path` and its parents unless it is already a directory.
fn ensure_dir(path: &Path) -> Result<(), WorkspaceError> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|source| WorkspaceError::Filesystem {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "created directory");
    Ok(())
}
