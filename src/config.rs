//! Harness configuration
//!
//! Describes the workspace layout relative to the root directory and how suites name the
//! tool under test. Every path here is relative to the root.

use std::path::{Component, Path, PathBuf};

/// Layout and redirect settings for a harness run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Tool under test
    pub tool: PathBuf,
    /// Program that launches the tool (e.g. `node`), if the tool is not directly executable
    pub launcher: Option<String>,
    /// Working directory for artifacts generated by suites
    pub output_dir: PathBuf,
    /// Directory populated by the fixture seeder
    pub fixture_dir: PathBuf,
    /// Directory holding the suite definitions
    pub suite_dir: PathBuf,
    /// Seed source for the default seeder, relative to `suite_dir`
    pub fixture_source: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            tool: PathBuf::from("lib/cli"),
            launcher: None,
            output_dir: PathBuf::from("test-output"),
            fixture_dir: PathBuf::from("test-grammars"),
            suite_dir: PathBuf::from("tests"),
            fixture_source: PathBuf::from("fixtures"),
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, tool: impl Into<PathBuf>) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn with_launcher(mut self, launcher: impl Into<String>) -> Self {
        self.launcher = Some(launcher.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = dir.into();
        self
    }

    pub fn with_suite_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.suite_dir = dir.into();
        self
    }

    /// The command prefix suites use to reach the tool from inside `suite_dir`.
    ///
    /// With the defaults this is `../lib/cli`; with a `node` launcher and a `lib/cli.js` tool
    /// it is `node ../lib/cli.js`.
    pub fn relative_prefix(&self) -> String {
        let depth = self
            .suite_dir
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count();
        let tool = slash_path(&self.tool);
        let relative = format!("{}{}", "../".repeat(depth), tool);
        match &self.launcher {
            Some(launcher) => format!("{} {}", launcher, relative),
            None => relative,
        }
    }
}

/// Render a relative path with forward slashes, the form suites write in commands.
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
