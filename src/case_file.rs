//! Case-file suites
//!
//! A case file is a JSON document listing shell commands to run against the tool under
//! test and what each one must produce:
//!
//! ```json
//! {
//!   "cases": [
//!     {
//!       "name": "generates a parser",
//!       "command": "../lib/cli test-grammars/calc.jison -o test-output/calc.js",
//!       "cwd": "test-output",
//!       "expect_status": 0,
//!       "stdout_contains": [],
//!       "creates": ["test-output/calc.js"]
//!     }
//!   ]
//! }
//! ```
//!
//! `cwd` and `creates` paths are relative to the workspace root. Without `cwd`, a command
//! that does not address the tool runs in the suite directory; a command that does always
//! runs from the root. Every `creates` target is removed before the command runs, so it
//! only passes if the command produced it. A case that cannot be launched is a failed case;
//! only an unreadable or malformed file crashes the suite.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::invocation::{InvocationOutput, InvokeOptions};
use crate::suite::{Suite, SuiteContext, SuiteError, SuiteResult};

#[derive(Debug, Clone, Deserialize)]
pub struct CaseFile {
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Case {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub expect_status: i32,
    #[serde(default)]
    pub stdout_contains: Vec<String>,
    #[serde(default)]
    pub stderr_contains: Vec<String>,
    #[serde(default)]
    pub creates: Vec<PathBuf>,
}

impl Case {
    /// Remove leftovers of earlier runs so `creates` proves the command wrote them.
    fn clear_targets(&self, root: &Path) -> Result<(), String> {
        for target in &self.creates {
            let path = root.join(target);
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            match removed {
                Err(e) if e.kind() != io::ErrorKind::NotFound => {
                    return Err(format!("cannot clear {}: {}", target.display(), e));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Check a finished command against the expectations. Returns the first mismatch.
    fn check(&self, output: &InvocationOutput, root: &Path) -> Result<(), String> {
        if output.status != Some(self.expect_status) {
            return Err(match output.status {
                Some(code) => format!("expected exit status {}, got {}", self.expect_status, code),
                None => format!("expected exit status {}, process was killed", self.expect_status),
            });
        }
        if let Some(missing) = self.stdout_contains.iter().find(|s| !output.stdout.contains(s.as_str())) {
            return Err(format!("stdout does not contain {:?}", missing));
        }
        if let Some(missing) = self.stderr_contains.iter().find(|s| !output.stderr.contains(s.as_str())) {
            return Err(format!("stderr does not contain {:?}", missing));
        }
        if let Some(missing) = self.creates.iter().find(|p| !root.join(p).exists()) {
            return Err(format!("expected {} to exist", missing.display()));
        }
        Ok(())
    }
}

/// Suite backed by a case file
#[derive(Debug, Clone)]
pub struct CaseFileSuite {
    path: PathBuf,
    cases: Vec<Case>,
}

impl CaseFileSuite {
    pub fn load(path: &Path) -> Result<Self, SuiteError> {
        let source = fs::read_to_string(path).map_err(|source| SuiteError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &source)
    }

    pub fn parse(path: &Path, source: &str) -> Result<Self, SuiteError> {
        let file: CaseFile = serde_json::from_str(source).map_err(|source| SuiteError::Definition {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            cases: file.cases,
        })
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }
}

impl Suite for CaseFileSuite {
    fn run_tests(&self, ctx: &SuiteContext<'_>) -> Result<SuiteResult, SuiteError> {
        debug!(path = %self.path.display(), cases = self.cases.len(), "running case file");
        let root = &ctx.paths().root_dir;
        let mut result = SuiteResult::default();

        for case in &self.cases {
            let options = InvokeOptions {
                cwd: case.cwd.as_ref().map(|dir| root.join(dir)),
            };
            let outcome = case
                .clear_targets(root)
                .and_then(|()| ctx.invoke(&case.command, options).map_err(|e| e.to_string()))
                .and_then(|output| case.check(&output, root));

            match &outcome {
                Ok(()) if ctx.verbose() => println!("  \x1b[32m✓\x1b[0m {}", case.name),
                Ok(()) => {}
                Err(reason) => println!("  \x1b[31m✗\x1b[0m {}: {}", case.name, reason),
            }
            result.record(outcome.is_ok());
        }

        Ok(result)
    }
}
