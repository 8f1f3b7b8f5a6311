//! The suite contract
//!
//! A suite is an opaque unit that runs its own checks against the tool under test and
//! reports counts. The orchestrator never looks inside: it hands the suite a
//! [`SuiteContext`] and adds up the returned [`SuiteResult`].

use std::io;
use std::ops::AddAssign;
use std::path::PathBuf;

use thiserror::Error;

use crate::invocation::{InvocationError, InvocationOutput, InvokeOptions, Invoker};
use crate::workspace::ResolvedPaths;

/// Errors that crash a suite as a whole
#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("failed to load suite from {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid suite definition {}: {source}", path.display())]
    Definition {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error("{0}")]
    Failed(String),

    #[error("suite panicked: {0}")]
    Panicked(String),
}

/// Counts reported by a single suite.
///
/// `passed + failed == total` for a well-behaved suite, but the orchestrator sums each
/// field on its own and never relies on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl SuiteResult {
    pub fn new(total: usize, passed: usize, failed: usize) -> Self {
        Self { total, passed, failed }
    }

    /// Record one check.
    pub fn record(&mut self, passed: bool) {
        self.total += 1;
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }
}

impl AddAssign for SuiteResult {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.passed += rhs.passed;
        self.failed += rhs.failed;
    }
}

/// Everything a suite receives from the orchestrator
pub struct SuiteContext<'a> {
    paths: &'a ResolvedPaths,
    invoker: &'a dyn Invoker,
    verbose: bool,
}

impl<'a> SuiteContext<'a> {
    pub fn new(paths: &'a ResolvedPaths, invoker: &'a dyn Invoker) -> Self {
        Self {
            paths,
            invoker,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn paths(&self) -> &ResolvedPaths {
        self.paths
    }

    pub fn invoker(&self) -> &dyn Invoker {
        self.invoker
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Shorthand for launching a command through the injected invoker.
    pub fn invoke(&self, command: &str, options: InvokeOptions) -> Result<InvocationOutput, InvocationError> {
        self.invoker.invoke(command, options)
    }
}

/// A loadable test suite
pub trait Suite {
    fn run_tests(&self, ctx: &SuiteContext<'_>) -> Result<SuiteResult, SuiteError>;
}
