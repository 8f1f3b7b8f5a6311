#![forbid(unsafe_code)]
//! Suiterun: a sequential test-suite orchestrator
//!
//! Suiterun prepares a shared workspace, seeds fixtures, runs a fixed, ordered list of
//! suites against a command-line tool under test and folds their counts into a single
//! pass/fail verdict.
//!
//! ## Flow
//!
//! 1. [`workspace::prepare`] resolves the [`ResolvedPaths`] and creates the output and
//!    fixture directories.
//! 2. A [`ToolInvoker`] is built for the workspace. Suites receive it through their
//!    [`SuiteContext`] and launch the tool with it; commands naming the tool by its
//!    relative path are redirected to the absolute path and run from the root.
//! 3. The [`FixtureSeeder`] runs once.
//! 4. [`SuiteRunner`] walks the [`SuiteRegistry`] in order, recovering from crashing suites.
//! 5. The [`SuiteReporter`] prints the tally; the CLI turns it into the exit status.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` with `?` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//! - **Suites**: a panic escaping a suite is caught by the runner and counted like any other
//!   suite crash.

pub mod case_file;
pub mod cli;
pub mod config;
pub mod fixtures;
pub mod harness;
pub mod invocation;
pub mod registry;
pub mod report;
pub mod runner;
pub mod suite;
pub mod version;
pub mod workspace;

pub use config::HarnessConfig;
pub use fixtures::{CommandSeeder, DirectorySeeder, FixtureSeeder, NoopSeeder, SeedError};
pub use harness::{Harness, StartupError};
pub use invocation::{InvocationError, InvocationOutput, InvokeOptions, Invoker, RedirectRule, ToolInvoker};
pub use registry::{SuiteDescriptor, SuiteRegistry};
pub use report::{ConsoleReporter, SuiteReporter};
pub use runner::{AggregateResult, SuiteRunner};
pub use suite::{Suite, SuiteContext, SuiteError, SuiteResult};
pub use workspace::{ResolvedPaths, WorkspaceError};
