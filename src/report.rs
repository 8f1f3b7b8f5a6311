//! Run reporting
//!
//! The runner drives a [`SuiteReporter`]; [`ConsoleReporter`] renders the human-readable
//! report, with progress and the final tally on stdout and suite crashes and the failure
//! count on stderr.

use std::io::{self, Stderr, Stdout, Write};

use crate::runner::AggregateResult;
use crate::suite::{SuiteError, SuiteResult};

/// Border around the final tally
pub const BORDER: &str = "==============================================";

/// Receives run progress from the [`SuiteRunner`](crate::SuiteRunner).
pub trait SuiteReporter {
    /// Called once before the first suite
    fn on_run_start(&mut self, _suite_count: usize) {}

    /// Called before a suite is loaded
    fn on_suite_start(&mut self, name: &str);

    /// Called when a suite returned its counts
    fn on_suite_complete(&mut self, name: &str, result: &SuiteResult);

    /// Called when a suite failed to load, errored or panicked
    fn on_suite_error(&mut self, name: &str, error: &SuiteError);

    /// Called after the last suite
    fn on_run_complete(&mut self, aggregate: &AggregateResult);
}

/// Plain-text reporter over a pair of writers
pub struct ConsoleReporter<O: Write = Stdout, E: Write = Stderr> {
    out: O,
    err: E,
}

impl ConsoleReporter {
    /// Reporter writing to the process's stdout and stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

// Write errors on the report streams are not actionable mid-run; they are dropped.
impl<O: Write, E: Write> SuiteReporter for ConsoleReporter<O, E> {
    fn on_run_start(&mut self, _suite_count: usize) {
        let _ = writeln!(self.out, "Running test suites...\n");
    }

    fn on_suite_start(&mut self, name: &str) {
        let _ = writeln!(self.out, "\nRunning test suite: {}", name);
        let _ = self.out.flush();
    }

    fn on_suite_complete(&mut self, _name: &str, result: &SuiteResult) {
        let _ = writeln!(self.out, "Suite results: {}/{} tests passed\n", result.passed, result.total);
    }

    fn on_suite_error(&mut self, name: &str, error: &SuiteError) {
        let _ = writeln!(self.err, "Error running {}: {}", name, error);
    }

    fn on_run_complete(&mut self, aggregate: &AggregateResult) {
        let _ = writeln!(self.out, "{}", BORDER);
        let _ = writeln!(
            self.out,
            "Final results: {}/{} tests passed",
            aggregate.total_passed, aggregate.total_tests
        );
        let _ = writeln!(self.out, "{}", BORDER);

        if aggregate.all_passed() {
            let _ = writeln!(self.out, "All tests passed successfully!");
        } else {
            let _ = writeln!(self.err, "Failed tests: {}", aggregate.total_failed);
        }
        let _ = self.out.flush();
        let _ = self.err.flush();
    }
}
