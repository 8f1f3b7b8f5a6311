//! Sequential suite execution
//!
//! Suites run one at a time, in registration order. A suite that fails to load, returns an
//! error or panics is reported and counted as exactly one failure; the run always moves on
//! to the next suite.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::invocation::Invoker;
use crate::registry::{SuiteDescriptor, SuiteRegistry};
use crate::report::SuiteReporter;
use crate::suite::{SuiteContext, SuiteError, SuiteResult};
use crate::workspace::ResolvedPaths;

/// Totals across every suite of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateResult {
    pub total_tests: usize,
    pub total_passed: usize,
    pub total_failed: usize,
}

impl AggregateResult {
    /// Fold one suite's counts in, field by field.
    pub fn add(&mut self, result: &SuiteResult) {
        self.total_tests += result.total;
        self.total_passed += result.passed;
        self.total_failed += result.failed;
    }

    /// A crashed suite counts as a single failure, however many tests it held.
    pub fn record_crash(&mut self) {
        self.total_failed += 1;
    }

    pub fn all_passed(&self) -> bool {
        self.total_failed == 0
    }
}

pub struct SuiteRunner<'r> {
    registry: &'r SuiteRegistry,
    verbose: bool,
}

impl<'r> SuiteRunner<'r> {
    pub fn new(registry: &'r SuiteRegistry) -> Self {
        Self {
            registry,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run every registered suite and return the totals.
    pub fn run(&self, paths: &ResolvedPaths, invoker: &dyn Invoker, reporter: &mut dyn SuiteReporter) -> AggregateResult {
        let ctx = SuiteContext::new(paths, invoker).with_verbose(self.verbose);
        let mut aggregate = AggregateResult::default();

        reporter.on_run_start(self.registry.len());

        for descriptor in self.registry.iter() {
            reporter.on_suite_start(descriptor.name());

            match run_suite(descriptor, &ctx) {
                Ok(result) => {
                    debug!(suite = descriptor.name(), ?result, "suite finished");
                    aggregate.add(&result);
                    reporter.on_suite_complete(descriptor.name(), &result);
                }
                Err(error) => {
                    warn!(suite = descriptor.name(), %error, "suite crashed");
                    aggregate.record_crash();
                    reporter.on_suite_error(descriptor.name(), &error);
                }
            }
        }

        reporter.on_run_complete(&aggregate);
        aggregate
    }
}

/// Load and run one suite, turning a panic into a [`SuiteError::Panicked`].
fn run_suite(descriptor: &SuiteDescriptor, ctx: &SuiteContext<'_>) -> Result<SuiteResult, SuiteError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let suite = descriptor.load(ctx.paths())?;
        suite.run_tests(ctx)
    }));
    outcome.unwrap_or_else(|payload| Err(SuiteError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
