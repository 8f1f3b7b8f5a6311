//! Orchestration tests: workspace preparation, suite sequencing and the final report.

use std::fs;
use std::path::Path;

use suiterun::{
    AggregateResult, ConsoleReporter, Harness, HarnessConfig, NoopSeeder, ResolvedPaths, StartupError, Suite,
    SuiteContext, SuiteError, SuiteRegistry, SuiteResult,
};

struct Fixed(SuiteResult);

impl Suite for Fixed {
    fn run_tests(&self, _ctx: &SuiteContext<'_>) -> Result<SuiteResult, SuiteError> {
        Ok(self.0)
    }
}

struct Throws;

impl Suite for Throws {
    fn run_tests(&self, _ctx: &SuiteContext<'_>) -> Result<SuiteResult, SuiteError> {
        Err(SuiteError::Failed("unexpected token in grammar".to_string()))
    }
}

/// Writes an artifact into the output directory, like a generator suite would.
struct WritesArtifact;

impl Suite for WritesArtifact {
    fn run_tests(&self, ctx: &SuiteContext<'_>) -> Result<SuiteResult, SuiteError> {
        let path = ctx.paths().output_dir.join("artifact.js");
        fs::write(&path, "module.exports = {};").map_err(|e| SuiteError::Failed(e.to_string()))?;
        Ok(SuiteResult::new(1, 1, 0))
    }
}

fn passing(name: &str) -> (String, SuiteResult) {
    (name.to_string(), SuiteResult::new(5, 5, 0))
}

fn registry_of(results: Vec<(String, SuiteResult)>, crashing: Option<&str>) -> SuiteRegistry {
    let crashing = crashing.map(str::to_string);
    results.into_iter().fold(SuiteRegistry::new(), |registry, (name, result)| {
        if crashing.as_deref() == Some(name.as_str()) {
            registry.with(name, |_: &ResolvedPaths| Ok(Box::new(Throws) as Box<dyn Suite>))
        } else {
            registry.with(name, move |_: &ResolvedPaths| Ok(Box::new(Fixed(result)) as Box<dyn Suite>))
        }
    })
}

fn seven_suites() -> Vec<(String, SuiteResult)> {
    suiterun::registry::BUILTIN_SUITES.iter().map(|name| passing(name)).collect()
}

fn workspace() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("tests")).unwrap();
    root
}

fn run(root: &Path, registry: SuiteRegistry) -> (Result<AggregateResult, StartupError>, String, String) {
    let harness = Harness::new(root, HarnessConfig::default(), registry).with_seeder(NoopSeeder);
    let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new());
    let result = harness.run(&mut reporter);
    let (out, err) = reporter.into_parts();
    (result, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

#[test]
fn test_all_suites_pass() {
    let root = workspace();
    let (result, out, err) = run(root.path(), registry_of(seven_suites(), None));

    let aggregate = result.unwrap();
    assert_eq!(
        aggregate,
        AggregateResult {
            total_tests: 35,
            total_passed: 35,
            total_failed: 0,
        }
    );
    assert!(aggregate.all_passed());
    assert!(out.contains("Final results: 35/35 tests passed"));
    assert!(out.contains("All tests passed successfully!"));
    assert!(err.is_empty());
}

#[test]
fn test_crashing_suite_counts_once() {
    let root = workspace();
    let (result, out, err) = run(root.path(), registry_of(seven_suites(), Some("parser-tests")));

    let aggregate = result.unwrap();
    assert_eq!(
        aggregate,
        AggregateResult {
            total_tests: 30,
            total_passed: 30,
            total_failed: 1,
        }
    );
    assert!(!aggregate.all_passed());
    assert!(out.contains("Final results: 30/30 tests passed"));
    assert!(err.contains("Error running parser-tests: unexpected token in grammar"));
    assert!(err.ends_with("Failed tests: 1\n"));

    // Every suite after the crash still ran.
    for name in ["module-type-tests", "parser-type-tests", "error-tests", "integration-tests"] {
        assert!(out.contains(&format!("Running test suite: {name}\nSuite results: 5/5 tests passed")));
    }
}

#[test]
fn test_every_crash_adds_one_failure() {
    let root = workspace();
    let registry = SuiteRegistry::new()
        .with("a", |_: &ResolvedPaths| Ok(Box::new(Throws) as Box<dyn Suite>))
        .with("b", |_: &ResolvedPaths| Err(SuiteError::Failed("missing entry point".into())))
        .with("c", |_: &ResolvedPaths| Ok(Box::new(Fixed(SuiteResult::new(4, 2, 2))) as Box<dyn Suite>));

    let (result, _, err) = run(root.path(), registry);
    let aggregate = result.unwrap();
    assert_eq!(aggregate.total_tests, 4);
    assert_eq!(aggregate.total_passed, 2);
    assert_eq!(aggregate.total_failed, 4);
    assert!(err.contains("Failed tests: 4"));
}

#[test]
fn test_console_report_layout() {
    let root = workspace();
    let registry = registry_of(vec![passing("basic-tests"), ("generator-tests".to_string(), SuiteResult::new(3, 2, 1))], None);

    let (_, out, err) = run(root.path(), registry);
    insta::assert_snapshot!(out, @r"
Running test suites...


Running test suite: basic-tests
Suite results: 5/5 tests passed


Running test suite: generator-tests
Suite results: 2/3 tests passed

==============================================
Final results: 7/8 tests passed
==============================================
");
    assert_eq!(err, "Failed tests: 1\n");
}

#[test]
fn test_repeat_runs_keep_workspace() {
    let root = workspace();
    let build = || SuiteRegistry::new().with("writer", |_: &ResolvedPaths| Ok(Box::new(WritesArtifact) as Box<dyn Suite>));

    let (first, _, _) = run(root.path(), build());
    fs::write(root.path().join("test-grammars/calc.jison"), "%%").unwrap();
    let (second, _, _) = run(root.path(), build());

    assert_eq!(first.unwrap(), second.unwrap());
    assert!(root.path().join("test-grammars/calc.jison").is_file());
    assert_eq!(fs::read_dir(root.path().join("test-output")).unwrap().count(), 1);
}

#[test]
fn test_missing_suite_dir_aborts_before_suites() {
    let root = tempfile::tempdir().unwrap();
    let (result, out, _) = run(root.path(), registry_of(seven_suites(), None));

    assert!(matches!(result, Err(StartupError::Workspace(_))));
    assert!(out.is_empty(), "no partial report on startup failure");
}

#[test]
fn test_seed_failure_aborts_before_suites() {
    use suiterun::{FixtureSeeder, Invoker, SeedError};

    struct FailingSeeder;

    impl FixtureSeeder for FailingSeeder {
        fn seed(&self, paths: &ResolvedPaths, _invoker: &dyn Invoker) -> Result<(), SeedError> {
            Err(SeedError::Io {
                path: paths.fixture_dir.join("calc.jison"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    let root = workspace();
    let harness = Harness::new(root.path(), HarnessConfig::default(), registry_of(seven_suites(), None))
        .with_seeder(FailingSeeder);
    let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new());

    let result = harness.run(&mut reporter);
    assert!(matches!(result, Err(StartupError::Seed(_))));
    let (out, _) = reporter.into_parts();
    assert!(out.is_empty());
}
