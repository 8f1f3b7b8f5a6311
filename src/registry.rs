//! Suite registration table
//!
//! An ordered mapping from suite name to entry point. Registration order is run order.

use crate::case_file::CaseFileSuite;
use crate::suite::{Suite, SuiteError};
use crate::workspace::ResolvedPaths;

/// Suites shipped with the harness, in run order.
pub const BUILTIN_SUITES: [&str; 7] = [
    "basic-tests",
    "generator-tests",
    "parser-tests",
    "module-type-tests",
    "parser-type-tests",
    "error-tests",
    "integration-tests",
];

/// Entry point of a suite. Loading may fail; the failure counts against that suite only.
pub type SuiteLoader = Box<dyn Fn(&ResolvedPaths) -> Result<Box<dyn Suite>, SuiteError>>;

pub struct SuiteDescriptor {
    name: String,
    loader: SuiteLoader,
}

impl SuiteDescriptor {
    pub fn new<F>(name: impl Into<String>, loader: F) -> Self
    where
        F: Fn(&ResolvedPaths) -> Result<Box<dyn Suite>, SuiteError> + 'static,
    {
        Self {
            name: name.into(),
            loader: Box::new(loader),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn load(&self, paths: &ResolvedPaths) -> Result<Box<dyn Suite>, SuiteError> {
        (self.loader)(paths)
    }
}

impl std::fmt::Debug for SuiteDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteDescriptor").field("name", &self.name).finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct SuiteRegistry {
    suites: Vec<SuiteDescriptor>,
}

impl SuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table: one case-file suite per [`BUILTIN_SUITES`] entry, read from
    /// `<suite_dir>/<name>.json` when the suite is loaded.
    pub fn builtin() -> Self {
        BUILTIN_SUITES.iter().fold(Self::new(), |registry, name| {
            let file = format!("{}.json", name);
            registry.with(*name, move |paths: &ResolvedPaths| {
                let suite = CaseFileSuite::load(&paths.suite_dir.join(&file))?;
                Ok(Box::new(suite) as Box<dyn Suite>)
            })
        })
    }

    /// Register a suite. Re-registering a name replaces its entry point and keeps its position.
    pub fn register(&mut self, descriptor: SuiteDescriptor) -> &mut Self {
        match self.suites.iter_mut().find(|d| d.name == descriptor.name) {
            Some(existing) => *existing = descriptor,
            None => self.suites.push(descriptor),
        }
        self
    }

    pub fn with<F>(mut self, name: impl Into<String>, loader: F) -> Self
    where
        F: Fn(&ResolvedPaths) -> Result<Box<dyn Suite>, SuiteError> + 'static,
    {
        self.register(SuiteDescriptor::new(name, loader));
        self
    }

    /// Keep only suites whose name contains `keyword`, preserving order.
    pub fn filtered(mut self, keyword: &str) -> Self {
        self.suites.retain(|d| d.name.contains(keyword));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &SuiteDescriptor> {
        self.suites.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.suites.iter().map(SuiteDescriptor::name).collect()
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}
