//! Tool invocation and redirection
//!
//! Suites launch the tool under test as shell commands that name it by a path relative to
//! the suite directory (`../lib/cli <args>`). The [`ToolInvoker`] handed to each suite
//! rewrites those commands to the absolute tool path and runs them from the workspace root,
//! so suites never have to know where the workspace lives.
//!
//! The invoker is passed explicitly through [`SuiteContext`](crate::SuiteContext); nothing here
//! touches process-wide state such as the current directory.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::config::HarnessConfig;
use crate::workspace::ResolvedPaths;

/// Errors raised while launching a command
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Options a caller may attach to a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    /// Working directory requested by the caller
    pub cwd: Option<PathBuf>,
}

impl InvokeOptions {
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: Some(cwd.into()) }
    }
}

/// A command after redirection, ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub cwd: Option<PathBuf>,
    /// Whether the command matched the tool prefix and was rewritten
    pub redirected: bool,
}

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl InvocationOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Launches commands on behalf of a suite.
///
/// Invocations are synchronous: `invoke` returns once the process has exited.
pub trait Invoker {
    fn invoke(&self, command: &str, options: InvokeOptions) -> Result<InvocationOutput, InvocationError>;
}

/// Prefix rewrite for commands that address the tool by its relative path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
    prefix: String,
    replacement: String,
    root_dir: PathBuf,
}

impl RedirectRule {
    /// Rewrite `prefix` to the shell-quoted `tool_path` (behind `launcher`, if any) and pin
    /// the working directory to `root_dir`.
    pub fn new(prefix: impl Into<String>, tool_path: &Path, launcher: Option<&str>, root_dir: impl Into<PathBuf>) -> Self {
        let quoted = shell_quote(&tool_path.to_string_lossy());
        let replacement = match launcher {
            Some(launcher) => format!("{} {}", launcher, quoted),
            None => quoted,
        };
        Self {
            prefix: prefix.into(),
            replacement,
            root_dir: root_dir.into(),
        }
    }

    pub fn for_workspace(paths: &ResolvedPaths, config: &HarnessConfig) -> Self {
        Self::new(
            config.relative_prefix(),
            &paths.tool_path,
            config.launcher.as_deref(),
            &paths.root_dir,
        )
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Apply the rule to one command.
    ///
    /// The prefix must be a whole word: `../lib/cli --x` matches, `../lib/client` does not.
    /// A matching command always runs from the root, whatever directory the caller asked
    /// for. Anything else keeps the caller's command and options untouched.
    pub fn apply(&self, command: &str, options: InvokeOptions) -> Invocation {
        let matched = command
            .trim_start()
            .strip_prefix(self.prefix.as_str())
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace));
        match matched {
            Some(rest) => Invocation {
                command: format!("{}{}", self.replacement, rest),
                cwd: Some(self.root_dir.clone()),
                redirected: true,
            },
            None => Invocation {
                command: command.to_string(),
                cwd: options.cwd,
                redirected: false,
            },
        }
    }
}

/// The invoker suites receive: redirects tool commands and runs everything through the shell
#[derive(Debug, Clone)]
pub struct ToolInvoker {
    rule: RedirectRule,
    default_cwd: Option<PathBuf>,
}

impl ToolInvoker {
    pub fn new(rule: RedirectRule) -> Self {
        Self { rule, default_cwd: None }
    }

    /// Invoker for a prepared workspace. Commands that are not redirected and carry no
    /// working directory run from the suite directory.
    pub fn for_workspace(paths: &ResolvedPaths, config: &HarnessConfig) -> Self {
        Self::new(RedirectRule::for_workspace(paths, config)).with_default_cwd(&paths.suite_dir)
    }

    pub fn with_default_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.default_cwd = Some(cwd.into());
        self
    }

    /// Redirect a command without running it.
    pub fn rewrite(&self, command: &str, options: InvokeOptions) -> Invocation {
        let mut invocation = self.rule.apply(command, options);
        if invocation.cwd.is_none() {
            invocation.cwd = self.default_cwd.clone();
        }
        invocation
    }
}

impl Invoker for ToolInvoker {
    fn invoke(&self, command: &str, options: InvokeOptions) -> Result<InvocationOutput, InvocationError> {
        let invocation = self.rewrite(command, options);
        debug!(
            command = %invocation.command,
            cwd = ?invocation.cwd,
            redirected = invocation.redirected,
            "invoking"
        );
        execute(&invocation)
    }
}

/// Run an invocation through the platform shell and wait for it.
pub fn execute(invocation: &Invocation) -> Result<InvocationOutput, InvocationError> {
    let mut cmd = shell_command(&invocation.command);
    if let Some(cwd) = &invocation.cwd {
        cmd.current_dir(cwd);
    }

    let output = cmd.output().map_err(|source| InvocationError::Spawn {
        command: invocation.command.clone(),
        source,
    })?;

    Ok(InvocationOutput {
        status: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Quote `text` as a single shell word.
#[cfg(not(windows))]
fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

#[cfg(windows)]
fn shell_quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> RedirectRule {
        RedirectRule::new("../lib/cli", Path::new("/work/lib/cli"), None, "/work")
    }

    #[test]
    fn test_prefixed_command_is_redirected() {
        let invocation = rule().apply("../lib/cli grammar.jison -o out.js", InvokeOptions::default());
        assert!(invocation.redirected);
        assert_eq!(invocation.command, "'/work/lib/cli' grammar.jison -o out.js");
        assert_eq!(invocation.cwd, Some(PathBuf::from("/work")));
    }

    #[test]
    fn test_redirect_overrides_caller_cwd() {
        let invocation = rule().apply("../lib/cli --help", InvokeOptions::in_dir("/elsewhere"));
        assert_eq!(invocation.cwd, Some(PathBuf::from("/work")));
    }

    #[test]
    fn test_leading_whitespace_still_matches() {
        let invocation = rule().apply("   ../lib/cli --version", InvokeOptions::default());
        assert!(invocation.redirected);
        assert_eq!(invocation.command, "'/work/lib/cli' --version");
    }

    #[test]
    fn test_prefix_needs_word_boundary() {
        for command in ["../lib/client --x", "../lib/cli.js grammar.jison", "../lib/cli-old"] {
            let invocation = rule().apply(command, InvokeOptions::in_dir("/elsewhere"));
            assert!(!invocation.redirected, "{command} should not be redirected");
            assert_eq!(invocation.command, command);
            assert_eq!(invocation.cwd, Some(PathBuf::from("/elsewhere")));
        }
    }

    #[test]
    fn test_bare_prefix_is_redirected() {
        let invocation = rule().apply("../lib/cli", InvokeOptions::default());
        assert!(invocation.redirected);
        assert_eq!(invocation.command, "'/work/lib/cli'");
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_path_is_quoted_for_the_shell() {
        let rule = RedirectRule::new("../lib/cli", Path::new("/w/$HOME/`id`/it's \\\"x\""), None, "/w");
        let invocation = rule.apply("../lib/cli -v", InvokeOptions::default());
        assert_eq!(invocation.command, "'/w/$HOME/`id`/it'\\''s \\\"x\"' -v");
    }

    #[cfg(unix)]
    #[test]
    fn test_quoted_tool_runs_from_awkward_root() {
        let base = tempfile::tempdir().unwrap();
        let root = base.path().join("it's $HOME `x`");
        std::fs::create_dir_all(root.join("lib")).unwrap();
        std::fs::write(root.join("lib/cli"), "echo \"tool $1\"\n").unwrap();

        let rule = RedirectRule::new("sh ../lib/cli", &root.join("lib/cli"), Some("sh"), &root);
        let output = execute(&rule.apply("sh ../lib/cli ok", InvokeOptions::default())).unwrap();
        assert!(output.success(), "stderr: {}", output.stderr);
        assert_eq!(output.stdout.trim(), "tool ok");
    }

    #[test]
    fn test_other_commands_pass_through() {
        let options = InvokeOptions::in_dir("/elsewhere");
        let invocation = rule().apply("ls -la ../lib/cli", options);
        assert!(!invocation.redirected);
        assert_eq!(invocation.command, "ls -la ../lib/cli");
        assert_eq!(invocation.cwd, Some(PathBuf::from("/elsewhere")));
    }

    #[test]
    fn test_pass_through_without_cwd() {
        let invocation = rule().apply("echo hi", InvokeOptions::default());
        assert_eq!(invocation.cwd, None);
    }

    #[test]
    fn test_launcher_is_kept() {
        let rule = RedirectRule::new("node ../lib/cli.js", Path::new("/work/lib/cli.js"), Some("node"), "/work");
        let invocation = rule.apply("node ../lib/cli.js a.jison", InvokeOptions::default());
        assert_eq!(invocation.command, "node '/work/lib/cli.js' a.jison");
    }

    #[test]
    fn test_invoker_defaults_cwd_for_pass_through() {
        let invoker = ToolInvoker::new(rule()).with_default_cwd("/work/tests");
        assert_eq!(
            invoker.rewrite("echo hi", InvokeOptions::default()).cwd,
            Some(PathBuf::from("/work/tests"))
        );
        assert_eq!(
            invoker.rewrite("echo hi", InvokeOptions::in_dir("/tmp")).cwd,
            Some(PathBuf::from("/tmp"))
        );
        assert_eq!(
            invoker.rewrite("../lib/cli x", InvokeOptions::in_dir("/tmp")).cwd,
            Some(PathBuf::from("/work"))
        );
    }

    #[test]
    fn test_workspace_rule_uses_config_prefix() {
        let config = HarnessConfig::default();
        let paths = ResolvedPaths::resolve(Path::new("/work"), &config);
        let rule = RedirectRule::for_workspace(&paths, &config);
        assert_eq!(rule.prefix(), "../lib/cli");
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let invocation = Invocation {
            command: "echo out; echo err 1>&2; exit 3".to_string(),
            cwd: Some(dir.path().to_path_buf()),
            redirected: false,
        };
        let output = execute(&invocation).unwrap();
        assert_eq!(output.status, Some(3));
        assert!(!output.success());
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }
}
