//! External tool invocation.
//!
//! The pipeline never spawns processes directly. It goes through a
//! [`ToolRunner`], so tests can substitute a recording runner for the real
//! packager and signer.

use super::tool_detection::find_tool;
use crate::bundler::error::{Error, Result};
use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    process::Stdio,
};

/// External tools the pipeline depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// `nuget`, compiles the `.nuspec` into a `.nupkg`.
    Packager,
    /// `signtool`, signs the finished artifact.
    Signer,
}

impl Tool {
    /// Executable name looked up on disk.
    pub fn program(self) -> &'static str {
        match self {
            Tool::Packager => "nuget",
            Tool::Signer => "signtool",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// A resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool: Tool,
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl ToolInvocation {
    pub fn new(tool: Tool, program: PathBuf) -> Self {
        Self {
            tool,
            program,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// How a tool run ended. The exit code is the only signal the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ToolExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Locates and runs external tools.
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    /// Resolves the executable for `tool`. A missing tool is an external tool error.
    fn locate(&self, tool: Tool) -> Result<PathBuf>;

    /// Runs `invocation` to completion.
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolExit>;
}

/// Runs tools as child processes with inherited stdio.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    toolchain_dir: Option<PathBuf>,
}

impl ProcessRunner {
    /// `toolchain_dir` replaces `PATH` for tool lookup when set.
    pub fn new(toolchain_dir: Option<PathBuf>) -> Self {
        Self { toolchain_dir }
    }

    pub fn toolchain_dir(&self) -> Option<&Path> {
        self.toolchain_dir.as_deref()
    }
}

impl ToolRunner for ProcessRunner {
    fn locate(&self, tool: Tool) -> Result<PathBuf> {
        find_tool(tool, self.toolchain_dir.as_deref())
    }

    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolExit> {
        log::debug!("Running: {invocation}");

        let status = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| Error::CommandFailed {
                command: invocation.tool.program().to_string(),
                error: e,
            })?;

        Ok(ToolExit {
            code: status.code(),
        })
    }
}

/// Locates `tool`, runs it with `args` and fails unless it exits with 0.
pub async fn run_tool<R, I, S>(runner: &R, tool: Tool, args: I) -> Result<()>
where
    R: ToolRunner + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let program = runner.locate(tool)?;
    let invocation = ToolInvocation::new(tool, program).args(args);
    let exit = runner.run(&invocation).await?;

    if !exit.success() {
        let reason = match exit.code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        };
        return Err(Error::ExternalTool {
            tool: tool.program().to_string(),
            reason,
        });
    }

    Ok(())
}
