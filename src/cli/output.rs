//! Colored terminal output for build progress.
//!
//! All user-facing lines go to stderr so stdout stays free for the artifact
//! path.

use crate::bundler::{BuildStep, Diagnostics};
use cyrup_termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::io::{self, IsTerminal, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Section,
    Progress,
    Info,
    Verbose,
    Success,
    Warn,
}

impl Level {
    /// Prefix and its color. Plain levels have neither.
    fn marker(self) -> Option<(&'static str, ColorSpec)> {
        let mut spec = ColorSpec::new();
        let prefix = match self {
            Level::Section => {
                spec.set_fg(Some(Color::Cyan)).set_bold(true);
                "=="
            }
            Level::Progress => {
                spec.set_fg(Some(Color::Blue));
                "→"
            }
            Level::Success => {
                spec.set_fg(Some(Color::Green)).set_bold(true);
                "✓"
            }
            Level::Warn => {
                spec.set_fg(Some(Color::Yellow)).set_bold(true);
                "⚠"
            }
            Level::Info | Level::Verbose => return None,
        };
        Some((prefix, spec))
    }
}

/// Output manager for colored terminal output on stderr.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    color: ColorChoice,
}

impl OutputManager {
    /// Colors are used only when stderr is a terminal.
    pub fn new(verbose: bool) -> Self {
        let color = if io::stderr().is_terminal() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self { verbose, color }
    }

    /// Print section header
    pub fn section(&self, title: &str) -> io::Result<()> {
        self.emit(Level::Section, title)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> io::Result<()> {
        self.emit(Level::Progress, message)
    }

    pub fn info(&self, message: &str) -> io::Result<()> {
        self.emit(Level::Info, message)
    }

    /// Printed only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        self.emit(Level::Verbose, message)
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        self.emit(Level::Success, message)
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.emit(Level::Warn, message)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.emit(Level::Info, &format!("   {message}"))
    }

    fn emit(&self, level: Level, message: &str) -> io::Result<()> {
        let mut stream = StandardStream::stderr(self.color);
        self.write_line(&mut stream, level, message)
    }

    fn write_line<W: WriteColor>(
        &self,
        out: &mut W,
        level: Level,
        message: &str,
    ) -> io::Result<()> {
        if level == Level::Verbose && !self.verbose {
            return Ok(());
        }
        if level == Level::Section {
            writeln!(out)?;
        }

        match level.marker() {
            Some((prefix, spec)) => {
                out.set_color(&spec)?;
                write!(out, "{prefix}")?;
                out.reset()?;
                if level == Level::Section {
                    writeln!(out, " {message} {prefix}")
                } else {
                    writeln!(out, " {message}")
                }
            }
            None => writeln!(out, "{message}"),
        }
    }

    /// Diagnostics have no error channel, so a lost line only reaches the log.
    fn report(result: io::Result<()>) {
        if let Err(e) = result {
            log::debug!("failed to write to terminal: {e}");
        }
    }
}

impl Diagnostics for OutputManager {
    fn step(&self, step: BuildStep) {
        match step {
            BuildStep::Validate => Self::report(self.progress("Validating project...")),
            BuildStep::Done => {}
            other => Self::report(self.verbose(&format!("→ {other}"))),
        }
    }

    fn info(&self, message: &str) {
        Self::report(OutputManager::info(self, message));
    }

    fn warn(&self, message: &str) {
        Self::report(OutputManager::warn(self, message));
    }
}
