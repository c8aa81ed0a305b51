//! Error types for package builds.
//!
//! Every failure surfaced by the build pipeline maps onto one of four
//! [`ErrorKind`]s: project structure, manifest configuration, filesystem I/O,
//! or external tool invocation. All of them are fatal to the build.

use super::builder::BuildStep;
use std::{fmt::Display, io, path::PathBuf};
use thiserror::Error as ThisError;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a build failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The project directory is not a well-formed package project.
    Structure,
    /// `build-info.yaml` is malformed or semantically invalid.
    Config,
    /// Filesystem read/write/copy or document encoding failure.
    Io,
    /// The packager or signer failed or could not be found.
    ExternalTool,
}

/// Errors produced while building a package.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid project layout
    #[error("project structure error: {0}")]
    Structure(String),

    /// Invalid build manifest
    #[error("build-info.yaml error: {0}")]
    Config(String),

    /// Filesystem failure with the operation and path that caused it
    #[error("{context} {}: {source}", .path.display())]
    Fs {
        /// What was being attempted
        context: String,
        /// Path being operated on
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Bare I/O failure
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// `.nuspec` encoding failure
    #[error("failed to encode package manifest: {0}")]
    Xml(String),

    /// Install script rendering failure
    #[error("failed to render install script: {0}")]
    Template(String),

    /// External tool reported failure or is unavailable
    #[error("{tool} failed: {reason}")]
    ExternalTool {
        /// Tool name (e.g. `nuget`)
        tool: String,
        /// Exit status or lookup failure
        reason: String,
    },

    /// External tool could not be launched
    #[error("failed to run {command}: {error}")]
    CommandFailed {
        /// Command that failed to start
        command: String,
        /// Spawn error
        error: io::Error,
    },

    /// A pipeline step failed
    #[error("{step} failed: {source}")]
    Step {
        /// Step during which the failure happened
        step: BuildStep,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },

    /// Uncategorized failure from shared helpers
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Classifies this error, looking through step wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Structure(_) => ErrorKind::Structure,
            Error::Config(_) => ErrorKind::Config,
            Error::Fs { .. }
            | Error::IoError(_)
            | Error::Xml(_)
            | Error::Template(_)
            | Error::GenericError(_) => ErrorKind::Io,
            Error::ExternalTool { .. } | Error::CommandFailed { .. } => ErrorKind::ExternalTool,
            Error::Step { source, .. } => source.kind(),
        }
    }

    /// Returns the pipeline step that failed, if known.
    pub fn step(&self) -> Option<BuildStep> {
        match self {
            Error::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(e: walkdir::Error) -> Self {
        let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
        match e.into_io_error() {
            Some(source) => Error::Fs {
                context: "walking".into(),
                path,
                source,
            },
            None => Error::GenericError(format!("filesystem loop at {}", path.display())),
        }
    }
}

impl From<std::path::StripPrefixError> for Error {
    fn from(e: std::path::StripPrefixError) -> Self {
        Error::GenericError(e.to_string())
    }
}

/// Attaches the failing operation and path to I/O results.
pub trait ErrorExt<T> {
    /// Converts an I/O error into [`Error::Fs`].
    fn fs_context(self, context: &str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.into(),
            source,
        })
    }
}

/// Adds a message to `Option`s and foreign errors.
pub trait Context<T> {
    /// Turns `None`/`Err` into [`Error::GenericError`] carrying `msg`.
    fn context<C: Display>(self, msg: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{msg}: {e}")))
    }
}

/// Returns early with a [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
