//! Chocolatey package bundler.
//!
//! Turns a package project directory into a `.nupkg`:
//!
//! - [`settings`] - project layout and `build-info.yaml`
//! - [`platform`] - install script and `.nuspec` generation, `nuget pack`
//! - [`builder`] - the [`Bundler`] step sequence and external tools
//! - [`diagnostics`] - progress reporting sink
//! - [`error`] - [`Error`] and its [`ErrorKind`] classification

pub mod builder;
pub mod diagnostics;
pub mod error;
pub mod platform;
pub mod settings;
pub mod utils;

pub use builder::{
    ArtifactLocation, BuildOptions, BuildStep, BundledArtifact, Bundler, ProcessRunner, Tool,
    ToolExit, ToolInvocation, ToolRunner,
};
pub use diagnostics::{Diagnostics, Event, RecordingDiagnostics};
pub use error::{Context, Error, ErrorExt, ErrorKind, Result};
pub use settings::{BuildManifest, PostInstallAction, ProjectDirectory, Version};
