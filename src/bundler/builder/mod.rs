//! Build orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that turns a package
//! project directory into a `.nupkg` by running a fixed, linear sequence of
//! [`BuildStep`]s.
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_nupkg::bundler::{
//!     BuildOptions, Bundler, ProcessRunner, ProjectDirectory, RecordingDiagnostics,
//! };
//!
//! # async fn example() -> kodegen_bundler_nupkg::bundler::Result<()> {
//! let bundler = Bundler::new(
//!     ProjectDirectory::new("my-package"),
//!     BuildOptions::default(),
//!     ProcessRunner::default(),
//! );
//! let artifact = bundler.bundle(&RecordingDiagnostics::new()).await?;
//! println!("Created: {} ({} bytes)", artifact.path.display(), artifact.size);
//! println!("SHA256: {}", artifact.checksum);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - Main [`Bundler`] struct and the step sequence
//! - [`signing`] - `signtool` invocation with the fixed signing policy
//! - [`tool_detection`] - External tool lookup
//! - [`tools`] - [`ToolRunner`] process boundary

mod checksum;
mod orchestrator;
mod signing;
mod tool_detection;
mod tools;

pub use checksum::calculate_sha256;
pub use orchestrator::{ArtifactLocation, BuildOptions, BundledArtifact, Bundler};
pub use signing::{DIGEST_ALGORITHM, TIMESTAMP_URL, sign_package};
pub use tool_detection::find_tool;
pub use tools::{ProcessRunner, Tool, ToolExit, ToolInvocation, ToolRunner, run_tool};

#[cfg(test)]
pub(crate) use tools::testing;

use std::fmt;

/// Steps of a build, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Validate,
    Scaffold,
    SynthesizePreinstall,
    SynthesizeInstallScript,
    GenerateManifest,
    InvokePackager,
    LocatePackagedArtifact,
    RenameArtifact,
    ConditionallySign,
    Cleanup,
    Done,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStep::Validate => "validate",
            BuildStep::Scaffold => "scaffold",
            BuildStep::SynthesizePreinstall => "synthesize preinstall",
            BuildStep::SynthesizeInstallScript => "synthesize install script",
            BuildStep::GenerateManifest => "generate manifest",
            BuildStep::InvokePackager => "invoke packager",
            BuildStep::LocatePackagedArtifact => "locate packaged artifact",
            BuildStep::RenameArtifact => "rename artifact",
            BuildStep::ConditionallySign => "sign",
            BuildStep::Cleanup => "cleanup",
            BuildStep::Done => "done",
        };
        f.write_str(name)
    }
}
