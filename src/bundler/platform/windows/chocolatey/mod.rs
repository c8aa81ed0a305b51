//! Chocolatey/NuGet package creation.
//!
//! # Module Organization
//!
//! - `template` - install script template constant
//! - `script` - install script synthesis and preinstall staging
//! - `nuspec` - `.nuspec` package manifest generation
//! - `build` - `nuget pack` execution

mod build;
mod nuspec;
mod script;
mod template;

pub use build::run_nuget_pack;
pub use nuspec::{FileEntry, Metadata, PACKAGE_TAGS, PackageManifest, generate_nuspec};
pub use script::{generate_install_script, render_install_script, stage_preinstall};

/// Generated install script, inside the staging area.
pub const INSTALL_SCRIPT: &str = "chocolateyInstall.ps1";
/// Name Chocolatey runs before install, upgrade and uninstall.
pub const BEFORE_MODIFY_SCRIPT: &str = "chocolateyBeforeModify.ps1";
/// Extension of packaged artifacts.
pub const NUPKG_EXTENSION: &str = "nupkg";
