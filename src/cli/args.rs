//! Command line argument parsing and validation.

use crate::{bundler::BuildOptions, error::CliError};
use clap::Parser;
use std::path::PathBuf;

/// Chocolatey package builder
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_nupkg",
    version,
    about = "Builds Chocolatey .nupkg packages from package project directories",
    long_about = "Builds a Chocolatey .nupkg from a package project directory.

A project contains build-info.yaml plus a payload/ and/or scripts/ directory.
The generated install script and .nuspec are removed after every build.

Usage:
  kodegen_bundler_nupkg ./my-package
  kodegen_bundler_nupkg ./my-package --output ./dist --no-sign
  kodegen_bundler_nupkg ./my-package --toolchain-path C:\\tools\\nuget
  kodegen_bundler_nupkg ./new-package --create

Exit code 0 = artifact exists at <output>/<name>-<version>.nupkg."
)]
pub struct Args {
    /// Package project directory
    #[arg(value_name = "PROJECT_DIR")]
    pub project_dir: PathBuf,

    /// Enable debug logging and detailed packager output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output directory for the package (default: <PROJECT_DIR>/build)
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Directory containing nuget and signtool, searched instead of PATH
    #[arg(long, value_name = "DIR", env = "KODEGEN_NUPKG_TOOLCHAIN")]
    pub toolchain_path: Option<PathBuf>,

    /// Skip signing even when signing_certificate is set
    #[arg(long)]
    pub no_sign: bool,

    /// Create a new project at PROJECT_DIR with a default build-info.yaml
    #[arg(long, conflicts_with_all = ["output", "no_sign"])]
    pub create: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        if let Some(dir) = self.toolchain_path.as_deref().filter(|d| !d.is_dir()) {
            return Err(CliError::InvalidArguments {
                reason: format!("toolchain path {} is not a directory", dir.display()),
            });
        }

        if let Some(output) = self.output.as_deref().filter(|o| o.is_file()) {
            return Err(CliError::InvalidArguments {
                reason: format!("output {} is a file, expected a directory", output.display()),
            });
        }

        Ok(())
    }

    /// Build switches for [`crate::bundler::Bundler`].
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            output_dir: self.output.clone(),
            skip_signing: self.no_sign,
            verbose: self.verbose,
        }
    }
}
