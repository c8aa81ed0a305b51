//! Chocolatey/NuGet package builder library.
//!
//! Builds signed `.nupkg` installers from declarative project directories
//! (`build-info.yaml`, `payload/`, `scripts/`). It can be used both as a CLI
//! tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
