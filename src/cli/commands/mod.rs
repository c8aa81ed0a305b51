//! Command execution for the CLI.

mod build;
mod create;

pub use build::build_project;
pub use create::{DEFAULT_BUILD_INFO, create_project};
