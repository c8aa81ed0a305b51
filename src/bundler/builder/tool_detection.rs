//! External tool lookup.
//!
//! Tools are searched on `PATH`, or only in the configured toolchain
//! directory when one is given.

use super::tools::Tool;
use crate::bundler::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Resolves the executable for `tool`.
pub fn find_tool(tool: Tool, toolchain_dir: Option<&Path>) -> Result<PathBuf> {
    let program = tool.program();

    let found = match toolchain_dir {
        Some(dir) => {
            let cwd = std::env::current_dir().map_err(Error::IoError)?;
            which::which_in(program, Some(dir), cwd)
        }
        None => which::which(program),
    };

    match found {
        Ok(path) => {
            log::debug!("Found {program} at: {}", path.display());
            Ok(path)
        }
        Err(e) => {
            let location = match toolchain_dir {
                Some(dir) => format!("in {}", dir.display()),
                None => "in PATH".to_string(),
            };
            Err(Error::ExternalTool {
                tool: program.to_string(),
                reason: format!("not found {location}: {e}"),
            })
        }
    }
}
