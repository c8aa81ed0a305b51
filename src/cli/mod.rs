//! Command line interface for the package builder.

mod args;
pub mod commands;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point. Returns the process exit code on success.
pub async fn run(args: Args) -> Result<i32> {
    args.validate()?;
    let output = OutputManager::new(args.verbose);

    if args.create {
        commands::create_project(&args.project_dir).await?;
        output.success(&format!(
            "Created new project directory at {}",
            args.project_dir.display()
        ))?;
        return Ok(0);
    }

    let artifact = commands::build_project(&args, &output).await?;
    println!("{}", artifact.path.display());

    Ok(0)
}
