//! Package build command.

use crate::{
    bundler::{BundledArtifact, Bundler, ProcessRunner, ProjectDirectory},
    cli::{Args, OutputManager},
    error::Result,
};

/// Builds the project named by `args`, reporting through `output`.
pub async fn build_project(args: &Args, output: &OutputManager) -> Result<BundledArtifact> {
    let project = ProjectDirectory::new(&args.project_dir);
    let runner = ProcessRunner::new(args.toolchain_path.clone());
    let bundler = Bundler::new(project, args.build_options(), runner);

    output.section(&format!("Building {}", args.project_dir.display()))?;
    let artifact = bundler.bundle(output).await?;

    output.success(&format!("Package created: {}", artifact.path.display()))?;
    output.indent(&format!("Size: {} bytes", artifact.size))?;
    output.indent(&format!("SHA256: {}", artifact.checksum))?;
    if artifact.signed {
        output.indent("Signed: yes")?;
    }

    Ok(artifact)
}
