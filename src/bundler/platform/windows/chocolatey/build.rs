//! Package build execution.
//!
//! Compiles the `.nuspec` into a `.nupkg` using `nuget pack`.

use crate::bundler::{
    builder::{Tool, ToolRunner, run_tool},
    error::{ErrorExt, Result},
};
use std::{ffi::OsString, path::Path};

/// Run `nuget pack` on `nuspec_path`, writing into `output_dir`.
///
/// Package analysis is disabled. The packager inherits stdio, so its own
/// output reaches the terminal unchanged.
///
/// # Arguments
/// - `runner` - Locates and runs the `nuget` executable
/// - `nuspec_path` - Generated `.nuspec` at the project root
/// - `output_dir` - Directory the `.nupkg` is written to, created if missing
/// - `verbose` - Adds `-Verbosity detailed` to the packager arguments
///
/// # Returns
/// `Ok(())` once the packager exits with status 0
pub async fn run_nuget_pack<R: ToolRunner>(
    runner: &R,
    nuspec_path: &Path,
    output_dir: &Path,
    verbose: bool,
) -> Result<()> {
    log::info!("Running nuget pack...");

    tokio::fs::create_dir_all(output_dir)
        .await
        .fs_context("creating package output directory", output_dir)?;

    let mut args: Vec<OsString> = vec![
        "pack".into(),
        nuspec_path.into(),
        "-OutputDirectory".into(),
        output_dir.into(),
        "-NoPackageAnalysis".into(),
    ];
    if verbose {
        args.extend(["-Verbosity".into(), "detailed".into()]);
    }

    run_tool(runner, Tool::Packager, args).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{ErrorKind, builder::testing::RecordingRunner};

    #[tokio::test]
    async fn passes_fixed_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("build");
        let nuspec = dir.path().join("Foo.nuspec");
        let runner = RecordingRunner::new("Foo.1.0.nupkg");

        run_nuget_pack(&runner, &nuspec, &out, false).await.unwrap();

        let calls = runner.calls_to(Tool::Packager);
        assert_eq!(calls.len(), 1);
        let expected: Vec<OsString> = vec![
            "pack".into(),
            nuspec.into(),
            "-OutputDirectory".into(),
            out.clone().into(),
            "-NoPackageAnalysis".into(),
        ];
        assert_eq!(calls[0].args, expected);
        assert!(out.join("Foo.1.0.nupkg").is_file());
    }

    #[tokio::test]
    async fn verbose_requests_detailed_output() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new("Foo.1.0.nupkg");

        run_nuget_pack(&runner, &dir.path().join("Foo.nuspec"), dir.path(), true)
            .await
            .unwrap();

        let args = &runner.calls_to(Tool::Packager)[0].args;
        assert_eq!(&args[args.len() - 2..], ["-Verbosity", "detailed"]);
    }

    #[tokio::test]
    async fn failing_packager_is_external_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = RecordingRunner::new("Foo.1.0.nupkg");
        runner.failing.push((Tool::Packager, 1));

        let err = run_nuget_pack(&runner, &dir.path().join("Foo.nuspec"), dir.path(), false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExternalTool);
    }
}
