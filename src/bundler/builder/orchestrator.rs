//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that runs the build
//! steps in order, stops at the first failure, and always cleans up the
//! staging area once the project has been validated.

use super::{
    BuildStep,
    checksum::calculate_sha256,
    signing::sign_package,
    tools::ToolRunner,
};
use crate::bundler::{
    diagnostics::Diagnostics,
    error::{Context, Error, ErrorExt, Result},
    platform::windows::chocolatey::{
        NUPKG_EXTENSION, generate_install_script, generate_nuspec, run_nuget_pack,
        stage_preinstall,
    },
    settings::{BuildManifest, ProjectDirectory},
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Per-invocation build switches.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Where the artifact is written. Defaults to `<project>/build`.
    pub output_dir: Option<PathBuf>,
    /// Never sign, even when the manifest names a signing identity.
    pub skip_signing: bool,
    /// Ask the packager for detailed output.
    pub verbose: bool,
}

/// Where the packager left its output relative to the canonical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLocation {
    /// Found under another name, typically `<identifier>.<version>.nupkg`.
    AlternateName(PathBuf),
    /// Already at `<name>-<version>.nupkg`.
    AlreadyCanonical,
}

/// The finished package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledArtifact {
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256.
    pub checksum: String,
    pub signed: bool,
}

/// Main bundler orchestrator.
///
/// Owns one project directory and the tool runner used to reach `nuget` and
/// `signtool`. A bundler runs builds sequentially; concurrent builds against
/// the same directory are not supported.
#[derive(Debug)]
pub struct Bundler<R> {
    project: ProjectDirectory,
    options: BuildOptions,
    runner: R,
}

/// Tags an error with the step it happened in.
fn in_step(step: BuildStep) -> impl FnOnce(Error) -> Error {
    move |source| Error::Step {
        step,
        source: Box::new(source),
    }
}

impl<R: ToolRunner> Bundler<R> {
    pub fn new(project: ProjectDirectory, options: BuildOptions, runner: R) -> Self {
        Self {
            project,
            options,
            runner,
        }
    }

    pub fn project(&self) -> &ProjectDirectory {
        &self.project
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Directory the artifact is written to.
    pub fn output_dir(&self) -> PathBuf {
        self.options
            .output_dir
            .clone()
            .unwrap_or_else(|| self.project.build_dir())
    }

    /// Runs the full build.
    ///
    /// Validation happens before anything is written. Once it passes, the
    /// staging area and the generated `.nuspec` are removed at the end of the
    /// run whether or not the build succeeded.
    pub async fn bundle(&self, diagnostics: &dyn Diagnostics) -> Result<BundledArtifact> {
        diagnostics.step(BuildStep::Validate);
        let manifest = self
            .validate()
            .await
            .map_err(in_step(BuildStep::Validate))?;
        diagnostics.info(&format!(
            "Building {} {} ({})",
            manifest.product_name, manifest.version, manifest.product_identifier
        ));

        let outcome = self.run_pipeline(&manifest, diagnostics).await;

        diagnostics.step(BuildStep::Cleanup);
        self.cleanup(&manifest, diagnostics).await;

        let (path, signed) = outcome?;

        diagnostics.step(BuildStep::Done);
        let artifact = self
            .describe(path, signed)
            .await
            .map_err(in_step(BuildStep::Done))?;
        log::debug!("Created package: {}", artifact.path.display());

        Ok(artifact)
    }

    /// Structure check, manifest load, payload/location cross-check.
    async fn validate(&self) -> Result<BuildManifest> {
        self.project.validate()?;
        let manifest = BuildManifest::load(&self.project.manifest_path()).await?;

        if manifest.install_location.is_none() && !self.project.payload_files()?.is_empty() {
            return Err(Error::Config(format!(
                "payload/ contains files but {} has no 'install_location'; \
                 set install_location or empty payload/",
                self.project.manifest_path().display()
            )));
        }

        Ok(manifest)
    }

    /// Steps between validation and cleanup. Returns the final artifact path
    /// and whether it was signed.
    async fn run_pipeline(
        &self,
        manifest: &BuildManifest,
        diagnostics: &dyn Diagnostics,
    ) -> Result<(PathBuf, bool)> {
        let output_dir = self.output_dir();

        diagnostics.step(BuildStep::Scaffold);
        self.scaffold(&output_dir)
            .await
            .map_err(in_step(BuildStep::Scaffold))?;

        diagnostics.step(BuildStep::SynthesizePreinstall);
        if let Some(staged) = stage_preinstall(&self.project)
            .await
            .map_err(in_step(BuildStep::SynthesizePreinstall))?
        {
            diagnostics.info(&format!("Included preinstall script: {}", staged.display()));
        }

        diagnostics.step(BuildStep::SynthesizeInstallScript);
        generate_install_script(manifest, &self.project)
            .await
            .map_err(in_step(BuildStep::SynthesizeInstallScript))?;

        diagnostics.step(BuildStep::GenerateManifest);
        let nuspec = generate_nuspec(manifest, &self.project)
            .await
            .map_err(in_step(BuildStep::GenerateManifest))?;

        diagnostics.step(BuildStep::InvokePackager);
        run_nuget_pack(&self.runner, &nuspec, &output_dir, self.options.verbose)
            .await
            .map_err(in_step(BuildStep::InvokePackager))?;

        diagnostics.step(BuildStep::LocatePackagedArtifact);
        let canonical = output_dir.join(format!(
            "{}.{NUPKG_EXTENSION}",
            manifest.artifact_stem()
        ));
        let location = locate_artifact(manifest, &output_dir, &canonical)
            .await
            .map_err(in_step(BuildStep::LocatePackagedArtifact))?;

        diagnostics.step(BuildStep::RenameArtifact);
        match location {
            Some(ArtifactLocation::AlternateName(found)) => {
                diagnostics.info(&format!(
                    "Renaming package: {} to {}",
                    found.display(),
                    canonical.display()
                ));
                tokio::fs::rename(&found, &canonical)
                    .await
                    .fs_context("renaming package", &found)
                    .map_err(in_step(BuildStep::RenameArtifact))?;
            }
            Some(ArtifactLocation::AlreadyCanonical) => {}
            None => diagnostics.warn(&format!(
                "No package matching {}* found, expecting {}",
                manifest.product_identifier,
                canonical.display()
            )),
        }

        diagnostics.step(BuildStep::ConditionallySign);
        let signed = match manifest.signing_identity.as_deref() {
            Some(identity) if !self.options.skip_signing => {
                sign_package(&self.runner, &canonical, identity)
                    .await
                    .map_err(in_step(BuildStep::ConditionallySign))?;
                true
            }
            Some(_) => {
                diagnostics.info("Signing disabled. Skipping signing.");
                false
            }
            None => {
                diagnostics.info("No signing certificate provided. Skipping signing.");
                false
            }
        };

        Ok((canonical, signed))
    }

    async fn scaffold(&self, output_dir: &Path) -> Result<()> {
        self.project.scaffold().await?;
        if self.options.output_dir.is_some() {
            fs::create_dir_all(output_dir).await?;
        }
        Ok(())
    }

    /// Removes `tools/` and the generated `.nuspec`. Never fails the build.
    async fn cleanup(&self, manifest: &BuildManifest, diagnostics: &dyn Diagnostics) {
        if let Err(e) = self.project.remove_staging().await {
            diagnostics.warn(&format!("Failed to remove staging directory: {e}"));
        }

        let nuspec = self.project.nuspec_path(&manifest.product_name);
        if let Err(e) = fs::remove_file(&nuspec).await {
            diagnostics.warn(&format!("Failed to remove package manifest: {e}"));
        }
    }

    async fn describe(&self, path: PathBuf, signed: bool) -> Result<BundledArtifact> {
        let size = tokio::fs::metadata(&path)
            .await
            .fs_context("reading artifact metadata", &path)?
            .len();
        let checksum = calculate_sha256(&path).await?;

        Ok(BundledArtifact {
            path,
            size,
            checksum,
            signed,
        })
    }
}

/// Finds what the packager produced in `output_dir`.
///
/// Looks for the packager's default `<identifier>.<version>.nupkg` first, then
/// for any `<identifier>.<digit>*.nupkg` the packager may have written with a
/// normalized version. Earlier canonical `<name>-*.nupkg` artifacts are never
/// candidates. A file already at `canonical` is used only when nothing else
/// matches. `None` when nothing matches.
pub async fn locate_artifact(
    manifest: &BuildManifest,
    output_dir: &Path,
    canonical: &Path,
) -> Result<Option<ArtifactLocation>> {
    let default_name = output_dir.join(format!(
        "{}.{}.{NUPKG_EXTENSION}",
        manifest.product_identifier, manifest.version
    ));
    if default_name.is_file() && default_name != canonical {
        return Ok(Some(ArtifactLocation::AlternateName(default_name)));
    }

    let packaged = glob::Pattern::new(&format!(
        "{}.[0-9]*.{NUPKG_EXTENSION}",
        glob::Pattern::escape(&manifest.product_identifier)
    ))
    .context("invalid artifact pattern")?;
    let renamed = glob::Pattern::new(&format!(
        "{}-*.{NUPKG_EXTENSION}",
        glob::Pattern::escape(&manifest.product_name)
    ))
    .context("invalid artifact pattern")?;

    let mut matches = Vec::new();
    let mut entries = tokio::fs::read_dir(output_dir)
        .await
        .fs_context("reading output directory", output_dir)?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading output directory", output_dir)?
    {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if packaged.matches(&name) && !renamed.matches(&name) && entry.path().is_file() {
            matches.push(entry.path());
        }
    }
    matches.sort();

    if let Some(found) = matches.into_iter().next() {
        return Ok(Some(ArtifactLocation::AlternateName(found)));
    }
    if canonical.is_file() {
        return Ok(Some(ArtifactLocation::AlreadyCanonical));
    }
    Ok(None)
}
