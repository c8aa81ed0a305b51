//! Install script synthesis.
//!
//! Produces `tools/chocolateyInstall.ps1` from the build manifest and stages
//! the optional preinstall fragment as `tools/chocolateyBeforeModify.ps1`.

use super::{BEFORE_MODIFY_SCRIPT, INSTALL_SCRIPT, template::INSTALL_TEMPLATE};
use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::{BuildManifest, ProjectDirectory},
    utils::fs,
};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct InstallScriptData {
    install_location: String,
    has_payload: bool,
    post_install_action: String,
}

/// Renders the install script text.
///
/// `has_payload` selects between the recursive copy block and the
/// script-only branch. `postinstall` is appended verbatim after the
/// post-install action, so user logic always runs last.
pub fn render_install_script(
    manifest: &BuildManifest,
    has_payload: bool,
    postinstall: Option<&str>,
) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let data = InstallScriptData {
        install_location: manifest
            .install_location
            .as_deref()
            .map(escape_single_quoted)
            .unwrap_or_default(),
        has_payload,
        post_install_action: manifest.post_install_action.script_block(),
    };

    handlebars
        .register_template_string(INSTALL_SCRIPT, INSTALL_TEMPLATE)
        .map_err(|e| Error::Template(format!("failed to register install template: {e}")))?;

    let mut script = handlebars
        .render(INSTALL_SCRIPT, &data)
        .map_err(|e| Error::Template(e.to_string()))?;

    if let Some(fragment) = postinstall {
        script.push_str("\n# Post-install script contents\n");
        script.push_str(fragment.strip_prefix('\u{feff}').unwrap_or(fragment));
        if !fragment.ends_with('\n') {
            script.push('\n');
        }
    }

    Ok(script)
}

/// Generate `tools/chocolateyInstall.ps1` from the install script template.
///
/// Uses handlebars to render the install location, payload copy and
/// post-install action. An existing `scripts/postinstall.ps1` is read here;
/// failing to read it fails the build.
///
/// # Arguments
/// - `manifest` - Parsed `build-info.yaml` with install location and action
/// - `project` - Project directory the staging area lives in
///
/// # Returns
/// Path to the generated install script
pub async fn generate_install_script(
    manifest: &BuildManifest,
    project: &ProjectDirectory,
) -> Result<PathBuf> {
    let has_payload = !project.payload_files()?.is_empty();

    let postinstall = match project.postinstall_fragment() {
        Some(path) => Some(
            tokio::fs::read_to_string(&path)
                .await
                .fs_context("reading postinstall script", &path)?,
        ),
        None => None,
    };

    let script = render_install_script(manifest, has_payload, postinstall.as_deref())?;

    let tools = project.create_staging().await?;
    let script_path = tools.join(INSTALL_SCRIPT);
    fs::write_utf8_bom(&script_path, &script).await?;

    log::debug!(
        "Generated {} (payload: {}, post-install action: {})",
        script_path.display(),
        has_payload,
        manifest.post_install_action
    );

    Ok(script_path)
}

/// Copies `scripts/preinstall.ps1` to `tools/chocolateyBeforeModify.ps1`.
///
/// Returns `None` when there is no preinstall fragment.
pub async fn stage_preinstall(project: &ProjectDirectory) -> Result<Option<PathBuf>> {
    let Some(source) = project.preinstall_fragment() else {
        log::debug!("No preinstall script found");
        return Ok(None);
    };

    let destination = project.create_staging().await?.join(BEFORE_MODIFY_SCRIPT);
    fs::copy_file(&source, &destination).await?;
    log::debug!("Staged {} -> {}", source.display(), destination.display());

    Ok(Some(destination))
}

/// Escapes a value for a single-quoted PowerShell string.
fn escape_single_quoted(value: &str) -> String {
    value.replace('\'', "''")
}
