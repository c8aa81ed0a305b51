//! New project scaffolding (`--create`).

use crate::bundler::settings::{BUILD_INFO_FILE, PAYLOAD_DIR, SCRIPTS_DIR};
use anyhow::{Context, bail};
use std::path::Path;

/// `build-info.yaml` written into new projects.
pub const DEFAULT_BUILD_INFO: &str = r#"product:
  identifier: com.domain.winadmins.package_name
  name: PkgName
  version: "1.0.0"
  developer: MyCompany
install_location: C:\Program Files\PkgName
postinstall_action: none
"#;

/// Creates `dir` with `payload/`, `scripts/` and a default `build-info.yaml`.
///
/// Refuses to touch an existing path.
pub async fn create_project(dir: &Path) -> anyhow::Result<()> {
    if tokio::fs::try_exists(dir)
        .await
        .with_context(|| format!("checking {}", dir.display()))?
    {
        bail!("directory {} already exists", dir.display());
    }

    for sub in [PAYLOAD_DIR, SCRIPTS_DIR] {
        let path = dir.join(sub);
        tokio::fs::create_dir_all(&path)
            .await
            .with_context(|| format!("creating {}", path.display()))?;
    }

    let manifest = dir.join(BUILD_INFO_FILE);
    tokio::fs::write(&manifest, DEFAULT_BUILD_INFO)
        .await
        .with_context(|| format!("writing {}", manifest.display()))?;

    log::debug!("Created project skeleton at {}", dir.display());
    Ok(())
}
