//! Package project directory layout and validation.

use super::BUILD_INFO_FILE;
use crate::bundler::{
    error::{Error, ErrorExt, Result},
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Files shipped to the target machine.
pub const PAYLOAD_DIR: &str = "payload";
/// User-supplied install script fragments.
pub const SCRIPTS_DIR: &str = "scripts";
/// Default output directory for packaged artifacts.
pub const BUILD_DIR: &str = "build";
/// Transient staging area for generated scripts.
pub const TOOLS_DIR: &str = "tools";
/// Fragment run before install/upgrade/uninstall.
pub const PREINSTALL_SCRIPT: &str = "preinstall.ps1";
/// Fragment appended to the generated install script.
pub const POSTINSTALL_SCRIPT: &str = "postinstall.ps1";

/// A package project rooted at a directory on disk.
///
/// ```text
/// <root>/
///   build-info.yaml
///   payload/            optional file tree
///   scripts/            optional preinstall.ps1 / postinstall.ps1
///   build/              output (created by scaffolding)
///   tools/              staging, exists only during a build
/// ```
#[derive(Debug, Clone)]
pub struct ProjectDirectory {
    root: PathBuf,
}

impl ProjectDirectory {
    /// Wraps `root` without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(BUILD_INFO_FILE)
    }

    pub fn payload_dir(&self) -> PathBuf {
        self.root.join(PAYLOAD_DIR)
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join(SCRIPTS_DIR)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.root.join(TOOLS_DIR)
    }

    /// Path of the generated `.nuspec` for a product.
    pub fn nuspec_path(&self, product_name: &str) -> PathBuf {
        self.root.join(format!("{product_name}.nuspec"))
    }

    /// `scripts/preinstall.ps1`, if present.
    pub fn preinstall_fragment(&self) -> Option<PathBuf> {
        existing_file(self.scripts_dir().join(PREINSTALL_SCRIPT))
    }

    /// `scripts/postinstall.ps1`, if present.
    pub fn postinstall_fragment(&self) -> Option<PathBuf> {
        existing_file(self.scripts_dir().join(POSTINSTALL_SCRIPT))
    }

    /// Checks that this is a package project.
    ///
    /// Requires `payload/` or `scripts/`, and `build-info.yaml`. Read-only.
    pub fn validate(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(Error::Structure(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        if !self.payload_dir().is_dir() && !self.scripts_dir().is_dir() {
            return Err(Error::Structure(format!(
                "either '{PAYLOAD_DIR}' or '{SCRIPTS_DIR}' directory must exist in {}",
                self.root.display()
            )));
        }

        if !self.manifest_path().is_file() {
            return Err(Error::Structure(format!(
                "'{BUILD_INFO_FILE}' is missing in {}",
                self.root.display()
            )));
        }

        Ok(())
    }

    /// Creates `payload/`, `scripts/` and `build/`. Safe to repeat.
    pub async fn scaffold(&self) -> Result<()> {
        for dir in [self.payload_dir(), self.scripts_dir(), self.build_dir()] {
            fs::create_dir_all(&dir).await?;
        }
        Ok(())
    }

    /// Regular files under `payload/`, relative to the project root, sorted.
    ///
    /// A missing payload directory yields an empty list.
    pub fn payload_files(&self) -> Result<Vec<PathBuf>> {
        let payload = self.payload_dir();
        if !payload.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&payload).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.path().strip_prefix(&self.root)?.to_path_buf());
            }
        }
        Ok(files)
    }

    /// Removes the staging area. Missing is fine.
    pub async fn remove_staging(&self) -> Result<()> {
        fs::remove_dir_all(&self.tools_dir()).await
    }

    /// Creates the staging area.
    pub async fn create_staging(&self) -> Result<PathBuf> {
        let tools = self.tools_dir();
        tokio::fs::create_dir_all(&tools)
            .await
            .fs_context("creating staging directory", &tools)?;
        Ok(tools)
    }
}

fn existing_file(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}
