//! Build manifest (`build-info.yaml`) loading and validation.
//!
//! Loading happens in two passes: `serde_yaml` maps the document onto a raw
//! structure (syntax and required keys), then [`BuildManifest::try_from`]
//! applies the semantic rules (version segments, post-install action, path
//! normalization). Both passes finish before the pipeline writes anything.

use super::{PostInstallAction, Version};
use crate::bundler::error::{Error, ErrorExt, Result};
use serde::Deserialize;
use std::path::Path;

/// Name of the build manifest inside a project directory.
pub const BUILD_INFO_FILE: &str = "build-info.yaml";

#[derive(Debug, Deserialize)]
struct RawBuildInfo {
    product: RawProduct,
    #[serde(default)]
    install_location: Option<String>,
    #[serde(default)]
    postinstall_action: Option<String>,
    #[serde(default)]
    signing_certificate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    identifier: String,
    name: String,
    version: serde_yaml::Value,
    developer: String,
    #[serde(default)]
    description: Option<String>,
}

/// Validated build manifest. Immutable for the duration of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildManifest {
    /// Reverse-domain package id, stable across versions.
    pub product_identifier: String,
    /// Human-readable product name, used for artifact naming.
    pub product_name: String,
    /// Package author.
    pub developer: String,
    /// Explicit package description.
    pub description: Option<String>,
    /// Package version.
    pub version: Version,
    /// Target directory on the installing machine, backslash-separated.
    pub install_location: Option<String>,
    /// Action appended to the install script.
    pub post_install_action: PostInstallAction,
    /// Certificate subject name passed to the signer.
    pub signing_identity: Option<String>,
}

impl BuildManifest {
    /// Reads and validates the manifest at `path`.
    pub async fn load(path: &Path) -> Result<Self> {
        log::debug!("Reading build info from {}", path.display());
        let contents = tokio::fs::read_to_string(path)
            .await
            .fs_context("reading build manifest", path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses and validates manifest text.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let raw: RawBuildInfo = serde_yaml::from_str(contents)
            .map_err(|e| Error::Config(format!("malformed manifest: {e}")))?;
        Self::try_from(raw)
    }

    /// Canonical artifact stem, `<name>-<version>`.
    pub fn artifact_stem(&self) -> String {
        format!("{}-{}", self.product_name, self.version)
    }

    /// Description written to the package manifest.
    ///
    /// Falls back to a composed sentence when no description is configured,
    /// so the output is identical for identical manifests.
    pub fn package_description(&self) -> String {
        match &self.description {
            Some(description) => description.clone(),
            None => format!(
                "{} version {} for {} by {}",
                self.product_name, self.version, self.product_identifier, self.developer
            ),
        }
    }
}

impl TryFrom<RawBuildInfo> for BuildManifest {
    type Error = Error;

    fn try_from(raw: RawBuildInfo) -> Result<Self> {
        let product = raw.product;

        let product_identifier = required("product.identifier", product.identifier)?;
        let product_name = required("product.name", product.name)?;
        let developer = required("product.developer", product.developer)?;

        let version = match product.version {
            serde_yaml::Value::String(s) => s.trim().parse::<Version>()?,
            serde_yaml::Value::Number(n) if n.is_u64() => n.to_string().parse::<Version>()?,
            other => {
                return Err(Error::Config(format!(
                    "product.version must be a quoted string such as \"1.2.3\", got {other:?}"
                )));
            }
        };

        let post_install_action = raw
            .postinstall_action
            .as_deref()
            .unwrap_or_default()
            .parse::<PostInstallAction>()?;

        Ok(Self {
            product_identifier,
            product_name,
            developer,
            description: non_empty(product.description),
            version,
            install_location: raw
                .install_location
                .map(|l| normalize_install_location(&l))
                .and_then(|l| non_empty(Some(l))),
            post_install_action,
            signing_identity: non_empty(raw.signing_certificate),
        })
    }
}

/// Converts separators to backslashes and strips trailing separators.
pub fn normalize_install_location(path: &str) -> String {
    path.trim()
        .replace('/', "\\")
        .trim_end_matches('\\')
        .to_string()
}

fn required(key: &str, value: String) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::Config(format!("{key} must not be empty")));
    }
    Ok(value.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
