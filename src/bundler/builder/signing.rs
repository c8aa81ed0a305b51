//! Artifact code signing.
//!
//! The signing policy is fixed: SHA-256 file digest, RFC 3161 timestamp from
//! DigiCert, certificate selected by subject name.

use super::tools::{Tool, ToolRunner, run_tool};
use crate::bundler::error::Result;
use std::{ffi::OsString, path::Path};

/// Timestamp authority used for every signature.
pub const TIMESTAMP_URL: &str = "http://timestamp.digicert.com";

/// Digest algorithm for both the file and the timestamp.
pub const DIGEST_ALGORITHM: &str = "SHA256";

/// Signs `artifact` with the certificate whose subject matches `identity`.
///
/// # Arguments
/// - `runner` - Locates and runs `signtool`
/// - `artifact` - Final, already renamed `.nupkg`
/// - `identity` - Certificate subject name passed to `/n`
pub async fn sign_package<R: ToolRunner>(runner: &R, artifact: &Path, identity: &str) -> Result<()> {
    log::info!("Signing {} as {identity}", artifact.display());

    let args: Vec<OsString> = vec![
        "sign".into(),
        "/n".into(),
        identity.into(),
        "/fd".into(),
        DIGEST_ALGORITHM.into(),
        "/tr".into(),
        TIMESTAMP_URL.into(),
        "/td".into(),
        DIGEST_ALGORITHM.into(),
        artifact.into(),
    ];

    run_tool(runner, Tool::Signer, args).await
}
