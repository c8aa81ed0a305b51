//! File system utilities for bundling.
//!
//! Idempotent directory and file helpers with path-aware errors.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{io, path::Path};
use tokio::{fs, io::AsyncWriteExt};

/// UTF-8 byte order mark.
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Creates all of the directories of the specified path.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err::<(), _>(e).fs_context("removing directory", path),
    }
}

/// Removes a file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err::<(), _>(e).fs_context("removing file", path),
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying to", to)?;
    Ok(())
}

/// Write file with UTF-8 BOM.
///
/// Windows PowerShell 5.1 decodes BOM-less scripts with the ANSI code page,
/// so generated scripts always carry the BOM (EF BB BF).
pub async fn write_utf8_bom(path: &Path, content: &str) -> Result<()> {
    let mut file = fs::File::create(path)
        .await
        .fs_context("creating script file", path)?;

    file.write_all(UTF8_BOM)
        .await
        .fs_context("writing UTF-8 BOM", path)?;
    file.write_all(content.as_bytes())
        .await
        .fs_context("writing script content", path)?;
    file.flush().await.fs_context("flushing script file", path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn removal_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("tools");
        create_dir_all(&sub).await.unwrap();
        std::fs::write(sub.join("a.ps1"), "x").unwrap();

        remove_dir_all(&sub).await.unwrap();
        remove_dir_all(&sub).await.unwrap();
        assert!(!sub.exists());

        remove_file(&dir.path().join("missing.nuspec")).await.unwrap();
    }

    #[tokio::test]
    async fn bom_is_prefixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.ps1");
        write_utf8_bom(&path, "Write-Host 'hi'").await.unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
        assert_eq!(&bytes[3..], b"Write-Host 'hi'");
    }

    #[tokio::test]
    async fn copy_file_rejects_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(&dir.path().join("nope"), &dir.path().join("dst"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
