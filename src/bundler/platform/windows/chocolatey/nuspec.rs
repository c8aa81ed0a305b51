//! `.nuspec` package manifest generation.
//!
//! The document lists package metadata plus every file `nuget pack` should
//! pick up: the payload tree, the generated install script, and the optional
//! user fragments under their Chocolatey names.

use super::{BEFORE_MODIFY_SCRIPT, INSTALL_SCRIPT};
use crate::{
    bail,
    bundler::{
        error::{Error, ErrorExt, Result},
        settings::{
            BuildManifest, POSTINSTALL_SCRIPT, PREINSTALL_SCRIPT, ProjectDirectory, SCRIPTS_DIR,
            TOOLS_DIR,
        },
    },
};
use serde::Serialize;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// Tags attached to every package.
pub const PACKAGE_TAGS: &str = "admin";

/// `<metadata>` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub id: String,
    pub version: String,
    pub authors: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

/// `<file src=".." target=".."/>` entry. Paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    #[serde(rename = "@src")]
    pub source: String,
    #[serde(rename = "@target")]
    pub target: String,
}

impl FileEntry {
    fn new(source: &Path, target: &Path) -> Self {
        Self {
            source: source.to_string_lossy().into_owned(),
            target: target.to_string_lossy().into_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct FileList {
    #[serde(rename = "file")]
    entries: Vec<FileEntry>,
}

/// Generated `.nuspec` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename = "package")]
pub struct PackageManifest {
    metadata: Metadata,
    files: FileList,
}

impl PackageManifest {
    /// Builds the document for `manifest` from the current state of `project`.
    ///
    /// Payload files are listed in sorted order; the install script is always
    /// listed; fragments are listed only when they exist on disk.
    pub fn generate(manifest: &BuildManifest, project: &ProjectDirectory) -> Result<Self> {
        let metadata = Metadata {
            id: manifest.product_identifier.clone(),
            version: manifest.version.to_string(),
            authors: manifest.developer.clone(),
            description: manifest.package_description(),
            tags: Some(PACKAGE_TAGS.to_string()),
        };

        let mut entries: Vec<FileEntry> = project
            .payload_files()?
            .iter()
            .map(|relative| FileEntry::new(relative, relative))
            .collect();

        let install_script = Path::new(TOOLS_DIR).join(INSTALL_SCRIPT);
        entries.push(FileEntry::new(&install_script, &install_script));

        let fragments = [
            (project.preinstall_fragment(), PREINSTALL_SCRIPT, BEFORE_MODIFY_SCRIPT),
            (project.postinstall_fragment(), POSTINSTALL_SCRIPT, POSTINSTALL_SCRIPT),
        ];
        for (present, source, target) in fragments {
            if present.is_some() {
                entries.push(FileEntry::new(
                    &Path::new(SCRIPTS_DIR).join(source),
                    &Path::new(TOOLS_DIR).join(target),
                ));
            }
        }

        Ok(Self {
            metadata,
            files: FileList { entries },
        })
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files.entries
    }

    /// Checks the document before it is handed to the packager: the install
    /// script is listed exactly once and no source is listed twice.
    pub fn verify(&self) -> Result<()> {
        let install_script = Path::new(TOOLS_DIR).join(INSTALL_SCRIPT);
        let install_script = install_script.to_string_lossy();
        let count = self
            .files()
            .iter()
            .filter(|f| f.source == install_script)
            .count();
        if count != 1 {
            bail!("package manifest lists {install_script} {count} times");
        }

        let mut seen = HashSet::new();
        for entry in self.files() {
            if !seen.insert(entry.source.as_str()) {
                bail!("package manifest lists {} more than once", entry.source);
            }
        }

        Ok(())
    }

    /// Serializes to indented XML with a declaration.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::from(XML_DECLARATION);
        let mut serializer = quick_xml::se::Serializer::new(&mut xml);
        serializer.indent(' ', 2);
        self.serialize(serializer)
            .map_err(|e| Error::Xml(e.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }
}

/// Generate the package manifest and write it to the project root.
///
/// The file list references payload files by their project-relative paths
/// and maps staged scripts under `tools/`. The manifest is checked before it
/// is written, so a rejected manifest leaves no `.nuspec` behind.
///
/// # Arguments
/// - `manifest` - Parsed `build-info.yaml` supplying package metadata
/// - `project` - Project directory holding `payload/` and `tools/`
///
/// # Returns
/// Path to the written `<name>.nuspec`
pub async fn generate_nuspec(
    manifest: &BuildManifest,
    project: &ProjectDirectory,
) -> Result<PathBuf> {
    let nuspec = PackageManifest::generate(manifest, project)?;
    nuspec.verify()?;

    let path = project.nuspec_path(&manifest.product_name);
    let xml = nuspec.to_xml()?;
    tokio::fs::write(&path, &xml)
        .await
        .fs_context("writing package manifest", &path)?;

    log::debug!(
        "Generated {} with {} file entries:\n{xml}",
        path.display(),
        nuspec.files().len()
    );

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::PostInstallAction;

    fn manifest(description: Option<&str>) -> BuildManifest {
        BuildManifest {
            product_identifier: "com.acme.Foo".into(),
            product_name: "Foo".into(),
            developer: "Acme".into(),
            description: description.map(String::from),
            version: "1.2.3".parse().unwrap(),
            install_location: Some(r"C:\Foo".into()),
            post_install_action: PostInstallAction::None,
            signing_identity: None,
        }
    }

    fn path(parts: &[&str]) -> String {
        parts
            .iter()
            .collect::<PathBuf>()
            .to_string_lossy()
            .into_owned()
    }

    fn sources(nuspec: &PackageManifest) -> Vec<String> {
        nuspec.files().iter().map(|f| f.source.clone()).collect()
    }

    #[test]
    fn empty_payload_lists_only_install_script() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectDirectory::new(dir.path());
        std::fs::create_dir(project.payload_dir()).unwrap();

        let nuspec = PackageManifest::generate(&manifest(None), &project).unwrap();
        assert_eq!(
            nuspec.files(),
            [FileEntry {
                source: path(&["tools", "chocolateyInstall.ps1"]),
                target: path(&["tools", "chocolateyInstall.ps1"]),
            }]
        );
        nuspec.verify().unwrap();
    }

    #[test]
    fn payload_files_are_listed_once_each() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectDirectory::new(dir.path());
        std::fs::create_dir_all(project.payload_dir().join("bin")).unwrap();
        std::fs::write(project.payload_dir().join("bin").join("foo.exe"), "x").unwrap();
        std::fs::write(project.payload_dir().join("foo.cfg"), "y").unwrap();

        let nuspec = PackageManifest::generate(&manifest(None), &project).unwrap();
        assert_eq!(
            sources(&nuspec),
            [
                path(&["payload", "bin", "foo.exe"]),
                path(&["payload", "foo.cfg"]),
                path(&["tools", "chocolateyInstall.ps1"]),
            ]
        );
        for entry in &nuspec.files()[..2] {
            assert_eq!(entry.source, entry.target);
        }
        nuspec.verify().unwrap();
    }

    #[test]
    fn fragments_use_chocolatey_names() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectDirectory::new(dir.path());
        std::fs::create_dir(project.scripts_dir()).unwrap();
        std::fs::write(project.scripts_dir().join("preinstall.ps1"), "a").unwrap();
        std::fs::write(project.scripts_dir().join("postinstall.ps1"), "b").unwrap();

        let nuspec = PackageManifest::generate(&manifest(None), &project).unwrap();
        let files = nuspec.files();
        assert_eq!(files.len(), 3);
        assert_eq!(files[1].source, path(&["scripts", "preinstall.ps1"]));
        assert_eq!(files[1].target, path(&["tools", "chocolateyBeforeModify.ps1"]));
        assert_eq!(files[2].source, path(&["scripts", "postinstall.ps1"]));
        assert_eq!(files[2].target, path(&["tools", "postinstall.ps1"]));
    }

    #[test]
    fn only_present_fragment_is_listed() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectDirectory::new(dir.path());
        std::fs::create_dir(project.scripts_dir()).unwrap();
        std::fs::write(project.scripts_dir().join("postinstall.ps1"), "b").unwrap();

        let nuspec = PackageManifest::generate(&manifest(None), &project).unwrap();
        assert_eq!(
            sources(&nuspec),
            [
                path(&["tools", "chocolateyInstall.ps1"]),
                path(&["scripts", "postinstall.ps1"]),
            ]
        );
    }

    #[test]
    fn metadata_uses_default_description() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectDirectory::new(dir.path());

        let nuspec = PackageManifest::generate(&manifest(None), &project).unwrap();
        assert_eq!(
            nuspec.metadata(),
            &Metadata {
                id: "com.acme.Foo".into(),
                version: "1.2.3".into(),
                authors: "Acme".into(),
                description: "Foo version 1.2.3 for com.acme.Foo by Acme".into(),
                tags: Some(PACKAGE_TAGS.into()),
            }
        );

        let explicit = PackageManifest::generate(&manifest(Some("Custom")), &project).unwrap();
        assert_eq!(explicit.metadata().description, "Custom");
    }

    #[test]
    fn serializes_to_nuspec_xml() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectDirectory::new(dir.path());

        let xml = PackageManifest::generate(&manifest(Some("Fish & Chips")), &project)
            .unwrap()
            .to_xml()
            .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<package>"));
        assert!(xml.contains("<id>com.acme.Foo</id>"));
        assert!(xml.contains("<version>1.2.3</version>"));
        assert!(xml.contains("<authors>Acme</authors>"));
        assert!(xml.contains("<description>Fish &amp; Chips</description>"));
        assert!(xml.contains("<tags>admin</tags>"));
        let script = path(&["tools", "chocolateyInstall.ps1"]);
        assert!(xml.contains(&format!("<file src=\"{script}\" target=\"{script}\"/>")));
        assert!(xml.trim_end().ends_with("</package>"));
    }

    #[test]
    fn serialization_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectDirectory::new(dir.path());
        std::fs::create_dir(project.payload_dir()).unwrap();
        for name in ["c.txt", "a.txt", "b.txt"] {
            std::fs::write(project.payload_dir().join(name), name).unwrap();
        }

        let first = PackageManifest::generate(&manifest(None), &project).unwrap().to_xml().unwrap();
        let second = PackageManifest::generate(&manifest(None), &project).unwrap().to_xml().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn verify_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectDirectory::new(dir.path());
        let mut nuspec = PackageManifest::generate(&manifest(None), &project).unwrap();
        let dup = nuspec.files()[0].clone();
        nuspec.files.entries.push(dup);
        assert!(nuspec.verify().is_err());
    }

    #[tokio::test]
    async fn writes_nuspec_at_project_root() {
        let dir = tempfile::tempdir().unwrap();
        let project = ProjectDirectory::new(dir.path());

        let path = generate_nuspec(&manifest(None), &project).await.unwrap();
        assert_eq!(path, dir.path().join("Foo.nuspec"));
        let xml = std::fs::read_to_string(&path).unwrap();
        assert!(xml.contains("<id>com.acme.Foo</id>"));
    }
}
