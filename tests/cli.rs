//! End-to-end tests for the `kodegen_bundler_nupkg` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const TOOLCHAIN_ENV: &str = "KODEGEN_NUPKG_TOOLCHAIN";

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kodegen_bundler_nupkg"));
    cmd.env_remove(TOOLCHAIN_ENV).env_remove("RUST_LOG");
    cmd
}

fn create(dir: &Path) {
    bin().arg(dir).arg("--create").assert().success();
}

#[test]
fn help_lists_flags() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PROJECT_DIR"))
        .stdout(predicate::str::contains("--toolchain-path"))
        .stdout(predicate::str::contains("--no-sign"));
}

#[test]
fn missing_project_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    bin()
        .arg(dir.path().join("absent"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: validate failed: project structure error"));
}

#[test]
fn project_without_manifest_is_not_mutated() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("payload")).unwrap();

    bin()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("build-info.yaml"));
    assert!(!dir.path().join("build").exists());
    assert!(!dir.path().join("scripts").exists());
}

#[test]
fn create_scaffolds_once() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("pkg");

    bin()
        .arg(&project)
        .arg("--create")
        .assert()
        .success()
        .stderr(predicate::str::contains("Created new project directory"));
    assert!(project.join("build-info.yaml").is_file());
    assert!(project.join("payload").is_dir());
    assert!(project.join("scripts").is_dir());

    bin()
        .arg(&project)
        .arg("--create")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn toolchain_path_must_be_directory() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("pkg");
    create(&project);

    bin()
        .arg(&project)
        .arg("--toolchain-path")
        .arg(dir.path().join("no-such-dir"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("toolchain path"));
}

#[test]
fn missing_packager_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("pkg");
    let toolchain = dir.path().join("toolchain");
    std::fs::create_dir(&toolchain).unwrap();
    create(&project);

    bin()
        .arg(&project)
        .arg("--toolchain-path")
        .arg(&toolchain)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invoke packager failed: nuget failed: not found"));
    assert!(!project.join("tools").exists());
    assert!(!project.join("PkgName.nuspec").exists());
}

#[cfg(unix)]
mod fake_toolchain {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Writes an executable shell script named `name` into `dir`.
    fn script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// `nuget pack <nuspec> -OutputDirectory <out> ...` writes the packager's default name.
    const FAKE_NUGET: &str =
        r#"printf 'nupkg' > "$4/com.domain.winadmins.package_name.1.0.0.nupkg""#;

    #[test]
    fn builds_and_renames_package() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("pkg");
        let toolchain = dir.path().join("toolchain");
        std::fs::create_dir(&toolchain).unwrap();
        script(&toolchain, "nuget", FAKE_NUGET);
        create(&project);

        let expected = project.join("build").join("PkgName-1.0.0.nupkg");
        bin()
            .arg(&project)
            .arg("--toolchain-path")
            .arg(&toolchain)
            .assert()
            .success()
            .stdout(predicate::str::contains(expected.display().to_string()));

        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "nupkg");
        assert!(
            !project
                .join("build")
                .join("com.domain.winadmins.package_name.1.0.0.nupkg")
                .exists()
        );
        assert!(!project.join("tools").exists());
        assert!(!project.join("PkgName.nuspec").exists());
    }

    #[test]
    fn failing_packager_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("pkg");
        let toolchain = dir.path().join("toolchain");
        std::fs::create_dir(&toolchain).unwrap();
        script(&toolchain, "nuget", "exit 1");
        create(&project);

        bin()
            .arg(&project)
            .arg("--toolchain-path")
            .arg(&toolchain)
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "invoke packager failed: nuget failed: exited with status 1",
            ));
        assert!(!project.join("tools").exists());
        assert!(!project.join("PkgName.nuspec").exists());
    }

    #[test]
    fn signs_unless_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("pkg");
        let toolchain = dir.path().join("toolchain");
        let log = dir.path().join("signtool.log");
        std::fs::create_dir(&toolchain).unwrap();
        script(&toolchain, "nuget", FAKE_NUGET);
        script(
            &toolchain,
            "signtool",
            &format!(r#"echo "$@" >> "{}""#, log.display()),
        );
        create(&project);

        let manifest = project.join("build-info.yaml");
        let mut contents = std::fs::read_to_string(&manifest).unwrap();
        contents.push_str("signing_certificate: Acme Cert\n");
        std::fs::write(&manifest, contents).unwrap();

        bin()
            .arg(&project)
            .arg("--toolchain-path")
            .arg(&toolchain)
            .arg("--no-sign")
            .assert()
            .success();
        assert!(!log.exists());

        bin()
            .arg(&project)
            .arg("--toolchain-path")
            .arg(&toolchain)
            .assert()
            .success();
        let calls = std::fs::read_to_string(&log).unwrap();
        assert_eq!(calls.lines().count(), 1);
        assert!(calls.starts_with("sign /n Acme Cert /fd SHA256"));
        assert!(calls.trim_end().ends_with("PkgName-1.0.0.nupkg"));
    }
}
