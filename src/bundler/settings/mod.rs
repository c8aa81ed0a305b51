//! Build inputs: the manifest model and the project directory layout.
//!
//! [`BuildManifest`] is loaded once per build from `build-info.yaml` and never
//! mutated afterwards. [`ProjectDirectory`] names the conventional paths the
//! pipeline reads from and writes to.

mod action;
mod manifest;
mod project;
mod version;

pub use action::{LOGOUT_COMMAND, PostInstallAction, RESTART_COMMAND};
pub use manifest::{BUILD_INFO_FILE, BuildManifest, normalize_install_location};
pub use project::{
    BUILD_DIR, PAYLOAD_DIR, POSTINSTALL_SCRIPT, PREINSTALL_SCRIPT, ProjectDirectory, SCRIPTS_DIR,
    TOOLS_DIR,
};
pub use version::Version;
