//! Bootstrap configuration file model.

use crate::constants;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Every literal the bootstrap uses. A missing file or missing key falls
/// back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Ubuntu `VERSION_ID` the host is expected to run.
    pub expected_release: String,
    pub os_release_path: PathBuf,

    pub dependency_packages: Vec<String>,
    pub docker_packages: Vec<String>,

    pub docker_gpg_url: String,
    pub docker_repo_url: String,
    pub keyring_dir: PathBuf,
    pub sources_list: PathBuf,

    pub installer_url: String,
    pub installer_path: PathBuf,
    /// Relative to the sudo user's home.
    pub install_subdir: PathBuf,
    pub system_install_dir: PathBuf,

    pub lock_path: PathBuf,

    /// Forward step outcomes to journald.
    pub journald: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            expected_release: constants::EXPECTED_RELEASE.to_string(),
            os_release_path: PathBuf::from(constants::OS_RELEASE_PATH),
            dependency_packages: owned(constants::DEPENDENCY_PACKAGES),
            docker_packages: owned(constants::DOCKER_PACKAGES),
            docker_gpg_url: constants::DOCKER_GPG_URL.to_string(),
            docker_repo_url: constants::DOCKER_REPO_URL.to_string(),
            keyring_dir: PathBuf::from(constants::KEYRING_DIR),
            sources_list: PathBuf::from(constants::DOCKER_SOURCES_LIST),
            installer_url: constants::INSTALLER_URL.to_string(),
            installer_path: PathBuf::from(constants::INSTALLER_PATH),
            install_subdir: PathBuf::from(constants::INSTALL_SUBDIR),
            system_install_dir: PathBuf::from(constants::SYSTEM_INSTALL_DIR),
            lock_path: PathBuf::from(constants::LOCK_PATH),
            journald: false,
        }
    }
}

impl BootstrapConfig {
    /// Location of the dearmored Docker signing key.
    pub fn docker_keyring(&self) -> PathBuf {
        self.keyring_dir.join(constants::DOCKER_KEYRING_NAME)
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
