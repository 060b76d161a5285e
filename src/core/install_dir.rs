//! Where YAMS should be installed.

use crate::models::config::BootstrapConfig;
use crate::util::path;
use std::path::PathBuf;

/// `<home of sudo user>/<install_subdir>` when invoked through sudo, the
/// system-wide directory otherwise.
pub fn resolve(sudo_user: Option<&str>, config: &BootstrapConfig) -> PathBuf {
    resolve_with(sudo_user, config, home_of)
}

pub fn resolve_with<F>(sudo_user: Option<&str>, config: &BootstrapConfig, lookup_home: F) -> PathBuf
where
    F: Fn(&str) -> Option<PathBuf>,
{
    let Some(user) = sudo_user else {
        return config.system_install_dir.clone();
    };
    let home = lookup_home(user).unwrap_or_else(|| PathBuf::from("/home").join(user));
    path::join_within(&home, &config.install_subdir)
        .unwrap_or_else(|| home.join(&config.install_subdir))
}

/// Home directory from the passwd database.
pub fn home_of(user: &str) -> Option<PathBuf> {
    nix::unistd::User::from_name(user)
        .ok()
        .flatten()
        .map(|u| u.dir)
}
