//! Docker engine installation from the vendor apt repository.
//!
//! A failure anywhere in [`install`] leaves whatever was already written
//! (keyring, sources list) in place.

use crate::constants;
use crate::core::apt;
use crate::core::os_release::OsRelease;
use crate::models::config::BootstrapConfig;
use crate::util::exec::{Invocation, Runner};
use crate::util::fetch::Fetch;
use crate::util::{fs as boot_fs, systemd, term};
use anyhow::{bail, Context, Result};
use std::path::Path;

pub fn is_installed(runner: &dyn Runner) -> bool {
    runner.resolves("docker")
}

pub fn compose_version() -> Invocation {
    Invocation::new("docker").args(["compose", "version"])
}

pub fn add_to_group(user: &str) -> Invocation {
    Invocation::new("usermod").args(["-aG", constants::DOCKER_GROUP, user])
}

pub fn dearmor() -> Invocation {
    Invocation::new("gpg").args(["--batch", "--dearmor"])
}

pub fn lsb_codename() -> Invocation {
    Invocation::new("lsb_release").arg("-cs")
}

/// The single line written to the Docker sources list.
pub fn repo_line(arch: &str, keyring: &Path, repo_url: &str, codename: &str) -> String {
    format!(
        "deb [arch={} signed-by={}] {} {} stable",
        arch,
        keyring.display(),
        repo_url,
        codename
    )
}

/// Whether `user` is listed as a member of the docker group.
pub fn user_in_group(user: &str) -> Result<bool> {
    let group = nix::unistd::Group::from_name(constants::DOCKER_GROUP)
        .context("look up docker group")?;
    Ok(group.map(|g| g.mem.iter().any(|m| m == user)).unwrap_or(false))
}

/// Distribution codename for the repository line: os-release first,
/// `lsb_release -cs` as fallback.
pub fn resolve_codename(runner: &dyn Runner, release: Option<&OsRelease>) -> Result<String> {
    if let Some(name) = release.and_then(|r| r.version_codename.clone()) {
        if !name.is_empty() {
            return Ok(name);
        }
    }
    let name = runner
        .capture(&lsb_codename())
        .context("determine distribution codename")?;
    if name.is_empty() {
        bail!("lsb_release returned an empty codename");
    }
    Ok(name)
}

/// Fetch the vendor key, dearmor it, and store it world-readable.
pub fn install_key(runner: &dyn Runner, fetcher: &dyn Fetch, config: &BootstrapConfig) -> Result<()> {
    boot_fs::ensure_dir(&config.keyring_dir, constants::KEYRING_DIR_MODE)?;
    let armored = fetcher
        .fetch(&config.docker_gpg_url)
        .context("download Docker signing key")?;
    let binary = runner
        .pipe(&dearmor(), &armored)
        .context("dearmor Docker signing key")?;
    if binary.is_empty() {
        bail!("gpg produced an empty keyring from {}", config.docker_gpg_url);
    }
    let keyring = config.docker_keyring();
    boot_fs::write_atomic(&keyring, &binary, constants::APT_FILE_MODE)
        .with_context(|| format!("write keyring {}", keyring.display()))
}

pub fn write_sources_list(config: &BootstrapConfig, arch: &str, codename: &str) -> Result<()> {
    let line = repo_line(arch, &config.docker_keyring(), &config.docker_repo_url, codename);
    boot_fs::write_atomic(
        &config.sources_list,
        format!("{}\n", line).as_bytes(),
        constants::APT_FILE_MODE,
    )
    .with_context(|| format!("write {}", config.sources_list.display()))
}

/// Key, repository, packages, service.
pub fn install(
    runner: &dyn Runner,
    fetcher: &dyn Fetch,
    config: &BootstrapConfig,
    release: Option<&OsRelease>,
) -> Result<()> {
    term::info("Adding Docker's official GPG key...");
    install_key(runner, fetcher, config)?;

    term::info("Adding the Docker repository...");
    let arch = runner
        .capture(&apt::print_architecture())
        .context("determine package architecture")?;
    let codename = resolve_codename(runner, release)?;
    write_sources_list(config, &arch, &codename)?;

    term::info("Installing Docker...");
    runner.run(&apt::update()).context("apt-get update")?;
    runner
        .run(&apt::install(&config.docker_packages))
        .context("install Docker packages")?;

    term::info("Starting and enabling the Docker service...");
    systemd::start_and_enable(runner, constants::DOCKER_SERVICE)?;
    Ok(())
}
