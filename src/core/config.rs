//! Config file resolution, loading, and validation.

use crate::constants;
use crate::models::config::BootstrapConfig;
use crate::util::path;
use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the config file comes from. Only the built-in default location
/// may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath {
    pub path: PathBuf,
    pub explicit: bool,
}

/// Resolve the config path from CLI arg, env var, or the default location.
pub fn resolve_path(arg: Option<PathBuf>) -> ConfigPath {
    if let Some(path) = arg {
        return ConfigPath { path, explicit: true };
    }
    match env::var(constants::CONFIG_ENV) {
        Ok(p) if !p.is_empty() => ConfigPath {
            path: PathBuf::from(p),
            explicit: true,
        },
        _ => ConfigPath {
            path: PathBuf::from(constants::DEFAULT_CONFIG_PATH),
            explicit: false,
        },
    }
}

/// Load and validate. A missing file yields the defaults unless `required`.
pub fn load(path: &Path, required: bool) -> Result<BootstrapConfig> {
    if !path.exists() {
        if required {
            bail!("config file not found: {}", path.display());
        }
        return Ok(BootstrapConfig::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: BootstrapConfig = toml::from_str(&content)
        .with_context(|| format!("parse config {}", path.display()))?;
    validate(&config).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

pub fn validate(config: &BootstrapConfig) -> Result<()> {
    if config.expected_release.trim().is_empty() {
        bail!("expected_release cannot be empty");
    }
    if config.dependency_packages.is_empty() {
        bail!("dependency_packages cannot be empty");
    }
    if config.docker_packages.is_empty() {
        bail!("docker_packages cannot be empty");
    }
    for pkg in config
        .dependency_packages
        .iter()
        .chain(config.docker_packages.iter())
    {
        if pkg.is_empty() || pkg.starts_with('-') || pkg.chars().any(char::is_whitespace) {
            bail!("invalid package name '{}'", pkg);
        }
    }
    if path::join_within(Path::new("/home/user"), &config.install_subdir).is_none() {
        bail!(
            "install_subdir '{}' must be a relative path inside the home directory",
            config.install_subdir.display()
        );
    }
    if !config.system_install_dir.is_absolute() {
        bail!("system_install_dir must be absolute");
    }
    Ok(())
}
