//! Privilege checks and sudo invoker detection.

use crate::error::BootstrapError;
use anyhow::Result;

/// Check if the current process is running as root (euid 0).
pub fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// The user who invoked us through sudo, if any.
pub fn sudo_user() -> Option<String> {
    parse_sudo_user(std::env::var("SUDO_USER").ok())
}

fn parse_sudo_user(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Identity facts gathered once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub is_root: bool,
    pub sudo_user: Option<String>,
}

impl Host {
    pub fn detect() -> Self {
        Self {
            is_root: is_root(),
            sudo_user: sudo_user(),
        }
    }

    /// Bail with [`BootstrapError::NotRoot`] unless effective root.
    pub fn require_root(&self) -> Result<()> {
        if !self.is_root {
            return Err(BootstrapError::NotRoot.into());
        }
        Ok(())
    }
}
