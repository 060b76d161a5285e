//! Diagnostics for bootstrap readiness and post-install state.

use crate::cli::CliContext;
use crate::constants;
use crate::core::docker;
use crate::core::os_release::OsRelease;
use crate::models::config::BootstrapConfig;
use crate::util::exec::{Runner, SystemRunner};
use crate::util::fs as boot_fs;
use crate::util::privilege::Host;
use crate::util::{systemd, term};
use anyhow::{bail, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Also inspect the Docker service and the sudo user's group membership
    #[arg(long)]
    pub deep: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pass,
    Warn,
    Fail,
    Info,
}

impl Status {
    fn label(self) -> (&'static str, &'static str) {
        match self {
            Status::Pass => ("[PASS]", "32;1"),
            Status::Warn => ("[WARN]", "33;1"),
            Status::Fail => ("[FAIL]", "31;1"),
            Status::Info => ("[INFO]", "34"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Check {
    pub status: Status,
    pub message: String,
}

fn check(status: Status, message: impl Into<String>) -> Check {
    Check {
        status,
        message: message.into(),
    }
}

pub fn run(ctx: &CliContext, args: DoctorArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let host = Host::detect();
    let checks = collect(&host, &config, &SystemRunner, args.deep);

    let color = term::color_enabled_stdout();
    println!("Doctor: {}", ctx.config_path.display());
    for c in &checks {
        let (tag, sgr) = c.status.label();
        println!("  {} {}", term::paint(color, sgr, tag), c.message);
    }

    let count = |s: Status| checks.iter().filter(|c| c.status == s).count();
    println!();
    println!(
        "Doctor summary: {} pass, {} warn, {} fail",
        count(Status::Pass),
        count(Status::Warn),
        count(Status::Fail)
    );
    if count(Status::Fail) > 0 {
        bail!("{} check(s) failed", count(Status::Fail));
    }
    Ok(())
}

pub fn collect(host: &Host, config: &BootstrapConfig, runner: &dyn Runner, deep: bool) -> Vec<Check> {
    let mut out = Vec::new();

    if host.is_root {
        out.push(check(Status::Pass, "running as root"));
    } else {
        out.push(check(Status::Warn, "not running as root (install requires sudo)"));
    }

    match OsRelease::read(&config.os_release_path) {
        Ok(rel) if rel.matches_release(&config.expected_release) => {
            out.push(check(Status::Pass, format!("OS release: {}", rel.describe())));
        }
        Ok(rel) => out.push(check(
            Status::Warn,
            format!(
                "OS release: {} (expected Ubuntu {})",
                rel.describe(),
                config.expected_release
            ),
        )),
        Err(e) => out.push(check(Status::Warn, format!("OS release unreadable: {:#}", e))),
    }

    for tool in ["apt-get", "dpkg", "gpg"] {
        if runner.resolves(tool) {
            out.push(check(Status::Pass, format!("{} available", tool)));
        } else {
            out.push(check(Status::Fail, format!("{} not found on PATH", tool)));
        }
    }

    let docker_present = docker::is_installed(runner);
    if docker_present {
        out.push(check(Status::Pass, "docker found on PATH"));
        if runner.succeeds(&docker::compose_version()) {
            out.push(check(Status::Pass, "docker compose available"));
        } else {
            out.push(check(Status::Fail, "docker compose version failed"));
        }
    } else {
        out.push(check(Status::Info, "docker not installed (install will add it)"));
    }

    let keyring = config.docker_keyring();
    match boot_fs::mode_of(&keyring) {
        Some(mode) if mode == constants::APT_FILE_MODE => {
            out.push(check(Status::Pass, format!("keyring present: {}", keyring.display())));
        }
        Some(mode) => out.push(check(
            Status::Warn,
            format!(
                "keyring mode {:04o} (expected {:04o}): {}",
                mode,
                constants::APT_FILE_MODE,
                keyring.display()
            ),
        )),
        None if docker_present => {}
        None => out.push(check(Status::Info, format!("keyring absent: {}", keyring.display()))),
    }
    if config.sources_list.is_file() {
        out.push(check(
            Status::Pass,
            format!("repository configured: {}", config.sources_list.display()),
        ));
    } else if !docker_present {
        out.push(check(
            Status::Info,
            format!("repository absent: {}", config.sources_list.display()),
        ));
    }

    if config.installer_path.is_file() {
        out.push(check(
            Status::Info,
            format!("installer already downloaded: {}", config.installer_path.display()),
        ));
    }

    if deep && docker_present {
        if runner.succeeds(&systemd::is_active(constants::DOCKER_SERVICE)) {
            out.push(check(Status::Pass, "docker service active"));
        } else {
            out.push(check(Status::Warn, "docker service not active"));
        }
        if runner.succeeds(&systemd::is_enabled(constants::DOCKER_SERVICE)) {
            out.push(check(Status::Pass, "docker service enabled"));
        } else {
            out.push(check(Status::Warn, "docker service not enabled at boot"));
        }
        if let Some(user) = host.sudo_user.as_deref() {
            match docker::user_in_group(user) {
                Ok(true) => out.push(check(Status::Pass, format!("{} is in the docker group", user))),
                Ok(false) => out.push(check(
                    Status::Warn,
                    format!("{} is not in the docker group", user),
                )),
                Err(e) => out.push(check(Status::Warn, format!("group lookup failed: {:#}", e))),
            }
        }
    }

    out
}
