//! Dry-run preview of the bootstrap on this host.

use crate::cli::CliContext;
use crate::constants;
use crate::core::os_release::OsRelease;
use crate::core::{apt, docker, install_dir, installer};
use crate::models::config::BootstrapConfig;
use crate::util::exec::{Runner, SystemRunner};
use crate::util::privilege::Host;
use crate::util::systemd;
use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Output format (text|json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedStep {
    pub step: &'static str,
    pub actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PlannedStep {
    fn new(step: &'static str, actions: Vec<String>) -> Self {
        Self {
            step,
            actions,
            note: None,
        }
    }

    fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

pub fn run(ctx: &CliContext, args: PlanArgs) -> Result<()> {
    if args.format != "text" && args.format != "json" {
        bail!("invalid format: {} (use text|json)", args.format);
    }
    let config = ctx.load_config()?;
    let steps = build_plan(&Host::detect(), &config, &SystemRunner);

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }

    println!("Plan: yams-bootstrap install");
    for (i, s) in steps.iter().enumerate() {
        println!("  {}. {}", i + 1, s.step);
        for a in &s.actions {
            println!("       {}", a);
        }
        if let Some(note) = &s.note {
            println!("       ({})", note);
        }
    }
    Ok(())
}

/// Probes only: reads os-release, resolves PATH, asks dpkg for the arch.
pub fn build_plan(host: &Host, config: &BootstrapConfig, runner: &dyn Runner) -> Vec<PlannedStep> {
    let mut steps = Vec::new();
    let release = OsRelease::read(&config.os_release_path).ok();

    let privilege = PlannedStep::new("privilege-check", vec!["require effective uid 0".into()]);
    steps.push(if host.is_root {
        privilege.note("running as root")
    } else {
        privilege.note("NOT root: install would exit 1 here")
    });

    steps.push(PlannedStep::new(
        "system-update",
        vec![apt::update().to_string(), apt::upgrade().to_string()],
    ));

    let version = PlannedStep::new(
        "version-check",
        vec![format!(
            "compare VERSION_ID in {} with {}",
            config.os_release_path.display(),
            config.expected_release
        )],
    );
    steps.push(match &release {
        Some(r) if r.matches_release(&config.expected_release) => {
            version.note(format!("detected {}", r.describe()))
        }
        Some(r) => version.note(format!("detected {}: will warn and continue", r.describe())),
        None => version.note("os-release unreadable: will warn and continue"),
    });

    steps.push(PlannedStep::new(
        "dependencies",
        vec![apt::install(&config.dependency_packages).to_string()],
    ));

    if docker::is_installed(runner) {
        steps.push(PlannedStep::new("docker-install", Vec::new()).note("docker found on PATH: skip"));
    } else {
        let arch = runner
            .capture(&apt::print_architecture())
            .ok()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "<arch>".to_string());
        let codename = docker::resolve_codename(runner, release.as_ref())
            .unwrap_or_else(|_| "<codename>".to_string());
        let keyring = config.docker_keyring();
        steps.push(PlannedStep::new(
            "docker-install",
            vec![
                format!(
                    "mkdir -m {:o} {}",
                    constants::KEYRING_DIR_MODE,
                    config.keyring_dir.display()
                ),
                format!(
                    "fetch {} | {} > {}",
                    config.docker_gpg_url,
                    docker::dearmor(),
                    keyring.display()
                ),
                format!(
                    "write {}: {}",
                    config.sources_list.display(),
                    docker::repo_line(&arch, &keyring, &config.docker_repo_url, &codename)
                ),
                apt::update().to_string(),
                apt::install(&config.docker_packages).to_string(),
                systemd::start(constants::DOCKER_SERVICE).to_string(),
                systemd::enable(constants::DOCKER_SERVICE).to_string(),
            ],
        ));
    }

    steps.push(
        PlannedStep::new("compose-check", vec![docker::compose_version().to_string()])
            .note("failure exits 1"),
    );

    match host.sudo_user.as_deref() {
        Some(user) => steps.push(PlannedStep::new(
            "docker-group",
            vec![docker::add_to_group(user).to_string()],
        )),
        None => steps.push(PlannedStep::new("docker-group", Vec::new()).note("no SUDO_USER: skip")),
    }

    let dir = install_dir::resolve(host.sudo_user.as_deref(), config);
    steps.push(PlannedStep::new(
        "installer-download",
        vec![format!(
            "fetch {} > {} (mode {:o})",
            config.installer_url,
            config.installer_path.display(),
            constants::INSTALLER_MODE
        )],
    )
    .note(format!("install directory: {}", dir.display())));

    steps.push(
        PlannedStep::new(
            "installer",
            vec![installer::run_invocation(&config.installer_path).to_string()],
        )
        .note("only after answering y/Y"),
    );

    steps
}
