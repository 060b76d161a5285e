//! The bootstrap pipeline: privilege check, system update, release probe,
//! dependencies, Docker, Compose, group membership, installer hand-off.
//!
//! Steps run strictly in order and the first failing command aborts the run.
//! Only the release mismatch is a soft failure.

use crate::core::installer::{self, HandOff};
use crate::core::os_release::OsRelease;
use crate::core::run_lock::RunLock;
use crate::core::{apt, docker, install_dir};
use crate::error::BootstrapError;
use crate::models::config::BootstrapConfig;
use crate::util::exec::Runner;
use crate::util::fetch::Fetch;
use crate::util::journald::Journal;
use crate::util::privilege::Host;
use crate::util::prompt::Prompt;
use crate::util::term;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// External seams the pipeline drives.
pub struct Deps<'a> {
    pub runner: &'a dyn Runner,
    pub fetcher: &'a dyn Fetch,
    pub prompt: &'a mut dyn Prompt,
    pub journal: &'a Journal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockerAction {
    AlreadyPresent,
    Installed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub release_matched: bool,
    pub docker: DockerAction,
    pub group_user: Option<String>,
    pub install_dir: PathBuf,
    pub hand_off: HandOff,
}

pub fn run(host: &Host, config: &BootstrapConfig, deps: Deps<'_>) -> Result<Outcome> {
    let Deps {
        runner,
        fetcher,
        prompt,
        journal,
    } = deps;

    host.require_root()?;
    let _lock = RunLock::acquire(&config.lock_path)?;
    journal.step("privilege-check", "ok", host.sudo_user.as_deref());

    term::info("Updating system packages...");
    runner.run(&apt::update()).context("apt-get update")?;
    runner.run(&apt::upgrade()).context("apt-get upgrade")?;
    journal.step("system-update", "ok", None);

    let release = check_release(config, journal);
    let release_matched = release
        .as_ref()
        .map(|r| r.matches_release(&config.expected_release))
        .unwrap_or(false);

    term::info("Installing dependencies...");
    runner
        .run(&apt::install(&config.dependency_packages))
        .context("install dependencies")?;
    journal.step("dependencies", "ok", None);

    let docker = if docker::is_installed(runner) {
        term::ok("Docker is already installed, skipping installation.");
        journal.step("docker-install", "skipped", None);
        DockerAction::AlreadyPresent
    } else {
        docker::install(runner, fetcher, config, release.as_ref())?;
        term::ok("Docker installed, started, and enabled.");
        journal.step("docker-install", "ok", None);
        DockerAction::Installed
    };

    if !runner.succeeds(&docker::compose_version()) {
        journal.step("compose-check", "fail", None);
        return Err(BootstrapError::ComposeUnavailable.into());
    }
    term::ok("Docker Compose is available.");
    journal.step("compose-check", "ok", None);

    if let Some(user) = host.sudo_user.as_deref() {
        runner
            .run(&docker::add_to_group(user))
            .with_context(|| format!("add {} to the docker group", user))?;
        term::ok(&format!(
            "Added {} to the docker group (log out and back in for it to take effect).",
            user
        ));
        journal.step("docker-group", "ok", Some(user));
    }

    let install_dir = install_dir::resolve(host.sudo_user.as_deref(), config);
    term::info(&format!("YAMS install directory: {}", install_dir.display()));

    term::info("Downloading the YAMS installer...");
    installer::download(fetcher, config)?;
    term::ok(&format!(
        "Installer saved to {}",
        config.installer_path.display()
    ));
    journal.step("installer-download", "ok", None);

    let hand_off = installer::hand_off(runner, prompt, config)?;
    journal.step(
        "installer",
        match hand_off {
            HandOff::Executed => "executed",
            HandOff::Deferred => "deferred",
        },
        None,
    );

    Ok(Outcome {
        release_matched,
        docker,
        group_user: host.sudo_user.clone(),
        install_dir,
        hand_off,
    })
}

/// Warn, never fail, when the host is not on the expected release.
fn check_release(config: &BootstrapConfig, journal: &Journal) -> Option<OsRelease> {
    match OsRelease::read(&config.os_release_path) {
        Ok(rel) if rel.matches_release(&config.expected_release) => {
            term::ok(&format!("Detected {}", rel.describe()));
            journal.step("version-check", "ok", rel.version_id.as_deref());
            Some(rel)
        }
        Ok(rel) => {
            let found = rel.describe();
            term::warn(&format!(
                "This script targets Ubuntu {}; detected {}. Continuing anyway.",
                config.expected_release, found
            ));
            journal.step("version-check", "warn", Some(&found));
            Some(rel)
        }
        Err(e) => {
            term::warn(&format!(
                "Could not determine the OS release ({:#}). Continuing anyway.",
                e
            ));
            journal.step("version-check", "warn", Some("unreadable"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFetcher, FakeRunner};
    use crate::util::prompt::{FixedAnswer, LinePrompt};
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::TempDir;

    const SCRIPT: &[u8] = b"#!/bin/bash\necho installing yams\n";

    fn sandbox(dir: &Path, release: &str) -> BootstrapConfig {
        let os_release = dir.join("os-release");
        fs::write(&os_release, release).unwrap();
        BootstrapConfig {
            os_release_path: os_release,
            keyring_dir: dir.join("keyrings"),
            sources_list: dir.join("sources.list.d/docker.list"),
            installer_path: dir.join("yams-install.sh"),
            lock_path: dir.join("bootstrap.lock"),
            ..BootstrapConfig::default()
        }
    }

    fn jammy(dir: &Path) -> BootstrapConfig {
        sandbox(dir, "ID=ubuntu\nVERSION_ID=\"22.04\"\nVERSION_CODENAME=jammy\n")
    }

    fn root(sudo_user: Option<&str>) -> Host {
        Host {
            is_root: true,
            sudo_user: sudo_user.map(String::from),
        }
    }

    fn fetcher_for(config: &BootstrapConfig) -> FakeFetcher {
        FakeFetcher::new()
            .with(&config.docker_gpg_url, b"-----BEGIN PGP PUBLIC KEY BLOCK-----")
            .with(&config.installer_url, SCRIPT)
    }

    fn run_with(
        host: &Host,
        config: &BootstrapConfig,
        runner: &FakeRunner,
        fetcher: &FakeFetcher,
        answer: bool,
    ) -> Result<Outcome> {
        let journal = Journal::disabled();
        let mut prompt = FixedAnswer(answer);
        run(
            host,
            config,
            Deps {
                runner,
                fetcher,
                prompt: &mut prompt,
                journal: &journal,
            },
        )
    }

    #[test]
    fn test_non_root_has_no_side_effects() {
        let dir = TempDir::new().unwrap();
        let config = jammy(dir.path());
        let runner = FakeRunner::new();
        let fetcher = fetcher_for(&config);
        let host = Host {
            is_root: false,
            sudo_user: Some("alice".into()),
        };

        let err = run_with(&host, &config, &runner, &fetcher, true).unwrap_err();

        assert_eq!(crate::error::exit_code_for(&err), 1);
        assert!(err.to_string().contains("root"));
        assert!(runner.calls().is_empty());
        assert!(fetcher.fetched().is_empty());
        assert!(!config.lock_path.exists());
        assert!(!config.installer_path.exists());
    }

    #[test]
    fn test_docker_absent_is_installed() {
        let dir = TempDir::new().unwrap();
        let config = jammy(dir.path());
        let runner = FakeRunner::new()
            .with_output("dpkg --print-architecture", "amd64")
            .with_pipe_output(b"dearmored");
        let fetcher = fetcher_for(&config);

        let outcome = run_with(&root(None), &config, &runner, &fetcher, false).unwrap();

        assert_eq!(outcome.docker, DockerAction::Installed);
        assert!(outcome.release_matched);
        let calls = runner.calls();
        let pos = |needle: &str| calls.iter().position(|c| c.contains(needle)).unwrap();
        assert!(pos("apt-get upgrade -y") < pos("apt-get install -y apt-transport-https"));
        assert!(pos("apt-get install -y apt-transport-https") < pos("docker-ce"));
        assert!(pos("docker-ce") < pos("systemctl start docker"));
        assert!(pos("systemctl start docker") < pos("systemctl enable docker"));
        assert!(pos("systemctl enable docker") < pos("docker compose version"));
        assert!(config.sources_list.exists());
        assert!(config.docker_keyring().exists());
    }

    #[test]
    fn test_docker_present_skips_install_but_checks_compose() {
        let dir = TempDir::new().unwrap();
        let config = jammy(dir.path());
        let runner = FakeRunner::new().on_path("docker");
        let fetcher = fetcher_for(&config);

        let outcome = run_with(&root(None), &config, &runner, &fetcher, false).unwrap();

        assert_eq!(outcome.docker, DockerAction::AlreadyPresent);
        let calls = runner.calls();
        assert!(!calls.iter().any(|c| c.contains("docker-ce")));
        assert!(!calls.iter().any(|c| c.starts_with("systemctl")));
        assert!(calls.iter().any(|c| c == "docker compose version"));
        assert!(!config.sources_list.exists());
        assert_eq!(fetcher.fetched(), vec![config.installer_url.clone()]);
    }

    #[test]
    fn test_sudo_user_added_to_group_and_home_dir() {
        let dir = TempDir::new().unwrap();
        let config = jammy(dir.path());
        let runner = FakeRunner::new().on_path("docker");
        let fetcher = fetcher_for(&config);

        let outcome =
            run_with(&root(Some("nobody-yams-test")), &config, &runner, &fetcher, false).unwrap();

        assert!(runner
            .calls()
            .contains(&"usermod -aG docker nobody-yams-test".to_string()));
        assert_eq!(outcome.group_user.as_deref(), Some("nobody-yams-test"));
        assert_eq!(
            outcome.install_dir,
            PathBuf::from("/home/nobody-yams-test/yams")
        );
    }

    #[test]
    fn test_true_root_uses_system_dir_and_skips_group() {
        let dir = TempDir::new().unwrap();
        let config = jammy(dir.path());
        let runner = FakeRunner::new().on_path("docker");
        let fetcher = fetcher_for(&config);

        let outcome = run_with(&root(None), &config, &runner, &fetcher, false).unwrap();

        assert!(!runner.calls().iter().any(|c| c.starts_with("usermod")));
        assert_eq!(outcome.install_dir, PathBuf::from("/opt/yams"));
    }

    #[test]
    fn test_answer_no_leaves_installer_unexecuted() {
        let dir = TempDir::new().unwrap();
        let config = jammy(dir.path());
        let runner = FakeRunner::new().on_path("docker");
        let fetcher = fetcher_for(&config);
        let journal = Journal::disabled();
        let mut prompt = LinePrompt::new(Cursor::new(b"n\n".to_vec()), Vec::new());

        let outcome = run(
            &root(None),
            &config,
            Deps {
                runner: &runner,
                fetcher: &fetcher,
                prompt: &mut prompt,
                journal: &journal,
            },
        )
        .unwrap();

        assert_eq!(outcome.hand_off, HandOff::Deferred);
        assert!(!runner.calls().iter().any(|c| c.starts_with("bash ")));
        assert_eq!(fs::read(&config.installer_path).unwrap(), SCRIPT);
    }

    #[test]
    fn test_answer_capital_y_executes_installer() {
        let dir = TempDir::new().unwrap();
        let config = jammy(dir.path());
        let runner = FakeRunner::new().on_path("docker");
        let fetcher = fetcher_for(&config);
        let journal = Journal::disabled();
        let mut prompt = LinePrompt::new(Cursor::new(b"Y\n".to_vec()), Vec::new());

        let outcome = run(
            &root(None),
            &config,
            Deps {
                runner: &runner,
                fetcher: &fetcher,
                prompt: &mut prompt,
                journal: &journal,
            },
        )
        .unwrap();

        assert_eq!(outcome.hand_off, HandOff::Executed);
        let expected = format!("bash {}", config.installer_path.display());
        assert_eq!(runner.calls().last(), Some(&expected));
    }

    #[test]
    fn test_compose_failure_stops_before_download() {
        let dir = TempDir::new().unwrap();
        let config = jammy(dir.path());
        let runner = FakeRunner::new()
            .on_path("docker")
            .failing("docker compose version", 1);
        let fetcher = fetcher_for(&config);

        let err = run_with(&root(Some("alice")), &config, &runner, &fetcher, true).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BootstrapError>(),
            Some(BootstrapError::ComposeUnavailable)
        ));
        assert_eq!(crate::error::exit_code_for(&err), 1);
        assert!(fetcher.fetched().is_empty());
        assert!(!config.installer_path.exists());
        assert!(!runner.calls().iter().any(|c| c.starts_with("usermod")));
    }

    #[test]
    fn test_release_mismatch_only_warns() {
        let dir = TempDir::new().unwrap();
        let config = sandbox(dir.path(), "ID=ubuntu\nVERSION_ID=\"24.04\"\n");
        let runner = FakeRunner::new().on_path("docker");
        let fetcher = fetcher_for(&config);

        let outcome = run_with(&root(None), &config, &runner, &fetcher, false).unwrap();
        assert!(!outcome.release_matched);
    }

    #[test]
    fn test_unreadable_release_only_warns() {
        let dir = TempDir::new().unwrap();
        let mut config = jammy(dir.path());
        config.os_release_path = dir.path().join("missing");
        let runner = FakeRunner::new().on_path("docker");
        let fetcher = fetcher_for(&config);

        let outcome = run_with(&root(None), &config, &runner, &fetcher, false).unwrap();
        assert!(!outcome.release_matched);
    }

    #[test]
    fn test_update_failure_aborts_with_child_code() {
        let dir = TempDir::new().unwrap();
        let config = jammy(dir.path());
        let runner = FakeRunner::new().failing("apt-get update", 100);
        let fetcher = fetcher_for(&config);

        let err = run_with(&root(None), &config, &runner, &fetcher, true).unwrap_err();

        assert_eq!(crate::error::exit_code_for(&err), 100);
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_concurrent_run_refused() {
        let dir = TempDir::new().unwrap();
        let config = jammy(dir.path());
        let _held = RunLock::acquire(&config.lock_path).unwrap();
        let runner = FakeRunner::new().on_path("docker");
        let fetcher = fetcher_for(&config);

        assert!(run_with(&root(None), &config, &runner, &fetcher, false).is_err());
        assert!(runner.calls().is_empty());
    }
}
