//! Download of the YAMS installer and the interactive hand-off to it.

use crate::constants;
use crate::models::config::BootstrapConfig;
use crate::util::exec::{Invocation, Runner};
use crate::util::fetch::Fetch;
use crate::util::prompt::Prompt;
use crate::util::{fs as boot_fs, term};
use anyhow::{bail, Context, Result};
use std::path::Path;

pub const RUN_QUESTION: &str = "Do you want to run the YAMS installer now?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandOff {
    Executed,
    Deferred,
}

/// Fetch the installer script and store it executable at `installer_path`.
pub fn download(fetcher: &dyn Fetch, config: &BootstrapConfig) -> Result<()> {
    let script = fetcher
        .fetch(&config.installer_url)
        .context("download YAMS installer")?;
    if script.is_empty() {
        bail!("installer download from {} was empty", config.installer_url);
    }
    boot_fs::write_atomic(&config.installer_path, &script, constants::INSTALLER_MODE)
        .with_context(|| format!("save installer to {}", config.installer_path.display()))
}

pub fn run_invocation(script: &Path) -> Invocation {
    Invocation::new("bash").arg(script.display().to_string())
}

/// What to type to run the installer later.
pub fn manual_command(script: &Path) -> String {
    format!("sudo {}", run_invocation(script))
}

/// Ask, then run the installer or print how to run it later.
pub fn hand_off(
    runner: &dyn Runner,
    prompt: &mut dyn Prompt,
    config: &BootstrapConfig,
) -> Result<HandOff> {
    if prompt.confirm(RUN_QUESTION)? {
        term::info("Running the YAMS installer...");
        runner
            .run(&run_invocation(&config.installer_path))
            .context("YAMS installer")?;
        return Ok(HandOff::Executed);
    }
    term::info("Skipping the YAMS installer. You can run it later with:");
    println!("  {}", manual_command(&config.installer_path));
    Ok(HandOff::Deferred)
}
