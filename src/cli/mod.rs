//! CLI routing and command dispatch.

use crate::core::config;
use crate::models::config::BootstrapConfig;
use crate::util::term::{self, ColorMode};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod doctor;
pub mod install;
pub mod plan;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub config_path: PathBuf,
    /// Set by --config or the env var; such a file must exist
    pub config_explicit: bool,
    pub non_interactive: bool,
}

impl CliContext {
    /// Load the override file. Deferred so handlers can check privileges first.
    pub fn load_config(&self) -> Result<BootstrapConfig> {
        config::load(&self.config_path, self.config_explicit)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "yams-bootstrap",
    version,
    about = "Provision an Ubuntu 22.04 host with Docker and hand off to the YAMS installer"
)]
pub struct Cli {
    /// Optional TOML file overriding built-in URLs, packages, and paths
    #[arg(long, global = true, value_name = "PATH", env = "YAMS_BOOTSTRAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run without prompts; the installer is not started unless --yes is given
    #[arg(
        long,
        global = true,
        env = "YAMS_BOOTSTRAP_NON_INTERACTIVE",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub non_interactive: bool,

    /// Colorize status output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Defaults to `install`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        term::set_color_mode(self.color);

        let resolved = config::resolve_path(self.config);
        let ctx = CliContext {
            config_path: resolved.path,
            config_explicit: resolved.explicit,
            non_interactive: self.non_interactive,
        };

        match self.command.unwrap_or_default() {
            Commands::Install(args) => install::run(&ctx, args),
            Commands::Plan(args) => plan::run(&ctx, args),
            Commands::Doctor(args) => doctor::run(&ctx, args),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full bootstrap (requires root)
    Install(install::InstallArgs),
    /// Print every command and file write the bootstrap would perform
    Plan(plan::PlanArgs),
    /// Diagnose host readiness (safe, read-only)
    Doctor(doctor::DoctorArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Install(install::InstallArgs::default())
    }
}
