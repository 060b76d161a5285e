use crate::cli::CliContext;
use crate::constants;
use crate::core::bootstrap::{self, Deps, DockerAction};
use crate::core::installer::HandOff;
use crate::util::exec::SystemRunner;
use crate::util::fetch::HttpFetcher;
use crate::util::journald::Journal;
use crate::util::privilege::Host;
use crate::util::prompt::{FixedAnswer, Prompt, TerminalPrompt};
use crate::util::term;
use anyhow::Result;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// Run the YAMS installer without asking
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// `--yes` wins; otherwise non-interactive runs decline and print the
/// manual command.
fn choose_prompt(yes: bool, non_interactive: bool) -> Box<dyn Prompt> {
    if yes {
        Box::new(FixedAnswer(true))
    } else if non_interactive {
        Box::new(FixedAnswer(false))
    } else {
        Box::new(TerminalPrompt)
    }
}

pub fn run(ctx: &CliContext, args: InstallArgs) -> Result<()> {
    let host = Host::detect();
    host.require_root()?;

    let config = ctx.load_config()?;
    let runner = SystemRunner;
    let fetcher = HttpFetcher::new(Duration::from_secs(constants::FETCH_TIMEOUT_SECS))?;
    let journal = Journal::new(constants::JOURNALD_TAG, config.journald);
    let mut prompt = choose_prompt(args.yes, ctx.non_interactive);

    let outcome = bootstrap::run(
        &host,
        &config,
        Deps {
            runner: &runner,
            fetcher: &fetcher,
            prompt: prompt.as_mut(),
            journal: &journal,
        },
    )?;

    println!();
    term::ok("Bootstrap complete.");
    if outcome.docker == DockerAction::Installed {
        println!("  docker: installed and enabled");
    } else {
        println!("  docker: already present");
    }
    if let Some(user) = &outcome.group_user {
        println!("  docker group: {} (re-login required)", user);
    }
    println!("  install dir: {}", outcome.install_dir.display());
    if outcome.hand_off == HandOff::Deferred {
        println!("  installer: not run");
    }
    Ok(())
}
