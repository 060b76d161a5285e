use clap::Parser;
use yams_bootstrap::{error, util::term};

fn main() {
    let cli = yams_bootstrap::cli::Cli::parse();
    if let Err(err) = cli.run() {
        term::error(&format!("{:#}", err));
        std::process::exit(error::exit_code_for(&err));
    }
}
