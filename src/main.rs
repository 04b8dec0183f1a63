//! revlock - reproducible dependency installer
//!
//! Command line entry point; all work happens in the library crate.

use clap::Parser;

use revlock::cli::{Cli, Commands};
use revlock::{commands, logging};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.workspace, args),
        Commands::Plan(args) => commands::plan::run(cli.workspace, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
