//! afevt CLI entry point.

use afevt::cli::{self, Cli, Commands, EXIT_ERROR};
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Lint(args) => cli::run_lint(&args),
        Commands::Init(args) => cli::run_init(&args),
        Commands::Rules => cli::run_rules(),
    };

    let exit_code = match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
