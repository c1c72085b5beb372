//! Main entry point for csvdelta CLI

use clap::Parser;
use csvdelta::cli::Cli;
use csvdelta::commands::execute_command;

fn main() {
    // Missing arguments print the usage and exit before any I/O
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over the flags
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    if let Err(e) = execute_command(&cli) {
        log::error!("Delta run failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
