mod commands;
mod handlers;
mod output;

use clap::Parser;
use commands::Cli;
use output::{init_logger, print_error};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    if let Err(err) = handlers::handle_command(cli.command) {
        print_error(&err.to_string());
        std::process::exit(1);
    }
    Ok(())
}
