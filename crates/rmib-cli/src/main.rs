pub mod cli;
pub mod cmd;
pub mod error;
pub mod io;

pub use cli::{Cli, Command, OutputFormat, Strictness};

use clap::Parser;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = dispatch(&cli) {
        eprintln!("{}", e.message());
        std::process::exit(e.exit_code());
    }
}

/// Dispatches the parsed CLI arguments to the appropriate command handler.
fn dispatch(cli: &Cli) -> Result<(), error::CliError> {
    match &cli.command {
        Command::Check { files, modules } => {
            let outcome = cmd::load(cli, files, modules)?;
            cmd::check::run(&outcome, cli.format)
        }
        Command::Tree { files, modules, root } => {
            let outcome = cmd::load(cli, files, modules)?;
            cmd::tree::run(&outcome, root.as_deref(), cli.format)
        }
        Command::Query { query, files, modules } => {
            let outcome = cmd::load(cli, files, modules)?;
            cmd::query::run(&outcome, query, cli.format)
        }
    }
}
