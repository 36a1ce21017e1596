mod commands;
mod context;
mod error;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};

use crate::commands::Commands;
use crate::context::RemoteArgs;
use crate::error::{CliError, error_chain};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(version, about = "Changeset-driven release automation", long_about = None)]
struct Cli {
    /// Path to start project discovery from (default: current directory)
    #[arg(long = "path", short = 'C', global = true)]
    path: Option<PathBuf>,

    /// More log output (-v info, -vv debug); CADENCE_LOG overrides
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    remote: RemoteArgs,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let start_path = match resolve_start_path(cli.path) {
        Ok(path) => path,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cli.command.execute(&start_path, cli.remote) {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn resolve_start_path(path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match path {
        Some(p) => Ok(p),
        None => std::env::current_dir().map_err(CliError::CurrentDir),
    }
}

fn print_error(error: &CliError) {
    let chain = error_chain(error);

    if let Some((message, causes)) = chain.split_first() {
        eprintln!("error: {message}");
        for cause in causes {
            eprintln!("caused by: {cause}");
        }
    }

    if std::env::var("GITHUB_ACTIONS").is_ok_and(|value| value == "true") {
        eprintln!("::error ::{}", chain.join(": "));
    }
}
