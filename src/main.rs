use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use seedex::config::{validate, CliArgs};
use seedex::engine;

fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return ExitCode::SUCCESS;
        }
        // clap's own message for malformed invocations, but a single
        // failure exit code for every error class
        Err(err) => {
            eprint!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let config = match validate(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("seedex: error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = engine::run(&config) {
        eprintln!("seedex: error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
