use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use vloc::cli::{Arguments, ExitStatus, logging::init_tracing, run_cli};

fn main() -> ExitCode {
    init_tracing();
    let args = Arguments::parse();

    match run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{} {:#}", "error:".bold().red(), err);
            ExitStatus::Error.into()
        }
    }
}
