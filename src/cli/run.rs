use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{init::init, literals::literals, references::references},
    exit_status::ExitStatus,
};

/// Main entry point for the vloc CLI.
///
/// Dispatches to the command handler; `Err` means the command could not run
/// at all (config, resource file or path problems).
pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(Arguments { command }) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match command {
        Some(Command::Literals(cmd)) => literals(cmd),
        Some(Command::References(cmd)) => references(cmd),
        Some(Command::Init) => init(),
        None => Ok(ExitStatus::Success),
    }
}
