//! Command-line driver.
//!
//! Plays the code-model walker for the engine: every source file is one
//! fragment starting at line 1.

pub mod args;
pub mod commands;
pub mod exit_status;
pub mod files;
pub mod logging;
pub mod report;
mod run;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;
pub use run::run_cli;
