//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `literals`: Report string literals that still need localizing
//! - `references`: Report references to known resource entries
//! - `init`: Initialize vloc configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

use crate::core::lang::Language;

#[derive(Debug, Parser)]
#[command(name = "vloc", author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Literals(cmd)) => cmd.common.verbose,
            Some(Command::References(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// `--lang` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    #[value(name = "csharp", alias = "cs")]
    CSharp,
    #[value(name = "vb")]
    VisualBasic,
    #[value(name = "aspnet-csharp")]
    AspNetCSharp,
    #[value(name = "aspnet-vb")]
    AspNetVisualBasic,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::CSharp => Language::CSharp,
            LanguageArg::VisualBasic => Language::VisualBasic,
            LanguageArg::AspNetCSharp => Language::AspNetCSharp,
            LanguageArg::AspNetVisualBasic => Language::AspNetVisualBasic,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Cargo-style report
    #[default]
    Text,
    /// JSON array on stdout
    Json,
}

/// Common arguments shared by the scan commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Files or directories to scan (default: current directory)
    pub paths: Vec<PathBuf>,

    /// Scan every file as this language instead of guessing from the extension
    #[arg(long, value_enum)]
    pub lang: Option<LanguageArg>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn paths_or_cwd(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.paths.clone()
        }
    }
}

#[derive(Debug, Args)]
pub struct LiteralsCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Also list literals excluded by a no-localize comment or region
    #[arg(long)]
    pub all: bool,

    /// No-localize marker (overrides config file)
    #[arg(long)]
    pub marker: Option<String>,

    /// Keep concatenated VB literals separate
    #[arg(long)]
    pub no_merge: bool,
}

#[derive(Debug, Args)]
pub struct ReferencesCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// JSON file listing the known resource entries
    #[arg(short, long, env = "VLOC_RESOURCES")]
    pub resources: PathBuf,

    /// Enclosing namespace (default: first namespace declared in each file)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Imported namespace, in addition to the file's own imports.
    /// Can be specified multiple times: --import App.Text --import App.Forms
    #[arg(long = "import")]
    pub imports: Vec<String>,

    /// Namespace alias as ALIAS=NAMESPACE
    #[arg(long = "alias", value_parser = parse_alias)]
    pub aliases: Vec<(String, String)>,

    /// VB project root namespace (overrides config file)
    #[arg(long)]
    pub root_namespace: Option<String>,

    /// Resource file that wins ambiguous bare references (overrides config file)
    #[arg(long)]
    pub preferred_origin: Option<String>,
}

fn parse_alias(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((alias, namespace)) if !alias.trim().is_empty() && !namespace.trim().is_empty() => {
            Ok((alias.trim().to_string(), namespace.trim().to_string()))
        }
        _ => Err(format!("expected ALIAS=NAMESPACE, got \"{value}\"")),
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report string literals that are not excluded from localization
    Literals(LiteralsCommand),
    /// Report references to known resource entries
    References(ReferencesCommand),
    /// Initialize a new .vlocrc.json configuration file
    Init,
}
