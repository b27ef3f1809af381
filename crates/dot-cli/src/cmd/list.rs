//! `dot list` — discovery commands.

use crate::invocation::Invocation;
use crate::output::{OutputMode, render_item};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(subcommand)]
    pub command: ListCommand,
}

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// List available project templates
    Templates(FormatArgs),
    /// List curated tutorials
    Tutorials(FormatArgs),
    /// List first-party devcontainers
    Devcontainers(FormatArgs),
    /// List locally known accounts (or from a managed registry)
    Accounts(FormatArgs),
}

impl ListCommand {
    const fn name(&self) -> &'static str {
        match self {
            Self::Templates(_) => "templates",
            Self::Tutorials(_) => "tutorials",
            Self::Devcontainers(_) => "devcontainers",
            Self::Accounts(_) => "accounts",
        }
    }

    const fn format_args(&self) -> &FormatArgs {
        match self {
            Self::Templates(args)
            | Self::Tutorials(args)
            | Self::Devcontainers(args)
            | Self::Accounts(args) => args,
        }
    }
}

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Output format.
    #[arg(short, long, value_enum)]
    pub format: Option<ListFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Json,
    Csv,
    Human,
}

impl ListFormat {
    const fn output_mode(self) -> OutputMode {
        match self {
            Self::Json => OutputMode::Json,
            Self::Csv => OutputMode::Text,
            Self::Human => OutputMode::Pretty,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Human => "human",
        }
    }
}

fn invocation(args: &ListArgs) -> Invocation {
    let format = args.command.format_args().format.unwrap_or(ListFormat::Human);
    Invocation::new(format!("list {}", args.command.name())).opt("format", format.as_str())
}

/// Execute `dot list <source>`.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_list(args: &ListArgs, output: OutputMode) -> Result<()> {
    let mode = args
        .command
        .format_args()
        .format
        .map_or(output, ListFormat::output_mode);
    render_item(&invocation(args), mode)?;
    Ok(())
}
