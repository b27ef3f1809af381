//! `dot fetch` — fetch curated content by id.

use crate::invocation::Invocation;
use crate::output::{OutputMode, render_item};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(subcommand)]
    pub command: FetchCommand,
}

#[derive(Subcommand, Debug)]
pub enum FetchCommand {
    /// Fetch a template by id
    Template(FetchTarget),
    /// Fetch a binary by id (e.g., subkey, nodes)
    Binary(FetchTarget),
}

#[derive(Args, Debug)]
pub struct FetchTarget {
    /// Content id
    pub id: String,

    /// Destination directory
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

fn invocation(args: &FetchArgs) -> Invocation {
    let (kind, target) = match &args.command {
        FetchCommand::Template(t) => ("template", t),
        FetchCommand::Binary(t) => ("binary", t),
    };
    Invocation::new(format!("fetch {kind}"))
        .arg(target.id.clone())
        .arg(target.dir.display().to_string())
}

/// Execute `dot fetch <kind> <id> <dir>`.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_fetch(args: &FetchArgs, output: OutputMode) -> Result<()> {
    render_item(&invocation(args), output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(subcommand)]
        command: FetchCommand,
    }

    #[test]
    fn binary_records_id_then_dir() {
        let command = Wrapper::parse_from(["test", "binary", "subkey", "./bin"]).command;
        let inv = invocation(&FetchArgs { command });
        assert_eq!(inv.command, "fetch binary");
        assert_eq!(inv.args, vec!["subkey", "./bin"]);
    }

    #[test]
    fn template_requires_both_positionals() {
        assert!(Wrapper::try_parse_from(["test", "template", "flipper"]).is_err());
    }
}
