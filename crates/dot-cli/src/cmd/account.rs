//! `dot account` — keypair utilities and account lookups.

use crate::invocation::Invocation;
use crate::output::{OutputMode, render_item};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Generate a new keypair (delegates to subkey under the hood)
    Generate(GenerateArgs),
    /// Show metadata for an account
    Info(AccountId),
    /// Show on-chain balance for an account
    Balance(AccountId),
    /// Configure a locally known account (labels, defaults, network)
    Configure(AccountId),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Arguments passed through to the key generator unchanged
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub passthrough: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AccountId {
    /// Account, address, or alias
    pub id: String,
}

fn invocation(args: &AccountArgs) -> Invocation {
    match &args.command {
        AccountCommand::Generate(g) => {
            Invocation::new("account generate").args(g.passthrough.iter().cloned())
        }
        AccountCommand::Info(a) => Invocation::new("account info").arg(a.id.clone()),
        AccountCommand::Balance(a) => Invocation::new("account balance").arg(a.id.clone()),
        AccountCommand::Configure(a) => Invocation::new("account configure").arg(a.id.clone()),
    }
}

/// Execute `dot account <action>`.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_account(args: &AccountArgs, output: OutputMode) -> Result<()> {
    render_item(&invocation(args), output)?;
    Ok(())
}
