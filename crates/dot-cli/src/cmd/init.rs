//! `dot init` — project scaffolding entry points.

use crate::invocation::Invocation;
use crate::output::{OutputMode, render_item};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(subcommand)]
    pub command: InitCommand,
}

#[derive(Subcommand, Debug)]
pub enum InitCommand {
    /// Initialize a smart-contracts project
    Contracts(ContractsArgs),
    /// Initialize a dapp project
    Dapp(ProjectArgs),
    /// Initialize a pallet project
    Pallet(ProjectArgs),
}

/// Which halves of project setup to run.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SetupFlags {
    /// Only set up environment (skip template files)
    #[arg(long, conflicts_with = "template_only")]
    pub env_only: bool,

    /// Only fetch template files (skip env setup)
    #[arg(long)]
    pub template_only: bool,
}

#[derive(Args, Debug)]
pub struct ContractsArgs {
    #[command(flatten)]
    pub setup: SetupFlags,

    #[command(subcommand)]
    pub framework: Framework,
}

#[derive(Subcommand, Debug)]
pub enum Framework {
    /// Initialize a Hardhat smart-contracts project
    Hardhat(FrameworkArgs),
    /// Initialize a Foundry smart-contracts project
    Foundry(FrameworkArgs),
    /// Initialize an ink! smart-contracts project
    Ink(FrameworkArgs),
}

#[derive(Args, Debug)]
pub struct FrameworkArgs {
    /// Target project directory
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Network the project is wired to
    #[arg(short, long, value_enum)]
    pub network: Option<Network>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Network {
    Dev,
    Test,
}

impl Network {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Test => "test",
        }
    }
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Target project directory
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub setup: SetupFlags,
}

fn with_setup(invocation: Invocation, setup: SetupFlags) -> Invocation {
    invocation
        .opt("env_only", setup.env_only)
        .opt("template_only", setup.template_only)
}

fn invocation(args: &InitArgs) -> Invocation {
    match &args.command {
        InitCommand::Contracts(contracts) => {
            let (name, framework) = match &contracts.framework {
                Framework::Hardhat(a) => ("hardhat", a),
                Framework::Foundry(a) => ("foundry", a),
                Framework::Ink(a) => ("ink", a),
            };
            let invocation = Invocation::new(format!("init contracts {name}"))
                .arg(framework.dir.display().to_string())
                .opt_some("network", framework.network.map(Network::as_str));
            with_setup(invocation, contracts.setup)
        }
        InitCommand::Dapp(project) => with_setup(
            Invocation::new("init dapp").arg(project.dir.display().to_string()),
            project.setup,
        ),
        InitCommand::Pallet(project) => with_setup(
            Invocation::new("init pallet").arg(project.dir.display().to_string()),
            project.setup,
        ),
    }
}

/// Execute `dot init <kind>`.
///
/// Reports the resolved invocation; scaffolding itself is delegated to the
/// ecosystem tools.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_init(args: &InitArgs, output: OutputMode) -> Result<()> {
    render_item(&invocation(args), output)?;
    Ok(())
}
