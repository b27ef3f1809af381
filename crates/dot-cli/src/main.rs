#![forbid(unsafe_code)]

mod cmd;
mod invocation;
mod output;

use anyhow::Context as _;
use clap::{CommandFactory, Parser, Subcommand};
use dot_core::protocol::COMPLETE_MARKER;
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "dot",
    author,
    version,
    about = "Polkadot toolbox: a unified, wide-thin wrapper over core ecosystem tools",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        visible_alias = "ls",
        about = "Discover templates, tutorials, devcontainers, and dynamic sources",
        after_help = "EXAMPLES:\n    # List project templates\n    dot list templates\n\n    # Emit machine-readable output\n    dot list tutorials --format json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        about = "Initialize a project from a template and set up its environment",
        after_help = "EXAMPLES:\n    # Scaffold a Hardhat project against the dev network\n    dot init contracts hardhat ./flipper --network dev\n\n    # Only fetch template files\n    dot init dapp ./my-dapp --template-only"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "Fetch content by id into a destination directory",
        after_help = "EXAMPLES:\n    # Fetch a template\n    dot fetch template hardhat-flipper ./flipper\n\n    # Fetch a binary\n    dot fetch binary subkey ./bin"
    )]
    Fetch(cmd::fetch::FetchArgs),

    #[command(
        about = "Keypair utilities and on-chain lookups",
        after_help = "EXAMPLES:\n    # Generate a keypair (arguments pass through to subkey)\n    dot account generate --scheme sr25519\n\n    # Show an account's balance\n    dot account balance alice"
    )]
    Account(cmd::account::AccountArgs),

    #[command(
        about = "Generate shell completion scripts",
        long_about = "Print a completion shim that asks `dot` for candidates at runtime.",
        after_help = "EXAMPLES:\n    # Enable zsh completions for this session\n    source <(dot completions zsh)\n\n    # Enable fish completions\n    dot completions fish | source"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("DOT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "dot=debug,dot_core=debug,info"
        } else {
            "dot=info,warn"
        })
    });

    let format = env::var("DOT_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args_os()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    // Completion requests bypass clap so malformed input never turns into a
    // usage error.
    if args.get(1).map(String::as_str) == Some(COMPLETE_MARKER) {
        init_tracing(false);
        cmd::complete::run_complete(&args[2..], Cli::command());
        return Ok(());
    }

    let cli = Cli::parse_from(&args);
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let config = dot_core::config::load_user_config().context("Failed to load dot config")?;
    let output = output::resolve_output_mode(cli.json, config.output.as_deref());
    debug!(?output, "resolved output mode");

    match cli.command {
        Commands::List(args) => cmd::list::run_list(&args, output),
        Commands::Init(args) => cmd::init::run_init(&args, output),
        Commands::Fetch(args) => cmd::fetch::run_fetch(&args, output),
        Commands::Account(args) => cmd::account::run_account(&args, output),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
