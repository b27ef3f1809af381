//! `dot __complete` — runtime completion backend for the shell shims.
//!
//! The command tree is derived from the clap definition once per request, then
//! handed to [`dot_core::resolve`]. Nothing here ever fails the process: a
//! broken tree or config degrades to fewer candidates, never to a usage error
//! printed into the user's prompt.

use std::io::{self, Write};

use dot_core::config::{UserConfig, load_user_config};
use dot_core::protocol::{COMPLETE_MARKER, CompletionRequest, EncodeOptions, encode};
use dot_core::{CommandNode, CommandTree, OptionSpec, TreeError, resolve};
use tracing::{debug, error, warn};

/// Convert a clap command into a validated completion tree.
///
/// The hidden [`COMPLETE_MARKER`] node is attached to the root so that the
/// marker itself is never reported as an unknown subcommand.
///
/// # Errors
///
/// Returns [`TreeError`] if the clap definition produces colliding names.
pub fn command_tree(mut command: clap::Command) -> Result<CommandTree, TreeError> {
    command.build();
    let root = node_from_clap(&command)
        .subcommand(CommandNode::new(COMPLETE_MARKER).hidden(true));
    CommandTree::new(root)
}

fn node_from_clap(command: &clap::Command) -> CommandNode {
    let mut node = CommandNode::new(command.get_name()).hidden(command.is_hide_set());
    if let Some(about) = command.get_about() {
        node = node.about(about.to_string());
    }
    for alias in command.get_all_aliases() {
        node = node.alias(alias);
    }
    for option in command
        .get_arguments()
        .filter(|a| !a.is_positional() && !a.is_hide_set())
        .filter_map(option_from_clap)
    {
        node = node.option(option);
    }
    for sub in command.get_subcommands() {
        node = node.subcommand(node_from_clap(sub));
    }
    node
}

fn option_from_clap(arg: &clap::Arg) -> Option<OptionSpec> {
    let mut spec = match (arg.get_short(), arg.get_long()) {
        (None, None) => return None,
        (Some(c), None) => OptionSpec::short(c),
        (None, Some(long)) => OptionSpec::long(long),
        (Some(c), Some(long)) => OptionSpec::long(long).with_short(c),
    };
    if arg.get_action().takes_values() {
        let choices: Vec<String> = arg
            .get_possible_values()
            .into_iter()
            .filter(|v| !v.is_hide_set())
            .map(|v| v.get_name().to_string())
            .collect();
        spec = if choices.is_empty() {
            spec.takes_value()
        } else {
            spec.choices(choices)
        };
    }
    if let Some(help) = arg.get_help() {
        spec = spec.help(help.to_string());
    }
    Some(spec)
}

fn encode_options() -> EncodeOptions {
    match load_user_config() {
        Ok(UserConfig { completion, .. }) => completion.encode_options(),
        Err(e) => {
            warn!("ignoring unreadable config during completion: {e}");
            EncodeOptions::default()
        }
    }
}

/// Resolve one request and write the tagged response to `out`.
///
/// # Errors
///
/// Returns any error raised while writing to `out`.
pub fn write_completions(
    tree: &CommandTree,
    request: &CompletionRequest,
    opts: &EncodeOptions,
    out: &mut dyn Write,
) -> io::Result<()> {
    let result = resolve(tree, &request.context);
    debug!(
        shell = request.shell.as_deref().unwrap_or("unknown"),
        kind = ?result.kind,
        candidates = result.items.len(),
        "resolved completion request"
    );
    encode(&result, opts, out)?;
    out.flush()
}

/// Handle `dot __complete <shell> --cur <fragment> -- <tokens...>`.
///
/// `args` are the raw arguments after the marker.
pub fn run_complete(args: &[String], command: clap::Command) {
    let request = CompletionRequest::parse(args);
    let tree = match command_tree(command) {
        Ok(tree) => tree,
        Err(e) => {
            error!("completion tree is invalid: {e}");
            return;
        }
    };

    let opts = encode_options();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = write_completions(&tree, &request, &opts, &mut out) {
        // The shell closed the pipe; nothing left to report to.
        debug!("failed to write completions: {e}");
    }
}
