#![no_main]

use dot_core::protocol::{CompletionRequest, EncodeOptions, encode_to_string};
use dot_core::{CommandNode, CommandTree, OptionSpec, resolve};
use libfuzzer_sys::fuzz_target;

fn tree() -> Option<CommandTree> {
    let root = CommandNode::new("dot")
        .option(OptionSpec::long("json"))
        .subcommand(
            CommandNode::new("list")
                .alias("ls")
                .subcommand(CommandNode::new("templates"))
                .subcommand(CommandNode::new("tutorials")),
        )
        .subcommand(
            CommandNode::new("init").subcommand(
                CommandNode::new("contracts").subcommand(
                    CommandNode::new("hardhat").option(
                        OptionSpec::long("network")
                            .with_short('n')
                            .choices(["dev", "test"]),
                    ),
                ),
            ),
        )
        .subcommand(CommandNode::new("__complete").hidden(true));
    CommandTree::new(root).ok()
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Some(tree) = tree() else {
        return;
    };
    let args: Vec<&str> = text.split('\n').collect();
    let request = CompletionRequest::parse(&args[..]);
    let result = resolve(&tree, &request.context);
    let out = encode_to_string(&result, &EncodeOptions::default());
    for line in out.lines() {
        assert!(!line.contains('\r'));
    }
});
