//! End-to-end resolution scenarios over a small `dot`-shaped tree.

use dot_core::protocol::{CompletionRequest, EncodeOptions, encode_to_string};
use dot_core::{
    CommandNode, CommandTree, CompletionKind, CompletionResult, OptionSpec, ResolutionContext,
    Severity, resolve,
};

fn dot_tree() -> CommandTree {
    let root = CommandNode::new("dot")
        .subcommand(
            CommandNode::new("list")
                .about("Discover templates and tutorials")
                .subcommand(CommandNode::new("templates").about("List available project templates"))
                .subcommand(CommandNode::new("tutorials").about("List curated tutorials")),
        )
        .subcommand(
            CommandNode::new("init")
                .about("Initialize a project")
                .subcommand(
                    CommandNode::new("contracts").subcommand(
                        CommandNode::new("hardhat").option(
                            OptionSpec::long("network")
                                .takes_value()
                                .choices(["dev", "test"]),
                        ),
                    ),
                ),
        );
    CommandTree::new(root).expect("scenario tree is valid")
}

fn complete(tokens: &[&str], fragment: &str) -> CompletionResult {
    resolve(
        &dot_tree(),
        &ResolutionContext::new(tokens.iter().copied(), fragment),
    )
}

fn inserts(result: &CompletionResult) -> Vec<&str> {
    result.inserts().collect()
}

#[test]
fn empty_line_lists_root_commands_in_declaration_order() {
    let result = complete(&[], "");
    assert_eq!(inserts(&result), vec!["list", "init"]);
    assert!(result.note.is_none());
    assert_eq!(result.kind, CompletionKind::Subcommand);
}

#[test]
fn prefix_matches_root_command() {
    let result = complete(&["li"], "li");
    assert_eq!(inserts(&result), vec!["list"]);
    assert_eq!(
        result.items[0].display.as_deref(),
        Some("Discover templates and tutorials")
    );
}

#[test]
fn flag_completion_at_nested_node() {
    let result = complete(&["init", "contracts", "hardhat"], "--net");
    assert_eq!(result.kind, CompletionKind::Flag);
    assert_eq!(inserts(&result), vec!["--network"]);
}

#[test]
fn partial_word_without_echo_completes_children() {
    let result = complete(&["list"], "t");
    assert_eq!(result.kind, CompletionKind::Subcommand);
    assert_eq!(inserts(&result), vec!["templates", "tutorials"]);
    assert!(result.note.is_none());
}

#[test]
fn value_completion_after_bare_flag() {
    let result = complete(&["init", "contracts", "hardhat", "--network"], "");
    assert_eq!(result.kind, CompletionKind::Value);
    assert_eq!(inserts(&result), vec!["dev", "test"]);
}

#[test]
fn unknown_root_fragment_is_reported() {
    let result = complete(&["bogus"], "bogus");
    assert!(result.items.is_empty());
    assert_eq!(
        result.note.as_deref(),
        Some("'bogus' is not a subcommand of 'dot'.")
    );
    assert_eq!(result.severity, Some(Severity::Error));
}

#[test]
fn inline_value_completion() {
    let result = complete(&["init", "contracts", "hardhat", "--network=d"], "--network=d");
    assert_eq!(result.kind, CompletionKind::Value);
    assert_eq!(inserts(&result), vec!["dev"]);
}

#[test]
fn program_name_prefix_is_transparent() {
    for (tokens, fragment) in [
        (vec!["list"], ""),
        (vec!["list", "t"], "t"),
        (vec!["init", "contracts", "hardhat", "--network"], ""),
        (vec!["bogus"], "bogus"),
    ] {
        let mut with_program = vec!["dot"];
        with_program.extend(tokens.iter().copied());
        assert_eq!(
            complete(&with_program, fragment),
            complete(&tokens, fragment),
            "tokens {tokens:?} fragment {fragment:?}"
        );
    }
}

#[test]
fn unknown_token_mid_path_names_parent() {
    let result = complete(&["init", "bogus", "hardhat"], "");
    assert!(result.items.is_empty());
    assert_eq!(
        result.note.as_deref(),
        Some("'bogus' is not a subcommand of 'init'.")
    );
}

#[test]
fn request_parsing_feeds_resolver() {
    let request = CompletionRequest::parse(&[
        "zsh",
        "--cur=--network=t",
        "--",
        "dot",
        "init",
        "contracts",
        "hardhat",
        "--network=t",
    ]);
    let result = resolve(&dot_tree(), &request.context);
    assert_eq!(inserts(&result), vec!["test"]);
}

#[test]
fn malformed_request_completes_from_root() {
    let request = CompletionRequest::parse(&["zsh", "--cur"]);
    let result = resolve(&dot_tree(), &request.context);
    assert_eq!(inserts(&result), vec!["list", "init"]);
}

#[test]
fn encoded_subcommand_listing() {
    let result = complete(&["list"], "");
    let out = encode_to_string(&result, &EncodeOptions::default());
    assert_eq!(
        out,
        "COLOR\tgreen\n\
         HEADER\t dot commands\n\
         templates\u{1f}templates  -- List available project templates\n\
         tutorials\u{1f}tutorials  -- List curated tutorials\n"
    );
}

#[test]
fn result_serializes_for_debugging() {
    let result = complete(&["bogus"], "bogus");
    let json = serde_json::to_value(&result).expect("result serializes");
    assert_eq!(json["kind"], "invalid");
    assert_eq!(json["severity"], "error");
    assert_eq!(json["items"].as_array().map(Vec::len), Some(0));
}

#[test]
fn tree_is_shareable_across_threads() {
    let tree = dot_tree();
    let expected = resolve(&tree, &ResolutionContext::new(["list"], ""));
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| resolve(&tree, &ResolutionContext::new(["list"], ""))))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("thread must not panic"), expected);
        }
    });
}
