//! Completion resolution over a [`CommandTree`].
//!
//! # Overview
//!
//! A shell asks for completions with the words typed so far and the word
//! under the cursor (the *fragment*). Resolution happens in two steps:
//!
//! 1. **Navigation**: walk committed tokens from the root, descending into
//!    the child whose name or alias matches each token exactly. Flags are
//!    skipped (a value-taking flag also skips its value). An unknown token
//!    stops the walk with a diagnostic note.
//! 2. **Classification**: decide, with the previous token and the fragment,
//!    whether the shell wants a flag value, a flag name, or a subcommand,
//!    then collect candidates in tree declaration order.
//!
//! # Input convention
//!
//! Tokens may end with an echo of a non-empty fragment; a last token equal to
//! the fragment is dropped before navigation, otherwise every token is
//! committed. Empty tokens are ignored, and a leading token equal to the
//! program name is stripped.
//!
//! # Failure model
//!
//! [`resolve`] never fails. Unknown subcommands are reported through
//! [`CompletionResult::note`] with an empty item list; unknown flags and
//! free-form values simply produce no candidates.

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::tree::{CommandNode, CommandTree, OptionSpec};

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// One completion request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    /// Words already on the command line, program name optional.
    pub tokens: Vec<String>,
    /// The word being typed; empty right after a space.
    pub fragment: String,
}

impl ResolutionContext {
    #[must_use]
    pub fn new<I, S>(tokens: I, fragment: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            fragment: fragment.into(),
        }
    }
}

/// One suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Text the shell inserts.
    pub insert: String,
    /// Annotation shown next to the suggestion, never inserted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Candidate {
    #[must_use]
    pub fn plain(insert: impl Into<String>) -> Self {
        Self {
            insert: insert.into(),
            display: None,
        }
    }

    #[must_use]
    pub fn described(insert: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            insert: insert.into(),
            display: Some(display.into()),
        }
    }
}

/// Display hint for the shell shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    /// Color name carried on the `COLOR` protocol line.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Info => "green",
            Self::Error => "red",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.color())
    }
}

/// What kind of word the request was classified as completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Subcommand,
    Flag,
    Value,
    /// A token or fragment that cannot name a subcommand.
    Invalid,
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionResult {
    pub kind: CompletionKind,
    pub items: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl CompletionResult {
    fn found(kind: CompletionKind, items: Vec<Candidate>) -> Self {
        Self {
            kind,
            items,
            note: None,
            severity: Some(Severity::Info),
        }
    }

    fn invalid(token: &str, node: &CommandNode) -> Self {
        Self {
            kind: CompletionKind::Invalid,
            items: Vec::new(),
            note: Some(format!(
                "'{token}' is not a subcommand of '{}'.",
                node.name()
            )),
            severity: Some(Severity::Error),
        }
    }

    /// Returns true when there is nothing to offer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert texts only, in order.
    pub fn inserts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|c| c.insert.as_str())
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve a completion request against `tree`.
#[must_use]
#[instrument(level = "debug", skip_all, fields(fragment = %ctx.fragment))]
pub fn resolve(tree: &CommandTree, ctx: &ResolutionContext) -> CompletionResult {
    let mut parts: Vec<&str> = ctx
        .tokens
        .iter()
        .map(String::as_str)
        .filter(|t| !t.is_empty())
        .collect();
    if parts.first() == Some(&tree.program()) {
        parts.remove(0);
    }

    let fragment = ctx.fragment.as_str();
    // Shells may or may not echo the fragment as the last token.
    let walk = match parts.split_last() {
        Some((last, committed)) if !fragment.is_empty() && *last == fragment => committed,
        _ => &parts[..],
    };

    let node = match navigate(tree.root(), walk) {
        Ok(node) => node,
        Err(result) => return result,
    };

    let result = classify(node, walk.last().copied(), fragment);
    debug!(
        active = node.name(),
        kind = ?result.kind,
        items = result.items.len(),
        "resolved completion"
    );
    result
}

/// Walk `walk` from `root` to the deepest matching node.
fn navigate<'t>(root: &'t CommandNode, walk: &[&str]) -> Result<&'t CommandNode, CompletionResult> {
    let mut node = root;
    let mut tokens = walk.iter().copied();

    while let Some(token) = tokens.next() {
        if is_flag(token) {
            let consumes_next =
                !token.contains('=') && node.find_option(token).is_some_and(OptionSpec::is_takes_value);
            if consumes_next {
                tokens.next();
            }
            continue;
        }

        let Some(child) = node.find_child(token) else {
            debug!(token, parent = node.name(), "token is not a subcommand");
            return Err(CompletionResult::invalid(token, node));
        };
        node = child;
    }

    Ok(node)
}

fn classify(node: &CommandNode, prev: Option<&str>, fragment: &str) -> CompletionResult {
    if let Some((flag, needle)) = value_request(node, prev, fragment) {
        return complete_value(node, flag, needle);
    }

    if fragment.starts_with('-') {
        return complete_flag(node, fragment);
    }

    if !fragment.is_empty() && !node.children().iter().any(|c| c.has_name_prefix(fragment)) {
        return CompletionResult::invalid(fragment, node);
    }

    complete_subcommand(node, fragment)
}

/// Returns `(flag, needle)` when the cursor sits on a flag's value.
fn value_request<'a>(
    node: &CommandNode,
    prev: Option<&'a str>,
    fragment: &'a str,
) -> Option<(&'a str, &'a str)> {
    if fragment.starts_with("--") {
        if let Some((flag, needle)) = fragment.split_once('=') {
            return Some((flag, needle));
        }
    }

    let prev = prev.filter(|p| is_flag(p) && !p.contains('='))?;
    // A known boolean switch expects no value; the next word is free.
    if node.find_option(prev).is_some_and(|o| !o.is_takes_value()) {
        return None;
    }
    let needle = fragment.split_once('=').map_or(fragment, |(_, v)| v);
    Some((prev, needle))
}

fn complete_value(node: &CommandNode, flag: &str, needle: &str) -> CompletionResult {
    let items = node
        .find_option(flag)
        .filter(|opt| opt.is_takes_value())
        .and_then(OptionSpec::choice_values)
        .map(|choices| {
            choices
                .iter()
                .filter(|v| v.starts_with(needle))
                .map(Candidate::plain)
                .collect()
        })
        .unwrap_or_default();
    CompletionResult::found(CompletionKind::Value, items)
}

fn complete_flag(node: &CommandNode, fragment: &str) -> CompletionResult {
    let items = node
        .options()
        .iter()
        .flat_map(|opt| {
            opt.spellings()
                .filter(|s| s.starts_with(fragment))
                .map(|s| Candidate {
                    insert: s.to_string(),
                    display: opt.description().map(str::to_string),
                })
        })
        .collect();
    CompletionResult::found(CompletionKind::Flag, items)
}

fn complete_subcommand(node: &CommandNode, fragment: &str) -> CompletionResult {
    let items = node
        .children()
        .iter()
        .filter(|c| !c.is_hidden() && c.has_name_prefix(fragment))
        .map(|c| Candidate {
            insert: c.name().to_string(),
            display: Some(c.description())
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        })
        .collect();
    CompletionResult::found(CompletionKind::Subcommand, items)
}

fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> CommandTree {
        let root = CommandNode::new("dot")
            .option(OptionSpec::long("verbose").with_short('v'))
            .subcommand(
                CommandNode::new("list")
                    .alias("ls")
                    .about("Discover templates")
                    .option(
                        OptionSpec::long("format")
                            .with_short('f')
                            .choices(["json", "csv", "human"])
                            .help("Output format"),
                    )
                    .subcommand(CommandNode::new("templates").about("List templates"))
                    .subcommand(CommandNode::new("tutorials").about("List tutorials")),
            )
            .subcommand(
                CommandNode::new("init").subcommand(
                    CommandNode::new("contracts")
                        .option(OptionSpec::long("env-only"))
                        .option(OptionSpec::long("label").takes_value())
                        .subcommand(CommandNode::new("hardhat")),
                ),
            )
            .subcommand(CommandNode::new("__complete").hidden(true).subcommand(CommandNode::new("zsh")));
        CommandTree::new(root).expect("test tree is valid")
    }

    fn run(tokens: &[&str], fragment: &str) -> CompletionResult {
        resolve(&tree(), &ResolutionContext::new(tokens.iter().copied(), fragment))
    }

    fn inserts(result: &CompletionResult) -> Vec<&str> {
        result.inserts().collect()
    }

    #[test]
    fn alias_prefix_offers_primary_name() {
        let result = run(&["l"], "l");
        assert_eq!(inserts(&result), vec!["list"]);
        assert_eq!(
            result.items[0].display.as_deref(),
            Some("Discover templates")
        );
    }

    #[test]
    fn alias_navigates_like_name() {
        assert_eq!(run(&["ls"], ""), run(&["list"], ""));
    }

    #[test]
    fn hidden_child_is_navigable_but_not_offered() {
        assert_eq!(inserts(&run(&[], "")), vec!["list", "init"]);
        assert_eq!(inserts(&run(&["__complete"], "")), vec!["zsh"]);
    }

    #[test]
    fn hidden_prefix_is_not_reported_invalid() {
        let result = run(&["__c"], "__c");
        assert!(result.items.is_empty());
        assert!(result.note.is_none());
        assert_eq!(result.kind, CompletionKind::Subcommand);
    }

    #[test]
    fn empty_tokens_are_ignored() {
        assert_eq!(run(&["list", ""], ""), run(&["list"], ""));
    }

    #[test]
    fn unknown_token_in_path_short_circuits() {
        let result = run(&["list", "bogus"], "");
        assert!(result.items.is_empty());
        assert_eq!(
            result.note.as_deref(),
            Some("'bogus' is not a subcommand of 'list'.")
        );
        assert_eq!(result.severity, Some(Severity::Error));
    }

    #[test]
    fn flag_value_is_skipped_during_navigation() {
        let result = run(&["list", "--format", "json"], "");
        assert_eq!(inserts(&result), vec!["templates", "tutorials"]);
    }

    #[test]
    fn inline_flag_value_is_skipped_during_navigation() {
        let result = run(&["list", "--format=json", "t"], "t");
        assert_eq!(inserts(&result), vec!["templates", "tutorials"]);
    }

    #[test]
    fn short_flag_value_completion() {
        let result = run(&["list", "-f"], "");
        assert_eq!(result.kind, CompletionKind::Value);
        assert_eq!(inserts(&result), vec!["json", "csv", "human"]);
    }

    #[test]
    fn value_completion_filters_by_fragment() {
        let result = run(&["list", "--format", "c"], "c");
        assert_eq!(inserts(&result), vec!["csv"]);
    }

    #[test]
    fn unknown_flag_value_is_silent_and_empty() {
        let result = run(&["list", "--nope"], "");
        assert_eq!(result.kind, CompletionKind::Value);
        assert!(result.items.is_empty());
        assert!(result.note.is_none());
    }

    #[test]
    fn free_form_value_yields_nothing() {
        let result = run(&["init", "contracts", "--label"], "");
        assert_eq!(result.kind, CompletionKind::Value);
        assert!(result.items.is_empty());
        assert!(result.note.is_none());
    }

    #[test]
    fn boolean_switch_does_not_expect_value() {
        let result = run(&["init", "contracts", "--env-only"], "");
        assert_eq!(result.kind, CompletionKind::Subcommand);
        assert_eq!(inserts(&result), vec!["hardhat"]);
    }

    #[test]
    fn flag_completion_lists_short_then_long() {
        let result = run(&["list"], "-");
        assert_eq!(inserts(&result), vec!["-f", "--format"]);
        assert_eq!(result.items[1].display.as_deref(), Some("Output format"));
    }

    #[test]
    fn flag_completion_is_node_local() {
        let result = run(&["list"], "--v");
        assert_eq!(result.kind, CompletionKind::Flag);
        assert!(result.items.is_empty());
        assert_eq!(inserts(&run(&[], "--v")), vec!["--verbose"]);
    }

    #[test]
    fn invalid_fragment_under_nested_node_names_that_node() {
        let result = run(&["init", "x"], "x");
        assert_eq!(
            result.note.as_deref(),
            Some("'x' is not a subcommand of 'init'.")
        );
    }

    #[test]
    fn leaf_node_with_empty_fragment_offers_nothing() {
        let result = run(&["init", "contracts", "hardhat"], "");
        assert!(result.items.is_empty());
        assert!(result.note.is_none());
    }

    #[test]
    fn fragment_without_echo_walks_every_token() {
        let result = run(&["list"], "t");
        assert_eq!(result.kind, CompletionKind::Subcommand);
        assert_eq!(inserts(&result), vec!["templates", "tutorials"]);
        assert!(result.note.is_none());
    }

    #[test]
    fn echoed_and_bare_fragments_agree() {
        assert_eq!(run(&["list", "-"], "-"), run(&["list"], "-"));
        assert_eq!(run(&["list", "--format", "c"], "c"), run(&["list", "--format"], "c"));
        assert_eq!(run(&["init", "x"], "x"), run(&["init"], "x"));
    }

    #[test]
    fn severity_color_names() {
        assert_eq!(Severity::Info.color(), "green");
        assert_eq!(Severity::Error.to_string(), "red");
    }
}
