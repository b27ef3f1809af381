//! Static command tree consumed by the completion resolver.
//!
//! A [`CommandTree`] is assembled once at startup from [`CommandNode`] and
//! [`OptionSpec`] builders, validated by [`CommandTree::new`], and is
//! read-only afterwards. Nodes own their children, so the structure is a
//! tree by construction.

use std::collections::HashSet;

/// A declared flag on a single command node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    long: Option<String>,
    short: Option<String>,
    takes_value: bool,
    choices: Option<Vec<String>>,
    description: Option<String>,
}

impl OptionSpec {
    /// Option spelled as `--name`. The leading dashes are added when missing.
    #[must_use]
    pub fn long(name: impl AsRef<str>) -> Self {
        Self::empty().with_long(name)
    }

    /// Option spelled as `-c`.
    #[must_use]
    pub fn short(c: char) -> Self {
        Self::empty().with_short(c)
    }

    /// Option with neither spelling; only useful as a starting point for
    /// callers that discover spellings incrementally (e.g. from clap).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            long: None,
            short: None,
            takes_value: false,
            choices: None,
            description: None,
        }
    }

    /// Add or replace the long spelling.
    #[must_use]
    pub fn with_long(mut self, name: impl AsRef<str>) -> Self {
        let name = name.as_ref().trim_start_matches('-');
        self.long = Some(format!("--{name}"));
        self
    }

    /// Add or replace the short spelling.
    #[must_use]
    pub fn with_short(mut self, c: char) -> Self {
        self.short = Some(format!("-{c}"));
        self
    }

    /// Mark the option as consuming an argument.
    #[must_use]
    pub const fn takes_value(mut self) -> Self {
        self.takes_value = true;
        self
    }

    /// Restrict the option's argument to a finite set of values.
    ///
    /// Implies [`OptionSpec::takes_value`]. Duplicates are dropped, keeping
    /// the first occurrence.
    #[must_use]
    pub fn choices<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let values = values
            .into_iter()
            .map(Into::into)
            .filter(|v: &String| seen.insert(v.clone()))
            .collect();
        self.takes_value = true;
        self.choices = Some(values);
        self
    }

    /// Attach help text shown next to the flag in completion menus.
    #[must_use]
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// The `--long` spelling, dashes included.
    #[must_use]
    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// The `-s` spelling, dash included.
    #[must_use]
    pub fn short_name(&self) -> Option<&str> {
        self.short.as_deref()
    }

    #[must_use]
    pub const fn is_takes_value(&self) -> bool {
        self.takes_value
    }

    #[must_use]
    pub fn choice_values(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Spellings in completion order: short first, then long.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        self.short.as_deref().into_iter().chain(self.long.as_deref())
    }

    /// Returns true when `flag` is exactly one of this option's spellings.
    #[must_use]
    pub fn matches(&self, flag: &str) -> bool {
        self.spellings().any(|s| s == flag)
    }
}

/// One command in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    name: String,
    aliases: Vec<String>,
    description: String,
    hidden: bool,
    options: Vec<OptionSpec>,
    children: Vec<CommandNode>,
}

impl CommandNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            hidden: false,
            options: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    #[must_use]
    pub const fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[must_use]
    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    #[must_use]
    pub fn subcommand(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Name followed by aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Child whose name or alias is exactly `token`. Hidden children match.
    #[must_use]
    pub fn find_child(&self, token: &str) -> Option<&Self> {
        self.children
            .iter()
            .find(|child| child.names().any(|n| n == token))
    }

    /// Declared option spelled exactly `flag`.
    #[must_use]
    pub fn find_option(&self, flag: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|opt| opt.matches(flag))
    }

    /// True when any name or alias of this node starts with `prefix`.
    #[must_use]
    pub fn has_name_prefix(&self, prefix: &str) -> bool {
        self.names().any(|n| n.starts_with(prefix))
    }
}

/// Structural problems detected while validating a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("command under '{parent}' has an empty name")]
    EmptyName { parent: String },

    #[error("'{name}' is declared more than once under '{parent}'")]
    DuplicateName { parent: String, name: String },

    #[error("an option on '{command}' has neither a long nor a short spelling")]
    MissingFlagSpelling { command: String },

    #[error("option '{flag}' on '{command}' is not a valid flag spelling")]
    MalformedFlag { command: String, flag: String },
}

/// A validated, immutable command tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTree {
    root: CommandNode,
}

impl CommandTree {
    /// Validate `root` and freeze it.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError`] when sibling names or aliases collide, when an
    /// option lacks a spelling, or when a spelling is malformed.
    pub fn new(root: CommandNode) -> Result<Self, TreeError> {
        validate(&root)?;
        Ok(Self { root })
    }

    #[must_use]
    pub const fn root(&self) -> &CommandNode {
        &self.root
    }

    /// The program name, i.e. the root node's name.
    #[must_use]
    pub fn program(&self) -> &str {
        self.root.name()
    }
}

fn validate(node: &CommandNode) -> Result<(), TreeError> {
    for option in &node.options {
        validate_option(node, option)?;
    }

    let mut seen = HashSet::new();
    for child in &node.children {
        if child.name.is_empty() {
            return Err(TreeError::EmptyName {
                parent: node.name.clone(),
            });
        }
        for name in child.names() {
            if !seen.insert(name) {
                return Err(TreeError::DuplicateName {
                    parent: node.name.clone(),
                    name: name.to_string(),
                });
            }
        }
        validate(child)?;
    }
    Ok(())
}

fn validate_option(node: &CommandNode, option: &OptionSpec) -> Result<(), TreeError> {
    if option.long.is_none() && option.short.is_none() {
        return Err(TreeError::MissingFlagSpelling {
            command: node.name.clone(),
        });
    }

    let long_ok = option
        .long
        .as_deref()
        .is_none_or(|l| l.len() > 2 && !l.contains('=') && !l.contains(char::is_whitespace));
    let short_ok = option
        .short
        .as_deref()
        .is_none_or(|s| s.chars().count() == 2 && !s.ends_with('-') && !s.ends_with('='));

    if !long_ok || !short_ok {
        let flag = option.spellings().collect::<Vec<_>>().join(", ");
        return Err(TreeError::MalformedFlag {
            command: node.name.clone(),
            flag,
        });
    }
    Ok(())
}
