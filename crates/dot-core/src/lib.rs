//! dot-core library: command tree, completion resolver, and shell protocol.
//!
//! # Conventions
//!
//! - **Errors**: library errors are `thiserror` enums; resolution itself is
//!   infallible and reports problems as data.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod config;
pub mod protocol;
pub mod resolve;
pub mod tree;

pub use resolve::{
    Candidate, CompletionKind, CompletionResult, ResolutionContext, Severity, resolve,
};
pub use tree::{CommandNode, CommandTree, OptionSpec, TreeError};
