pub mod account;
pub mod complete;
pub mod completions;
pub mod fetch;
pub mod init;
pub mod list;
