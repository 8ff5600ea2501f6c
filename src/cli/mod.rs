//! Command-line interface module.

mod args;
pub mod build;
pub mod common;
pub mod init;
pub mod transform;
pub mod watch;

pub use args::{BuildArgs, Cli, Commands};
