//! Command-line front end for the Strongbox secret keeper.

pub mod cli;
pub mod commands;

pub use cli::{Cli, CliConfig, Command};
pub use commands::execute;
