//! CLI module for ticklist - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
