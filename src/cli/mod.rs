//! CLI module for envsweep - command-line interface.

pub mod commands;

pub use commands::Cli;
