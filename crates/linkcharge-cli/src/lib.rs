//! Library side of the `lch` binary: argument parsing, logging setup and
//! the subcommands, kept out of `main.rs` so they can be tested.

pub mod cli;
pub mod commands;
pub mod logging;
