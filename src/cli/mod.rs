//! CLI module for pomoflow.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `repl`: The interactive command language
//! - `handler`: Applies interactive commands to the engine
//! - `display`: Output formatting and display logic
//! - `runner`: The foreground run loop

pub mod commands;
pub mod display;
pub mod handler;
pub mod repl;
pub mod runner;

pub use commands::{Cli, Commands, RunArgs};
pub use display::Display;
pub use handler::{CommandHandler, Reply};
pub use repl::{CommandError, ReplCommand};
pub use runner::run;
