//! A small interactive shell.
//!
//! Lines are run either as a built-in (`cd`, `bg`, `bglist`) or as an
//! external program. Foreground programs receive Ctrl-C in place of the
//! shell; background programs are tracked until they exit and are announced
//! when reaped.

pub mod builtins;
pub mod error;
pub mod exec;
pub mod foreground;
pub mod input;
pub mod jobs;
pub mod parser;
pub mod prompt;
pub mod reaper;
pub mod shell;
pub mod signals;
pub mod utils;

#[cfg(test)]
mod testutil;

pub use error::{Result, ShellError};
