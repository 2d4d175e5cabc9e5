//! Command-line interface module.

mod args;
pub mod common;
pub mod console;
pub mod serve;

pub use args::{Cli, Commands};
