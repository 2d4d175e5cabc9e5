//! Shared helpers for command execution and path handling.

pub mod exec;
pub mod path;
