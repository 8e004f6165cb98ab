//! mindwell-cli library root.
//!
//! Re-exports the command and config modules so integration tests can
//! exercise them without spawning the binary.

pub mod commands;
pub mod config;
