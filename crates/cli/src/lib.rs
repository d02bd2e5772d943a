//! webotron CLI library
//!
//! Exposes the command and output layers for tests.

pub mod commands;
pub mod exit_code;
pub mod output;
