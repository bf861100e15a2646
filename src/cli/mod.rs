//! CLI library modules for the semerr binary.
//!
//! Argument definitions and command bodies live here so they can be tested
//! without spawning the binary.

pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
