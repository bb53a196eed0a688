//! Command line interface module
//!
//! This module parses flags, gathers credentials and hands a ready
//! configuration to the retag workflow.

pub mod args;
pub mod runner;

pub use args::Args;
pub use runner::Runner;
