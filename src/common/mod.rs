//! Common module - shared traits and interfaces
//!
//! This module holds the seams between the orchestrator and the registry
//! transport, so either side can be replaced in isolation.

pub mod traits;

pub use traits::*;
