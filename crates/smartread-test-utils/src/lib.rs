#![deny(unsafe_code)]

//! Shared test utilities for the SmartRead workspace.
//!
//! Provides sample documents, config builders, fixed token counters and
//! tracing helpers so that individual crate tests stay concise and
//! consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! smartread-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod fixtures;
pub mod tracing_setup;
