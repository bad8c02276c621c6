//! Shared library for `uniport`
//! Contains core functionality used by the CLI binary and integration tests

pub mod core;
pub mod logger;

pub use self::core::{config, error, grades, models, portal, report, resolver};
