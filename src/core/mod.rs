//! Core module for `uniport`

pub mod config;
pub mod error;
pub mod grades;
pub mod models;
pub mod portal;
pub mod report;
pub mod resolver;

/// Returns the current version of the `uniport` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
