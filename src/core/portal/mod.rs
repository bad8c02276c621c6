//! Portal API access: authentication, token caching and data fetches

pub mod auth;
pub mod client;

pub use auth::CachedToken;
pub use client::PortalClient;
