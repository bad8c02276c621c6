//! Auth token caching
//!
//! Successful logins are cached as a small JSON file under the config
//! directory and reused until expiry, so repeated sessions skip the token
//! endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::Result;

/// A bearer token with its owner and expiry instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedToken {
    /// Student id the token was issued for
    pub student_id: String,
    /// Bearer token string
    pub token: String,
    /// Expiry instant
    pub expires: DateTime<Utc>,
}

impl CachedToken {
    /// Whether this token belongs to `student_id` and has not expired
    #[must_use]
    pub fn is_valid_for(&self, student_id: &str) -> bool {
        self.student_id == student_id && self.expires > Utc::now()
    }
}

/// Load a cached token. An absent, unreadable or unparsable cache file
/// reads as no cache.
#[must_use]
pub fn load_cached_token(path: &Path) -> Option<CachedToken> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Persist a token to the cache file, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if the directories cannot be created or the file
/// cannot be written
pub fn store_cached_token(path: &Path, token: &CachedToken) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(token)?)?;
    Ok(())
}
