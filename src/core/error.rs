//! Error taxonomy for portal and report operations

use thiserror::Error;

/// Convenience result alias for portal and report operations
pub type Result<T> = std::result::Result<T, PortalError>;

/// Failures surfaced by the portal client and report writers.
///
/// Authentication failure is recoverable (the interactive loop reprompts);
/// everything else aborts the in-progress operation. Nothing is retried
/// automatically.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Invalid credentials or missing token data in the auth response
    #[error("invalid credentials or missing token data in the response")]
    Auth,

    /// Non-success HTTP status from a fetch
    #[error("request to {url} failed with status {status}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// The HTTP status code returned
        status: u16,
    },

    /// Connection or protocol failure below the HTTP layer
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Token cache or report file I/O failure
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    /// Spreadsheet writer failure
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}
