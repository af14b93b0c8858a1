//! Error types for the Mailinator client.

use thiserror::Error;

/// Error type for all Mailinator client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying HTTP client error, including non-2xx detail responses.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    /// WebSocket connect or transport error on the inbox stream.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    /// A detail response did not match the expected JSON shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
