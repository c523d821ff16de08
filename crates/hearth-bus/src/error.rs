//! Bus client error types.

use thiserror::Error;

/// Errors from the bus connection and wire codec.
#[derive(Debug, Error)]
pub enum Error {
    /// WebSocket connect or read failure; the client will back off and
    /// retry.
    #[error("bus connection failed: {0}")]
    Connect(String),

    /// Write-half send failure; treated like a dropped connection.
    #[error("bus send failed: {0}")]
    Send(String),

    /// Frame (de)serialization failure.
    #[error("bus frame codec: {0}")]
    Codec(#[from] serde_json::Error),
}
