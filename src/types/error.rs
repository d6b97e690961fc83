use thiserror::Error;

/// Errors that can occur when using the socket client.
///
/// Only construction-time APIs return these to the caller. At runtime they are
/// handed to the `on_error` callback and the client recovers on its own.
#[derive(Error, Debug)]
pub enum SocketError {
    /// WebSocket protocol error (handshake failed, invalid frame, etc.)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// General connection error with descriptive message
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing error (malformed endpoint URL)
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Options rejected at construction time
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// The handshake did not complete within the connection timeout
    #[error("Timeout error")]
    Timeout,

    /// Attempted to write while the transport is not open
    #[error("Not connected")]
    NotConnected,
}

/// Convenience type alias for `Result<T, SocketError>`.
pub type Result<T> = std::result::Result<T, SocketError>;
