use crate::types::{Frame, Payload, Result};
use crate::websocket::{Link, LinkId};
use serde::{Deserialize, Serialize};

/// Connectivity as reported to observers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    #[default]
    Disconnected,
    Reconnecting,
    Error,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "CONNECTING",
            Self::Connected => "CONNECTED",
            Self::Disconnected => "DISCONNECTED",
            Self::Reconnecting => "RECONNECTING",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The transport handle currently owned by the client.
pub struct ConnectionManager {
    id: LinkId,
    link: Box<dyn Link>,
}

impl ConnectionManager {
    pub fn new(id: LinkId, link: Box<dyn Link>) -> Self {
        Self { id, link }
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    /// Checks if the handshake completed and the handle is still open
    pub fn is_connected(&self) -> bool {
        self.link.is_open()
    }

    /// Encodes and transmits a payload
    pub fn send_message(&mut self, payload: &Payload) -> Result<()> {
        let frame = payload.encode();
        tracing::debug!(link = self.id, len = frame.len(), "Sending frame");
        self.link.send(frame)
    }

    /// Transmits a pre-encoded frame
    pub fn send_frame(&mut self, frame: Frame) -> Result<()> {
        self.link.send(frame)
    }

    /// Closes the handle; it must not be used afterwards
    pub fn close(mut self) {
        tracing::debug!(link = self.id, "Closing transport handle");
        self.link.close();
    }
}
