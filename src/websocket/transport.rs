use crate::client::SubProtocols;
use crate::types::{Frame, Result, SocketError};
use tokio::sync::mpsc;

/// Identifies one transport handle for the lifetime of the client.
///
/// Every connection attempt gets a fresh id so that events emitted by a
/// superseded or closed handle can be told apart and dropped.
pub type LinkId = u64;

/// Everything a connector needs to open a handle.
#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub endpoint: String,
    pub protocols: Option<SubProtocols>,
}

/// Details of a successful handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenEvent {
    pub endpoint: String,
    /// Sub-protocol selected by the server, if any
    pub protocol: Option<String>,
}

/// Details of a closed handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseEvent {
    pub code: Option<u16>,
    pub reason: String,
    /// Whether a close frame was exchanged
    pub was_clean: bool,
}

impl CloseEvent {
    pub fn new(code: Option<u16>, reason: impl Into<String>, was_clean: bool) -> Self {
        Self {
            code,
            reason: reason.into(),
            was_clean,
        }
    }

    /// Close event synthesized when the heartbeat grace period expires.
    pub fn heartbeat_timeout() -> Self {
        Self::new(None, "heartbeat timeout", false)
    }
}

/// Asynchronous events a handle reports after it was constructed.
#[derive(Debug)]
pub enum TransportEvent {
    /// Handshake completed
    Open(OpenEvent),
    /// A data frame arrived
    Message(Frame),
    /// Runtime error on an open handle; a `Closed` usually follows
    Error(SocketError),
    /// The handshake failed and the handle never opened
    Failed(SocketError),
    /// The handle is closed and will report nothing further
    Closed(CloseEvent),
}

/// Where a handle reports its events.
#[derive(Debug, Clone)]
pub struct EventSink {
    link: LinkId,
    tx: mpsc::UnboundedSender<(LinkId, TransportEvent)>,
}

impl EventSink {
    pub fn new(link: LinkId, tx: mpsc::UnboundedSender<(LinkId, TransportEvent)>) -> Self {
        Self { link, tx }
    }

    pub fn link(&self) -> LinkId {
        self.link
    }

    /// Reports an event; silently dropped once the client is gone.
    pub fn emit(&self, event: TransportEvent) {
        if self.tx.send((self.link, event)).is_err() {
            tracing::trace!(link = self.link, "Client dropped, transport event discarded");
        }
    }
}

/// A live bidirectional connection.
pub trait Link: Send {
    /// Queues a frame for transmission.
    fn send(&mut self, frame: Frame) -> Result<()>;

    /// Starts closing the handle. Events reported afterwards are ignored.
    fn close(&mut self);

    /// Whether the handshake completed and the handle is not closed.
    fn is_open(&self) -> bool;
}

/// Builds transport handles.
///
/// `open` returns as soon as the handle exists; the handshake outcome and all
/// later traffic are reported through the [`EventSink`]. An `Err` here is a
/// construction failure (malformed URL, invalid header, ...).
pub trait Connector: Send + Sync + 'static {
    fn open(&self, request: &OpenRequest, events: EventSink) -> Result<Box<dyn Link>>;
}
