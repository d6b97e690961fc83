use super::transport::{
    CloseEvent, Connector, EventSink, Link, OpenEvent, OpenRequest, TransportEvent,
};
use crate::types::{Frame, Result, SUB_PROTOCOL_HEADER, SocketError};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::http::{HeaderValue, Request};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Opens WebSocket connections with `tokio-tungstenite`.
///
/// Each handle runs on its own task: it performs the handshake, then pumps
/// outgoing frames from an unbounded channel into the socket and reports
/// incoming frames through the [`EventSink`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketFactory;

impl WebSocketFactory {
    pub fn new() -> Self {
        Self
    }

    /// Validates the endpoint and builds the handshake request.
    fn build_request(request: &OpenRequest) -> Result<Request<()>> {
        let url = Url::parse(&request.endpoint)?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(SocketError::Connection(format!(
                "unsupported scheme '{}' in {}",
                url.scheme(),
                request.endpoint
            )));
        }

        let mut handshake = url.as_str().into_client_request()?;
        if let Some(protocols) = &request.protocols
            && !protocols.is_empty()
        {
            let value = HeaderValue::from_str(&protocols.header_value()).map_err(|e| {
                SocketError::Connection(format!("invalid sub-protocol list: {}", e))
            })?;
            handshake.headers_mut().insert(SUB_PROTOCOL_HEADER, value);
        }

        Ok(handshake)
    }
}

impl Connector for WebSocketFactory {
    fn open(&self, request: &OpenRequest, events: EventSink) -> Result<Box<dyn Link>> {
        let handshake = Self::build_request(request)?;
        tracing::debug!(link = events.link(), "Creating WebSocket connection to: {}", request.endpoint);

        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let open = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn(run_link(
            handshake,
            request.endpoint.clone(),
            Arc::clone(&open),
            outgoing_rx,
            shutdown_rx,
            events,
        ));

        Ok(Box::new(WebSocketLink {
            outgoing: outgoing_tx,
            shutdown: shutdown_tx,
            open,
            task,
        }))
    }
}

/// Handle side of a tungstenite connection.
struct WebSocketLink {
    outgoing: mpsc::UnboundedSender<Message>,
    shutdown: watch::Sender<bool>,
    open: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl Link for WebSocketLink {
    fn send(&mut self, frame: Frame) -> Result<()> {
        if !self.is_open() {
            return Err(SocketError::NotConnected);
        }
        self.outgoing
            .send(frame.into())
            .map_err(|_| SocketError::NotConnected)
    }

    fn close(&mut self) {
        self.open.store(false, Ordering::Release);
        if self.shutdown.send(true).is_err() {
            // Task already finished
            self.task.abort();
        }
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire) && !self.task.is_finished()
    }
}

impl Drop for WebSocketLink {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

impl From<Frame> for Message {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Binary(data) => Message::Binary(data.into()),
        }
    }
}

/// Drives one connection from handshake to close.
async fn run_link(
    handshake: Request<()>,
    endpoint: String,
    open: Arc<AtomicBool>,
    outgoing_rx: mpsc::UnboundedReceiver<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
    events: EventSink,
) {
    let connected = tokio::select! {
        _ = shutdown_rx.changed() => {
            tracing::debug!(link = events.link(), "Connection attempt abandoned");
            return;
        }
        result = connect_async(handshake) => result,
    };

    let (ws_stream, response) = match connected {
        Ok(connected) => connected,
        Err(e) => {
            tracing::warn!(link = events.link(), error = %e, "WebSocket handshake failed");
            events.emit(TransportEvent::Failed(e.into()));
            return;
        }
    };

    let protocol = response
        .headers()
        .get(SUB_PROTOCOL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let (ws_tx, ws_rx) = ws_stream.split();
    open.store(true, Ordering::Release);
    tracing::info!(link = events.link(), "Connected to {}", endpoint);
    events.emit(TransportEvent::Open(OpenEvent { endpoint, protocol }));

    let close = pump(ws_tx, ws_rx, outgoing_rx, shutdown_rx, &events).await;
    open.store(false, Ordering::Release);
    if let Some(close) = close {
        events.emit(TransportEvent::Closed(close));
    }
    tracing::debug!(link = events.link(), "Link task finished");
}

/// Moves frames in both directions until either side closes.
///
/// Returns the close event to report, or `None` when the client asked for the
/// close itself and is no longer listening.
async fn pump(
    mut ws_tx: WsSink,
    mut ws_rx: WsSource,
    mut outgoing_rx: mpsc::UnboundedReceiver<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
    events: &EventSink,
) -> Option<CloseEvent> {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                tracing::debug!(link = events.link(), "Closing WebSocket connection");
                let _ = ws_tx.close().await;
                return None;
            }

            Some(message) = outgoing_rx.recv() => {
                if let Err(e) = ws_tx.send(message).await {
                    tracing::warn!(link = events.link(), error = %e, "Failed to send frame");
                    events.emit(TransportEvent::Error(e.into()));
                }
            }

            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    tracing::trace!(link = events.link(), len = text.len(), "Received text");
                    events.emit(TransportEvent::Message(Frame::Text(text.as_str().to_string())));
                }
                Some(Ok(Message::Binary(data))) => {
                    tracing::trace!(link = events.link(), len = data.len(), "Received binary");
                    events.emit(TransportEvent::Message(Frame::Binary(data.to_vec())));
                }
                Some(Ok(Message::Ping(data))) => {
                    tracing::trace!(link = events.link(), "Received ping ({} bytes)", data.len());
                }
                Some(Ok(Message::Pong(data))) => {
                    tracing::trace!(link = events.link(), "Received pong ({} bytes)", data.len());
                }
                Some(Ok(Message::Close(frame))) => {
                    return Some(match frame {
                        Some(close_frame) => {
                            tracing::info!(
                                link = events.link(),
                                "Server closed connection: code={:?}, reason='{}'",
                                close_frame.code,
                                close_frame.reason.as_str()
                            );
                            CloseEvent::new(
                                Some(u16::from(close_frame.code)),
                                close_frame.reason.as_str(),
                                true,
                            )
                        }
                        None => {
                            tracing::warn!(link = events.link(), "Server closed connection without close frame");
                            CloseEvent::new(None, "", true)
                        }
                    });
                }
                Some(Ok(Message::Frame(_))) => {
                    tracing::debug!(link = events.link(), "Received raw frame (internal)");
                }
                Some(Err(e)) => {
                    tracing::error!(link = events.link(), "WebSocket read error: {}", e);
                    let reason = e.to_string();
                    events.emit(TransportEvent::Error(e.into()));
                    return Some(CloseEvent::new(None, reason, false));
                }
                None => {
                    tracing::info!(link = events.link(), "WebSocket stream ended");
                    return Some(CloseEvent::new(None, "stream ended", false));
                }
            }
        }
    }
}
