use super::ConnectionStatus;
use crate::types::{Inbound, SocketError};
use crate::websocket::{CloseEvent, OpenEvent};
use std::sync::Arc;

type OpenCallback = Arc<dyn Fn(&OpenEvent) + Send + Sync + 'static>;
type MessageCallback = Arc<dyn Fn(Inbound) + Send + Sync + 'static>;
type CloseCallback = Arc<dyn Fn(&CloseEvent) + Send + Sync + 'static>;
type ErrorCallback = Arc<dyn Fn(&SocketError) + Send + Sync + 'static>;
type StatusCallback = Arc<dyn Fn(ConnectionStatus) + Send + Sync + 'static>;
type ReconnectCallback = Arc<dyn Fn(u32) + Send + Sync + 'static>;

/// Optional observers of a client.
///
/// Callbacks run on the client's driver task, in event order, and should
/// return quickly. Calling back into the client (for example `send`) from a
/// callback is fine; the call is processed after the current event.
///
/// # Example
///
/// ```no_run
/// use relay_socket::{Callbacks, ConnectionStatus};
///
/// let callbacks = Callbacks::new()
///     .on_status_change(|status: ConnectionStatus| println!("status: {}", status))
///     .on_reconnect(|attempt| println!("reconnect attempt {}", attempt));
/// ```
#[derive(Clone, Default)]
pub struct Callbacks {
    pub(crate) on_open: Option<OpenCallback>,
    pub(crate) on_message: Option<MessageCallback>,
    pub(crate) on_close: Option<CloseCallback>,
    pub(crate) on_error: Option<ErrorCallback>,
    pub(crate) on_status_change: Option<StatusCallback>,
    pub(crate) on_reconnect: Option<ReconnectCallback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_open<F>(mut self, callback: F) -> Self
    where
        F: Fn(&OpenEvent) + Send + Sync + 'static,
    {
        self.on_open = Some(Arc::new(callback));
        self
    }

    pub fn on_message<F>(mut self, callback: F) -> Self
    where
        F: Fn(Inbound) + Send + Sync + 'static,
    {
        self.on_message = Some(Arc::new(callback));
        self
    }

    pub fn on_close<F>(mut self, callback: F) -> Self
    where
        F: Fn(&CloseEvent) + Send + Sync + 'static,
    {
        self.on_close = Some(Arc::new(callback));
        self
    }

    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SocketError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    pub fn on_status_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(ConnectionStatus) + Send + Sync + 'static,
    {
        self.on_status_change = Some(Arc::new(callback));
        self
    }

    pub fn on_reconnect<F>(mut self, callback: F) -> Self
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.on_reconnect = Some(Arc::new(callback));
        self
    }

    /// Shallow merge: every callback set in `update` replaces ours.
    pub fn merge(&mut self, update: Callbacks) {
        let Callbacks {
            on_open,
            on_message,
            on_close,
            on_error,
            on_status_change,
            on_reconnect,
        } = update;

        if on_open.is_some() {
            self.on_open = on_open;
        }
        if on_message.is_some() {
            self.on_message = on_message;
        }
        if on_close.is_some() {
            self.on_close = on_close;
        }
        if on_error.is_some() {
            self.on_error = on_error;
        }
        if on_status_change.is_some() {
            self.on_status_change = on_status_change;
        }
        if on_reconnect.is_some() {
            self.on_reconnect = on_reconnect;
        }
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_open", &self.on_open.is_some())
            .field("on_message", &self.on_message.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_status_change", &self.on_status_change.is_some())
            .field("on_reconnect", &self.on_reconnect.is_some())
            .finish()
    }
}
