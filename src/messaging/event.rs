use crate::client::ConnectionStatus;
use crate::types::Inbound;
use crate::websocket::{CloseEvent, OpenEvent};
use tokio::sync::mpsc;

/// Everything a subscriber can observe, mirroring the callback surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Open(OpenEvent),
    Message(Inbound),
    Close(CloseEvent),
    /// Error description; the error itself goes to the `on_error` callback
    Error(String),
    StatusChange(ConnectionStatus),
    Reconnect(u32),
}

pub type SubscriptionId = u64;

/// A detachable stream of [`ClientEvent`]s.
///
/// Dropping the subscription detaches it as well; `unsubscribe` makes the
/// intent explicit and releases the driver's side right away.
pub struct Subscription {
    id: SubscriptionId,
    events: mpsc::UnboundedReceiver<ClientEvent>,
    detach: Option<Box<dyn FnOnce(SubscriptionId) + Send>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriptionId,
        events: mpsc::UnboundedReceiver<ClientEvent>,
        detach: impl FnOnce(SubscriptionId) + Send + 'static,
    ) -> Self {
        Self {
            id,
            events,
            detach: Some(Box::new(detach)),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Waits for the next event; `None` once the client is gone.
    pub async fn recv(&mut self) -> Option<ClientEvent> {
        self.events.recv().await
    }

    /// Returns an already delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<ClientEvent> {
        self.events.try_recv().ok()
    }

    pub fn unsubscribe(mut self) {
        if let Some(detach) = self.detach.take() {
            detach(self.id);
        }
        self.events.close();
    }
}
