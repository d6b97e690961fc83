use super::event::{ClientEvent, SubscriptionId};
use crate::client::{Callbacks, ConnectionStatus};
use crate::types::{Inbound, SocketError};
use crate::websocket::{CloseEvent, OpenEvent};
use tokio::sync::mpsc;

/// Routes lifecycle events and inbound messages to callbacks and subscribers
pub struct MessageRouter {
    callbacks: Callbacks,
    subscribers: Vec<(SubscriptionId, mpsc::UnboundedSender<ClientEvent>)>,
}

impl MessageRouter {
    pub fn new(callbacks: Callbacks) -> Self {
        Self {
            callbacks,
            subscribers: Vec::new(),
        }
    }

    pub fn update_callbacks(&mut self, update: Callbacks) {
        self.callbacks.merge(update);
    }

    pub fn subscribe(&mut self, id: SubscriptionId, tx: mpsc::UnboundedSender<ClientEvent>) {
        self.subscribers.push((id, tx));
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(existing, _)| *existing != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn open(&mut self, event: &OpenEvent) {
        if let Some(callback) = &self.callbacks.on_open {
            callback(event);
        }
        self.publish(ClientEvent::Open(event.clone()));
    }

    pub fn message(&mut self, message: Inbound) {
        if !self.subscribers.is_empty() {
            self.publish(ClientEvent::Message(message.clone()));
        }
        if let Some(callback) = &self.callbacks.on_message {
            callback(message);
        }
    }

    pub fn close(&mut self, event: &CloseEvent) {
        if let Some(callback) = &self.callbacks.on_close {
            callback(event);
        }
        self.publish(ClientEvent::Close(event.clone()));
    }

    pub fn error(&mut self, error: &SocketError) {
        if let Some(callback) = &self.callbacks.on_error {
            callback(error);
        }
        self.publish(ClientEvent::Error(error.to_string()));
    }

    pub fn status(&mut self, status: ConnectionStatus) {
        if let Some(callback) = &self.callbacks.on_status_change {
            callback(status);
        }
        self.publish(ClientEvent::StatusChange(status));
    }

    pub fn reconnect(&mut self, attempt: u32) {
        if let Some(callback) = &self.callbacks.on_reconnect {
            callback(attempt);
        }
        self.publish(ClientEvent::Reconnect(attempt));
    }

    /// Fans an event out, forgetting subscribers that went away
    fn publish(&mut self, event: ClientEvent) {
        self.subscribers.retain(|(id, tx)| {
            let delivered = tx.send(event.clone()).is_ok();
            if !delivered {
                tracing::debug!(subscription = id, "Subscriber dropped, detaching");
            }
            delivered
        });
    }
}
