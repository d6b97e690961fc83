use crate::types::{Payload, Result};
use std::collections::VecDeque;

/// FIFO of payloads submitted while the link could not take them.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    items: VecDeque<Payload>,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, payload: Payload) {
        self.items.push_back(payload);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Hands every queued payload to `send`, head first, in a single pass.
    ///
    /// Stops at the first failure: the failed payload and everything behind
    /// it stay queued in their original order. Returns how many were sent.
    pub fn drain_with<F>(&mut self, mut send: F) -> usize
    where
        F: FnMut(&Payload) -> Result<()>,
    {
        let mut sent = 0;
        while let Some(payload) = self.items.front() {
            if let Err(e) = send(payload) {
                tracing::warn!(
                    remaining = self.items.len(),
                    "Queue drain interrupted: {}",
                    e
                );
                break;
            }
            self.items.pop_front();
            sent += 1;
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SocketError;

    fn queue_of(items: &[&str]) -> OutboundQueue {
        let mut queue = OutboundQueue::new();
        for item in items {
            queue.push(Payload::from(*item));
        }
        queue
    }

    #[test]
    fn test_drain_preserves_submission_order() {
        let mut queue = queue_of(&["a", "b", "c"]);
        let mut seen = Vec::new();

        let sent = queue.drain_with(|payload| {
            seen.push(payload.clone());
            Ok(())
        });

        assert_eq!(sent, 3);
        assert!(queue.is_empty());
        assert_eq!(seen, vec![Payload::from("a"), Payload::from("b"), Payload::from("c")]);
    }

    #[test]
    fn test_failed_drain_keeps_the_tail_in_order() {
        let mut queue = queue_of(&["a", "b", "c", "d"]);
        let mut calls = 0;

        let sent = queue.drain_with(|_| {
            calls += 1;
            if calls == 2 {
                Err(SocketError::NotConnected)
            } else {
                Ok(())
            }
        });

        assert_eq!(sent, 1);
        assert_eq!(calls, 2);
        let mut rest = Vec::new();
        queue.drain_with(|payload| {
            rest.push(payload.clone());
            Ok(())
        });
        assert_eq!(rest, vec![Payload::from("b"), Payload::from("c"), Payload::from("d")]);
    }
}
