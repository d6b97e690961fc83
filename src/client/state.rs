use super::{ConnectionStatus, SocketClientOptions};
use crate::infrastructure::TimerKind;
use crate::websocket::{CloseEvent, OpenEvent};

/// Inputs of the connection state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Caller asked to connect
    Connect,
    /// Caller asked to disconnect
    Disconnect,
    /// Handshake completed
    Opened(OpenEvent),
    /// Handle could not be constructed or the handshake failed
    OpenFailed,
    /// Transport reported the handle closed
    Closed(CloseEvent),
    ConnectTimedOut,
    HeartbeatDue,
    HeartbeatTimedOut,
    /// Any inbound frame
    TrafficReceived,
    ReconnectDue,
}

/// Side effects the driver carries out, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    OpenTransport,
    CloseTransport,
    Arm(TimerKind),
    Disarm(TimerKind),
    DisarmAll,
    /// Ping if the transport is open, then arm the heartbeat timeout
    SendPing,
    FlushQueue,
    ClearQueue,
    Status(ConnectionStatus),
    NotifyOpen(OpenEvent),
    NotifyClose(CloseEvent),
    NotifyReconnect(u32),
}

/// Connection lifecycle as an explicit state machine.
///
/// Holds no transport or timers itself: [`ConnectionMachine::handle`] maps the
/// current state and an [`Event`] to the next state plus the [`Effect`]s to
/// perform, so every transition can be checked without a network.
#[derive(Debug, Default)]
pub struct ConnectionMachine {
    status: ConnectionStatus,
    reconnect_attempts: u32,
    /// Whether the disconnect was manual (prevents auto-reconnect)
    was_manual_disconnect: bool,
}

impl ConnectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts
    }

    pub fn was_manual_disconnect(&self) -> bool {
        self.was_manual_disconnect
    }

    /// The transition function.
    pub fn handle(&mut self, event: Event, options: &SocketClientOptions) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            Event::Connect => self.connect(&mut effects),
            Event::ReconnectDue => {
                if self.status == ConnectionStatus::Reconnecting {
                    tracing::info!(
                        "Reconnecting... attempt {}/{}",
                        self.reconnect_attempts,
                        options.max_reconnect_attempts
                    );
                    self.connect(&mut effects);
                }
            }
            Event::Disconnect => {
                self.was_manual_disconnect = true;
                effects.push(Effect::DisarmAll);
                effects.push(Effect::CloseTransport);
                effects.push(Effect::ClearQueue);
                self.set_status(ConnectionStatus::Disconnected, &mut effects);
            }
            Event::Opened(open) => {
                if self.status == ConnectionStatus::Connecting {
                    effects.push(Effect::Disarm(TimerKind::ConnectTimeout));
                    self.set_status(ConnectionStatus::Connected, &mut effects);
                    self.reconnect_attempts = 0;
                    effects.push(Effect::Arm(TimerKind::HeartbeatInterval));
                    effects.push(Effect::FlushQueue);
                    effects.push(Effect::NotifyOpen(open));
                }
            }
            Event::OpenFailed => {
                if self.status == ConnectionStatus::Connecting {
                    self.fail_attempt(options, &mut effects);
                }
            }
            Event::ConnectTimedOut => {
                if self.status == ConnectionStatus::Connecting {
                    tracing::error!("Connection timeout");
                    self.fail_attempt(options, &mut effects);
                }
            }
            Event::Closed(close) => {
                if matches!(
                    self.status,
                    ConnectionStatus::Connecting | ConnectionStatus::Connected
                ) {
                    self.closed(close, options, &mut effects);
                }
            }
            Event::HeartbeatDue => {
                if self.status == ConnectionStatus::Connected {
                    effects.push(Effect::SendPing);
                }
            }
            Event::TrafficReceived => {
                if self.status == ConnectionStatus::Connected {
                    effects.push(Effect::Disarm(TimerKind::HeartbeatTimeout));
                }
            }
            Event::HeartbeatTimedOut => {
                if self.status == ConnectionStatus::Connected {
                    tracing::warn!("Heartbeat timeout, reconnecting...");
                    self.closed(CloseEvent::heartbeat_timeout(), options, &mut effects);
                }
            }
        }

        effects
    }

    fn connect(&mut self, effects: &mut Vec<Effect>) {
        match self.status {
            ConnectionStatus::Connected => {
                tracing::warn!("WebSocket is already connected");
                return;
            }
            ConnectionStatus::Connecting => {
                tracing::warn!("Superseding the connection attempt in flight");
            }
            _ => {}
        }

        self.was_manual_disconnect = false;
        effects.push(Effect::Disarm(TimerKind::Reconnect));
        effects.push(Effect::Disarm(TimerKind::ConnectTimeout));
        effects.push(Effect::CloseTransport);
        self.set_status(ConnectionStatus::Connecting, effects);
        effects.push(Effect::OpenTransport);
        effects.push(Effect::Arm(TimerKind::ConnectTimeout));
    }

    /// The attempt in flight is over without ever opening.
    fn fail_attempt(&mut self, options: &SocketClientOptions, effects: &mut Vec<Effect>) {
        effects.push(Effect::Disarm(TimerKind::ConnectTimeout));
        effects.push(Effect::CloseTransport);
        self.set_status(ConnectionStatus::Error, effects);
        self.after_link_lost(options, effects);
    }

    fn closed(&mut self, close: CloseEvent, options: &SocketClientOptions, effects: &mut Vec<Effect>) {
        effects.push(Effect::DisarmAll);
        effects.push(Effect::CloseTransport);
        effects.push(Effect::NotifyClose(close));
        self.after_link_lost(options, effects);
    }

    fn after_link_lost(&mut self, options: &SocketClientOptions, effects: &mut Vec<Effect>) {
        if self.was_manual_disconnect || !options.auto_reconnect {
            self.set_status(ConnectionStatus::Disconnected, effects);
            return;
        }

        if self.reconnect_attempts >= options.max_reconnect_attempts {
            tracing::error!(
                attempts = self.reconnect_attempts,
                "Max reconnect attempts reached"
            );
            self.set_status(ConnectionStatus::Disconnected, effects);
            return;
        }

        self.reconnect_attempts += 1;
        self.set_status(ConnectionStatus::Reconnecting, effects);
        effects.push(Effect::NotifyReconnect(self.reconnect_attempts));
        effects.push(Effect::Arm(TimerKind::Reconnect));
    }

    /// Same-value writes produce no notification
    fn set_status(&mut self, status: ConnectionStatus, effects: &mut Vec<Effect>) {
        if self.status != status {
            tracing::debug!(from = %self.status, to = %status, "Status changed");
            self.status = status;
            effects.push(Effect::Status(status));
        }
    }
}
