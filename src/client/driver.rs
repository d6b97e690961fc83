use super::state::{ConnectionMachine, Effect, Event};
use super::{Callbacks, ConnectionManager, ConnectionStatus, OptionsUpdate, SocketClientOptions};
use crate::infrastructure::{HeartbeatManager, OutboundQueue, TimerFired, TimerKind, TimerSet};
use crate::messaging::{ClientEvent, MessageRouter, SubscriptionId};
use crate::types::{Inbound, Payload, SocketError};
use crate::websocket::{Connector, EventSink, LinkId, OpenRequest, TransportEvent};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Requests from [`SocketClient`](super::SocketClient) handles.
pub(crate) enum Command {
    Connect,
    Disconnect,
    Send(Payload),
    UpdateOptions(OptionsUpdate),
    UpdateCallbacks(Callbacks),
    Subscribe(SubscriptionId, mpsc::UnboundedSender<ClientEvent>),
    Unsubscribe(SubscriptionId),
    QueuedMessages(oneshot::Sender<usize>),
}

enum Input {
    Command(Command),
    Timer(TimerFired),
    Transport(LinkId, TransportEvent),
}

/// Everything the driver waits on.
struct Inbox {
    commands: mpsc::UnboundedReceiver<Command>,
    timers: mpsc::UnboundedReceiver<TimerFired>,
    transport: mpsc::UnboundedReceiver<(LinkId, TransportEvent)>,
}

impl Inbox {
    /// Next input, or `None` once every client handle is gone.
    ///
    /// Transport events win over timer fires that are ready at the same time,
    /// so traffic already received is seen before a heartbeat timeout.
    async fn next(&mut self) -> Option<Input> {
        tokio::select! {
            biased;
            Some((link, event)) = self.transport.recv() => Some(Input::Transport(link, event)),
            Some(fired) = self.timers.recv() => Some(Input::Timer(fired)),
            command = self.commands.recv() => command.map(Input::Command),
        }
    }
}

/// Owns the connection state, the transport handle, the outbound queue and
/// every timer. Runs as one task, so all of it is mutated from one place.
pub(crate) struct Driver {
    machine: ConnectionMachine,
    options: SocketClientOptions,
    router: MessageRouter,
    connector: Arc<dyn Connector>,
    connection: Option<ConnectionManager>,
    next_link: LinkId,
    transport_tx: mpsc::UnboundedSender<(LinkId, TransportEvent)>,
    queue: OutboundQueue,
    timers: TimerSet,
    status_tx: watch::Sender<ConnectionStatus>,
    inbox: Inbox,
}

impl Driver {
    pub(crate) fn new(
        options: SocketClientOptions,
        callbacks: Callbacks,
        connector: Arc<dyn Connector>,
        commands: mpsc::UnboundedReceiver<Command>,
        status_tx: watch::Sender<ConnectionStatus>,
    ) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (transport_tx, transport_rx) = mpsc::unbounded_channel();

        Self {
            machine: ConnectionMachine::new(),
            options,
            router: MessageRouter::new(callbacks),
            connector,
            connection: None,
            next_link: 0,
            transport_tx,
            queue: OutboundQueue::new(),
            timers: TimerSet::new(timer_tx),
            status_tx,
            inbox: Inbox {
                commands,
                timers: timer_rx,
                transport: transport_rx,
            },
        }
    }

    pub(crate) async fn run(mut self) {
        tracing::debug!(endpoint = %self.options.endpoint, "Client driver started");

        while let Some(input) = self.inbox.next().await {
            match input {
                Input::Command(command) => self.on_command(command),
                Input::Timer(fired) => self.on_timer(fired),
                Input::Transport(link, event) => self.on_transport(link, event),
            }
        }

        self.timers.disarm_all();
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
        tracing::debug!("Client driver finished");
    }

    fn on_command(&mut self, command: Command) {
        match command {
            Command::Connect => self.dispatch(Event::Connect),
            Command::Disconnect => {
                tracing::info!("Disconnecting from WebSocket server");
                self.dispatch(Event::Disconnect);
            }
            Command::Send(payload) => self.send(payload),
            Command::UpdateOptions(update) => self.update_options(update),
            Command::UpdateCallbacks(callbacks) => self.router.update_callbacks(callbacks),
            Command::Subscribe(id, tx) => self.router.subscribe(id, tx),
            Command::Unsubscribe(id) => self.router.unsubscribe(id),
            Command::QueuedMessages(reply) => {
                let _ = reply.send(self.queue.len());
            }
        }
    }

    /// Applies an update only if the merged options are still valid.
    fn update_options(&mut self, update: OptionsUpdate) {
        let mut merged = self.options.clone();
        merged.merge(update);
        match merged.validate() {
            Ok(()) => {
                self.options = merged;
                tracing::debug!(options = ?self.options, "Options updated");
            }
            Err(e) => {
                tracing::warn!("Rejected options update: {}", e);
                self.router.error(&e);
            }
        }
    }

    fn on_timer(&mut self, fired: TimerFired) {
        if !self.timers.accept(fired) {
            tracing::trace!(kind = ?fired.kind, "Ignoring stale timer");
            return;
        }

        let event = match fired.kind {
            TimerKind::ConnectTimeout => {
                self.router.error(&SocketError::Timeout);
                Event::ConnectTimedOut
            }
            TimerKind::HeartbeatInterval => Event::HeartbeatDue,
            TimerKind::HeartbeatTimeout => Event::HeartbeatTimedOut,
            TimerKind::Reconnect => Event::ReconnectDue,
        };
        self.dispatch(event);
    }

    fn on_transport(&mut self, link: LinkId, event: TransportEvent) {
        if self.connection.as_ref().map(ConnectionManager::id) != Some(link) {
            tracing::trace!(link, "Ignoring event from a closed handle");
            return;
        }

        match event {
            TransportEvent::Open(open) => self.dispatch(Event::Opened(open)),
            TransportEvent::Message(frame) => {
                self.dispatch(Event::TrafficReceived);
                self.router.message(Inbound::decode(frame));
            }
            TransportEvent::Error(error) => {
                tracing::warn!(link, "WebSocket error: {}", error);
                self.router.error(&error);
            }
            TransportEvent::Failed(error) => {
                tracing::error!(link, "Failed to connect: {}", error);
                self.router.error(&error);
                self.dispatch(Event::OpenFailed);
            }
            TransportEvent::Closed(close) => {
                tracing::info!(link, code = ?close.code, reason = %close.reason, "WebSocket closed");
                self.dispatch(Event::Closed(close));
            }
        }
    }

    /// Runs an event through the state machine and performs its effects.
    ///
    /// Effects can raise follow-up events (a handle that cannot even be
    /// constructed); those run after the current effect list completes.
    fn dispatch(&mut self, event: Event) {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            for effect in self.machine.handle(event, &self.options) {
                if let Some(follow_up) = self.perform(effect) {
                    pending.push_back(follow_up);
                }
            }
        }
    }

    fn perform(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::OpenTransport => return self.open_transport(),
            Effect::CloseTransport => {
                if let Some(connection) = self.connection.take() {
                    connection.close();
                }
            }
            Effect::Arm(kind) => self.arm(kind),
            Effect::Disarm(TimerKind::HeartbeatTimeout) => {
                HeartbeatManager::traffic_received(&mut self.timers)
            }
            Effect::Disarm(kind) => self.timers.disarm(kind),
            Effect::DisarmAll => self.timers.disarm_all(),
            Effect::SendPing => self.send_ping(),
            Effect::FlushQueue => self.flush_queue(),
            Effect::ClearQueue => self.queue.clear(),
            Effect::Status(status) => {
                self.status_tx.send_replace(status);
                self.router.status(status);
            }
            Effect::NotifyOpen(open) => self.router.open(&open),
            Effect::NotifyClose(close) => self.router.close(&close),
            Effect::NotifyReconnect(attempt) => self.router.reconnect(attempt),
        }
        None
    }

    fn open_transport(&mut self) -> Option<Event> {
        self.next_link += 1;
        let link = self.next_link;
        let request = OpenRequest {
            endpoint: self.options.endpoint.clone(),
            protocols: self.options.protocols.clone(),
        };

        tracing::info!(link, "Connecting to {}", request.endpoint);
        let sink = EventSink::new(link, self.transport_tx.clone());
        match self.connector.open(&request, sink) {
            Ok(handle) => {
                self.connection = Some(ConnectionManager::new(link, handle));
                None
            }
            Err(e) => {
                tracing::error!(link, "Failed to create WebSocket: {}", e);
                self.router.error(&e);
                Some(Event::OpenFailed)
            }
        }
    }

    /// No grace period starts unless the ping actually went out; a link that
    /// is not open reports its close separately.
    fn send_ping(&mut self) {
        let Some(connection) = self.connection.as_mut() else {
            return;
        };
        if !connection.is_connected() {
            tracing::debug!(link = connection.id(), "[Heartbeat] Transport not open, skipping");
            return;
        }

        match connection.send_frame(HeartbeatManager::ping_frame()) {
            Ok(()) => {
                tracing::debug!("Sent heartbeat");
                self.arm(TimerKind::HeartbeatTimeout);
            }
            Err(e) => tracing::error!("[Heartbeat] Failed to send: {}", e),
        }
    }

    fn arm(&mut self, kind: TimerKind) {
        let heartbeat =
            HeartbeatManager::new(self.options.heartbeat_interval(), self.options.heartbeat_timeout());
        match kind {
            TimerKind::HeartbeatInterval => heartbeat.start(&mut self.timers),
            TimerKind::HeartbeatTimeout => heartbeat.await_traffic(&mut self.timers),
            TimerKind::ConnectTimeout => self
                .timers
                .arm_once(kind, self.options.connection_timeout()),
            TimerKind::Reconnect => self
                .timers
                .arm_once(kind, self.options.reconnect_interval()),
        }
    }

    fn send(&mut self, payload: Payload) {
        let connected = self.machine.status() == ConnectionStatus::Connected;
        match self.connection.as_mut() {
            Some(connection) if connected => {
                if let Err(e) = connection.send_message(&payload) {
                    tracing::error!("Failed to send message: {}", e);
                    self.queue.push(payload);
                }
            }
            _ => {
                tracing::warn!("WebSocket is not connected, message queued");
                self.queue.push(payload);
            }
        }
    }

    fn flush_queue(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let Some(connection) = self.connection.as_mut() else {
            return;
        };

        let queued = self.queue.len();
        let sent = self
            .queue
            .drain_with(|payload| connection.send_message(payload));
        tracing::info!(sent, queued, "Flushed outbound queue");
    }
}
