use super::driver::Command;
use super::{Callbacks, ConnectionStatus, OptionsUpdate, SocketClientBuilder, SocketClientOptions};
use crate::messaging::{DirectionKey, Subscription};
use crate::types::{Payload, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot, watch};

/// The main entry point: a self-healing WebSocket connection.
///
/// `SocketClient` is a cheap handle to a driver task that owns the transport,
/// reconnects on unexpected closure, pings the server to detect dead links and
/// buffers outbound messages while offline. None of its operations block or
/// fail at runtime; outcomes are reported through [`Callbacks`], a
/// [`Subscription`] or [`SocketClient::watch_status`].
///
/// # Example
///
/// ```no_run
/// use relay_socket::{Callbacks, DirectionKey, SocketClient, SocketClientOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SocketClient::builder(SocketClientOptions::new("wss://api.example.com/ws/abc123"))?
///     .callbacks(Callbacks::new().on_message(|message| println!("received: {:?}", message)))
///     .build();
///
/// client.connect();
/// client.send_action(DirectionKey::W);
/// // ...
/// client.disconnect();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SocketClient {
    pub(crate) commands: mpsc::UnboundedSender<Command>,
    pub(crate) status: watch::Receiver<ConnectionStatus>,
    pub(crate) next_subscription: Arc<AtomicU64>,
}

impl SocketClient {
    /// Creates a client over the tungstenite transport without callbacks.
    ///
    /// This does not connect; call [`connect()`](Self::connect). Must be called
    /// from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SocketError::InvalidOptions`](crate::SocketError::InvalidOptions)
    /// if the endpoint is empty.
    pub fn new(options: SocketClientOptions) -> Result<Self> {
        SocketClientBuilder::new(options).map(|builder| builder.build())
    }

    /// Starts configuring a client with callbacks or a custom connector.
    pub fn builder(options: SocketClientOptions) -> Result<SocketClientBuilder> {
        SocketClientBuilder::new(options)
    }

    /// Opens the connection.
    ///
    /// A no-op (with a warning) while already connected. While a connection
    /// attempt or a reconnect delay is pending, starts over with a fresh
    /// handle. Clears a previous manual disconnect, but not the reconnect
    /// counter, which only resets on a successful open.
    pub fn connect(&self) {
        self.dispatch(Command::Connect);
    }

    /// Closes the connection for good.
    ///
    /// Cancels every timer, drops the transport handle, discards queued
    /// messages and settles in [`ConnectionStatus::Disconnected`]. No
    /// reconnection follows until [`connect()`](Self::connect) is called again.
    pub fn disconnect(&self) {
        self.dispatch(Command::Disconnect);
    }

    /// Sends a payload, or queues it until the connection is open.
    ///
    /// Queued payloads are transmitted in submission order as soon as the
    /// client reaches [`ConnectionStatus::Connected`].
    pub fn send(&self, payload: impl Into<Payload>) {
        self.dispatch(Command::Send(payload.into()));
    }

    /// Sends a directional command as `{"type":"action","action":...}`.
    pub fn send_action(&self, direction: DirectionKey) {
        self.send(direction);
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Checks whether the client is currently connected.
    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected
    }

    /// A receiver that observes every status change.
    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    /// Shallow-merges new options. An open connection is left alone; new
    /// values apply to the next timer armed or connection attempt made.
    pub fn update_options(&self, update: OptionsUpdate) {
        self.dispatch(Command::UpdateOptions(update));
    }

    /// Shallow-merges callbacks: each one set in `callbacks` replaces the
    /// current one.
    pub fn update_callbacks(&self, callbacks: Callbacks) {
        self.dispatch(Command::UpdateCallbacks(callbacks));
    }

    /// Attaches an observer that receives every event from now on.
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.dispatch(Command::Subscribe(id, tx));

        let commands = self.commands.downgrade();
        Subscription::new(id, rx, move |id| {
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(Command::Unsubscribe(id));
            }
        })
    }

    /// Number of payloads waiting for the connection to open.
    pub async fn queued_messages(&self) -> usize {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.dispatch(Command::QueuedMessages(reply_tx));
        reply_rx.await.unwrap_or(0)
    }

    fn dispatch(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::debug!("Client driver stopped, command dropped");
        }
    }
}

impl std::fmt::Debug for SocketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketClient")
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::ClientEvent;
    use crate::types::{Frame, Inbound};
    use crate::websocket::transport::testing::{MemoryConnector, OpenBehavior};
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time;

    #[derive(Default)]
    struct Recorder {
        statuses: Mutex<Vec<ConnectionStatus>>,
        reconnects: Mutex<Vec<u32>>,
        messages: Mutex<Vec<Inbound>>,
        closes: Mutex<usize>,
        errors: Mutex<usize>,
        opens: Mutex<usize>,
    }

    impl Recorder {
        fn callbacks(self: &Arc<Self>) -> Callbacks {
            let (s, r, m, c, e, o) = (
                Arc::clone(self),
                Arc::clone(self),
                Arc::clone(self),
                Arc::clone(self),
                Arc::clone(self),
                Arc::clone(self),
            );
            Callbacks::new()
                .on_status_change(move |status| s.statuses.lock().unwrap().push(status))
                .on_reconnect(move |attempt| r.reconnects.lock().unwrap().push(attempt))
                .on_message(move |message| m.messages.lock().unwrap().push(message))
                .on_close(move |_| *c.closes.lock().unwrap() += 1)
                .on_error(move |_| *e.errors.lock().unwrap() += 1)
                .on_open(move |_| *o.opens.lock().unwrap() += 1)
        }

        fn statuses(&self) -> Vec<ConnectionStatus> {
            self.statuses.lock().unwrap().clone()
        }

        fn reconnects(&self) -> Vec<u32> {
            self.reconnects.lock().unwrap().clone()
        }

        fn callback_count(&self) -> usize {
            self.statuses.lock().unwrap().len()
                + self.reconnects.lock().unwrap().len()
                + self.messages.lock().unwrap().len()
                + *self.closes.lock().unwrap()
                + *self.errors.lock().unwrap()
                + *self.opens.lock().unwrap()
        }
    }

    fn client_with(
        options: SocketClientOptions,
        behavior: OpenBehavior,
    ) -> (SocketClient, MemoryConnector, Arc<Recorder>) {
        let connector = MemoryConnector::new(behavior);
        let recorder = Arc::new(Recorder::default());
        let client = SocketClient::builder(options)
            .unwrap()
            .callbacks(recorder.callbacks())
            .connector(connector.clone())
            .build();
        (client, connector, recorder)
    }

    /// Lets the driver process everything already submitted.
    async fn settle() {
        time::sleep(Duration::from_millis(1)).await;
    }

    fn text(s: &str) -> Frame {
        Frame::Text(s.to_string())
    }

    use ConnectionStatus::*;

    #[tokio::test(start_paused = true)]
    async fn test_messages_sent_offline_are_flushed_in_order() {
        let (client, connector, _) =
            client_with(SocketClientOptions::new("ws://h/s"), OpenBehavior::Manual);

        client.send("x");
        client.send(json!({"n": 1}));
        client.send("z");
        client.connect();
        settle().await;
        assert_eq!(client.queued_messages().await, 3);

        let link = connector.last_link();
        link.accept();
        client.send("after");
        settle().await;

        assert_eq!(client.status(), Connected);
        assert_eq!(
            link.sent(),
            vec![text("x"), text(r#"{"n":1}"#), text("z"), text("after")]
        );
        assert_eq!(client.queued_messages().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_queued_frame_is_sent_once() {
        let (client, connector, _) =
            client_with(SocketClientOptions::new("ws://h/s"), OpenBehavior::Manual);

        client.send("x");
        client.connect();
        settle().await;
        connector.last_link().accept();
        settle().await;

        assert_eq!(connector.last_link().sent(), vec![text("x")]);
        assert_eq!(client.queued_messages().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_attempts_exhaust_and_stop() {
        let options = SocketClientOptions {
            max_reconnect_attempts: 2,
            reconnect_interval: 100,
            ..SocketClientOptions::new("ws://h/s")
        };
        let (client, connector, recorder) = client_with(options, OpenBehavior::Fail);

        client.connect();
        time::sleep(Duration::from_secs(1)).await;

        assert_eq!(
            recorder.statuses(),
            vec![
                Connecting,
                Error,
                Reconnecting,
                Connecting,
                Error,
                Reconnecting,
                Connecting,
                Error,
                Disconnected
            ]
        );
        assert_eq!(recorder.reconnects(), vec![1, 2]);
        assert_eq!(connector.attempts(), 3);

        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(connector.attempts(), 3);
        assert_eq!(client.status(), Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_construction_failure_follows_reconnect_policy() {
        let options = SocketClientOptions {
            max_reconnect_attempts: 1,
            reconnect_interval: 50,
            ..SocketClientOptions::new("ws://h/s")
        };
        let (client, connector, recorder) = client_with(options, OpenBehavior::Reject);

        client.connect();
        settle().await;
        assert_eq!(recorder.statuses(), vec![Connecting, Error, Reconnecting]);

        connector.set_behavior(OpenBehavior::Accept);
        time::sleep(Duration::from_millis(60)).await;
        assert_eq!(client.status(), Connected);
        assert_eq!(*recorder.errors.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_while_reconnecting_stops_everything() {
        let (client, connector, recorder) =
            client_with(SocketClientOptions::new("ws://h/s"), OpenBehavior::Accept);

        client.connect();
        settle().await;
        connector.last_link().drop_connection();
        settle().await;
        assert_eq!(client.status(), Reconnecting);

        client.disconnect();
        settle().await;
        assert_eq!(client.status(), Disconnected);
        let callbacks_at_disconnect = recorder.callback_count();

        time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(connector.attempts(), 1);
        assert_eq!(recorder.callback_count(), callbacks_at_disconnect);
        assert_eq!(recorder.statuses().last(), Some(&Disconnected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_from_connected_leaves_no_timers() {
        let options = SocketClientOptions {
            heartbeat_interval: 1_000,
            heartbeat_timeout: 500,
            ..SocketClientOptions::new("ws://h/s")
        };
        let (client, connector, recorder) = client_with(options, OpenBehavior::Accept);

        client.connect();
        settle().await;
        let link = connector.last_link();
        client.send("queued?");
        client.disconnect();
        client.send("after disconnect");
        settle().await;

        assert!(link.is_closed());
        assert_eq!(link.sent(), vec![text("queued?")]);
        let callbacks_at_disconnect = recorder.callback_count();

        time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(recorder.callback_count(), callbacks_at_disconnect);
        assert_eq!(connector.attempts(), 1);
        // Sends made after a manual disconnect wait for the next connect
        assert_eq!(client.queued_messages().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_timeout_forces_one_reconnect() {
        let options = SocketClientOptions {
            heartbeat_interval: 1_000,
            heartbeat_timeout: 500,
            reconnect_interval: 3_000,
            ..SocketClientOptions::new("ws://h/s")
        };
        let (client, connector, recorder) = client_with(options, OpenBehavior::Manual);

        client.connect();
        settle().await;
        let link = connector.last_link();
        link.accept();
        settle().await;

        time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(link.sent(), vec![text(r#"{"type":"ping"}"#)]);

        time::sleep(Duration::from_millis(500)).await;
        assert!(link.is_closed());
        assert_eq!(client.status(), Reconnecting);
        assert_eq!(*recorder.closes.lock().unwrap(), 1);

        time::sleep(Duration::from_millis(3_000)).await;
        assert_eq!(connector.attempts(), 2);
        assert_eq!(
            recorder.statuses(),
            vec![Connecting, Connected, Reconnecting, Connecting]
        );
        assert_eq!(recorder.reconnects(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_any_inbound_traffic_keeps_link_alive() {
        let options = SocketClientOptions {
            heartbeat_interval: 1_000,
            heartbeat_timeout: 500,
            ..SocketClientOptions::new("ws://h/s")
        };
        let (client, connector, recorder) = client_with(options, OpenBehavior::Accept);

        client.connect();
        settle().await;
        let link = connector.last_link();

        time::sleep(Duration::from_millis(1_200)).await;
        link.receive(text("frame-update"));
        time::sleep(Duration::from_millis(600)).await;

        assert_eq!(client.status(), Connected);
        assert!(!link.is_closed());
        assert_eq!(
            *recorder.messages.lock().unwrap(),
            vec![Inbound::Raw(text("frame-update"))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_inbound_decoding() {
        let (client, connector, recorder) =
            client_with(SocketClientOptions::new("ws://h/s"), OpenBehavior::Accept);

        client.connect();
        settle().await;
        let link = connector.last_link();
        link.receive(text(r#"{"type":"state","x":1}"#));
        link.receive(text("not { json"));
        link.receive(Frame::Binary(vec![0xde, 0xad]));
        settle().await;

        assert_eq!(
            *recorder.messages.lock().unwrap(),
            vec![
                Inbound::Json(json!({"type": "state", "x": 1})),
                Inbound::Raw(text("not { json")),
                Inbound::Raw(Frame::Binary(vec![0xde, 0xad])),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unexpected_close_reconnects_and_resets_counter() {
        let options = SocketClientOptions {
            reconnect_interval: 100,
            ..SocketClientOptions::new("ws://h/s")
        };
        let (client, connector, recorder) = client_with(options, OpenBehavior::Accept);

        client.connect();
        settle().await;
        for _ in 0..3 {
            connector.last_link().drop_connection();
            time::sleep(Duration::from_millis(150)).await;
            assert_eq!(client.status(), Connected);
        }

        // Every successful open resets the counter, so each reconnect is attempt 1
        assert_eq!(recorder.reconnects(), vec![1, 1, 1]);
        assert_eq!(connector.attempts(), 4);
        assert_eq!(*recorder.opens.lock().unwrap(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_without_auto_reconnect() {
        let options = SocketClientOptions {
            auto_reconnect: false,
            ..SocketClientOptions::new("ws://h/s")
        };
        let (client, connector, recorder) = client_with(options, OpenBehavior::Accept);

        client.connect();
        settle().await;
        connector.last_link().drop_connection();
        time::sleep(Duration::from_secs(60)).await;

        assert_eq!(recorder.statuses(), vec![Connecting, Connected, Disconnected]);
        assert_eq!(connector.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connection_timeout_aborts_attempt() {
        let options = SocketClientOptions {
            connection_timeout: 2_000,
            reconnect_interval: 100,
            max_reconnect_attempts: 1,
            ..SocketClientOptions::new("ws://h/s")
        };
        let (client, connector, recorder) = client_with(options, OpenBehavior::Manual);

        client.connect();
        time::sleep(Duration::from_millis(2_001)).await;
        let first = connector.links()[0].clone();
        assert!(first.is_closed());
        assert_eq!(recorder.statuses(), vec![Connecting, Error, Reconnecting]);
        assert_eq!(*recorder.errors.lock().unwrap(), 1);

        // An open from the abandoned handle is ignored
        first.accept();
        time::sleep(Duration::from_millis(150)).await;
        assert_eq!(client.status(), Connecting);
        assert_eq!(connector.attempts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_while_connected_is_ignored() {
        let (client, connector, recorder) =
            client_with(SocketClientOptions::new("ws://h/s"), OpenBehavior::Accept);

        client.connect();
        settle().await;
        client.connect();
        settle().await;

        assert_eq!(connector.attempts(), 1);
        assert_eq!(recorder.statuses(), vec![Connecting, Connected]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_send_is_queued_and_flushed_on_next_open() {
        let (client, connector, _) =
            client_with(SocketClientOptions::new("ws://h/s"), OpenBehavior::Accept);

        client.connect();
        settle().await;
        let first = connector.last_link();
        first.fail_sends.store(true, std::sync::atomic::Ordering::SeqCst);
        client.send("lost?");
        settle().await;
        assert_eq!(client.queued_messages().await, 1);

        first.drop_connection();
        time::sleep(Duration::from_secs(4)).await;

        assert_eq!(client.status(), Connected);
        assert_eq!(connector.last_link().sent(), vec![text("lost?")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_options_applies_to_next_attempt() {
        let (client, connector, _) =
            client_with(SocketClientOptions::new("ws://h/old"), OpenBehavior::Accept);

        client.connect();
        settle().await;
        client.update_options(OptionsUpdate {
            endpoint: Some("ws://h/new".to_string()),
            reconnect_interval: Some(10),
            ..Default::default()
        });
        settle().await;
        assert_eq!(client.status(), Connected);

        connector.last_link().drop_connection();
        time::sleep(Duration::from_millis(20)).await;

        let endpoints: Vec<_> = connector.requests().into_iter().map(|r| r.endpoint).collect();
        assert_eq!(endpoints, vec!["ws://h/old", "ws://h/new"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_callbacks_replaces_observer() {
        let (client, connector, recorder) =
            client_with(SocketClientOptions::new("ws://h/s"), OpenBehavior::Accept);
        let replacement = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&replacement);

        client.update_callbacks(Callbacks::new().on_message(move |m| sink.lock().unwrap().push(m)));
        client.connect();
        settle().await;
        connector.last_link().receive(text("1"));
        settle().await;

        assert!(recorder.messages.lock().unwrap().is_empty());
        assert_eq!(*replacement.lock().unwrap(), vec![Inbound::Json(json!(1))]);
        assert_eq!(recorder.statuses(), vec![Connecting, Connected]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscription_and_unsubscribe() {
        let (client, connector, _) =
            client_with(SocketClientOptions::new("ws://h/s"), OpenBehavior::Manual);
        let mut subscription = client.subscribe();

        client.connect();
        settle().await;
        connector.last_link().accept();
        settle().await;

        assert_eq!(subscription.try_recv(), Some(ClientEvent::StatusChange(Connecting)));
        assert_eq!(subscription.try_recv(), Some(ClientEvent::StatusChange(Connected)));
        assert!(matches!(subscription.try_recv(), Some(ClientEvent::Open(_))));

        subscription.unsubscribe();
        client.disconnect();
        settle().await;
        assert_eq!(client.status(), Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_status() {
        let (client, _, _) =
            client_with(SocketClientOptions::new("ws://h/s"), OpenBehavior::Accept);
        let mut status = client.watch_status();
        assert_eq!(*status.borrow(), Disconnected);

        client.connect();
        status.wait_for(|s| *s == Connected).await.unwrap();
        assert!(client.is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_action_wire_format() {
        let (client, connector, _) =
            client_with(SocketClientOptions::new("ws://h/s"), OpenBehavior::Accept);

        client.connect();
        settle().await;
        client.send_action(DirectionKey::Left);
        settle().await;

        let sent = connector.last_link().sent();
        let [Frame::Text(body)] = sent.as_slice() else {
            panic!("expected one text frame, got {:?}", sent);
        };
        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(value, json!({"type": "action", "action": "arrowleft"}));
    }

    #[tokio::test(start_paused = true)]
    async fn test_protocols_are_passed_to_connector() {
        let options = SocketClientOptions {
            protocols: Some("control.v1".into()),
            ..SocketClientOptions::new("ws://h/s")
        };
        let (client, connector, _) = client_with(options, OpenBehavior::Accept);

        client.connect();
        settle().await;
        assert_eq!(
            connector.requests()[0].protocols,
            Some(crate::client::SubProtocols::from("control.v1"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_options_update_is_rejected() {
        let options = SocketClientOptions {
            heartbeat_interval: 1_000,
            heartbeat_timeout: 500,
            ..SocketClientOptions::new("ws://h/s")
        };
        let (client, connector, recorder) = client_with(options, OpenBehavior::Accept);

        client.update_options(OptionsUpdate {
            heartbeat_interval: Some(0),
            reconnect_interval: Some(10),
            ..Default::default()
        });
        client.connect();
        settle().await;
        assert_eq!(*recorder.errors.lock().unwrap(), 1);

        // The previous interval is still in force, so the heartbeat keeps running
        time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(
            connector.last_link().sent(),
            vec![text(r#"{"type":"ping"}"#)]
        );
        assert_eq!(client.status(), Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_client_stops_driver_despite_subscription() {
        let options = SocketClientOptions {
            heartbeat_interval: 1_000,
            heartbeat_timeout: 500,
            ..SocketClientOptions::new("ws://h/s")
        };
        let (client, connector, _) = client_with(options, OpenBehavior::Accept);
        let mut subscription = client.subscribe();

        client.connect();
        settle().await;
        let link = connector.last_link();
        drop(client);
        settle().await;

        assert!(link.is_closed());
        let drained = time::timeout(Duration::from_secs(1), async {
            while subscription.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok(), "subscription should end with the driver");

        time::sleep(Duration::from_secs(10)).await;
        assert!(link.sent().is_empty());
        assert_eq!(connector.attempts(), 1);
        subscription.unsubscribe();
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_heartbeat_timeout_without_ping() {
        let options = SocketClientOptions {
            heartbeat_interval: 1_000,
            heartbeat_timeout: 500,
            ..SocketClientOptions::new("ws://h/s")
        };
        let (client, connector, recorder) = client_with(options, OpenBehavior::Accept);

        client.connect();
        settle().await;
        let link = connector.last_link();
        // Transport stops accepting writes without reporting a close yet
        link.open.store(false, std::sync::atomic::Ordering::SeqCst);

        time::sleep(Duration::from_millis(2_200)).await;
        assert!(link.sent().is_empty());
        assert!(!link.is_closed());
        assert_eq!(client.status(), Connected);
        assert_eq!(*recorder.closes.lock().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejects_empty_endpoint() {
        assert!(SocketClient::new(SocketClientOptions::new("")).is_err());
    }
}
