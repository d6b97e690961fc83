use super::driver::Driver;
use super::{Callbacks, ConnectionStatus, SocketClient};
use crate::types::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_HEARTBEAT_INTERVAL, DEFAULT_HEARTBEAT_TIMEOUT,
    DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_RECONNECT_INTERVAL, Result, SocketError,
};
use crate::websocket::{Connector, WebSocketFactory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Sub-protocols requested during the handshake, in preference order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubProtocols {
    One(String),
    Many(Vec<String>),
}

impl SubProtocols {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(protocol) => std::slice::from_ref(protocol),
            Self::Many(protocols) => protocols,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Comma-separated form used in the handshake header.
    pub fn header_value(&self) -> String {
        self.as_slice().join(", ")
    }
}

impl From<&str> for SubProtocols {
    fn from(protocol: &str) -> Self {
        Self::One(protocol.to_string())
    }
}

impl From<Vec<String>> for SubProtocols {
    fn from(protocols: Vec<String>) -> Self {
        Self::Many(protocols)
    }
}

/// Client configuration. Durations are in milliseconds.
///
/// Deserializes from any serde format with every field but `endpoint`
/// optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketClientOptions {
    pub endpoint: String,
    #[serde(default = "defaults::heartbeat_interval")]
    pub heartbeat_interval: u64,
    #[serde(default = "defaults::heartbeat_timeout")]
    pub heartbeat_timeout: u64,
    #[serde(default = "defaults::auto_reconnect")]
    pub auto_reconnect: bool,
    #[serde(default = "defaults::reconnect_interval")]
    pub reconnect_interval: u64,
    #[serde(default = "defaults::max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
    #[serde(default = "defaults::connection_timeout")]
    pub connection_timeout: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocols: Option<SubProtocols>,
}

mod defaults {
    use crate::types::*;

    pub fn heartbeat_interval() -> u64 {
        DEFAULT_HEARTBEAT_INTERVAL
    }
    pub fn heartbeat_timeout() -> u64 {
        DEFAULT_HEARTBEAT_TIMEOUT
    }
    pub fn auto_reconnect() -> bool {
        true
    }
    pub fn reconnect_interval() -> u64 {
        DEFAULT_RECONNECT_INTERVAL
    }
    pub fn max_reconnect_attempts() -> u32 {
        DEFAULT_MAX_RECONNECT_ATTEMPTS
    }
    pub fn connection_timeout() -> u64 {
        DEFAULT_CONNECTION_TIMEOUT
    }
}

impl SocketClientOptions {
    /// Options for `endpoint` with every other field at its default.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            heartbeat_timeout: DEFAULT_HEARTBEAT_TIMEOUT,
            auto_reconnect: true,
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            protocols: None,
        }
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval)
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_millis(self.heartbeat_timeout)
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout)
    }

    /// Shallow merge; takes effect from the next event that reads a field.
    pub fn merge(&mut self, update: OptionsUpdate) {
        let OptionsUpdate {
            endpoint,
            heartbeat_interval,
            heartbeat_timeout,
            auto_reconnect,
            reconnect_interval,
            max_reconnect_attempts,
            connection_timeout,
            protocols,
        } = update;

        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(heartbeat_interval) = heartbeat_interval {
            self.heartbeat_interval = heartbeat_interval;
        }
        if let Some(heartbeat_timeout) = heartbeat_timeout {
            self.heartbeat_timeout = heartbeat_timeout;
        }
        if let Some(auto_reconnect) = auto_reconnect {
            self.auto_reconnect = auto_reconnect;
        }
        if let Some(reconnect_interval) = reconnect_interval {
            self.reconnect_interval = reconnect_interval;
        }
        if let Some(max_reconnect_attempts) = max_reconnect_attempts {
            self.max_reconnect_attempts = max_reconnect_attempts;
        }
        if let Some(connection_timeout) = connection_timeout {
            self.connection_timeout = connection_timeout;
        }
        if let Some(protocols) = protocols {
            self.protocols = Some(protocols);
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(SocketError::InvalidOptions(
                "endpoint is required".to_string(),
            ));
        }
        if self.heartbeat_interval == 0 {
            return Err(SocketError::InvalidOptions(
                "heartbeat_interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial options for [`SocketClient::update_options`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsUpdate {
    pub endpoint: Option<String>,
    pub heartbeat_interval: Option<u64>,
    pub heartbeat_timeout: Option<u64>,
    pub auto_reconnect: Option<bool>,
    pub reconnect_interval: Option<u64>,
    pub max_reconnect_attempts: Option<u32>,
    pub connection_timeout: Option<u64>,
    pub protocols: Option<SubProtocols>,
}

/// Builder for SocketClient that handles initialization
pub struct SocketClientBuilder {
    options: SocketClientOptions,
    callbacks: Callbacks,
    connector: Arc<dyn Connector>,
}

impl SocketClientBuilder {
    /// Create a new builder
    pub fn new(options: SocketClientOptions) -> Result<Self> {
        options.validate()?;

        Ok(Self {
            options,
            callbacks: Callbacks::default(),
            connector: Arc::new(WebSocketFactory::new()),
        })
    }

    pub fn callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Replaces the tungstenite transport, e.g. with an in-memory one.
    pub fn connector(mut self, connector: impl Connector) -> Self {
        self.connector = Arc::new(connector);
        self
    }

    /// Build the client and spawn its driver task.
    ///
    /// Must be called from within a tokio runtime. The driver stops once
    /// every clone of the returned client is dropped.
    pub fn build(self) -> SocketClient {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Disconnected);

        let driver = Driver::new(
            self.options,
            self.callbacks,
            self.connector,
            command_rx,
            status_tx,
        );
        tokio::spawn(driver.run());

        SocketClient {
            commands: command_tx,
            status: status_rx,
            next_subscription: Arc::new(AtomicU64::new(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SocketClientOptions::new("ws://h/s");
        assert_eq!(options.heartbeat_interval(), Duration::from_secs(30));
        assert_eq!(options.heartbeat_timeout(), Duration::from_secs(5));
        assert!(options.auto_reconnect);
        assert_eq!(options.reconnect_interval(), Duration::from_secs(3));
        assert_eq!(options.max_reconnect_attempts, 5);
        assert_eq!(options.connection_timeout(), Duration::from_secs(10));
        assert_eq!(options.protocols, None);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let options: SocketClientOptions = serde_json::from_str(
            r#"{"endpoint": "ws://h/s", "max_reconnect_attempts": 2, "protocols": "control"}"#,
        )
        .unwrap();

        assert_eq!(options.max_reconnect_attempts, 2);
        assert_eq!(options.reconnect_interval, DEFAULT_RECONNECT_INTERVAL);
        assert_eq!(options.protocols, Some(SubProtocols::from("control")));

        let many: SocketClientOptions =
            serde_json::from_str(r#"{"endpoint": "ws://h/s", "protocols": ["a", "b"]}"#).unwrap();
        assert_eq!(many.protocols.unwrap().header_value(), "a, b");
    }

    #[test]
    fn test_endpoint_is_required() {
        assert!(serde_json::from_str::<SocketClientOptions>(r#"{"auto_reconnect": false}"#).is_err());
        assert!(matches!(
            SocketClientBuilder::new(SocketClientOptions::new("  ")),
            Err(SocketError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut options = SocketClientOptions::new("ws://h/s");
        options.merge(OptionsUpdate {
            reconnect_interval: Some(100),
            auto_reconnect: Some(false),
            ..Default::default()
        });

        assert_eq!(options.reconnect_interval, 100);
        assert!(!options.auto_reconnect);
        assert_eq!(options.endpoint, "ws://h/s");
        assert_eq!(options.heartbeat_interval, DEFAULT_HEARTBEAT_INTERVAL);
    }
}
