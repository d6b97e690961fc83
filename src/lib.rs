//! # Relay Socket
//!
//! A resilient WebSocket messaging client: it reconnects after unexpected
//! closures, detects dead links with an application-level heartbeat and
//! queues outbound messages while offline.
//!
//! ## Example
//!
//! ```no_run
//! use relay_socket::{Callbacks, DirectionKey, SocketClient, SocketClientOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoint = relay_socket::session_endpoint("localhost:8000", "abc123", false)?;
//!     let client = SocketClient::builder(SocketClientOptions::new(endpoint))?
//!         .callbacks(
//!             Callbacks::new()
//!                 .on_status_change(|status| println!("status: {}", status))
//!                 .on_message(|message| println!("received: {:?}", message)),
//!         )
//!         .build();
//!
//!     client.connect();
//!     client.send_action(DirectionKey::Up);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod infrastructure;
pub mod messaging;
pub mod types;
pub mod websocket;

pub use client::{
    Callbacks, ConnectionStatus, OptionsUpdate, SocketClient, SocketClientBuilder,
    SocketClientOptions, SubProtocols,
};
pub use infrastructure::session_endpoint;
pub use messaging::{ClientEvent, ControlMessage, DirectionKey, Subscription};
pub use types::{Frame, Inbound, Payload, Result, SocketError};
pub use websocket::{CloseEvent, Connector, Link, OpenEvent, WebSocketFactory};
