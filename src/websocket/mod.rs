// WebSocket module - Transport seam and the tungstenite-backed connector
mod factory;
pub mod transport;

pub use factory::WebSocketFactory;
pub use transport::{
    CloseEvent, Connector, EventSink, Link, LinkId, OpenEvent, OpenRequest, TransportEvent,
};
