/// Wire-level `type` tags used by the control protocol (magic strings layer)
pub mod message_types {
    pub const PING: &str = "ping";
    pub const ACTION: &str = "action";
}

/// WebSocket handshake header carrying the requested sub-protocols
pub const SUB_PROTOCOL_HEADER: &str = "sec-websocket-protocol";

/// Path segment under which the backend serves session sockets
pub const SESSION_SOCKET_PATH: &str = "ws";

/// Default heartbeat interval (milliseconds)
pub const DEFAULT_HEARTBEAT_INTERVAL: u64 = 30_000;

/// Default heartbeat grace period after a ping (milliseconds)
pub const DEFAULT_HEARTBEAT_TIMEOUT: u64 = 5_000;

/// Default delay before each reconnect attempt (milliseconds)
pub const DEFAULT_RECONNECT_INTERVAL: u64 = 3_000;

/// Default cap on consecutive reconnect attempts
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Default time allowed for the handshake to complete (milliseconds)
pub const DEFAULT_CONNECTION_TIMEOUT: u64 = 10_000;
