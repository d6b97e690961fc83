// Infrastructure module - Timers, heartbeat and buffering behind the client driver
pub mod endpoint;
pub mod heartbeat;
pub mod queue;
pub mod timer;

pub use endpoint::session_endpoint;
pub use heartbeat::HeartbeatManager;
pub use queue::OutboundQueue;
pub use timer::{TimerFired, TimerKind, TimerSet};
