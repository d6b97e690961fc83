// Messaging module - Control payloads, observer events and routing
pub mod control;
pub mod event;
pub mod router;

pub use control::{ControlMessage, DirectionKey};
pub use event::{ClientEvent, Subscription, SubscriptionId};
pub use router::MessageRouter;
