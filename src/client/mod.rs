// Module declarations
mod builder;
mod callbacks;
mod connection;
mod core;
mod driver;
pub mod state;

// Public API exports
pub use builder::{OptionsUpdate, SocketClientBuilder, SocketClientOptions, SubProtocols};
pub use callbacks::Callbacks;
pub use connection::{ConnectionManager, ConnectionStatus};
pub use self::core::SocketClient;
pub use state::{ConnectionMachine, Effect, Event};
