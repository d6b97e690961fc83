use crate::types::Payload;
use serde::{Deserialize, Serialize};

/// Directional input accepted by the backend.
///
/// Serialized as the lowercase keyboard key name that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionKey {
    #[serde(rename = "w")]
    W,
    #[serde(rename = "a")]
    A,
    #[serde(rename = "s")]
    S,
    #[serde(rename = "d")]
    D,
    #[serde(rename = "arrowup")]
    Up,
    #[serde(rename = "arrowdown")]
    Down,
    #[serde(rename = "arrowleft")]
    Left,
    #[serde(rename = "arrowright")]
    Right,
}

impl DirectionKey {
    /// Maps a keyboard key name (`"W"`, `"ArrowUp"`, ...) to a direction.
    ///
    /// Returns `None` for keys that carry no direction.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "w" => Some(Self::W),
            "a" => Some(Self::A),
            "s" => Some(Self::S),
            "d" => Some(Self::D),
            "arrowup" => Some(Self::Up),
            "arrowdown" => Some(Self::Down),
            "arrowleft" => Some(Self::Left),
            "arrowright" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::W => "w",
            Self::A => "a",
            Self::S => "s",
            Self::D => "d",
            Self::Up => "arrowup",
            Self::Down => "arrowdown",
            Self::Left => "arrowleft",
            Self::Right => "arrowright",
        }
    }
}

impl std::fmt::Display for DirectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Messages of the control protocol, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Liveness probe; the backend is not required to answer it
    Ping,
    /// A directional command
    Action { action: DirectionKey },
}

impl ControlMessage {
    pub fn action(direction: DirectionKey) -> Self {
        Self::Action { action: direction }
    }
}

impl From<ControlMessage> for Payload {
    fn from(message: ControlMessage) -> Self {
        // Unit and single-field variants always serialize
        match serde_json::to_value(&message) {
            Ok(value) => Payload::Json(value),
            Err(e) => {
                tracing::error!("Failed to encode control message {:?}: {}", message, e);
                Payload::Json(serde_json::Value::Null)
            }
        }
    }
}

impl From<DirectionKey> for Payload {
    fn from(direction: DirectionKey) -> Self {
        ControlMessage::action(direction).into()
    }
}
