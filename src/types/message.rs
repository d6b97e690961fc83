use serde::Serialize;
use serde_json::Value;

use super::error::Result;

/// A single WebSocket data frame as it travels over the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

impl Frame {
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An outbound application payload.
///
/// Text is sent verbatim; JSON values are encoded when transmitted, so a
/// payload queued while offline is encoded only once the link is open.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
}

impl Payload {
    /// Builds a JSON payload from any serializable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Encodes the payload into the frame put on the wire.
    pub fn encode(&self) -> Frame {
        match self {
            Self::Text(text) => Frame::Text(text.clone()),
            Self::Json(value) => Frame::Text(value.to_string()),
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// An inbound message as delivered to observers.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// The frame decoded as JSON
    Json(Value),
    /// The frame could not be decoded and is passed through unchanged
    Raw(Frame),
}

impl Inbound {
    /// Decodes a frame, falling back to the raw frame when it is not JSON.
    pub fn decode(frame: Frame) -> Self {
        let decoded = match &frame {
            Frame::Text(text) => serde_json::from_str::<Value>(text),
            Frame::Binary(data) => serde_json::from_slice::<Value>(data),
        };

        match decoded {
            Ok(value) => Self::Json(value),
            Err(e) => {
                tracing::debug!("Inbound frame is not JSON ({}), delivering raw", e);
                Self::Raw(frame)
            }
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }
}
