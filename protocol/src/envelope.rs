//! The typed JSON envelope and its codec.
//!
//! Every frame on the wire is `{ "type": <string>, "payload": <object>,
//! "timestamp": <int64_ms> }`. Decoding never panics on malformed input —
//! it reports [`CodecError::InvalidFrame`] so the caller can answer with an
//! `ERROR` envelope instead of tearing down the socket.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::wire::MessageType;

/// A decoded wire frame before its payload has been interpreted.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub payload: Value,
    pub timestamp: i64,
}

/// Failures from decoding a raw frame or extracting a typed payload from it.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid frame: {0}")]
    InvalidFrame(#[from] serde_json::Error),
}

impl Envelope {
    /// Builds an envelope for `payload`, stamping `timestamp` as given by
    /// the caller. Never reads the clock itself, so it stays a pure
    /// function and is trivially testable.
    pub fn new<P: Serialize>(kind: MessageType, payload: &P, timestamp: i64) -> Result<Self, CodecError> {
        let payload = serde_json::to_value(payload)?;
        Ok(Envelope { kind, payload, timestamp })
    }

    /// Serializes this envelope to a JSON string for the wire.
    pub fn encode(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(CodecError::from)
    }

    /// Parses a raw JSON frame off the wire.
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        serde_json::from_str(raw).map_err(CodecError::from)
    }

    /// Deserializes this envelope's `payload` into a concrete type.
    pub fn payload_as<P: DeserializeOwned>(&self) -> Result<P, CodecError> {
        serde_json::from_value(self.payload.clone()).map_err(CodecError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::HeartbeatPayload;

    #[test]
    fn round_trip_preserves_type_payload_and_timestamp() {
        let envelope = Envelope::new(MessageType::Ping, &HeartbeatPayload { timestamp: 42 }, 1234).unwrap();
        let encoded = envelope.encode().unwrap();
        let decoded = Envelope::decode(&encoded).unwrap();

        assert_eq!(decoded.kind, MessageType::Ping);
        assert_eq!(decoded.timestamp, 1234);
        let payload: HeartbeatPayload = decoded.payload_as().unwrap();
        assert_eq!(payload.timestamp, 42);
    }

    #[test]
    fn unknown_type_fails_with_invalid_frame() {
        let raw = r#"{"type":"NOT_A_REAL_TYPE","payload":{},"timestamp":0}"#;
        assert!(Envelope::decode(raw).is_err());
    }

    #[test]
    fn malformed_json_fails_with_invalid_frame() {
        let raw = "{not json";
        assert!(Envelope::decode(raw).is_err());
    }

    #[test]
    fn wire_strings_match_spec() {
        assert_eq!(MessageType::Action.as_wire_str(), "ACTION");
        assert_eq!(MessageType::ActionRejected.as_wire_str(), "ACTION_REJECTED");
        assert_eq!(MessageType::JoinRoomAck.as_wire_str(), "JOIN_ROOM_ACK");
    }
}
