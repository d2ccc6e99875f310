//! C2: the typed request/response/event message model.
//!
//! Dynamic-shape payloads (`arguments`, `body`) are represented as generic
//! [`serde_json::Value`]; the engine only inspects specific fields for
//! routing and state-machine advancement, per the "dynamic-shape payloads"
//! design note.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

/// A client- or adapter-initiated request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestMessage {
    pub seq: u64,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

/// Response to a previously sent request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseMessage {
    pub seq: u64,
    pub request_seq: u64,
    pub command: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ResponseMessage {
    /// The reserved `"cancelled"` message token: the request was honored as
    /// cancelled.
    pub const MESSAGE_CANCELLED: &'static str = "cancelled";
    /// The reserved `"notStopped"` message token: retry once the adapter is
    /// in a `stopped` state.
    pub const MESSAGE_NOT_STOPPED: &'static str = "notStopped";
}

/// A debug-adapter-initiated event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventMessage {
    pub seq: u64,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// The three protocol message kinds, discriminated by the wire `type` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolMessage {
    Request(RequestMessage),
    Response(ResponseMessage),
    Event(EventMessage),
}

impl ProtocolMessage {
    /// The `seq` carried by every protocol message, regardless of kind.
    pub fn seq(&self) -> u64 {
        match self {
            ProtocolMessage::Request(r) => r.seq,
            ProtocolMessage::Response(r) => r.seq,
            ProtocolMessage::Event(e) => e.seq,
        }
    }

    /// Serialize to the tagged JSON shape the wire format expects.
    pub fn to_value(&self) -> Value {
        match self {
            ProtocolMessage::Request(r) => tag(r, "request"),
            ProtocolMessage::Response(r) => tag(r, "response"),
            ProtocolMessage::Event(e) => tag(e, "event"),
        }
    }
}

fn tag<T: Serialize>(inner: &T, type_name: &str) -> Value {
    let mut value = serde_json::to_value(inner).expect("message structs always serialize");
    value
        .as_object_mut()
        .expect("message structs serialize to JSON objects")
        .insert("type".to_string(), Value::String(type_name.to_string()));
    value
}

/// Decode a single parsed JSON value (one element already split out of a
/// frame's body, including batch elements) into a typed [`ProtocolMessage`].
///
/// Unknown `type` values, or a value lacking `type` entirely, are decode
/// failures per spec.md §4.2/§7 -- the engine does not guess at intent.
pub fn decode_message(value: Value) -> Result<ProtocolMessage, DecodeError> {
    let type_name = value
        .as_object()
        .ok_or(DecodeError::NotAnObject)?
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?
        .to_string();

    match type_name.as_str() {
        "request" => serde_json::from_value(value)
            .map(ProtocolMessage::Request)
            .map_err(|source| DecodeError::MalformedMessage {
                kind: "request",
                source,
            }),
        "response" => serde_json::from_value(value)
            .map(ProtocolMessage::Response)
            .map_err(|source| DecodeError::MalformedMessage {
                kind: "response",
                source,
            }),
        "event" => serde_json::from_value(value)
            .map(ProtocolMessage::Event)
            .map_err(|source| DecodeError::MalformedMessage {
                kind: "event",
                source,
            }),
        other => Err(DecodeError::UnknownType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_each_known_type() {
        let req = decode_message(json!({"type": "request", "seq": 1, "command": "threads"}))
            .unwrap();
        assert!(matches!(req, ProtocolMessage::Request(_)));

        let resp = decode_message(json!({
            "type": "response", "seq": 2, "request_seq": 1,
            "command": "threads", "success": true
        }))
        .unwrap();
        assert!(matches!(resp, ProtocolMessage::Response(_)));

        let evt = decode_message(json!({"type": "event", "seq": 3, "event": "output"})).unwrap();
        assert!(matches!(evt, ProtocolMessage::Event(_)));
    }

    #[test]
    fn unknown_type_is_a_decode_error() {
        let err = decode_message(json!({"type": "ping", "seq": 1})).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownType(t) if t == "ping"));
    }

    #[test]
    fn missing_type_is_a_decode_error() {
        let err = decode_message(json!({"seq": 1})).unwrap_err();
        assert!(matches!(err, DecodeError::MissingType));
    }

    #[test]
    fn non_object_is_a_decode_error() {
        let err = decode_message(Value::Null).unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject));
    }

    #[test]
    fn round_trips_unknown_command_and_event_names() {
        let req = ProtocolMessage::Request(RequestMessage {
            seq: 1,
            command: "someFutureCommand".to_string(),
            arguments: None,
        });
        let decoded = decode_message(req.to_value()).unwrap();
        assert_eq!(decoded, req);

        let evt = ProtocolMessage::Event(EventMessage {
            seq: 2,
            event: "someFutureEvent".to_string(),
            body: Some(json!({"k": "v"})),
        });
        let decoded = decode_message(evt.to_value()).unwrap();
        assert_eq!(decoded, evt);
    }

    #[test]
    fn outbound_encoding_omits_null_optional_fields() {
        let req = ProtocolMessage::Request(RequestMessage {
            seq: 1,
            command: "threads".to_string(),
            arguments: None,
        });
        let value = req.to_value();
        assert!(!value.as_object().unwrap().contains_key("arguments"));
    }
}
