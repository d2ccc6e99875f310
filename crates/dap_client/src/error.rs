//! Error taxonomy for the frame codec, message model, and client state machine.

use thiserror::Error;

use crate::client::ClientState;

/// Failures while extracting a frame from the inbound byte buffer.
#[derive(Debug, Error)]
pub enum FrameError {
    /// A header block was present but carried no `Content-Length` entry.
    #[error("frame is missing a Content-Length header")]
    MissingContentLength,

    /// `Content-Length` was present but not a valid non-negative integer.
    #[error("invalid Content-Length value: {0:?}")]
    InvalidContentLength(String),

    /// A header line did not contain the required `": "` separator.
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),

    /// `Content-Type` named a charset this codec cannot decode.
    #[error("unsupported body encoding: {0:?}")]
    UnsupportedEncoding(String),

    /// The body bytes were not valid text in the selected encoding.
    #[error("body is not valid {encoding} text")]
    InvalidText {
        /// The encoding that failed to decode the body.
        encoding: String,
    },

    /// The body was not valid JSON.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while decoding a parsed JSON value into a typed protocol message.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The JSON value was not an object, so it cannot carry a `type` field.
    #[error("message is not a JSON object")]
    NotAnObject,

    /// The `type` discriminator was absent.
    #[error("message is missing a \"type\" field")]
    MissingType,

    /// The `type` discriminator was present but not one of `request`,
    /// `response`, or `event`.
    #[error("unknown message type: {0:?}")]
    UnknownType(String),

    /// The value matched a known `type` but failed to deserialize into that
    /// variant's shape (a required field was missing or mistyped).
    #[error("malformed {kind} message: {source}")]
    MalformedMessage {
        /// Which variant (`request`, `response`, `event`) failed to parse.
        kind: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by the client's public operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A frame-level decode failure occurred during `recv`.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A message-level decode failure occurred during `recv`.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A request-issuing operation was called from a state that disallows it.
    #[error("operation {operation:?} is not permitted in state {current:?}")]
    InvalidState {
        /// The operation that was rejected.
        operation: &'static str,
        /// The state the client was in when the operation was attempted.
        current: ClientState,
    },
}
