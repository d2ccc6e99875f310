#![forbid(unsafe_code)]
//! A sans-I/O client engine for the Debug Adapter Protocol (DAP).
//!
//! This crate owns no sockets, pipes, threads, or timers. A host feeds
//! inbound bytes to [`Client::recv`] and drains outbound bytes with
//! [`Client::send`]; the engine advances the protocol state machine,
//! correlates requests with responses, and yields a unified
//! [`LogicalEvent`] stream. Wiring up an actual debug adapter process
//! (spawning it, piping its stdio, running an event loop) is left to the
//! host, the same way this workspace keeps transport and protocol concerns
//! in separate layers.

mod capabilities;
mod client;
mod codec;
mod commands;
mod config;
mod correlation;
mod error;
mod events;
mod message;

pub use capabilities::{AdapterCapabilities, ClientCapabilities};
pub use client::{Client, ClientState, LogicalEvent, Recv, ResponseDelivery};
pub use codec::{encode_frame, FrameDecoder};
pub use commands::KnownCommand;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use correlation::{Correlator, PendingRequest};
pub use error::{ClientError, DecodeError, FrameError};
pub use events::KnownEvent;
pub use message::{decode_message, EventMessage, ProtocolMessage, RequestMessage, ResponseMessage};
