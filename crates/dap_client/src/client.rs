//! C4: the client state machine.
//!
//! Drives the initialization handshake, exposes the request-issuing
//! operations, and turns decoded protocol messages into a unified logical
//! event stream. Purely byte-in/byte-out: no sockets, threads, or timers
//! live here, matching the transport-agnostic split `codex::mcp` draws
//! between its stdio plumbing and its message handling.

use std::collections::VecDeque;

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::capabilities::{AdapterCapabilities, ClientCapabilities};
use crate::codec::{encode_frame, FrameDecoder};
use crate::commands::KnownCommand;
use crate::config::ClientConfig;
use crate::correlation::Correlator;
use crate::error::ClientError;
use crate::message::{decode_message, EventMessage, ProtocolMessage, RequestMessage};

/// The client's position in the DAP session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Ephemeral; exists only during construction.
    NotInitialized,
    /// The `initialize` request has been sent; its response has not arrived.
    WaitingForInitialized,
    /// Initialize response received; arbitrary requests permitted.
    Normal,
    /// The `disconnect` request has been sent.
    WaitingForShutdown,
    /// Terminal: no further sends permitted.
    Shutdown,
    /// Terminal: reached after an `exited` event from the adapter.
    Exited,
}

impl ClientState {
    fn is_terminal(self) -> bool {
        matches!(self, ClientState::Shutdown | ClientState::Exited)
    }
}

/// A generic response delivery: every response that isn't one of the two
/// synthetic lifecycle transitions (`initialize` success, `disconnect`
/// success) is surfaced this way, success or failure alike.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDelivery {
    /// The originating command, resolved from the pending table when
    /// possible, else taken from the response's own `command` field.
    pub command: String,
    pub request_seq: u64,
    pub success: bool,
    pub message: Option<String>,
    pub body: Option<Value>,
    /// `true` when no pending entry matched `request_seq`.
    pub unsolicited: bool,
}

/// A value yielded by [`Client::recv`] to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalEvent {
    /// An adapter-originated event, passed through unchanged.
    Event(EventMessage),
    /// An adapter-originated request (rare), passed through for host handling.
    Request(RequestMessage),
    /// Synthetic: the `initialize` request succeeded.
    Initialized,
    /// Synthetic: the `disconnect` request was answered.
    Terminated,
    /// A generic response delivery, including error responses.
    Response(ResponseDelivery),
}

/// The sans-I/O DAP client.
pub struct Client {
    state: ClientState,
    decoder: FrameDecoder,
    correlator: Correlator,
    capabilities: ClientCapabilities,
    adapter_capabilities: AdapterCapabilities,
    outbound: Vec<u8>,
    /// Values already split out of a frame (e.g. a batch array) but not yet
    /// turned into logical events -- what makes `recv` lazy rather than
    /// eager.
    queued_values: VecDeque<Value>,
}

impl Client {
    /// Construct a client and enqueue the implicit `initialize` request.
    pub fn new(config: ClientConfig) -> Self {
        let capabilities = config.into_capabilities();
        let mut client = Self {
            state: ClientState::NotInitialized,
            decoder: FrameDecoder::new(),
            correlator: Correlator::starting_at(1),
            capabilities,
            adapter_capabilities: AdapterCapabilities::default(),
            outbound: Vec::new(),
            queued_values: VecDeque::new(),
        };
        let init_args = client.capabilities.to_arguments();
        client.send_request(KnownCommand::Initialize.as_str(), Some(init_args));
        client.state = ClientState::WaitingForInitialized;
        debug!(state = ?client.state, "dap client constructed, initialize sent");
        client
    }

    pub fn builder() -> crate::config::ClientConfigBuilder {
        ClientConfig::builder()
    }

    /// The client's current lifecycle state.
    pub fn state(&self) -> ClientState {
        self.state
    }

    /// The adapter's reported capabilities, available once `Normal` is reached.
    pub fn adapter_capabilities(&self) -> &AdapterCapabilities {
        &self.adapter_capabilities
    }

    /// Drain the outbound buffer. A subsequent call with no intervening
    /// operation returns an empty vector.
    pub fn send(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.outbound)
    }

    /// Feed inbound bytes and return a lazy iterator of logical events.
    pub fn recv<'a>(&'a mut self, bytes: &[u8]) -> Recv<'a> {
        self.decoder.push(bytes);
        Recv { client: self }
    }

    fn send_request(&mut self, command: &str, arguments: Option<Value>) -> u64 {
        let seq = self.correlator.next_seq();
        self.correlator.insert_pending(seq, command, self.state);
        let msg = ProtocolMessage::Request(RequestMessage {
            seq,
            command: command.to_string(),
            arguments,
        });
        trace!(?msg, "encoding outbound request");
        self.outbound.extend(encode_frame(&msg.to_value()));
        seq
    }

    fn require_state(
        &self,
        operation: &'static str,
        wanted: ClientState,
    ) -> Result<(), ClientError> {
        if self.state == wanted {
            Ok(())
        } else {
            Err(ClientError::InvalidState {
                operation,
                current: self.state,
            })
        }
    }

    fn require_non_terminal(&self, operation: &'static str) -> Result<(), ClientError> {
        if self.state.is_terminal() {
            Err(ClientError::InvalidState {
                operation,
                current: self.state,
            })
        } else {
            Ok(())
        }
    }

    // --- request-issuing operations ----------------------------------

    pub fn launch(&mut self, program: impl Into<String>, extras: Option<Value>) -> Result<u64, ClientError> {
        self.require_state("launch", ClientState::Normal)?;
        let mut args = Map::new();
        args.insert("program".to_string(), Value::String(program.into()));
        merge_extras(&mut args, extras);
        Ok(self.send_request(KnownCommand::Launch.as_str(), Some(Value::Object(args))))
    }

    pub fn attach(&mut self, extras: Option<Value>) -> Result<u64, ClientError> {
        self.require_state("attach", ClientState::Normal)?;
        let mut args = Map::new();
        merge_extras(&mut args, extras);
        Ok(self.send_request(KnownCommand::Attach.as_str(), Some(Value::Object(args))))
    }

    pub fn set_breakpoints(&mut self, source: Value, breakpoints: Value) -> Result<u64, ClientError> {
        self.require_state("set_breakpoints", ClientState::Normal)?;
        let mut args = Map::new();
        args.insert("source".to_string(), source);
        args.insert("breakpoints".to_string(), breakpoints);
        Ok(self.send_request(
            KnownCommand::SetBreakpoints.as_str(),
            Some(Value::Object(args)),
        ))
    }

    pub fn set_function_breakpoints(&mut self, breakpoints: Value) -> Result<u64, ClientError> {
        self.require_state("set_function_breakpoints", ClientState::Normal)?;
        let mut args = Map::new();
        args.insert("breakpoints".to_string(), breakpoints);
        Ok(self.send_request(
            KnownCommand::SetFunctionBreakpoints.as_str(),
            Some(Value::Object(args)),
        ))
    }

    pub fn set_exception_breakpoints(&mut self, filters: Vec<String>) -> Result<u64, ClientError> {
        self.require_state("set_exception_breakpoints", ClientState::Normal)?;
        let mut args = Map::new();
        args.insert(
            "filters".to_string(),
            Value::Array(filters.into_iter().map(Value::String).collect()),
        );
        Ok(self.send_request(
            KnownCommand::SetExceptionBreakpoints.as_str(),
            Some(Value::Object(args)),
        ))
    }

    pub fn configuration_done(&mut self) -> Result<u64, ClientError> {
        self.require_state("configuration_done", ClientState::Normal)?;
        Ok(self.send_request(KnownCommand::ConfigurationDone.as_str(), None))
    }

    pub fn continue_execution(&mut self, thread_id: i64) -> Result<u64, ClientError> {
        self.require_state("continue_execution", ClientState::Normal)?;
        Ok(self.send_request(
            KnownCommand::Continue.as_str(),
            Some(thread_id_args(thread_id)),
        ))
    }

    pub fn next(&mut self, thread_id: i64) -> Result<u64, ClientError> {
        self.require_state("next", ClientState::Normal)?;
        Ok(self.send_request(KnownCommand::Next.as_str(), Some(thread_id_args(thread_id))))
    }

    pub fn step_in(&mut self, thread_id: i64) -> Result<u64, ClientError> {
        self.require_state("step_in", ClientState::Normal)?;
        Ok(self.send_request(
            KnownCommand::StepIn.as_str(),
            Some(thread_id_args(thread_id)),
        ))
    }

    pub fn step_out(&mut self, thread_id: i64) -> Result<u64, ClientError> {
        self.require_state("step_out", ClientState::Normal)?;
        Ok(self.send_request(
            KnownCommand::StepOut.as_str(),
            Some(thread_id_args(thread_id)),
        ))
    }

    pub fn pause(&mut self, thread_id: i64) -> Result<u64, ClientError> {
        self.require_state("pause", ClientState::Normal)?;
        Ok(self.send_request(KnownCommand::Pause.as_str(), Some(thread_id_args(thread_id))))
    }

    pub fn stack_trace(&mut self, thread_id: i64, extras: Option<Value>) -> Result<u64, ClientError> {
        self.require_state("stack_trace", ClientState::Normal)?;
        let mut args = Map::new();
        args.insert("threadId".to_string(), Value::from(thread_id));
        merge_extras(&mut args, extras);
        Ok(self.send_request(
            KnownCommand::StackTrace.as_str(),
            Some(Value::Object(args)),
        ))
    }

    pub fn scopes(&mut self, frame_id: i64) -> Result<u64, ClientError> {
        self.require_state("scopes", ClientState::Normal)?;
        let mut args = Map::new();
        args.insert("frameId".to_string(), Value::from(frame_id));
        Ok(self.send_request(KnownCommand::Scopes.as_str(), Some(Value::Object(args))))
    }

    pub fn variables(
        &mut self,
        variables_reference: i64,
        extras: Option<Value>,
    ) -> Result<u64, ClientError> {
        self.require_state("variables", ClientState::Normal)?;
        let mut args = Map::new();
        args.insert(
            "variablesReference".to_string(),
            Value::from(variables_reference),
        );
        merge_extras(&mut args, extras);
        Ok(self.send_request(KnownCommand::Variables.as_str(), Some(Value::Object(args))))
    }

    pub fn set_variable(
        &mut self,
        variables_reference: i64,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<u64, ClientError> {
        self.require_state("set_variable", ClientState::Normal)?;
        let mut args = Map::new();
        args.insert(
            "variablesReference".to_string(),
            Value::from(variables_reference),
        );
        args.insert("name".to_string(), Value::String(name.into()));
        args.insert("value".to_string(), Value::String(value.into()));
        Ok(self.send_request(
            KnownCommand::SetVariable.as_str(),
            Some(Value::Object(args)),
        ))
    }

    pub fn source(&mut self, source_reference: i64) -> Result<u64, ClientError> {
        self.require_state("source", ClientState::Normal)?;
        let mut args = Map::new();
        args.insert("sourceReference".to_string(), Value::from(source_reference));
        Ok(self.send_request(KnownCommand::Source.as_str(), Some(Value::Object(args))))
    }

    pub fn threads(&mut self) -> Result<u64, ClientError> {
        self.require_state("threads", ClientState::Normal)?;
        Ok(self.send_request(KnownCommand::Threads.as_str(), None))
    }

    pub fn evaluate(
        &mut self,
        expression: impl Into<String>,
        frame_id: Option<i64>,
        extras: Option<Value>,
    ) -> Result<u64, ClientError> {
        self.require_state("evaluate", ClientState::Normal)?;
        let mut args = Map::new();
        args.insert("expression".to_string(), Value::String(expression.into()));
        if let Some(frame_id) = frame_id {
            args.insert("frameId".to_string(), Value::from(frame_id));
        }
        merge_extras(&mut args, extras);
        Ok(self.send_request(KnownCommand::Evaluate.as_str(), Some(Value::Object(args))))
    }

    /// Cancel a prior request or in-flight progress. Best-effort: the target
    /// `seq` is NOT removed from the pending table here, since the adapter
    /// is still expected to deliver a response.
    pub fn cancel(
        &mut self,
        request_id: Option<u64>,
        progress_id: Option<String>,
    ) -> Result<u64, ClientError> {
        self.require_non_terminal("cancel")?;
        let mut args = Map::new();
        if let Some(id) = request_id {
            args.insert("requestId".to_string(), Value::from(id));
        }
        if let Some(id) = progress_id {
            args.insert("progressId".to_string(), Value::String(id));
        }
        Ok(self.send_request(KnownCommand::Cancel.as_str(), Some(Value::Object(args))))
    }

    pub fn disconnect(&mut self) -> Result<u64, ClientError> {
        self.require_state("disconnect", ClientState::Normal)?;
        let seq = self.send_request(KnownCommand::Disconnect.as_str(), None);
        self.state = ClientState::WaitingForShutdown;
        debug!(state = ?self.state, "disconnect sent");
        Ok(seq)
    }

    // --- inbound processing --------------------------------------------

    fn process_next_value(&mut self) -> Result<LogicalEvent, ClientError> {
        let value = self
            .queued_values
            .pop_front()
            .expect("process_next_value called with an empty queue");

        match decode_message(value) {
            Ok(msg) => Ok(self.apply_message(msg)),
            Err(err) => {
                warn!(error = %err, "decode failure, clearing inbound state");
                self.queued_values.clear();
                self.decoder.clear();
                Err(ClientError::from(err))
            }
        }
    }

    fn apply_message(&mut self, msg: ProtocolMessage) -> LogicalEvent {
        match msg {
            ProtocolMessage::Request(r) => LogicalEvent::Request(r),
            ProtocolMessage::Event(e) => {
                match e.event.as_str() {
                    "exited" => {
                        self.state = ClientState::Exited;
                        debug!(state = ?self.state, "adapter reported exited");
                    }
                    "terminated" => {
                        self.state = ClientState::Shutdown;
                        debug!(state = ?self.state, "adapter reported terminated");
                    }
                    _ => {}
                }
                trace!(?e, "adapter event");
                LogicalEvent::Event(e)
            }
            ProtocolMessage::Response(r) => {
                let pending = self.correlator.take_pending(r.request_seq);
                let unsolicited = pending.is_none();
                if unsolicited {
                    warn!(request_seq = r.request_seq, "unsolicited response");
                }
                let command = pending
                    .map(|p| p.command)
                    .unwrap_or_else(|| r.command.clone());

                if !unsolicited && command == KnownCommand::Initialize.as_str() {
                    if r.success {
                        self.adapter_capabilities = AdapterCapabilities::from_body(r.body.clone());
                        self.state = ClientState::Normal;
                        debug!(state = ?self.state, "initialize succeeded");
                        return LogicalEvent::Initialized;
                    }
                    self.state = ClientState::Exited;
                    debug!(state = ?self.state, "initialize failed");
                } else if !unsolicited && command == KnownCommand::Disconnect.as_str() {
                    self.state = ClientState::Shutdown;
                    debug!(state = ?self.state, "disconnect acknowledged");
                    return LogicalEvent::Terminated;
                }

                LogicalEvent::Response(ResponseDelivery {
                    command,
                    request_seq: r.request_seq,
                    success: r.success,
                    message: r.message,
                    body: r.body,
                    unsolicited,
                })
            }
        }
    }
}

fn merge_extras(base: &mut Map<String, Value>, extras: Option<Value>) {
    if let Some(Value::Object(map)) = extras {
        base.extend(map);
    }
}

fn thread_id_args(thread_id: i64) -> Value {
    let mut args = Map::new();
    args.insert("threadId".to_string(), Value::from(thread_id));
    Value::Object(args)
}

/// Lazy, single-pass iterator of logical events produced by one [`Client::recv`] call.
pub struct Recv<'a> {
    client: &'a mut Client,
}

impl<'a> Iterator for Recv<'a> {
    type Item = Result<LogicalEvent, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if !self.client.queued_values.is_empty() {
                return Some(self.client.process_next_value());
            }

            match self.client.decoder.next_frame() {
                Ok(None) => return None,
                Ok(Some(values)) => {
                    self.client.queued_values.extend(values);
                    continue;
                }
                Err(err) => {
                    warn!(error = %err, "frame decode failure, clearing inbound buffer");
                    self.client.decoder.clear();
                    self.client.queued_values.clear();
                    return Some(Err(ClientError::from(err)));
                }
            }
        }
    }
}
