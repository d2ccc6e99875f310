//! Client- and adapter-side capability storage.
//!
//! The core stores both verbatim and gates nothing on them -- capability
//! negotiation, if a host wants it, happens above this layer.

use serde::Serialize;
use serde_json::Value;

/// The seven `supports_*` flags plus identifying fields shipped on the
/// `initialize` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCapabilities {
    #[serde(rename = "clientID", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(rename = "adapterID", skip_serializing_if = "Option::is_none")]
    pub adapter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub lines_start_at1: bool,
    pub columns_start_at1: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_format: Option<String>,
    pub supports_variable_type: bool,
    pub supports_variable_paging: bool,
    pub supports_run_in_terminal_request: bool,
    pub supports_memory_references: bool,
    pub supports_progress_reporting: bool,
    pub supports_invalidated_event: bool,
    pub supports_memory_event: bool,
}

impl ClientCapabilities {
    /// Render as the `arguments` value of an `initialize` request.
    pub fn to_arguments(&self) -> Value {
        serde_json::to_value(self).expect("capability struct always serializes")
    }
}

/// The body of a successful `initialize` response, stored verbatim.
///
/// Opaque on purpose: the DAP capability set is large and adapter-specific,
/// and the core never needs to branch on individual flags.
#[derive(Debug, Clone, Default)]
pub struct AdapterCapabilities(pub Value);

impl AdapterCapabilities {
    pub fn from_body(body: Option<Value>) -> Self {
        Self(body.unwrap_or(Value::Null))
    }

    /// The raw capability value as reported by the adapter.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}
