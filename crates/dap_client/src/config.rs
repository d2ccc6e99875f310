//! Fluent construction of a [`crate::client::Client`].

use crate::capabilities::ClientCapabilities;
use crate::client::Client;

/// Assembled inputs for client construction.
///
/// The builder validates nothing beyond type-level constraints: this layer
/// is assembly, not capability negotiation.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub adapter_id: Option<String>,
    pub locale: Option<String>,
    pub lines_start_at1: bool,
    pub columns_start_at1: bool,
    pub path_format: Option<String>,
    pub supports_variable_type: bool,
    pub supports_variable_paging: bool,
    pub supports_run_in_terminal_request: bool,
    pub supports_memory_references: bool,
    pub supports_progress_reporting: bool,
    pub supports_invalidated_event: bool,
    pub supports_memory_event: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_name: None,
            adapter_id: None,
            locale: None,
            lines_start_at1: true,
            columns_start_at1: true,
            path_format: Some("path".to_string()),
            supports_variable_type: false,
            supports_variable_paging: false,
            supports_run_in_terminal_request: false,
            supports_memory_references: false,
            supports_progress_reporting: false,
            supports_invalidated_event: false,
            supports_memory_event: false,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    pub(crate) fn into_capabilities(self) -> ClientCapabilities {
        ClientCapabilities {
            client_id: self.client_id,
            client_name: self.client_name,
            adapter_id: self.adapter_id,
            locale: self.locale,
            lines_start_at1: self.lines_start_at1,
            columns_start_at1: self.columns_start_at1,
            path_format: self.path_format,
            supports_variable_type: self.supports_variable_type,
            supports_variable_paging: self.supports_variable_paging,
            supports_run_in_terminal_request: self.supports_run_in_terminal_request,
            supports_memory_references: self.supports_memory_references,
            supports_progress_reporting: self.supports_progress_reporting,
            supports_invalidated_event: self.supports_invalidated_event,
            supports_memory_event: self.supports_memory_event,
        }
    }
}

/// Fluent builder for [`ClientConfig`], mirroring the builder used elsewhere
/// in this codebase for client construction.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.config.client_id = Some(id.into());
        self
    }

    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.config.client_name = Some(name.into());
        self
    }

    pub fn adapter_id(mut self, id: impl Into<String>) -> Self {
        self.config.adapter_id = Some(id.into());
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.config.locale = Some(locale.into());
        self
    }

    pub fn lines_start_at1(mut self, value: bool) -> Self {
        self.config.lines_start_at1 = value;
        self
    }

    pub fn columns_start_at1(mut self, value: bool) -> Self {
        self.config.columns_start_at1 = value;
        self
    }

    pub fn path_format(mut self, format: impl Into<String>) -> Self {
        self.config.path_format = Some(format.into());
        self
    }

    pub fn supports_variable_type(mut self, value: bool) -> Self {
        self.config.supports_variable_type = value;
        self
    }

    pub fn supports_variable_paging(mut self, value: bool) -> Self {
        self.config.supports_variable_paging = value;
        self
    }

    pub fn supports_run_in_terminal_request(mut self, value: bool) -> Self {
        self.config.supports_run_in_terminal_request = value;
        self
    }

    pub fn supports_memory_references(mut self, value: bool) -> Self {
        self.config.supports_memory_references = value;
        self
    }

    pub fn supports_progress_reporting(mut self, value: bool) -> Self {
        self.config.supports_progress_reporting = value;
        self
    }

    pub fn supports_invalidated_event(mut self, value: bool) -> Self {
        self.config.supports_invalidated_event = value;
        self
    }

    pub fn supports_memory_event(mut self, value: bool) -> Self {
        self.config.supports_memory_event = value;
        self
    }

    pub fn config(self) -> ClientConfig {
        self.config
    }

    /// Build the config and construct a [`Client`] from it, issuing the
    /// implicit `initialize` request.
    pub fn build(self) -> Client {
        Client::new(self.config)
    }
}
