//! The central Model Context Protocol engine
//!
//! Decodes JSON-RPC messages, routes them by method and wraps tool results.
//! Every failure becomes a JSON-RPC error; nothing here terminates the caller's
//! serving loop.

use std::panic::{self, AssertUnwindSafe};

use rust_mcp_sdk::schema::{
    CallToolResult, ContentBlock, Implementation, InitializeResult, ListToolsResult,
    ProtocolVersion, ServerCapabilities, ServerCapabilitiesTools, TextContent,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::domain::tools::ToolRegistry;
use crate::errors::AppError;
use crate::mcp::rpc::{Method, Request, Response};

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_DESCRIPTION: &str = "MCP server for Year 3 math diagnostic tools";

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Map<String, Value>>,
}

pub struct Dispatcher {
    registry: ToolRegistry,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handles one raw message. `None` means nothing must be written back.
    pub fn process_message(&self, raw: &str) -> Option<Response> {
        match serde_json::from_str::<Value>(raw) {
            Ok(payload) => self.process_value(payload),
            Err(err) => Some(Response::error(Value::Null, &AppError::parse(err.to_string()))),
        }
    }

    pub fn process_value(&self, payload: Value) -> Option<Response> {
        let request = match Request::from_value(payload) {
            Ok(request) => request,
            Err(envelope) => return Some(Response::error(envelope.id, &envelope.error)),
        };

        let audit_params = redact_audit_params(&request.params);
        let outcome = Method::from_name(&request.method)
            .and_then(|method| self.dispatch(method, &request.params));

        info!(
            method = %request.method,
            params = %audit_params,
            outcome = if outcome.is_err() { "failure" } else { "success" },
            "mcp action audited"
        );

        let id = match request.id {
            Some(id) => id,
            None => {
                debug!(method = %request.method, "notification handled without response");
                return None;
            }
        };

        match outcome {
            Ok(Some(result)) => Some(Response::result(id, result)),
            Ok(None) => None,
            Err(err) => Some(Response::error(id, &err)),
        }
    }

    fn dispatch(&self, method: Method, params: &Map<String, Value>) -> Result<Option<Value>, AppError> {
        let result = match method {
            Method::Initialize => initialize_result()?,
            Method::Initialized => return Ok(None),
            Method::Ping => json!({}),
            Method::ToolsList => serde_json::to_value(ListToolsResult {
                meta: None,
                next_cursor: None,
                tools: self.registry.definitions(),
            })
            .map_err(|err| AppError::internal(format!("tools list serialization: {err}")))?,
            Method::ToolsCall => self.call_tool(params)?,
        };

        Ok(Some(result))
    }

    fn call_tool(&self, params: &Map<String, Value>) -> Result<Value, AppError> {
        let call: ToolCallParams = serde_json::from_value(Value::Object(params.clone()))
            .map_err(|err| AppError::invalid_params("invalid_tool_call", err.to_string()))?;
        let arguments = call.arguments.unwrap_or_default();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.registry.call(&call.name, arguments)
        }))
        .unwrap_or_else(|_| Err(AppError::internal(format!("tool {} panicked", call.name))))?;

        let text = serde_json::to_string_pretty(&result)
            .map_err(|err| AppError::internal(format!("tool result serialization: {err}")))?;

        serde_json::to_value(CallToolResult {
            content: vec![ContentBlock::from(TextContent::new(text, None, None))],
            is_error: None,
            meta: None,
            structured_content: None,
        })
        .map_err(|err| AppError::internal(format!("call tool result serialization: {err}")))
    }
}

fn initialize_result() -> Result<Value, AppError> {
    let initialize_result = InitializeResult {
        server_info: Implementation {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: None,
            description: Some(SERVER_DESCRIPTION.to_string()),
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            resources: None,
            prompts: None,
            ..Default::default()
        },
        protocol_version: ProtocolVersion::V2024_11_05.into(),
        instructions: None,
        meta: None,
    };

    serde_json::to_value(initialize_result)
        .map_err(|err| AppError::internal(format!("initialize result serialization: {err}")))
}

pub fn redact_audit_params(params: &Map<String, Value>) -> Value {
    redact_audit_value(&Value::Object(params.clone()))
}

pub fn redact_audit_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String("[REDACTED]".to_string()))
                    } else {
                        (key.clone(), redact_audit_value(item))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_audit_value).collect()),
        _ => value.clone(),
    }
}

pub fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    matches!(
        normalized.as_str(),
        "authorization" | "bearer" | "api_key" | "apikey"
    ) || normalized.contains("token")
        || normalized.contains("secret")
        || normalized.contains("password")
        || normalized.contains("credential")
}
