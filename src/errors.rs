use serde_json::{json, Value};
use thiserror::Error;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("parse error: {message}")]
    Parse { message: String },
    #[error("invalid request: {message}")]
    InvalidRequest { message: &'static str },
    #[error("method not found: {method}")]
    MethodNotFound { method: String },
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },
    #[error("bad request: {message}")]
    InvalidParams {
        code: &'static str,
        message: String,
    },
    #[error("internal error")]
    Internal { message: String },
}

impl AppError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: &'static str) -> Self {
        Self::InvalidRequest { message }
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    pub fn invalid_params(code: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// JSON-RPC error code reported to the caller.
    pub fn rpc_code(&self) -> i64 {
        match self {
            Self::Parse { .. } => PARSE_ERROR,
            Self::InvalidRequest { .. } => INVALID_REQUEST,
            Self::MethodNotFound { .. } => METHOD_NOT_FOUND,
            Self::UnknownTool { .. } | Self::InvalidParams { .. } => INVALID_PARAMS,
            Self::Internal { .. } => INTERNAL_ERROR,
        }
    }

    /// Caller-facing message. Internal details stay in the logs.
    pub fn rpc_message(&self) -> String {
        match self {
            Self::Parse { .. } => "Parse error".to_string(),
            Self::InvalidRequest { .. } => "Invalid Request".to_string(),
            Self::MethodNotFound { method } => format!("Method not found: {method}"),
            Self::UnknownTool { name } => format!("Unknown tool: {name}"),
            Self::InvalidParams { .. } => "Invalid params".to_string(),
            Self::Internal { .. } => "Internal error".to_string(),
        }
    }

    pub fn rpc_data(&self) -> Option<Value> {
        match self {
            Self::UnknownTool { name } => Some(json!({
                "code": "unknown_tool",
                "message": "unknown tool name",
                "details": { "name": name },
            })),
            Self::InvalidParams { code, message } => Some(json!({
                "code": code,
                "message": message,
                "details": {}
            })),
            _ => None,
        }
    }
}
