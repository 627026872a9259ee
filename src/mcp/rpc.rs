//! JSON-RPC protocol representations and formatting utilities
//!
//! Validates the request envelope and maps `AppError`s to JSON-RPC error
//! payloads. A response carries either `result` or `error`, never both.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

use crate::errors::AppError;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    Initialized,
    Ping,
    ToolsList,
    ToolsCall,
}

impl Method {
    pub fn from_name(name: &str) -> Result<Self, AppError> {
        match name {
            "initialize" => Ok(Self::Initialize),
            "notifications/initialized" => Ok(Self::Initialized),
            "ping" => Ok(Self::Ping),
            "tools/list" => Ok(Self::ToolsList),
            "tools/call" => Ok(Self::ToolsCall),
            _ => Err(AppError::method_not_found(name)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Initialized => "notifications/initialized",
            Self::Ping => "ping",
            Self::ToolsList => "tools/list",
            Self::ToolsCall => "tools/call",
        }
    }
}

/// A request whose envelope is well formed. `id == None` marks a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub id: Option<Value>,
    pub method: String,
    pub params: Map<String, Value>,
}

/// Envelope failure, with whatever id could be recovered.
#[derive(Debug)]
pub struct EnvelopeError {
    pub id: Value,
    pub error: AppError,
}

impl Request {
    pub fn from_value(payload: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(mut object) = payload else {
            return Err(EnvelopeError {
                id: Value::Null,
                error: AppError::invalid_request("request must be a JSON object"),
            });
        };

        let id = match object.remove("id") {
            None | Some(Value::Null) => None,
            Some(id @ (Value::Number(_) | Value::String(_))) => Some(id),
            Some(_) => {
                return Err(EnvelopeError {
                    id: Value::Null,
                    error: AppError::invalid_request("id must be a number or string"),
                })
            }
        };
        let reply_id = id.clone().unwrap_or(Value::Null);

        if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(EnvelopeError {
                id: reply_id,
                error: AppError::invalid_request("jsonrpc must be \"2.0\""),
            });
        }

        let method = match object.remove("method") {
            Some(Value::String(method)) if !method.trim().is_empty() => method,
            _ => {
                return Err(EnvelopeError {
                    id: reply_id,
                    error: AppError::invalid_request("method must be a non-empty string"),
                })
            }
        };

        let params = match object.remove("params") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(params)) => params,
            Some(_) => {
                return Err(EnvelopeError {
                    id: reply_id,
                    error: AppError::invalid_params("invalid_params", "params must be an object"),
                })
            }
        };

        Ok(Self { id, method, params })
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(RpcError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Response {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn error(id: Value, err: &AppError) -> Self {
        if let AppError::Internal { message } = err {
            error!(error = %message, "request failed with internal error");
        }

        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Error(RpcError {
                code: err.rpc_code(),
                message: err.rpc_message(),
                data: err.rpc_data(),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    pub fn error_code(&self) -> Option<i64> {
        match &self.outcome {
            Outcome::Error(error) => Some(error.code),
            Outcome::Result(_) => None,
        }
    }
}
