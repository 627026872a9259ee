use std::net::SocketAddr;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::domain::evaluation::DEFAULT_PASS_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// Newline-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// JSON-RPC over HTTP POST /mcp
    Http,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "maths-tutor-mcp", version, about = "Year 3 maths question and diagnostic tools over MCP")]
pub struct Config {
    /// Transport to serve on
    #[arg(long, value_enum, env = "MCP_TRANSPORT", default_value = "stdio")]
    pub transport: TransportKind,

    /// Host to bind to (http transport only)
    #[arg(long = "host", env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind_addr: String,

    /// Port to listen on (http transport only)
    #[arg(long = "port", env = "BIND_PORT", default_value_t = 8080)]
    pub bind_port: u16,

    /// Minimum benchmark score that counts as a pass
    #[arg(long, env = "BENCHMARK_PASS_THRESHOLD", default_value_t = DEFAULT_PASS_THRESHOLD)]
    pub pass_threshold: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address or port")]
    InvalidSocket,
    #[error("pass threshold must be between 0 and 10")]
    InvalidThreshold,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::parse().validated()
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        if !(0.0..=10.0).contains(&self.pass_threshold) {
            return Err(ConfigError::InvalidThreshold);
        }
        if self.transport == TransportKind::Http {
            let _ = self.bind_socket()?;
        }
        Ok(self)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
