//! Model Context Protocol (MCP) server handling and JSON-RPC implementations
//!
//! Provides protocol-level specifics surrounding JSON-RPC validation, routing
//! and the newline-delimited stdio transport.

pub mod rpc;
pub mod server;
pub mod stdio;
