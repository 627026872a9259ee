//! HTTP Transport layer for the Model Context Protocol
//!
//! Provides the `/mcp` JSON-RPC endpoint plus health and discovery endpoints.

pub mod handlers;
