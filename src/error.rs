//! Error types for the Jenkins MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the Jenkins MCP Server
#[derive(Error, Debug)]
pub enum JenkinsMcpError {
    /// Jenkins REST API errors (non-2xx responses)
    #[error("Jenkins API error: {status} - {body}")]
    Api { status: u16, body: String },

    /// Transport failures reaching the Jenkins server
    #[error("Failed to connect to Jenkins: {0}")]
    Connection(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}")]
    MissingEnvVar { var: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Validation errors
#[derive(Error, Debug)]
#[allow(dead_code)] // Some variants reserved for future use
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid parameter: {name} - {message}")]
    InvalidParameter { name: String, message: String },
}

/// MCP protocol errors
#[derive(Error, Debug)]
#[allow(dead_code)] // Some variants reserved for future use
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid tool arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Protocol error: {message}")]
    ProtocolError { message: String },

    #[error("Transport error: {message}")]
    TransportError { message: String },
}

/// Result type alias for Jenkins MCP operations
pub type Result<T> = std::result::Result<T, JenkinsMcpError>;
