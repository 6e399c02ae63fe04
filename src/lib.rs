//! Jenkins MCP Server Library
//!
//! A Model Context Protocol (MCP) server for Jenkins integration.
//! Provides tools for listing jobs, triggering and stopping builds, and
//! inspecting builds, the queue, and agents via the Jenkins REST API.

pub mod config;
pub mod error;
pub mod jenkins;
pub mod mcp;

pub use config::Config;
pub use error::{JenkinsMcpError, Result};
