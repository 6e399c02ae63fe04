//! Jenkins MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server for Jenkins integration.
//! Provides tools for listing jobs, triggering and stopping builds, and
//! inspecting builds, the queue, and agents via the Jenkins REST API.

use std::sync::Arc;

use clap::Parser;

use jenkins_mcp_server_rust::config::Config;
use jenkins_mcp_server_rust::error::Result;
use jenkins_mcp_server_rust::jenkins::client::JenkinsClient;
use jenkins_mcp_server_rust::mcp::server::McpServer;

/// Jenkins MCP Server
#[derive(Parser)]
#[command(name = "jenkins-mcp-server")]
#[command(
    author,
    version,
    about = "Jenkins MCP Server - A Model Context Protocol server for Jenkins"
)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let _cli = Cli::parse();

    // Load configuration; a missing connection setting is startup-fatal
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Please set the JENKINS_URL, JENKINS_USERNAME, and JENKINS_API_TOKEN environment variables."
            );
            std::process::exit(1);
        }
    };

    let jenkins_client = Arc::new(JenkinsClient::new(&config)?);

    tracing::info!("Jenkins MCP Server started");

    let mut server = McpServer::new(jenkins_client);
    server.run_stdio().await?;

    Ok(())
}
