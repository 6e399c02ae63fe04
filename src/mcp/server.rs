//! MCP Server implementation
//!
//! Implements the Model Context Protocol server for stdio transport.

use std::io::{BufRead, Write};
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::jenkins::client::JenkinsClient;
use crate::mcp::tools::ToolHandler;
use crate::mcp::types::*;

/// MCP Server info
const SERVER_NAME: &str = "jenkins-controller";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Jenkins
pub struct McpServer {
    /// Tool handler
    tool_handler: ToolHandler,

    /// Whether initialized
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(jenkins_client: Arc<JenkinsClient>) -> Self {
        Self {
            tool_handler: ToolHandler::new(jenkins_client),
            initialized: false,
        }
    }

    /// Run the server on stdio
    pub async fn run_stdio(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        let reader = stdin.lock();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match self.handle_message(&line).await {
                Ok(Some(response)) => {
                    let response_str = serde_json::to_string(&response)?;
                    writeln!(stdout, "{}", response_str)?;
                    stdout.flush()?;
                }
                Ok(None) => {
                    // Notification, no response needed
                }
                Err(e) => {
                    tracing::error!("Error handling message: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Handle an incoming JSON-RPC message
    async fn handle_message(&mut self, message: &str) -> Result<Option<JsonRpcResponse>> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(req) => req,
            Err(e) => {
                return Ok(Some(JsonRpcResponse::error(
                    RequestId::Number(0),
                    JsonRpcError::parse_error(e.to_string()),
                )));
            }
        };

        // A request without an id is a notification; it is handled but
        // never answered.
        let id = match request.id.clone() {
            Some(id) => id,
            None => {
                if request.method == methods::INITIALIZED {
                    self.initialized = true;
                }
                return Ok(None);
            }
        };

        match request.method.as_str() {
            methods::INITIALIZE => {
                let result = self.handle_initialize()?;
                Ok(Some(JsonRpcResponse::success(id, result)))
            }
            methods::INITIALIZED => {
                self.initialized = true;
                Ok(None) // Notification, no response
            }
            methods::PING => Ok(Some(JsonRpcResponse::success(id, serde_json::json!({})))),
            methods::LIST_TOOLS => {
                let result = self.handle_list_tools()?;
                Ok(Some(JsonRpcResponse::success(id, result)))
            }
            methods::CALL_TOOL => {
                let result = self.handle_call_tool(&request).await;
                Ok(Some(JsonRpcResponse::success(id, result)))
            }
            _ => Ok(Some(JsonRpcResponse::error(
                id,
                JsonRpcError::method_not_found(&request.method),
            ))),
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self) -> Result<Value> {
        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {}),
            },
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle list tools request
    fn handle_list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.tool_handler.list_tools(),
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle call tool request
    ///
    /// Malformed params are reported inside the tool result rather than as a
    /// JSON-RPC fault, so the host always receives a well-formed response.
    async fn handle_call_tool(&self, request: &JsonRpcRequest) -> Value {
        let params: CallToolParams = match request.params.as_ref() {
            Some(p) => match serde_json::from_value(p.clone()) {
                Ok(params) => params,
                Err(e) => {
                    return serde_json::to_value(CallToolResult::error(format!(
                        "Invalid tool parameters: {}",
                        e
                    )))
                    .unwrap_or(Value::Null);
                }
            },
            None => {
                return serde_json::to_value(CallToolResult::error("Missing tool parameters"))
                    .unwrap_or(Value::Null);
            }
        };

        let result = self
            .tool_handler
            .call_tool(&params.name, params.arguments)
            .await;
        serde_json::to_value(result).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_server() -> McpServer {
        let config = Config::new("http://localhost:9", "test", "token");
        let client = JenkinsClient::new(&config).expect("client construction");
        McpServer::new(Arc::new(client))
    }

    #[test]
    fn test_server_info() {
        assert_eq!(SERVER_NAME, "jenkins-controller");
    }

    #[tokio::test]
    async fn test_initialized_notification_without_id_is_not_answered() {
        let mut server = test_server();
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .unwrap();
        assert!(response.is_none());
        assert!(server.initialized);
    }

    #[tokio::test]
    async fn test_unknown_notification_without_id_is_not_answered() {
        let mut server = test_server();
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{}}"#)
            .await
            .unwrap();
        assert!(response.is_none());
        assert!(!server.initialized);
    }

    #[tokio::test]
    async fn test_ping_with_id_is_answered() {
        let mut server = test_server();
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#)
            .await
            .unwrap()
            .expect("ping response");
        assert_eq!(response.id, RequestId::Number(7));
        assert!(response.result.is_some());
    }
}
