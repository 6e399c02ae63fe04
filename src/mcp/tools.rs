//! MCP Tool definitions and handlers
//!
//! Defines the eight Jenkins tools and their implementations. Every
//! invocation maps to exactly one Jenkins API call, and every outcome,
//! success or failure, is rendered as a single text block.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{Result, ValidationError};
use crate::jenkins::client::JenkinsClient;
use crate::jenkins::types::{BuildInfo, Job, JobInfo, Node, QueueItem};
use crate::mcp::types::{CallToolResult, Tool};

/// Maximum console output length before truncation
const MAX_CONSOLE_CHARS: usize = 5000;

/// Tool handler
pub struct ToolHandler {
    jenkins_client: Arc<JenkinsClient>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(jenkins_client: Arc<JenkinsClient>) -> Self {
        Self { jenkins_client }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        vec![
            tool_def(
                "list_jobs",
                "List all Jenkins jobs with their status",
                no_args_schema(),
            ),
            tool_def(
                "get_job_info",
                "Get detailed information about a specific Jenkins job",
                job_name_schema(),
            ),
            tool_def(
                "build_job",
                "Trigger a Jenkins job build",
                build_job_schema(),
            ),
            tool_def(
                "get_build_info",
                "Get information about a specific build",
                build_ref_schema(),
            ),
            tool_def(
                "get_build_console",
                "Get console output for a specific build",
                build_ref_schema(),
            ),
            tool_def("stop_build", "Stop a running build", build_ref_schema()),
            tool_def("get_queue", "Get the Jenkins build queue", no_args_schema()),
            tool_def(
                "get_nodes",
                "Get Jenkins nodes/agents status",
                no_args_schema(),
            ),
        ]
    }

    /// Call a tool by name
    ///
    /// Unknown names and failed invocations come back as error text; no
    /// failure on this path propagates as a protocol-level fault.
    pub async fn call_tool(&self, name: &str, args: Value) -> CallToolResult {
        let result = match name {
            "list_jobs" => self.handle_list_jobs().await,
            "get_job_info" => self.handle_get_job_info(args).await,
            "build_job" => self.handle_build_job(args).await,
            "get_build_info" => self.handle_get_build_info(args).await,
            "get_build_console" => self.handle_get_build_console(args).await,
            "stop_build" => self.handle_stop_build(args).await,
            "get_queue" => self.handle_get_queue().await,
            "get_nodes" => self.handle_get_nodes().await,
            _ => return CallToolResult::error(format!("Unknown tool: {}", name)),
        };

        match result {
            Ok(text) => CallToolResult::text(text),
            Err(e) => CallToolResult::error(format!("Error executing {}: {}", name, e)),
        }
    }

    // ==================== Tool Handlers ====================

    async fn handle_list_jobs(&self) -> Result<String> {
        let jobs = self.jenkins_client.get_jobs().await?;
        Ok(format_jobs(&jobs))
    }

    async fn handle_get_job_info(&self, args: Value) -> Result<String> {
        #[derive(Deserialize)]
        struct Args {
            job_name: String,
        }

        let args: Args = decode_args(args)?;
        let info = self.jenkins_client.get_job_info(&args.job_name).await?;
        Ok(format_job_info(&args.job_name, &info))
    }

    async fn handle_build_job(&self, args: Value) -> Result<String> {
        #[derive(Deserialize)]
        struct Args {
            job_name: String,
            parameters: Option<HashMap<String, String>>,
        }

        let args: Args = decode_args(args)?;
        let parameters = normalize_parameters(args.parameters);
        self.jenkins_client
            .build_job(&args.job_name, parameters.as_ref())
            .await?;

        Ok(build_ack(&args.job_name, parameters.as_ref()))
    }

    async fn handle_get_build_info(&self, args: Value) -> Result<String> {
        let args: BuildRefArgs = decode_args(args)?;
        let info = self
            .jenkins_client
            .get_build_info(&args.job_name, args.build_number)
            .await?;
        Ok(format_build_info(&args.job_name, args.build_number, &info))
    }

    async fn handle_get_build_console(&self, args: Value) -> Result<String> {
        let args: BuildRefArgs = decode_args(args)?;
        let console = self
            .jenkins_client
            .get_build_console(&args.job_name, args.build_number)
            .await?;

        Ok(format!(
            "Console output for '{}' #{}:\n\n{}",
            args.job_name,
            args.build_number,
            truncate_console(&console)
        ))
    }

    async fn handle_stop_build(&self, args: Value) -> Result<String> {
        let args: BuildRefArgs = decode_args(args)?;
        self.jenkins_client
            .stop_build(&args.job_name, args.build_number)
            .await?;
        Ok(format!(
            "Stopped build #{} for job '{}'",
            args.build_number, args.job_name
        ))
    }

    async fn handle_get_queue(&self) -> Result<String> {
        let queue = self.jenkins_client.get_queue().await?;
        Ok(format_queue(&queue))
    }

    async fn handle_get_nodes(&self) -> Result<String> {
        let nodes = self.jenkins_client.get_nodes().await?;
        Ok(format_nodes(&nodes))
    }
}

/// Arguments shared by the build-scoped tools
#[derive(Deserialize)]
struct BuildRefArgs {
    job_name: String,
    build_number: u32,
}

/// Decode tool arguments, turning serde failures into validation errors
fn decode_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| {
        ValidationError::InvalidParameter {
            name: "arguments".to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

// ==================== Formatting ====================

fn format_jobs(jobs: &[Job]) -> String {
    let mut text = String::from("Jenkins Jobs:\n");
    for job in jobs {
        let status = job.color.as_deref().unwrap_or("unknown");
        match &job.last_build {
            Some(build) => {
                let number = build
                    .number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                let result = build.result.as_deref().unwrap_or("Unknown");
                text.push_str(&format!(
                    "• {} - Status: {} - Last Build: #{} ({})\n",
                    job.name, status, number, result
                ));
            }
            None => {
                text.push_str(&format!(
                    "• {} - Status: {} - No builds yet\n",
                    job.name, status
                ));
            }
        }
    }
    text
}

fn format_job_info(job_name: &str, info: &JobInfo) -> String {
    let mut text = format!("Job Information for '{}':\n", job_name);
    text.push_str(&format!(
        "Description: {}\n",
        info.description.as_deref().unwrap_or("N/A")
    ));
    text.push_str(&format!("URL: {}\n", info.url.as_deref().unwrap_or("N/A")));
    text.push_str(&format!(
        "Buildable: {}\n",
        info.buildable
            .map(|b| b.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    ));
    text.push_str(&format!(
        "Color: {}\n",
        info.color.as_deref().unwrap_or("N/A")
    ));

    if let Some(build) = &info.last_build {
        let number = build
            .number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        text.push_str(&format!("Last Build: #{}\n", number));
    }

    text
}

fn format_build_info(job_name: &str, build_number: u32, info: &BuildInfo) -> String {
    let mut text = format!("Build Information for '{}' #{}:\n", job_name, build_number);
    text.push_str(&format!(
        "Result: {}\n",
        info.result.as_deref().unwrap_or("N/A")
    ));
    text.push_str(&format!(
        "Duration: {}ms\n",
        info.duration
            .map(|d| d.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    ));
    text.push_str(&format!(
        "Timestamp: {}\n",
        info.timestamp
            .map(|t| t.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    ));
    text.push_str(&format!(
        "Building: {}\n",
        info.building
            .map(|b| b.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    ));
    text.push_str(&format!("URL: {}\n", info.url.as_deref().unwrap_or("N/A")));
    text
}

fn format_queue(queue: &[QueueItem]) -> String {
    if queue.is_empty() {
        return String::from("Build queue is empty");
    }

    let mut text = String::from("Build Queue:\n");
    for item in queue {
        let name = item
            .task
            .as_ref()
            .and_then(|t| t.name.as_deref())
            .unwrap_or("Unknown");
        let since = item
            .in_queue_since
            .map(|t| t.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        text.push_str(&format!("• {} - Waiting time: {}\n", name, since));
    }
    text
}

fn format_nodes(nodes: &[Node]) -> String {
    let mut text = String::from("Jenkins Nodes:\n");
    for node in nodes {
        let name = node.display_name.as_deref().unwrap_or("Unknown");
        text.push_str(&format!("• {} - Online: {}", name, !node.offline));
        if node.offline {
            let reason = node.offline_cause_reason.as_deref().unwrap_or("Unknown");
            text.push_str(&format!(" (Reason: {})", reason));
        }
        text.push('\n');
    }
    text
}

/// Treat an explicit empty parameter map as if no parameters were given
fn normalize_parameters(
    parameters: Option<HashMap<String, String>>,
) -> Option<HashMap<String, String>> {
    parameters.filter(|p| !p.is_empty())
}

/// Acknowledgment for a triggered build, echoing parameters when supplied
fn build_ack(job_name: &str, parameters: Option<&HashMap<String, String>>) -> String {
    let mut text = format!("Build triggered for job '{}'", job_name);
    if let Some(parameters) = parameters {
        text.push_str(&format!(
            " with parameters: {}",
            format_parameters(parameters)
        ));
    }
    text
}

/// Echo build parameters in a stable order
fn format_parameters(parameters: &HashMap<String, String>) -> String {
    let sorted: BTreeMap<_, _> = parameters.iter().collect();
    serde_json::to_string(&sorted).unwrap_or_default()
}

/// Keep only the trailing 5000 characters of console output, appending a
/// truncation notice; shorter output is returned unmodified.
fn truncate_console(output: &str) -> String {
    let count = output.chars().count();
    if count <= MAX_CONSOLE_CHARS {
        return output.to_string();
    }

    let tail: String = output.chars().skip(count - MAX_CONSOLE_CHARS).collect();
    format!(
        "{}\n\n[Output truncated - showing last {} characters]",
        tail, MAX_CONSOLE_CHARS
    )
}

// ==================== Schema Definitions ====================

fn tool_def(name: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema,
    }
}

fn no_args_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

fn job_name_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "job_name": {"type": "string", "description": "Name of the Jenkins job"}
        },
        "required": ["job_name"]
    })
}

fn build_job_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "job_name": {"type": "string", "description": "Name of the Jenkins job"},
            "parameters": {
                "type": "object",
                "description": "Build parameters (optional)",
                "additionalProperties": {"type": "string"}
            }
        },
        "required": ["job_name"]
    })
}

fn build_ref_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "job_name": {"type": "string", "description": "Name of the Jenkins job"},
            "build_number": {"type": "integer", "description": "Build number"}
        },
        "required": ["job_name", "build_number"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jenkins::types::BuildRef;

    #[test]
    fn test_format_jobs_with_and_without_builds() {
        let jobs = vec![
            Job {
                name: "backend-ci".to_string(),
                color: Some("blue".to_string()),
                last_build: Some(BuildRef {
                    number: Some(42),
                    result: Some("SUCCESS".to_string()),
                    timestamp: None,
                }),
                ..Default::default()
            },
            Job {
                name: "new-job".to_string(),
                color: Some("notbuilt".to_string()),
                ..Default::default()
            },
        ];

        let text = format_jobs(&jobs);
        assert!(text.starts_with("Jenkins Jobs:\n"));
        assert!(text.contains("• backend-ci - Status: blue - Last Build: #42 (SUCCESS)"));
        assert!(text.contains("• new-job - Status: notbuilt - No builds yet"));
    }

    #[test]
    fn test_format_jobs_empty_list_is_header_only() {
        assert_eq!(format_jobs(&[]), "Jenkins Jobs:\n");
    }

    #[test]
    fn test_format_job_info_fields() {
        let info = JobInfo {
            description: Some("Nightly build".to_string()),
            url: Some("https://jenkins.example.com/job/nightly/".to_string()),
            buildable: Some(true),
            color: Some("blue".to_string()),
            last_build: Some(BuildRef {
                number: Some(7),
                ..Default::default()
            }),
        };

        let text = format_job_info("nightly", &info);
        assert!(text.contains("Job Information for 'nightly':"));
        assert!(text.contains("Description: Nightly build"));
        assert!(text.contains("Buildable: true"));
        assert!(text.contains("Last Build: #7"));
    }

    #[test]
    fn test_format_job_info_missing_fields_show_na() {
        let text = format_job_info("bare", &JobInfo::default());
        assert!(text.contains("Description: N/A"));
        assert!(text.contains("URL: N/A"));
        assert!(text.contains("Buildable: N/A"));
        assert!(text.contains("Color: N/A"));
        assert!(!text.contains("Last Build:"));
    }

    #[test]
    fn test_format_build_info_fields() {
        let info = BuildInfo {
            result: Some("SUCCESS".to_string()),
            duration: Some(93500),
            timestamp: Some(1700000000000),
            building: Some(false),
            url: Some("https://jenkins.example.com/job/deploy/12/".to_string()),
        };

        let text = format_build_info("deploy", 12, &info);
        assert!(text.contains("Build Information for 'deploy' #12:"));
        assert!(text.contains("Result: SUCCESS"));
        assert!(text.contains("Duration: 93500ms"));
        assert!(text.contains("Building: false"));
    }

    #[test]
    fn test_format_queue_empty() {
        assert_eq!(format_queue(&[]), "Build queue is empty");
    }

    #[test]
    fn test_format_queue_items() {
        let queue = vec![QueueItem {
            task: Some(crate::jenkins::types::QueueTask {
                name: Some("deploy".to_string()),
                url: None,
            }),
            in_queue_since: Some(1700000123456),
            why: None,
        }];

        let text = format_queue(&queue);
        assert!(text.starts_with("Build Queue:\n"));
        assert!(text.contains("• deploy - Waiting time: 1700000123456"));
    }

    #[test]
    fn test_format_nodes_online_and_offline() {
        let nodes = vec![
            Node {
                display_name: Some("built-in".to_string()),
                offline: false,
                offline_cause_reason: None,
            },
            Node {
                display_name: Some("agent-1".to_string()),
                offline: true,
                offline_cause_reason: Some("Disconnected by admin".to_string()),
            },
        ];

        let text = format_nodes(&nodes);
        assert!(text.contains("• built-in - Online: true\n"));
        assert!(text.contains("• agent-1 - Online: false (Reason: Disconnected by admin)\n"));
    }

    #[test]
    fn test_truncate_console_short_output_unmodified() {
        let output = "line 1\nline 2\n";
        assert_eq!(truncate_console(output), output);
    }

    #[test]
    fn test_truncate_console_exact_limit_unmodified() {
        let output = "x".repeat(MAX_CONSOLE_CHARS);
        assert_eq!(truncate_console(&output), output);
    }

    #[test]
    fn test_truncate_console_keeps_trailing_chars() {
        let output = format!("{}{}", "a".repeat(100), "b".repeat(MAX_CONSOLE_CHARS));
        let truncated = truncate_console(&output);
        assert!(truncated.starts_with("bbbb"));
        assert!(!truncated.contains('a'));
        assert!(truncated.ends_with("[Output truncated - showing last 5000 characters]"));
    }

    #[test]
    fn test_normalize_parameters_drops_empty_map() {
        assert!(normalize_parameters(Some(HashMap::new())).is_none());
        assert!(normalize_parameters(None).is_none());

        let mut params = HashMap::new();
        params.insert("BRANCH".to_string(), "main".to_string());
        assert_eq!(normalize_parameters(Some(params)).map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_build_ack_without_parameters() {
        assert_eq!(
            build_ack("deploy", None),
            "Build triggered for job 'deploy'"
        );
    }

    #[test]
    fn test_build_ack_echoes_parameters() {
        let mut params = HashMap::new();
        params.insert("BRANCH".to_string(), "main".to_string());
        assert_eq!(
            build_ack("deploy", Some(&params)),
            r#"Build triggered for job 'deploy' with parameters: {"BRANCH":"main"}"#
        );
    }

    #[test]
    fn test_format_parameters_stable_order() {
        let mut params = HashMap::new();
        params.insert("BRANCH".to_string(), "main".to_string());
        params.insert("ARCH".to_string(), "x86_64".to_string());
        assert_eq!(
            format_parameters(&params),
            r#"{"ARCH":"x86_64","BRANCH":"main"}"#
        );
    }
}
