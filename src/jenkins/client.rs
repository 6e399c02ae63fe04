//! Jenkins REST API client
//!
//! One authenticated HTTP request per logical operation. Transport and HTTP
//! failures are normalized into the crate error type; responses come back
//! as parsed JSON or raw text depending on the declared content type.

use std::collections::HashMap;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;

use crate::config::Config;
use crate::error::{ConfigError, JenkinsMcpError, Result};
use crate::jenkins::types::{BuildInfo, Job, JobInfo, Node, QueueItem};
use crate::jenkins::urls;

/// Per-request timeout; the sole bound on worst-case latency
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A normalized Jenkins response
///
/// Jenkins answers most endpoints with JSON but serves console output as
/// plain text; the variant is chosen by the response's content type.
#[derive(Debug, Clone)]
pub enum ApiResponse {
    /// Parsed JSON body
    Json(Value),

    /// Raw text body with the HTTP status code
    Text { content: String, status_code: u16 },
}

/// Jenkins REST API client
pub struct JenkinsClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// Base URL without trailing slash
    base_url: String,

    /// Precomputed `Basic` authorization header value
    auth_header: String,
}

/// Build the `Authorization: Basic` header value for a username/token pair
fn basic_auth(username: &str, api_token: &str) -> String {
    let credentials = STANDARD.encode(format!("{}:{}", username, api_token));
    format!("Basic {}", credentials)
}

impl JenkinsClient {
    /// Create a new Jenkins client from connection configuration
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::InvalidConfig {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            auth_header: basic_auth(&config.username, &config.api_token),
        })
    }

    /// Make an HTTP request to the Jenkins API
    async fn request(
        &self,
        method: Method,
        path: &str,
        form: Option<&HashMap<String, String>>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .http_client
            .request(method, &url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(CONTENT_TYPE, "application/json");

        if let Some(params) = form {
            request = request.form(params);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Request to {} failed: {}", url, e);
            JenkinsMcpError::Connection(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("HTTP error {}: {}", status, body);
            return Err(JenkinsMcpError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.contains("application/json") {
            let value = response
                .json()
                .await
                .map_err(|e| JenkinsMcpError::Connection(e.to_string()))?;
            Ok(ApiResponse::Json(value))
        } else {
            let status_code = status.as_u16();
            let content = response
                .text()
                .await
                .map_err(|e| JenkinsMcpError::Connection(e.to_string()))?;
            Ok(ApiResponse::Text {
                content,
                status_code,
            })
        }
    }

    /// Extract the JSON body or fail when the server answered with text
    fn expect_json(response: ApiResponse) -> Result<Value> {
        match response {
            ApiResponse::Json(value) => Ok(value),
            ApiResponse::Text { status_code, .. } => Err(JenkinsMcpError::Api {
                status: status_code,
                body: "expected a JSON response".to_string(),
            }),
        }
    }

    /// Get the list of all jobs
    pub async fn get_jobs(&self) -> Result<Vec<Job>> {
        let response = self.request(Method::GET, urls::JOBS_PATH, None).await?;
        let mut data = Self::expect_json(response)?;

        match data.get_mut("jobs") {
            Some(jobs) => Ok(serde_json::from_value(jobs.take())?),
            None => Ok(Vec::new()),
        }
    }

    /// Get detailed information about a specific job
    pub async fn get_job_info(&self, job_name: &str) -> Result<JobInfo> {
        let path = urls::job_info_path(job_name);
        let response = self.request(Method::GET, &path, None).await?;
        Ok(serde_json::from_value(Self::expect_json(response)?)?)
    }

    /// Pick the trigger endpoint for a build
    ///
    /// An explicit empty parameter map triggers a plain build;
    /// `buildWithParameters` can reject non-parameterized jobs.
    fn trigger_path(job_name: &str, parameters: Option<&HashMap<String, String>>) -> String {
        match parameters.filter(|p| !p.is_empty()) {
            Some(_) => urls::build_with_parameters_path(job_name),
            None => urls::build_path(job_name),
        }
    }

    /// Trigger a job build, with optional parameters
    ///
    /// Parameterized builds POST a form body to `buildWithParameters`;
    /// plain builds POST to `build`. Jenkins answers with an empty ack
    /// either way, so the body is not inspected.
    pub async fn build_job(
        &self,
        job_name: &str,
        parameters: Option<&HashMap<String, String>>,
    ) -> Result<()> {
        let parameters = parameters.filter(|p| !p.is_empty());
        let path = Self::trigger_path(job_name, parameters);
        self.request(Method::POST, &path, parameters).await?;
        Ok(())
    }

    /// Get information about a specific build
    pub async fn get_build_info(&self, job_name: &str, build_number: u32) -> Result<BuildInfo> {
        let path = urls::build_info_path(job_name, build_number);
        let response = self.request(Method::GET, &path, None).await?;
        Ok(serde_json::from_value(Self::expect_json(response)?)?)
    }

    /// Get console output for a build
    pub async fn get_build_console(&self, job_name: &str, build_number: u32) -> Result<String> {
        let path = urls::console_text_path(job_name, build_number);
        let response = self.request(Method::GET, &path, None).await?;

        match response {
            ApiResponse::Text { content, .. } => Ok(content),
            // Console output is always plain text; an unexpected JSON body
            // carries no console content.
            ApiResponse::Json(_) => Ok(String::new()),
        }
    }

    /// Stop a running build
    pub async fn stop_build(&self, job_name: &str, build_number: u32) -> Result<()> {
        let path = urls::stop_build_path(job_name, build_number);
        self.request(Method::POST, &path, None).await?;
        Ok(())
    }

    /// Get the build queue
    pub async fn get_queue(&self) -> Result<Vec<QueueItem>> {
        let response = self.request(Method::GET, urls::QUEUE_PATH, None).await?;
        let mut data = Self::expect_json(response)?;

        match data.get_mut("items") {
            Some(items) => Ok(serde_json::from_value(items.take())?),
            None => Ok(Vec::new()),
        }
    }

    /// Get Jenkins agents
    pub async fn get_nodes(&self) -> Result<Vec<Node>> {
        let response = self.request(Method::GET, urls::NODES_PATH, None).await?;
        let mut data = Self::expect_json(response)?;

        match data.get_mut("computer") {
            Some(nodes) => Ok(serde_json::from_value(nodes.take())?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_encoding() {
        assert_eq!(basic_auth("admin", "secret"), "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn test_client_construction() {
        let config = Config::new("https://jenkins.example.com/", "admin", "token");
        let client = JenkinsClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://jenkins.example.com");
        assert!(client.auth_header.starts_with("Basic "));
    }

    #[test]
    fn test_trigger_path_with_parameters() {
        let mut params = HashMap::new();
        params.insert("BRANCH".to_string(), "main".to_string());
        assert_eq!(
            JenkinsClient::trigger_path("deploy", Some(&params)),
            "/job/deploy/buildWithParameters"
        );
    }

    #[test]
    fn test_trigger_path_without_parameters() {
        assert_eq!(JenkinsClient::trigger_path("deploy", None), "/job/deploy/build");
    }

    #[test]
    fn test_trigger_path_empty_map_is_plain_build() {
        let params = HashMap::new();
        assert_eq!(
            JenkinsClient::trigger_path("deploy", Some(&params)),
            "/job/deploy/build"
        );
    }

    #[test]
    fn test_expect_json_rejects_text() {
        let response = ApiResponse::Text {
            content: "<html>".to_string(),
            status_code: 200,
        };
        assert!(JenkinsClient::expect_json(response).is_err());
    }

    #[test]
    fn test_expect_json_passes_value_through() {
        let response = ApiResponse::Json(serde_json::json!({"jobs": []}));
        let value = JenkinsClient::expect_json(response).unwrap();
        assert!(value.get("jobs").is_some());
    }
}
