//! Configuration management for the Jenkins MCP Server
//!
//! Connection settings are loaded once at startup from environment variables.

use crate::error::{ConfigError, Result};

/// Environment variable holding the Jenkins base URL
pub const ENV_URL: &str = "JENKINS_URL";

/// Environment variable holding the Jenkins username
pub const ENV_USERNAME: &str = "JENKINS_USERNAME";

/// Environment variable holding the Jenkins API token
pub const ENV_API_TOKEN: &str = "JENKINS_API_TOKEN";

/// Connection configuration for the Jenkins server
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Jenkins server, without trailing slash
    pub base_url: String,

    /// Jenkins username
    pub username: String,

    /// Jenkins API token
    pub api_token: String,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// All three variables are required; a missing one is a startup-fatal
    /// configuration error.
    pub fn from_env() -> Result<Self> {
        let base_url = require_env(ENV_URL)?;
        let username = require_env(ENV_USERNAME)?;
        let api_token = require_env(ENV_API_TOKEN)?;

        Ok(Self::new(base_url, username, api_token))
    }

    /// Create a configuration from explicit values, normalizing the base URL
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.into(),
            api_token: api_token.into(),
        }
    }
}

fn require_env(var: &str) -> Result<String> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            ConfigError::MissingEnvVar {
                var: var.to_string(),
            }
            .into()
        })
}
