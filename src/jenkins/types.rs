//! Jenkins REST API type definitions
//!
//! These types mirror the Jenkins API responses and are used for
//! serialization/deserialization. Jenkins omits fields freely depending on
//! job type and server version, so almost everything is optional.

use serde::{Deserialize, Serialize};

/// A job entry from the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Job name
    pub name: String,

    /// Job URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Status color (e.g. "blue", "red", "disabled")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Most recent build, if the job has ever built
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_build: Option<BuildRef>,
}

/// A lightweight reference to a build
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BuildRef {
    /// Build number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,

    /// Build start time (epoch milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Build result (e.g. "SUCCESS", "FAILURE"); absent while building
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Detailed job information
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    /// Job description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Job URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Whether the job can be built
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buildable: Option<bool>,

    /// Status color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Most recent build
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_build: Option<BuildRef>,
}

/// Detailed build information
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// Build result; absent while the build is running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Build duration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,

    /// Build start time (epoch milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Whether the build is currently running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<bool>,

    /// Build URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// An entry in the build queue
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// The queued task (usually a job)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<QueueTask>,

    /// When the item entered the queue (epoch milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_queue_since: Option<i64>,

    /// Why the item is still waiting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
}

/// The task behind a queue item
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueueTask {
    /// Task name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Task URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A Jenkins agent (node)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Display name of the agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Whether the agent is offline
    #[serde(default)]
    pub offline: bool,

    /// Human-readable offline reason, when offline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline_cause_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_deserialization() {
        let json = r#"{
            "name": "backend-ci",
            "url": "https://jenkins.example.com/job/backend-ci/",
            "color": "blue",
            "lastBuild": {"number": 42, "timestamp": 1700000000000, "result": "SUCCESS"}
        }"#;

        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.name, "backend-ci");
        assert_eq!(job.color.as_deref(), Some("blue"));
        assert_eq!(job.last_build.unwrap().number, Some(42));
    }

    #[test]
    fn test_job_without_builds() {
        let json = r#"{"name": "new-job", "color": "notbuilt"}"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert!(job.last_build.is_none());
    }

    #[test]
    fn test_build_info_while_running_has_no_result() {
        let json = r#"{"building": true, "timestamp": 1700000000000, "duration": 0}"#;
        let info: BuildInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.building, Some(true));
        assert!(info.result.is_none());
    }

    #[test]
    fn test_node_offline_defaults() {
        let json = r#"{"displayName": "built-in"}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert!(!node.offline);
        assert!(node.offline_cause_reason.is_none());
    }

    #[test]
    fn test_queue_item_deserialization() {
        let json = r#"{
            "task": {"name": "deploy", "url": "https://jenkins.example.com/job/deploy/"},
            "inQueueSince": 1700000123456,
            "why": "Waiting for next available executor"
        }"#;
        let item: QueueItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.task.unwrap().name.as_deref(), Some("deploy"));
        assert_eq!(item.in_queue_since, Some(1700000123456));
    }
}
