//! Jenkins endpoint path construction
//!
//! Builds the relative API paths for each operation. Job names are
//! percent-encoded so names containing spaces or slashes stay within a
//! single path segment.

/// Listing endpoint with a tree filter limiting the payload to the fields
/// the reports actually show.
pub const JOBS_PATH: &str =
    "/api/json?tree=jobs[name,url,color,lastBuild[number,timestamp,result]]";

/// Queue endpoint
pub const QUEUE_PATH: &str = "/queue/api/json";

/// Agents endpoint
pub const NODES_PATH: &str = "/computer/api/json";

/// Percent-encode a job name for use as a path segment
pub fn encode_job_name(job_name: &str) -> String {
    urlencoding::encode(job_name).into_owned()
}

/// Path to a job's detail endpoint
pub fn job_info_path(job_name: &str) -> String {
    format!("/job/{}/api/json", encode_job_name(job_name))
}

/// Path to the plain build-trigger endpoint
pub fn build_path(job_name: &str) -> String {
    format!("/job/{}/build", encode_job_name(job_name))
}

/// Path to the parameterized build-trigger endpoint
pub fn build_with_parameters_path(job_name: &str) -> String {
    format!("/job/{}/buildWithParameters", encode_job_name(job_name))
}

/// Path to a build's detail endpoint
pub fn build_info_path(job_name: &str, build_number: u32) -> String {
    format!("/job/{}/{}/api/json", encode_job_name(job_name), build_number)
}

/// Path to a build's console text endpoint
pub fn console_text_path(job_name: &str, build_number: u32) -> String {
    format!(
        "/job/{}/{}/consoleText",
        encode_job_name(job_name),
        build_number
    )
}

/// Path to a build's stop endpoint
pub fn stop_build_path(job_name: &str, build_number: u32) -> String {
    format!("/job/{}/{}/stop", encode_job_name(job_name), build_number)
}
