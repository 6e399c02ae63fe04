//! Jenkins REST API module
//!
//! Contains types, URL construction, and the client for the Jenkins REST API.

pub mod client;
pub mod types;
pub mod urls;
