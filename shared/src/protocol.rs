use crate::{format_uptime, API_VERSION};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Message carried by every info response
pub const INFO_MESSAGE: &str = "Beacon API is running!";

/// Status reported while the process is reachable
pub const HEALTHY: &str = "healthy";

/// Server -> Client: metadata describing the running instance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfoPayload {
    pub message: String,

    /// When the response was built
    pub timestamp: DateTime<Utc>,

    /// Always [`API_VERSION`]
    pub version: String,

    /// Host name of the machine, empty if it could not be resolved
    pub hostname: String,
}

/// Server -> Client: liveness report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthPayload {
    /// Always [`HEALTHY`]
    pub status: String,

    /// When the response was built
    pub timestamp: DateTime<Utc>,

    /// Time since process start, rendered by [`format_uptime`]
    pub uptime: String,
}

impl InfoPayload {
    pub fn new(hostname: String) -> Self {
        Self {
            message: INFO_MESSAGE.to_string(),
            timestamp: Utc::now(),
            version: API_VERSION.to_string(),
            hostname,
        }
    }
}

impl HealthPayload {
    pub fn new(uptime: Duration) -> Self {
        Self {
            status: HEALTHY.to_string(),
            timestamp: Utc::now(),
            uptime: format_uptime(uptime),
        }
    }
}
