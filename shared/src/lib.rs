pub mod protocol;
pub mod uptime;

pub use protocol::*;
pub use uptime::{format_uptime, parse_uptime};

/// The version reported by `/api/info` - fixed, independent of the crate version
pub const API_VERSION: &str = "1.0.0";
