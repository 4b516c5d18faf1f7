use super::{RenderParams, RenderedFile};
use crate::error::Result;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;
use std::path::Path;

/// Creation stamp written into the infrastructure agent config.
///
/// This is the epoch seconds followed directly by the six-digit microsecond
/// fraction, e.g. `1718000000` + `042137` -> `1718000000042137`. It looks like
/// a nanosecond value but is not one and must never be parsed as a time unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTime(String);

impl CreatedTime {
    pub fn now() -> Self {
        Self::from_datetime(&Utc::now())
    }

    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self(format!("{}{:06}", at.timestamp(), at.timestamp_subsec_micros()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CreatedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct InfraParams {
    pub license: String,
    pub server_host: String,
    pub server_port: String,
    pub created_time: CreatedTime,
}

impl InfraParams {
    /// Parameters stamped with the current time
    pub fn new(license: &str, server_host: &str, server_port: &str) -> Self {
        Self {
            license: license.to_string(),
            server_host: server_host.to_string(),
            server_port: server_port.to_string(),
            created_time: CreatedTime::now(),
        }
    }

    pub fn content(&self) -> String {
        format!(
            "license={}\nwhatap.server.host={}\nwhatap.server.port={}\ncreatedtime={}",
            self.license, self.server_host, self.server_port, self.created_time
        )
    }
}

/// Write the infrastructure agent `whatap.conf`.
pub fn render_infrastructure_config(
    path: &Path,
    license: &str,
    server_host: &str,
    server_port: &str,
) -> Result<RenderedFile> {
    let params = InfraParams::new(license, server_host, server_port);
    super::render(path, &RenderParams::Infrastructure(params))
}
