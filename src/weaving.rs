//! Java agent option assembly: weaving tags and JVM option lines.

use std::fmt;
use std::str::FromStr;

/// Spring Boot answer meaning "not a Spring Boot application"
pub const NOT_APPLICABLE: &str = "N/A";

/// Option line opening `java.lang` to the agent on Java 17+
pub const REFLECT_OPTION_LINE: &str =
    r#"WHATAP_OPTS="${WHATAP_OPTS} --add-opens=java.base/java.lang=ALL-UNNAMED""#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFramework {
    /// logback 1.2.8 or later
    Logback,
    /// log4j 2.17 or later
    Log4j,
    #[default]
    None,
}

impl LogFramework {
    /// Weaving tag understood by the agent.
    ///
    /// The trailing space is part of the tag as the agent has always received it.
    pub fn weaving_tag(&self) -> Option<&'static str> {
        match self {
            LogFramework::Logback => Some("logback-1.2.8 "),
            LogFramework::Log4j => Some("log4j-2.17 "),
            LogFramework::None => None,
        }
    }
}

impl fmt::Display for LogFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogFramework::Logback => "logback",
            LogFramework::Log4j => "log4j",
            LogFramework::None => "none",
        };
        f.write_str(name)
    }
}

impl FromStr for LogFramework {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logback" => Ok(LogFramework::Logback),
            "log4j" => Ok(LogFramework::Log4j),
            "none" | "" => Ok(LogFramework::None),
            other => Err(format!(
                "unknown log framework '{}', expected logback, log4j or none",
                other
            )),
        }
    }
}

/// Comma-join the selected framework tags.
///
/// An empty result means nothing is woven.
pub fn build_weaving(spring_boot_version: Option<&str>, log_framework: LogFramework) -> String {
    let mut items = Vec::new();

    if let Some(version) = spring_boot_version.map(str::trim) {
        if !version.is_empty() && version != NOT_APPLICABLE {
            items.push(format!("spring-boot-{}", version));
        }
    }

    if let Some(tag) = log_framework.weaving_tag() {
        items.push(tag.to_string());
    }

    items.join(",")
}

/// Extra environment script line, needed only on Java 17+ when the launch
/// command does not already open `java.lang`.
pub fn reflect_option_line(java17_or_later: bool, has_reflect_opts: bool) -> Option<String> {
    if java17_or_later && !has_reflect_opts {
        Some(REFLECT_OPTION_LINE.to_string())
    } else {
        None
    }
}
