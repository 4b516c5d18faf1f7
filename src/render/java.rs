use super::{RenderParams, RenderedFile};
use crate::error::Result;
use std::path::Path;

/// Separator used in single-line option strings to mean "new line"
pub const OPTION_LINE_SEPARATOR: char = '|';

#[derive(Debug, Clone)]
pub struct JavaAgentParams {
    pub license: String,
    pub server_host: String,
    pub server_port: String,
    /// Comma-joined framework tags, may be empty
    pub weaving: String,
    /// `"true"` or `"false"`
    pub logsink_enabled: String,
    /// Free-form option lines joined with `|`
    pub option_block: String,
}

impl JavaAgentParams {
    pub fn content(&self) -> String {
        format!(
            "license={}\nwhatap.server.host={}\nwhatap.server.port={}\n\nweaving={}\nlogsink_enabled={}\n{}\n\n",
            self.license,
            self.server_host,
            self.server_port,
            self.weaving,
            self.logsink_enabled,
            expand_option_block(&self.option_block)
        )
    }
}

/// Turn `a|b|c` into three lines, keeping their order.
pub fn expand_option_block(block: &str) -> String {
    block.replace(OPTION_LINE_SEPARATOR, "\n")
}

/// Write the Java agent `whatap.conf`.
pub fn render_java_agent_config(path: &Path, params: &JavaAgentParams) -> Result<RenderedFile> {
    super::render(path, &RenderParams::JavaAgent(params.clone()))
}
