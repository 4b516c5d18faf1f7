use super::{RenderParams, RenderedFile};
use crate::error::Result;
use std::path::Path;

/// File name the Java environment script is written under in the WAS directory
pub const ENV_SCRIPT_FILE_NAME: &str = "whatap_env.sh";

/// Resolves the newest agent jar when the script runs, not at render time.
const JAR_LOOKUP: &str = "WHATAP_JAR=`ls ${WHATAP_HOME}/whatap.agent-*.jar | sort -V | tail -1`";

#[derive(Debug, Clone)]
pub struct EnvScriptParams {
    pub java_base_dir: String,
    /// Appended verbatim after the generated options when non-empty
    pub extra_option_line: String,
}

impl EnvScriptParams {
    pub fn new(java_base_dir: &str, extra_option_line: &str) -> Self {
        Self {
            java_base_dir: java_base_dir.to_string(),
            extra_option_line: extra_option_line.to_string(),
        }
    }

    pub fn content(&self) -> String {
        let mut content = format!(
            "WHATAP_HOME={}\n{}\n\
             WHATAP_OPTS=\"${{WHATAP_OPTS}} -javaagent:${{WHATAP_JAR}}\"\n\
             WHATAP_OPTS=\"${{WHATAP_OPTS}} -Dwhatap.name=`hostname`\"\n",
            self.java_base_dir, JAR_LOOKUP
        );

        if !self.extra_option_line.is_empty() {
            content.push_str(&self.extra_option_line);
            content.push('\n');
        }
        content
    }
}

/// Write the environment script and mark it executable (0755).
pub fn render_environment_script(path: &Path, params: &EnvScriptParams) -> Result<RenderedFile> {
    super::render(path, &RenderParams::EnvScript(params.clone()))
}
