use super::{RenderParams, RenderedFile};
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct DatabaseAgentParams {
    pub license: String,
    pub server_host: String,
    pub server_port: String,
    pub object_name: String,
    /// Lower-cased platform name, e.g. `postgresql`
    pub dbms: String,
    /// Single extra line such as `db=sales`; empty means no line at all
    pub extra_option: String,
    pub db_addr: String,
    pub db_port: String,
}

impl DatabaseAgentParams {
    pub fn content(&self) -> String {
        let mut content = format!(
            "license={}\nwhatap.server.host={}\nwhatap.server.port={}\nobject_name={}\n\ndbms={}\n",
            self.license, self.server_host, self.server_port, self.object_name, self.dbms
        );

        if !self.extra_option.is_empty() {
            content.push_str(&self.extra_option);
            content.push('\n');
        }

        content.push_str(&format!(
            "db_ip={}\ndb_port={}\n",
            self.db_addr, self.db_port
        ));
        content
    }
}

/// Write a database agent `whatap.conf`.
pub fn render_database_agent_config(
    path: &Path,
    params: &DatabaseAgentParams,
) -> Result<RenderedFile> {
    super::render(path, &RenderParams::DatabaseAgent(params.clone()))
}
