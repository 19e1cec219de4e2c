//! Tools module for the Entrez MCP server

use entrez_client::EntrezClient;
use rmcp::handler::server::router::tool::ToolRouter;
use std::sync::Arc;

pub mod count;
pub mod details;
pub mod mesh;
pub mod pico;
pub mod search;

/// Entrez MCP Server
#[derive(Clone)]
pub struct EntrezServer {
    pub(crate) client: Arc<EntrezClient>,
    pub(crate) tool_router: ToolRouter<Self>,
}

impl EntrezServer {
    pub fn new() -> Self {
        let client = EntrezClient::new();
        Self {
            client: Arc::new(client),
            tool_router: Self::tool_router(),
        }
    }
}
