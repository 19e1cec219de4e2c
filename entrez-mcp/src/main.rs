use anyhow::Result;
use rmcp::{
    handler::server::wrapper::Parameters, model::*, tool, tool_handler, tool_router,
    transport::stdio, ServerHandler, ServiceExt,
};
use tracing::info;

mod tools;
use tools::EntrezServer;

#[tool_router]
impl EntrezServer {
    #[tool(
        description = "Search PubMed for articles by keywords and/or journal name. Keywords are OR-combined; a journal restricts results to that journal. Supports sorting by relevance (default), date_desc (newest first), or date_asc (oldest first). Returns full article records including title, authors, abstract, and MeSH keywords."
    )]
    async fn search_pubmed(
        &self,
        params: Parameters<tools::search::SearchRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        tools::search::search_pubmed(self, params).await
    }

    #[tool(
        description = "Look up standardized MeSH (Medical Subject Headings) vocabulary terms matching a word or phrase. Useful for finding the controlled vocabulary form of a clinical concept before searching."
    )]
    async fn get_mesh_terms(
        &self,
        params: Parameters<tools::mesh::MeshRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        tools::mesh::get_mesh_terms(self, params).await
    }

    #[tool(
        description = "Get the total PubMed hit count for each of several search terms without retrieving any articles. Useful for gauging how much literature exists on each topic."
    )]
    async fn get_pubmed_count(
        &self,
        params: Parameters<tools::count::CountRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        tools::count::get_pubmed_count(self, params).await
    }

    #[tool(
        description = "Fetch full structured records (title, abstract, authors, journal, MeSH keywords, DOI) for a list of PubMed IDs."
    )]
    async fn format_paper_details(
        &self,
        params: Parameters<tools::details::DetailsRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        tools::details::format_paper_details(self, params).await
    }

    #[tool(
        description = "Run a PICO (Population, Intervention, Comparison, Outcome) evidence search: counts PubMed hits for each framework element and for their AND-combinations (P+I always; P+I+C, P+I+O, P+I+C+O when the optional elements are given). Population and Intervention terms are required."
    )]
    async fn pico_search(
        &self,
        params: Parameters<tools::pico::PicoRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        tools::pico::pico_search(self, params).await
    }
}

#[tool_handler]
impl ServerHandler for EntrezServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "entrez-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Entrez MCP Server - Search PubMed, look up MeSH vocabulary, compare hit counts, and run PICO evidence searches.".to_string(),
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing to stderr to avoid interfering with JSON-RPC on stdout
    // MCP protocol uses stdin/stdout for JSON-RPC messages
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting Entrez MCP Server");

    let service = EntrezServer::new().serve(stdio()).await?;
    info!("MCP server initialized, waiting for requests");

    service.waiting().await?;

    Ok(())
}
