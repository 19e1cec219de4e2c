//! MeSH vocabulary lookup tool

use rmcp::{handler::server::wrapper::Parameters, model::*, schemars};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// MeSH lookup request parameters
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MeshRequest {
    #[schemars(description = "Word or phrase to match against MeSH vocabulary (e.g., 'asthma')")]
    pub search_word: String,
}

#[derive(Debug, Serialize)]
struct MeshResponse {
    success: bool,
    mesh_terms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Look up standardized MeSH terms matching a search word
pub async fn get_mesh_terms(
    server: &super::EntrezServer,
    Parameters(params): Parameters<MeshRequest>,
) -> Result<CallToolResult, ErrorData> {
    info!(search_word = %params.search_word, "Looking up MeSH terms");

    let response = match server.client.get_mesh_terms(&params.search_word).await {
        Ok(terms) => MeshResponse {
            success: true,
            mesh_terms: terms,
            error: None,
        },
        Err(e) => {
            warn!(error = %e, "MeSH lookup failed");
            MeshResponse {
                success: false,
                mesh_terms: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    };

    let json = serde_json::to_string_pretty(&response).map_err(|e| ErrorData {
        code: ErrorCode(-32603),
        message: std::borrow::Cow::from(format!("Failed to serialize response: {}", e)),
        data: None,
    })?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
