//! Hit count tool for comparing search term yields

use rmcp::{handler::server::wrapper::Parameters, model::*, schemars};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Count request parameters
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CountRequest {
    #[schemars(description = "Search terms to count hits for, each counted independently")]
    pub search_terms: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CountResponse {
    success: bool,
    counts: HashMap<String, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Get the total PubMed hit count for each of several search terms
pub async fn get_pubmed_count(
    server: &super::EntrezServer,
    Parameters(params): Parameters<CountRequest>,
) -> Result<CallToolResult, ErrorData> {
    let response = if params.search_terms.is_empty() {
        CountResponse {
            success: false,
            counts: HashMap::new(),
            error: Some("No search terms provided".to_string()),
        }
    } else {
        info!(terms = ?params.search_terms, "Counting PubMed hits");
        count_all(server, &params.search_terms).await
    };

    let json = serde_json::to_string_pretty(&response).map_err(|e| ErrorData {
        code: ErrorCode(-32603),
        message: std::borrow::Cow::from(format!("Failed to serialize response: {}", e)),
        data: None,
    })?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

async fn count_all(server: &super::EntrezServer, terms: &[String]) -> CountResponse {
    let mut counts = HashMap::new();
    for term in terms {
        match server.client.get_count(term).await {
            Ok(count) => {
                counts.insert(term.clone(), count);
            }
            Err(e) => {
                warn!(term = %term, error = %e, "Count lookup failed");
                return CountResponse {
                    success: false,
                    counts: HashMap::new(),
                    error: Some(e.to_string()),
                };
            }
        }
    }
    CountResponse {
        success: true,
        counts,
        error: None,
    }
}
