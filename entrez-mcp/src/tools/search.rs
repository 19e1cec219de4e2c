//! Keyword and journal search tool

use rmcp::{handler::server::wrapper::Parameters, model::*, schemars};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use entrez_client::{PubMedArticle, SortOrder};

/// Search request parameters
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    #[schemars(description = "Keywords to search for, OR-combined (e.g., ['covid-19', 'sars-cov-2'])")]
    pub keywords: Option<Vec<String>>,

    #[schemars(description = "Journal name to restrict results to (e.g., 'BMJ')")]
    pub journal: Option<String>,

    #[schemars(description = "Maximum number of results to return (default: 10)")]
    pub num_results: Option<usize>,

    #[schemars(
        description = "Sort order: relevance (default), date_desc (newest first), date_asc (oldest first)"
    )]
    pub sort_by: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    success: bool,
    results: Vec<PubMedArticle>,
    total_results: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Search PubMed by keywords and/or journal, returning article records
pub async fn search_pubmed(
    server: &super::EntrezServer,
    Parameters(params): Parameters<SearchRequest>,
) -> Result<CallToolResult, ErrorData> {
    let keywords = params.keywords.unwrap_or_default();
    let num_results = params.num_results.unwrap_or(10);
    let sort = SortOrder::parse(params.sort_by.as_deref().unwrap_or("relevance"));

    info!(
        keywords = ?keywords,
        journal = ?params.journal,
        num_results,
        sort = ?sort,
        "Searching PubMed"
    );

    let response = match server
        .client
        .search_and_fetch(&keywords, params.journal.as_deref(), num_results, &sort)
        .await
    {
        Ok(outcome) => SearchResponse {
            success: true,
            results: outcome.articles,
            total_results: outcome.total_count,
            error: None,
        },
        Err(e) => {
            warn!(error = %e, "Search failed");
            SearchResponse {
                success: false,
                results: Vec::new(),
                total_results: 0,
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
