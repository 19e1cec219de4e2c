//! Batch article detail tool

use rmcp::{handler::server::wrapper::Parameters, model::*, schemars};
use serde::Deserialize;
use tracing::{info, warn};

use entrez_client::PubMedArticle;

/// Detail request parameters
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DetailsRequest {
    #[schemars(description = "PubMed IDs to fetch full records for (e.g., ['31978945'])")]
    pub pubmed_ids: Vec<String>,
}

/// Fetch full article records for a list of PubMed IDs
///
/// Returns a JSON list of records. Failures yield an empty list rather
/// than an error payload.
pub async fn format_paper_details(
    server: &super::EntrezServer,
    Parameters(params): Parameters<DetailsRequest>,
) -> Result<CallToolResult, ErrorData> {
    info!(ids = ?params.pubmed_ids, "Fetching article details");

    let articles: Vec<PubMedArticle> = match server.client.fetch_articles(&params.pubmed_ids).await
    {
        Ok(articles) => articles,
        Err(e) => {
            warn!(error = %e, "Detail fetch failed");
            Vec::new()
        }
    };

    let json = serde_json::to_string_pretty(&articles).map_err(|e| ErrorData {
        code: ErrorCode(-32603),
        message: std::borrow::Cow::from(format!("Failed to serialize response: {}", e)),
        data: None,
    })?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
