//! PICO combinatorial evidence search tool

use rmcp::{handler::server::wrapper::Parameters, model::*, schemars};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use entrez_client::{PicoOutcome, TermCount};

/// PICO request parameters
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PicoRequest {
    #[schemars(description = "Population terms (required, e.g., ['adults with type 2 diabetes'])")]
    pub p_terms: Option<Vec<String>>,

    #[schemars(description = "Intervention terms (required, e.g., ['metformin'])")]
    pub i_terms: Option<Vec<String>>,

    #[schemars(description = "Comparison terms (optional, e.g., ['placebo'])")]
    pub c_terms: Option<Vec<String>>,

    #[schemars(description = "Outcome terms (optional, e.g., ['hba1c reduction'])")]
    pub o_terms: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct PicoResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    results: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct PicoResults {
    individual: IndividualCounts,
    combinations: CombinationCounts,
}

#[derive(Debug, Serialize)]
struct IndividualCounts {
    #[serde(rename = "P")]
    population: TermCount,
    #[serde(rename = "I")]
    intervention: TermCount,
    #[serde(rename = "C", skip_serializing_if = "Option::is_none")]
    comparison: Option<TermCount>,
    #[serde(rename = "O", skip_serializing_if = "Option::is_none")]
    outcome: Option<TermCount>,
}

#[derive(Debug, Serialize)]
struct CombinationCounts {
    #[serde(rename = "P_AND_I")]
    p_and_i: TermCount,
    #[serde(rename = "P_AND_I_AND_C", skip_serializing_if = "Option::is_none")]
    p_and_i_and_c: Option<TermCount>,
    #[serde(rename = "P_AND_I_AND_O", skip_serializing_if = "Option::is_none")]
    p_and_i_and_o: Option<TermCount>,
    #[serde(rename = "P_AND_I_AND_C_AND_O", skip_serializing_if = "Option::is_none")]
    p_and_i_and_c_and_o: Option<TermCount>,
}

impl From<PicoOutcome> for PicoResults {
    fn from(outcome: PicoOutcome) -> Self {
        Self {
            individual: IndividualCounts {
                population: outcome.population,
                intervention: outcome.intervention,
                comparison: outcome.comparison,
                outcome: outcome.outcome,
            },
            combinations: CombinationCounts {
                p_and_i: outcome.combinations.p_and_i,
                p_and_i_and_c: outcome.combinations.p_and_i_and_c,
                p_and_i_and_o: outcome.combinations.p_and_i_and_o,
                p_and_i_and_c_and_o: outcome.combinations.p_and_i_and_c_and_o,
            },
        }
    }
}

/// Run combinatorial hit counts over PICO framework terms
pub async fn pico_search(
    server: &super::EntrezServer,
    Parameters(params): Parameters<PicoRequest>,
) -> Result<CallToolResult, ErrorData> {
    let p_terms = params.p_terms.unwrap_or_default();
    let i_terms = params.i_terms.unwrap_or_default();
    let c_terms = params.c_terms.unwrap_or_default();
    let o_terms = params.o_terms.unwrap_or_default();

    info!(
        p = ?p_terms,
        i = ?i_terms,
        c = ?c_terms,
        o = ?o_terms,
        "Running PICO search"
    );

    let response = match server
        .client
        .pico_counts(&p_terms, &i_terms, &c_terms, &o_terms)
        .await
    {
        Ok(outcome) => {
            let results = serde_json::to_value(PicoResults::from(outcome)).map_err(|e| {
                ErrorData {
                    code: ErrorCode(-32603),
                    message: std::borrow::Cow::from(format!(
                        "Failed to serialize response: {}",
                        e
                    )),
                    data: None,
                }
            })?;
            PicoResponse {
                success: true,
                error: None,
                results,
            }
        }
        Err(e) => {
            warn!(error = %e, "PICO search failed");
            PicoResponse {
                success: false,
                error: Some(e.to_string()),
                results: serde_json::Value::Object(Default::default()),
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
