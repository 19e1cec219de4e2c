//! Boolean query composition for ESearch terms.

use crate::error::{EntrezError, Result};

/// Build the boolean query for a keyword/journal search.
///
/// Keywords are OR-joined inside one parenthesized clause; a journal name
/// becomes a `[Journal]`-restricted clause; the clauses are AND-joined with
/// the keyword clause first. Supplying neither is an error, raised before
/// any request is made.
pub fn build_search_query(keywords: &[String], journal: Option<&str>) -> Result<String> {
    let mut clauses = Vec::new();

    if !keywords.is_empty() {
        clauses.push(format!("({})", keywords.join(" OR ")));
    }

    if let Some(journal) = journal.filter(|j| !j.is_empty()) {
        clauses.push(format!("{}[Journal]", journal));
    }

    if clauses.is_empty() {
        return Err(EntrezError::InvalidQuery(
            "No search parameters provided. Please specify keywords or journal.".to_string(),
        ));
    }

    Ok(clauses.join(" AND "))
}

/// OR-join the terms of one PICO element, each term individually
/// parenthesized and the whole group re-parenthesized.
///
/// Returns an empty string for an empty term list: optional PICO elements
/// contribute nothing rather than failing.
pub fn compose_element(terms: &[String]) -> String {
    if terms.is_empty() {
        return String::new();
    }

    let inner = terms
        .iter()
        .map(|term| format!("({})", term))
        .collect::<Vec<_>>()
        .join(" OR ");

    format!("({})", inner)
}

/// Composed queries for a PICO search: one per present element plus the
/// applicable AND-combinations in fixed P, I, C, O order.
#[derive(Debug, Clone)]
pub struct PicoQueries {
    pub population: String,
    pub intervention: String,
    pub comparison: Option<String>,
    pub outcome: Option<String>,
}

impl PicoQueries {
    /// Compose element queries from raw term lists.
    ///
    /// Population and Intervention are mandatory; Comparison and Outcome are
    /// optional and absent elements never appear in any combination.
    pub fn compose(
        p_terms: &[String],
        i_terms: &[String],
        c_terms: &[String],
        o_terms: &[String],
    ) -> Result<Self> {
        if p_terms.is_empty() || i_terms.is_empty() {
            return Err(EntrezError::InvalidQuery(
                "At least P (Population) and I (Intervention) terms are required.".to_string(),
            ));
        }

        let comparison = (!c_terms.is_empty()).then(|| compose_element(c_terms));
        let outcome = (!o_terms.is_empty()).then(|| compose_element(o_terms));

        Ok(Self {
            population: compose_element(p_terms),
            intervention: compose_element(i_terms),
            comparison,
            outcome,
        })
    }

    /// `P AND I`, always applicable.
    pub fn p_and_i(&self) -> String {
        format!("{} AND {}", self.population, self.intervention)
    }

    /// `P AND I AND C`, only when comparison terms were supplied.
    pub fn p_and_i_and_c(&self) -> Option<String> {
        self.comparison
            .as_ref()
            .map(|c| format!("{} AND {}", self.p_and_i(), c))
    }

    /// `P AND I AND O`, only when outcome terms were supplied.
    pub fn p_and_i_and_o(&self) -> Option<String> {
        self.outcome
            .as_ref()
            .map(|o| format!("{} AND {}", self.p_and_i(), o))
    }

    /// `P AND I AND C AND O`, only when both optional elements were supplied.
    pub fn p_and_i_and_c_and_o(&self) -> Option<String> {
        match (&self.comparison, &self.outcome) {
            (Some(c), Some(o)) => Some(format!("{} AND {} AND {}", self.p_and_i(), c, o)),
            _ => None,
        }
    }
}
