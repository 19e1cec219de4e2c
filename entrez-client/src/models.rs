use serde::{Deserialize, Serialize};

/// Placeholder used for article fields that are absent in the source XML.
pub const NOT_AVAILABLE: &str = "N/A";

/// How many MeSH descriptor names are kept per article.
pub const MAX_MESH_TERMS: usize = 10;

/// A normalized PubMed article record
///
/// Serializes with the field names the callable surface exposes
/// (`pubmed_id`, `source`, `pubdate`, `abstract`, `keywords`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PubMedArticle {
    /// PubMed ID
    #[serde(rename = "pubmed_id")]
    pub pmid: String,
    /// Canonical article link, derived from the PMID
    pub link: String,
    /// Article title
    pub title: String,
    /// Author display names ("Lastname Forename")
    pub authors: Vec<String>,
    /// Journal name
    #[serde(rename = "source")]
    pub journal: String,
    /// Journal volume
    pub volume: String,
    /// Journal issue
    pub issue: String,
    /// Page range
    pub pages: String,
    /// DOI, or the "N/A" sentinel
    pub doi: String,
    /// Publication date: the Year/Month/Day components present, joined with "-"
    #[serde(rename = "pubdate")]
    pub pub_date: String,
    /// Abstract text; labeled sections are joined with a space and prefixed
    /// with their label
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Up to 10 MeSH descriptor names in document order
    #[serde(rename = "keywords")]
    pub mesh_terms: Vec<String>,
}

/// Result of a search-and-fetch pipeline
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Fetched article records, in the order the search returned them
    pub articles: Vec<PubMedArticle>,
    /// Total matches reported by ESearch; may exceed `articles.len()`
    pub total_count: u64,
}

/// A composed query string paired with its ESearch hit count
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TermCount {
    pub query: String,
    pub count: u64,
}

/// Counts for the PICO element queries and their combinations
#[derive(Debug, Clone)]
pub struct PicoOutcome {
    pub population: TermCount,
    pub intervention: TermCount,
    /// Present only when comparison terms were supplied
    pub comparison: Option<TermCount>,
    /// Present only when outcome terms were supplied
    pub outcome: Option<TermCount>,
    pub combinations: PicoCombinations,
}

/// The AND-combinations actually applicable to a PICO search
#[derive(Debug, Clone)]
pub struct PicoCombinations {
    /// `P AND I`, always computed
    pub p_and_i: TermCount,
    /// `P AND I AND C`, only when C was supplied
    pub p_and_i_and_c: Option<TermCount>,
    /// `P AND I AND O`, only when O was supplied
    pub p_and_i_and_o: Option<TermCount>,
    /// `P AND I AND C AND O`, only when both C and O were supplied
    pub p_and_i_and_c_and_o: Option<TermCount>,
}

/// Sort order for search results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOrder {
    /// Best-match ranking (the API default; no sort parameter sent)
    Relevance,
    /// Publication date, newest first
    DateDesc,
    /// Publication date, oldest first
    DateAsc,
}

impl SortOrder {
    /// Parse a user-facing sort string.
    ///
    /// Anything other than `date_desc`/`date_asc` means relevance.
    pub fn parse(value: &str) -> Self {
        match value {
            "date_desc" => SortOrder::DateDesc,
            "date_asc" => SortOrder::DateAsc,
            _ => SortOrder::Relevance,
        }
    }

    /// ESearch `sort` parameter, if any.
    ///
    /// The API only sorts by publication date descending; ascending order is
    /// produced locally by reversing the returned id list.
    pub fn as_api_param(&self) -> Option<&'static str> {
        match self {
            SortOrder::Relevance => None,
            SortOrder::DateDesc | SortOrder::DateAsc => Some("pub date"),
        }
    }
}
