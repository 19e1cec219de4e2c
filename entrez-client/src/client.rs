use reqwest::{Client, Response};
use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{EntrezError, Result};
use crate::models::{
    PicoCombinations, PicoOutcome, PubMedArticle, SearchOutcome, SortOrder, TermCount,
};
use crate::parser;
use crate::query::{self, PicoQueries};
use crate::responses::ESearchResult;
use crate::retry::with_retry;

/// Client for the NCBI Entrez E-utilities API
#[derive(Clone)]
pub struct EntrezClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

impl EntrezClient {
    /// Create a new client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use entrez_client::EntrezClient;
    ///
    /// let client = EntrezClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use entrez_client::{ClientConfig, EntrezClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = EntrezClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let base_url = config.effective_base_url().to_string();

        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            config,
        }
    }

    /// Internal helper for making HTTP requests with the retry policy.
    /// Appends the API etiquette parameters (api_key, email, tool) to the URL.
    pub(crate) async fn make_request(&self, url: &str) -> Result<Response> {
        let mut final_url = url.to_string();
        let api_params = self.config.build_api_params();

        if !api_params.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            final_url.push(separator);

            let param_strings: Vec<String> = api_params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
                .collect();
            final_url.push_str(&param_strings.join("&"));
        }

        with_retry(
            || async {
                debug!("Making API request to: {}", final_url);
                let response = self
                    .client
                    .get(&final_url)
                    .send()
                    .await
                    .map_err(EntrezError::from)?;

                // Any non-2xx status is a failed attempt, subject to retry.
                if !response.status().is_success() {
                    return Err(EntrezError::ApiError {
                        status: response.status().as_u16(),
                        message: response
                            .status()
                            .canonical_reason()
                            .unwrap_or("Unknown error")
                            .to_string(),
                    });
                }

                Ok(response)
            },
            &self.config.retry_config,
            "E-utilities request",
        )
        .await
    }

    /// Run an ESearch query, returning the id list and the total hit count.
    ///
    /// The count reflects all matches in the database and may exceed the
    /// number of ids returned under `limit`.
    #[instrument(skip(self, sort), fields(query = %query, limit = limit))]
    pub async fn search_ids(
        &self,
        query: &str,
        limit: usize,
        sort: Option<&SortOrder>,
    ) -> Result<(Vec<String>, u64)> {
        let mut url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmax={}&retmode=json",
            self.base_url,
            urlencoding::encode(query),
            limit
        );

        if let Some(sort_param) = sort.and_then(|s| s.as_api_param()) {
            url.push_str(&format!("&sort={}", urlencoding::encode(sort_param)));
        }

        let response = self.make_request(&url).await?;
        let search_result: ESearchResult = response.json().await?;

        // NCBI sometimes returns 200 OK with an ERROR field in the body.
        if let Some(error_msg) = &search_result.esearchresult.error {
            return Err(EntrezError::ApiError {
                status: 200,
                message: format!("NCBI ESearch API error: {}", error_msg),
            });
        }

        let total_count: u64 = search_result
            .esearchresult
            .count
            .as_ref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(0);

        info!(
            results_found = search_result.esearchresult.idlist.len(),
            total_count, "Search completed"
        );

        Ok((search_result.esearchresult.idlist, total_count))
    }

    /// Fetch full article records for the given PMIDs in one EFetch request.
    ///
    /// An empty id list returns an empty vector without a network call.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use entrez_client::EntrezClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = EntrezClient::new();
    ///     let ids = ["31978945".to_string(), "33515491".to_string()];
    ///     let articles = client.fetch_articles(&ids).await?;
    ///     for article in &articles {
    ///         println!("{}: {}", article.pmid, article.title);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(pmids_count = pmids.len()))]
    pub async fn fetch_articles(&self, pmids: &[String]) -> Result<Vec<PubMedArticle>> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml",
            self.base_url,
            pmids.join(",")
        );

        let response = self.make_request(&url).await?;
        let xml = response.text().await?;

        let articles = parser::parse_articles(&xml)?;
        info!(
            requested = pmids.len(),
            parsed = articles.len(),
            "Batch fetch completed"
        );

        Ok(articles)
    }

    /// Get the total PubMed hit count for a single search term.
    ///
    /// Uses ESearch in XML mode and reads only the count document.
    #[instrument(skip(self), fields(term = %term))]
    pub async fn get_count(&self, term: &str) -> Result<u64> {
        let url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmode=xml",
            self.base_url,
            urlencoding::encode(term)
        );

        let response = self.make_request(&url).await?;
        let xml = response.text().await?;
        parser::extract_count(&xml)
    }

    /// Look up MeSH vocabulary entries matching a search word.
    ///
    /// Two-step flow: ESearch against the MeSH database for entry ids, then
    /// EFetch in text mode and extraction of the canonical term per entry.
    /// No fetch call is made when the id list comes back empty.
    #[instrument(skip(self), fields(search_word = %search_word))]
    pub async fn get_mesh_terms(&self, search_word: &str) -> Result<Vec<String>> {
        let search_url = format!(
            "{}/esearch.fcgi?db=mesh&term={}&retmode=xml",
            self.base_url,
            urlencoding::encode(search_word)
        );

        let response = self.make_request(&search_url).await?;
        let xml = response.text().await?;
        let mesh_ids = parser::parse_id_list(&xml)?;

        if mesh_ids.is_empty() {
            info!("No MeSH ids found");
            return Ok(Vec::new());
        }

        let fetch_url = format!(
            "{}/efetch.fcgi?db=mesh&id={}&retmode=text",
            self.base_url,
            mesh_ids.join(",")
        );

        let response = self.make_request(&fetch_url).await?;
        let text = response.text().await?;

        let terms = parser::parse_mesh_terms(&text);
        info!(terms_found = terms.len(), "MeSH lookup completed");

        Ok(terms)
    }

    /// Compose a keyword/journal query, search, and fetch the matching records.
    ///
    /// Composition failures (no parameters at all) surface before any request
    /// is made. For ascending date order the id list is reversed locally,
    /// since the API only sorts by publication date descending.
    pub async fn search_and_fetch(
        &self,
        keywords: &[String],
        journal: Option<&str>,
        num_results: usize,
        sort: &SortOrder,
    ) -> Result<SearchOutcome> {
        let query_string = query::build_search_query(keywords, journal)?;
        info!(query = %query_string, "Composed search query");

        let (mut pmids, total_count) = self
            .search_ids(&query_string, num_results, Some(sort))
            .await?;

        if *sort == SortOrder::DateAsc {
            pmids.reverse();
        }

        let articles = self.fetch_articles(&pmids).await?;

        Ok(SearchOutcome {
            articles,
            total_count,
        })
    }

    /// Run the PICO combinatorial count flow.
    ///
    /// Population and Intervention are validated before any network call.
    /// One count request is issued per present element and per applicable
    /// combination, sequentially; absent elements cost nothing.
    pub async fn pico_counts(
        &self,
        p_terms: &[String],
        i_terms: &[String],
        c_terms: &[String],
        o_terms: &[String],
    ) -> Result<PicoOutcome> {
        let queries = PicoQueries::compose(p_terms, i_terms, c_terms, o_terms)?;

        let population = self.count_for(queries.population.clone()).await?;
        let intervention = self.count_for(queries.intervention.clone()).await?;
        let comparison = match &queries.comparison {
            Some(query) => Some(self.count_for(query.clone()).await?),
            None => None,
        };
        let outcome = match &queries.outcome {
            Some(query) => Some(self.count_for(query.clone()).await?),
            None => None,
        };

        let p_and_i = self.count_for(queries.p_and_i()).await?;
        let p_and_i_and_c = match queries.p_and_i_and_c() {
            Some(query) => Some(self.count_for(query).await?),
            None => None,
        };
        let p_and_i_and_o = match queries.p_and_i_and_o() {
            Some(query) => Some(self.count_for(query).await?),
            None => None,
        };
        let p_and_i_and_c_and_o = match queries.p_and_i_and_c_and_o() {
            Some(query) => Some(self.count_for(query).await?),
            None => None,
        };

        Ok(PicoOutcome {
            population,
            intervention,
            comparison,
            outcome,
            combinations: PicoCombinations {
                p_and_i,
                p_and_i_and_c,
                p_and_i_and_o,
                p_and_i_and_c_and_o,
            },
        })
    }

    /// Pair a composed query with its hit count.
    async fn count_for(&self, query: String) -> Result<TermCount> {
        let count = self.get_count(&query).await?;
        Ok(TermCount { query, count })
    }
}

impl Default for EntrezClient {
    fn default() -> Self {
        Self::new()
    }
}
