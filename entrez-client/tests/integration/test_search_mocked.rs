//! Mocked ESearch/EFetch tests for the search-and-fetch pipeline.

use entrez_client::{ClientConfig, EntrezClient, EntrezError, SortOrder};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn esearch_json(pmids: &[&str], total_count: usize) -> String {
    let id_list: Vec<String> = pmids.iter().map(|id| format!("\"{}\"", id)).collect();
    format!(
        r#"{{
            "esearchresult": {{
                "count": "{}",
                "retmax": "{}",
                "retstart": "0",
                "idlist": [{}]
            }}
        }}"#,
        total_count,
        pmids.len(),
        id_list.join(",")
    )
}

fn efetch_xml(pmids: &[&str]) -> String {
    let articles: String = pmids
        .iter()
        .map(|pmid| {
            format!(
                "<PubmedArticle><MedlineCitation><PMID>{pmid}</PMID>\
                 <Article><ArticleTitle>Article {pmid}</ArticleTitle></Article>\
                 </MedlineCitation></PubmedArticle>"
            )
        })
        .collect();
    format!("<PubmedArticleSet>{}</PubmedArticleSet>", articles)
}

fn create_test_client(base_url: &str) -> EntrezClient {
    let config = ClientConfig::new()
        .with_base_url(base_url)
        .with_tool("test-client");
    EntrezClient::with_config(config)
}

fn keywords(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
#[traced_test]
async fn test_search_and_fetch_returns_records_and_total() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("retmode", "json"))
        .and(query_param("retmax", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(esearch_json(&["111", "222"], 5000)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "111,222"))
        .respond_with(ResponseTemplate::new(200).set_body_string(efetch_xml(&["111", "222"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let outcome = client
        .search_and_fetch(&keywords(&["asthma"]), None, 2, &SortOrder::Relevance)
        .await
        .unwrap();

    // Total reported by ESearch exceeds the number of fetched records.
    assert_eq!(outcome.total_count, 5000);
    assert_eq!(outcome.articles.len(), 2);
    assert_eq!(outcome.articles[0].pmid, "111");
    assert_eq!(outcome.articles[0].title, "Article 111");
    assert_eq!(
        outcome.articles[0].link,
        "https://pubmed.ncbi.nlm.nih.gov/111/"
    );
}

#[tokio::test]
#[traced_test]
async fn test_search_composes_keyword_and_journal_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("term", "(covid-19 OR sars-cov-2) AND BMJ[Journal]"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(&["333"], 1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(efetch_xml(&["333"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let outcome = client
        .search_and_fetch(
            &keywords(&["covid-19", "sars-cov-2"]),
            Some("BMJ"),
            10,
            &SortOrder::Relevance,
        )
        .await
        .unwrap();

    assert_eq!(outcome.articles.len(), 1);
}

#[tokio::test]
#[traced_test]
async fn test_date_desc_requests_pub_date_sort() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("sort", "pub date"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(&["1", "2"], 2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "1,2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(efetch_xml(&["1", "2"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let outcome = client
        .search_and_fetch(&keywords(&["asthma"]), None, 10, &SortOrder::DateDesc)
        .await
        .unwrap();

    assert_eq!(outcome.articles[0].pmid, "1");
    assert_eq!(outcome.articles[1].pmid, "2");
}

#[tokio::test]
#[traced_test]
async fn test_date_asc_reverses_id_order_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("sort", "pub date"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(&["3", "2", "1"], 3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    // The fetch must be issued for the reversed id order.
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", "1,2,3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(efetch_xml(&["1", "2", "3"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let outcome = client
        .search_and_fetch(&keywords(&["asthma"]), None, 10, &SortOrder::DateAsc)
        .await
        .unwrap();

    assert_eq!(outcome.articles[0].pmid, "1");
    assert_eq!(outcome.articles[2].pmid, "3");
}

#[tokio::test]
#[traced_test]
async fn test_no_parameters_fails_without_network_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(&[], 0)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let result = client
        .search_and_fetch(&[], None, 10, &SortOrder::Relevance)
        .await;

    assert!(matches!(result, Err(EntrezError::InvalidQuery(_))));
    // MockServer verifies expect(0) on drop.
}

#[tokio::test]
#[traced_test]
async fn test_fetch_articles_with_empty_id_list_skips_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(efetch_xml(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());
    let articles = client.fetch_articles(&[]).await.unwrap();
    assert!(articles.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_esearch_error_field_surfaces_as_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"esearchresult": {"ERROR": "Empty term and query_key - nothing todo"}}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let result = client.search_ids("asthma", 10, None).await;
    assert!(matches!(result, Err(EntrezError::ApiError { .. })));
}
