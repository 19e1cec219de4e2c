//! Mocked tests for the two-step MeSH term lookup flow.

use entrez_client::{ClientConfig, EntrezClient};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(base_url: &str) -> EntrezClient {
    let config = ClientConfig::new()
        .with_base_url(base_url)
        .with_tool("test-client");
    EntrezClient::with_config(config)
}

const MESH_ID_XML: &str = r#"<eSearchResult>
    <Count>2</Count>
    <IdList>
        <Id>68001249</Id>
        <Id>68001991</Id>
    </IdList>
</eSearchResult>"#;

const MESH_TEXT: &str = "1: Asthma\nA form of bronchial disorder with three distinct components.\n\n2: Bronchial Spasm\nSpasmodic contraction of the smooth muscle of the bronchi.\n";

#[tokio::test]
#[traced_test]
async fn test_mesh_lookup_searches_then_fetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "mesh"))
        .and(query_param("term", "asthma"))
        .and(query_param("retmode", "xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MESH_ID_XML))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("db", "mesh"))
        .and(query_param("id", "68001249,68001991"))
        .and(query_param("retmode", "text"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MESH_TEXT))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let terms = client.get_mesh_terms("asthma").await.unwrap();
    assert_eq!(terms, vec!["Asthma", "Bronchial Spasm"]);
}

#[tokio::test]
#[traced_test]
async fn test_empty_id_list_short_circuits_without_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<eSearchResult><Count>0</Count><IdList/></eSearchResult>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server.uri());

    let terms = client.get_mesh_terms("xyzzy").await.unwrap();
    assert!(terms.is_empty());
}
