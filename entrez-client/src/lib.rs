//! Async client for the NCBI Entrez E-utilities API.
//!
//! This crate provides a small, focused client for the PubMed and MeSH
//! databases: boolean query composition, ESearch/EFetch calls with
//! exponential-backoff retry, XML and text response parsing, and a
//! PICO (Population, Intervention, Comparison, Outcome) combinatorial
//! count flow used in evidence-based medicine.
//!
//! # Example
//!
//! ```no_run
//! use entrez_client::{EntrezClient, SortOrder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EntrezClient::new();
//!     let outcome = client
//!         .search_and_fetch(
//!             &["covid-19".to_string(), "sars-cov-2".to_string()],
//!             Some("BMJ"),
//!             10,
//!             &SortOrder::Relevance,
//!         )
//!         .await?;
//!
//!     println!(
//!         "Fetched {} of {} matching articles",
//!         outcome.articles.len(),
//!         outcome.total_count
//!     );
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod query;
pub(crate) mod responses;
pub mod retry;

pub use client::EntrezClient;
pub use config::ClientConfig;
pub use error::{EntrezError, Result};
pub use models::{
    PicoCombinations, PicoOutcome, PubMedArticle, SearchOutcome, SortOrder, TermCount,
};
pub use query::PicoQueries;
pub use retry::RetryConfig;
