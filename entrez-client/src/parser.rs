//! Parsers for the E-utilities response formats: the EFetch article XML, the
//! ESearch id-list and count XML, and the MeSH text corpus.

use std::io::BufReader;
use std::sync::OnceLock;

use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use tracing::debug;

use crate::error::{EntrezError, Result};
use crate::models::{MAX_MESH_TERMS, NOT_AVAILABLE, PubMedArticle};

/// Accumulated state for the article currently being parsed.
///
/// Scalar fields are `Option` so the first matching element wins; absent
/// fields become the "N/A" sentinel when the record is built.
#[derive(Default)]
struct ArticleState {
    pmid: Option<String>,
    title: Option<String>,
    journal: Option<String>,
    volume: Option<String>,
    issue: Option<String>,
    pages: Option<String>,
    doi: Option<String>,
    year: Option<String>,
    month: Option<String>,
    day: Option<String>,
    abstract_parts: Vec<String>,
    authors: Vec<String>,
    mesh_terms: Vec<String>,
}

impl ArticleState {
    fn into_article(self) -> PubMedArticle {
        let sentinel = || NOT_AVAILABLE.to_string();

        let pmid = self.pmid.unwrap_or_else(sentinel);

        let date_parts: Vec<String> = [self.year, self.month, self.day]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        let pub_date = if date_parts.is_empty() {
            sentinel()
        } else {
            date_parts.join("-")
        };

        let abstract_text = if self.abstract_parts.is_empty() {
            sentinel()
        } else {
            self.abstract_parts.join(" ")
        };

        let mut mesh_terms = self.mesh_terms;
        mesh_terms.truncate(MAX_MESH_TERMS);

        PubMedArticle {
            link: format!("https://pubmed.ncbi.nlm.nih.gov/{}/", pmid),
            pmid,
            title: self.title.unwrap_or_else(sentinel),
            authors: self.authors,
            journal: self.journal.unwrap_or_else(sentinel),
            volume: self.volume.unwrap_or_else(sentinel),
            issue: self.issue.unwrap_or_else(sentinel),
            pages: self.pages.unwrap_or_else(sentinel),
            doi: self.doi.unwrap_or_else(sentinel),
            pub_date,
            abstract_text,
            mesh_terms,
        }
    }
}

/// Format the author display name from its components.
///
/// Prefers "Lastname Forename", falls back to "Lastname Initials", then to
/// the bare last name. Entries without a last name produce nothing.
fn format_author_name(last_name: &str, fore_name: &str, initials: &str) -> Option<String> {
    if last_name.is_empty() {
        return None;
    }
    if !fore_name.is_empty() {
        return Some(format!("{} {}", last_name, fore_name));
    }
    if !initials.is_empty() {
        return Some(format!("{} {}", last_name, initials));
    }
    Some(last_name.to_string())
}

/// Parse an EFetch XML document into normalized article records.
///
/// Pure and deterministic. Malformed XML fails the whole batch; missing
/// optional fields become sentinels, never errors.
pub fn parse_articles(xml: &str) -> Result<Vec<PubMedArticle>> {
    let mut reader = Reader::from_reader(BufReader::new(xml.as_bytes()));
    reader.config_mut().trim_text(true);

    let mut articles = Vec::new();
    let mut state = ArticleState::default();

    let mut buf = Vec::new();
    let mut in_article = false;
    let mut in_pmid = false;
    let mut in_article_title = false;
    let mut in_journal = false;
    let mut in_journal_title = false;
    let mut in_journal_issue = false;
    let mut in_volume = false;
    let mut in_issue = false;
    let mut in_pages = false;
    let mut in_doi = false;
    let mut in_pub_date = false;
    let mut in_year = false;
    let mut in_month = false;
    let mut in_day = false;

    // Abstract section state
    let mut in_abstract = false;
    let mut in_abstract_text = false;
    let mut current_abstract_label = String::new();
    let mut current_abstract_section = String::new();

    // Author state
    let mut in_author_list = false;
    let mut in_author = false;
    let mut in_last_name = false;
    let mut in_fore_name = false;
    let mut in_initials = false;
    let mut current_author_last = String::new();
    let mut current_author_fore = String::new();
    let mut current_author_initials = String::new();

    // MeSH state
    let mut in_mesh_heading = false;
    let mut in_descriptor = false;
    let mut current_descriptor = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"PubmedArticle" => {
                    in_article = true;
                    state = ArticleState::default();
                }
                b"PMID" if in_article && state.pmid.is_none() => {
                    state.pmid = Some(String::new());
                    in_pmid = true;
                }
                b"ArticleTitle" if in_article && state.title.is_none() => {
                    state.title = Some(String::new());
                    in_article_title = true;
                }
                b"Journal" if in_article => in_journal = true,
                b"Title" if in_journal && state.journal.is_none() => {
                    state.journal = Some(String::new());
                    in_journal_title = true;
                }
                b"JournalIssue" if in_journal => in_journal_issue = true,
                b"Volume" if in_journal_issue && state.volume.is_none() => {
                    state.volume = Some(String::new());
                    in_volume = true;
                }
                b"Issue" if in_journal_issue && state.issue.is_none() => {
                    state.issue = Some(String::new());
                    in_issue = true;
                }
                b"MedlinePgn" if in_article && state.pages.is_none() => {
                    state.pages = Some(String::new());
                    in_pages = true;
                }
                b"ELocationID" if in_article && state.doi.is_none() => {
                    let is_doi = e.attributes().flatten().any(|attr| {
                        attr.key.as_ref() == b"EIdType" && attr.value.as_ref() == b"doi"
                    });
                    if is_doi {
                        state.doi = Some(String::new());
                        in_doi = true;
                    }
                }
                b"PubDate" if in_article => in_pub_date = true,
                b"Year" if in_pub_date && state.year.is_none() => {
                    state.year = Some(String::new());
                    in_year = true;
                }
                b"Month" if in_pub_date && state.month.is_none() => {
                    state.month = Some(String::new());
                    in_month = true;
                }
                b"Day" if in_pub_date && state.day.is_none() => {
                    state.day = Some(String::new());
                    in_day = true;
                }
                b"Abstract" if in_article => in_abstract = true,
                b"AbstractText" if in_abstract => {
                    in_abstract_text = true;
                    current_abstract_section.clear();
                    current_abstract_label.clear();
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"Label" {
                            current_abstract_label = String::from_utf8_lossy(&attr.value).to_string();
                        }
                    }
                }
                b"AuthorList" if in_article => in_author_list = true,
                b"Author" if in_author_list => {
                    in_author = true;
                    current_author_last.clear();
                    current_author_fore.clear();
                    current_author_initials.clear();
                }
                b"LastName" if in_author => in_last_name = true,
                b"ForeName" if in_author => in_fore_name = true,
                b"Initials" if in_author => in_initials = true,
                b"MeshHeading" if in_article => in_mesh_heading = true,
                b"DescriptorName" if in_mesh_heading => {
                    in_descriptor = true;
                    current_descriptor.clear();
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"PubmedArticle" => {
                    if in_article {
                        articles.push(std::mem::take(&mut state).into_article());
                    }
                    in_article = false;
                }
                b"PMID" => in_pmid = false,
                b"ArticleTitle" => in_article_title = false,
                b"Journal" => in_journal = false,
                b"Title" => in_journal_title = false,
                b"JournalIssue" => in_journal_issue = false,
                b"Volume" => in_volume = false,
                b"Issue" => in_issue = false,
                b"MedlinePgn" => in_pages = false,
                b"ELocationID" => in_doi = false,
                b"PubDate" => in_pub_date = false,
                b"Year" => in_year = false,
                b"Month" => in_month = false,
                b"Day" => in_day = false,
                b"Abstract" => in_abstract = false,
                b"AbstractText" => {
                    if in_abstract_text {
                        let section = if current_abstract_label.is_empty() {
                            current_abstract_section.clone()
                        } else {
                            format!("{}: {}", current_abstract_label, current_abstract_section)
                        };
                        state.abstract_parts.push(section);
                    }
                    in_abstract_text = false;
                }
                b"AuthorList" => in_author_list = false,
                b"Author" => {
                    if in_author
                        && let Some(name) = format_author_name(
                            &current_author_last,
                            &current_author_fore,
                            &current_author_initials,
                        )
                    {
                        state.authors.push(name);
                    }
                    in_author = false;
                }
                b"LastName" => in_last_name = false,
                b"ForeName" => in_fore_name = false,
                b"Initials" => in_initials = false,
                b"MeshHeading" => in_mesh_heading = false,
                b"DescriptorName" => {
                    if in_descriptor && !current_descriptor.is_empty() {
                        state.mesh_terms.push(current_descriptor.clone());
                    }
                    in_descriptor = false;
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| EntrezError::XmlParseError {
                        message: format!("Failed to decode XML text: {}", err),
                    })?
                    .into_owned();

                if in_pmid {
                    append_to(&mut state.pmid, &text);
                } else if in_article_title {
                    append_to(&mut state.title, &text);
                } else if in_journal_title {
                    append_to(&mut state.journal, &text);
                } else if in_volume {
                    append_to(&mut state.volume, &text);
                } else if in_issue {
                    append_to(&mut state.issue, &text);
                } else if in_pages {
                    append_to(&mut state.pages, &text);
                } else if in_doi {
                    append_to(&mut state.doi, &text);
                } else if in_year {
                    append_to(&mut state.year, &text);
                } else if in_month {
                    append_to(&mut state.month, &text);
                } else if in_day {
                    append_to(&mut state.day, &text);
                } else if in_abstract_text {
                    current_abstract_section.push_str(&text);
                } else if in_last_name {
                    current_author_last.push_str(&text);
                } else if in_fore_name {
                    current_author_fore.push_str(&text);
                } else if in_initials {
                    current_author_initials.push_str(&text);
                } else if in_descriptor {
                    current_descriptor.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(EntrezError::XmlParseError {
                    message: format!("XML parsing error: {}", e),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    debug!(articles_parsed = articles.len(), "Completed EFetch XML parsing");

    Ok(articles)
}

fn append_to(field: &mut Option<String>, text: &str) {
    if let Some(value) = field.as_mut() {
        value.push_str(text);
    }
}

/// Collect the text of every `<Id>` element from an ESearch XML response.
pub fn parse_id_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(BufReader::new(xml.as_bytes()));
    reader.config_mut().trim_text(true);

    let mut ids = Vec::new();
    let mut buf = Vec::new();
    let mut in_id = false;
    let mut current = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"Id" => {
                in_id = true;
                current.clear();
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"Id" => {
                if in_id && !current.is_empty() {
                    ids.push(current.clone());
                }
                in_id = false;
            }
            Ok(Event::Text(e)) if in_id => {
                let text = e.unescape().map_err(|err| EntrezError::XmlParseError {
                    message: format!("Failed to decode XML text: {}", err),
                })?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(EntrezError::XmlParseError {
                    message: format!("XML parsing error: {}", e),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

fn mesh_term_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+: (.+)").expect("valid regex"))
}

fn mesh_entry_start_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+:").expect("valid regex"))
}

/// Extract canonical MeSH terms from the numbered-entry text corpus.
///
/// A line starting with `<number>:` opens a new entry; every following line
/// belongs to that entry until the next numbered line. Only the first line's
/// remainder is kept as the canonical term. Entries whose text does not
/// match the extraction pattern are silently dropped.
pub fn parse_mesh_terms(text: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();

    for line in text.split('\n') {
        if mesh_entry_start_pattern().is_match(line) {
            if !current.is_empty() {
                flush_mesh_entry(&current, &mut terms);
            }
            current = line.to_string();
        } else {
            current.push('\n');
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        flush_mesh_entry(&current, &mut terms);
    }

    terms
}

fn flush_mesh_entry(entry: &str, terms: &mut Vec<String>) {
    if let Some(caps) = mesh_term_pattern().captures(entry) {
        terms.push(caps[1].trim().to_string());
    }
}

/// Read the total hit count from a minimal ESearch XML document.
///
/// Only a `<Count>` element that is a direct child of the document root
/// qualifies; its absence is an explicit error, never a zero.
pub fn extract_count(xml: &str) -> Result<u64> {
    let mut reader = Reader::from_reader(BufReader::new(xml.as_bytes()));
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut in_count = false;
    let mut count_text: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if depth == 1 && count_text.is_none() && e.name().as_ref() == b"Count" {
                    in_count = true;
                    count_text = Some(String::new());
                }
                depth += 1;
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                in_count = false;
            }
            Ok(Event::Text(e)) if in_count => {
                let text = e.unescape().map_err(|err| EntrezError::XmlParseError {
                    message: format!("Failed to decode XML text: {}", err),
                })?;
                if let Some(value) = count_text.as_mut() {
                    value.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(EntrezError::XmlParseError {
                    message: format!("XML parsing error: {}", e),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    let text = count_text.ok_or(EntrezError::CountNotFound)?;
    text.trim()
        .parse::<u64>()
        .map_err(|_| EntrezError::XmlParseError {
            message: format!("Invalid Count value: {}", text),
        })
}
