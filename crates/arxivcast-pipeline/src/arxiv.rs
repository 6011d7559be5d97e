//! arXiv metadata fetch.
//!
//! Queries the arXiv export API for the most recently submitted papers in
//! one category and maps the Atom feed into `Paper` records. Every run
//! also persists the batch as a dated JSON document so downstream stages
//! stay debuggable after the fact.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use atom_syndication::{Entry, Feed};
use reqwest::Client;
use tracing::{debug, info};

use arxivcast_models::Paper;

use crate::error::{PipelineError, PipelineResult};

/// Source of paper metadata for a run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Fetch up to `max_results` most recently submitted papers in `category`.
    async fn fetch(&self, category: &str, max_results: usize) -> PipelineResult<Vec<Paper>>;
}

/// Client for the arXiv export API.
pub struct ArxivClient {
    base_url: String,
    client: Client,
}

impl ArxivClient {
    /// Create a new client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("arxivcast/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Build the query URL for one category, newest submissions first.
    fn query_url(&self, category: &str, max_results: usize) -> String {
        format!(
            "{}?search_query=cat:{}&sortBy=submittedDate&sortOrder=descending&start=0&max_results={}",
            self.base_url, category, max_results
        )
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn fetch(&self, category: &str, max_results: usize) -> PipelineResult<Vec<Paper>> {
        let url = self.query_url(category, max_results);
        debug!("Querying arXiv: {}", url);

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| PipelineError::fetch_failed(format!("arXiv API: {e}")))?
            .text()
            .await?;

        let feed = Feed::read_from(body.as_bytes())?;
        let papers: Vec<Paper> = feed.entries().iter().map(paper_from_entry).collect();

        info!("Fetched {} papers in {}", papers.len(), category);
        Ok(papers)
    }
}

/// Map one Atom entry to a `Paper`.
fn paper_from_entry(entry: &Entry) -> Paper {
    // Entry id is a URL like http://arxiv.org/abs/2608.01234v1
    let arxiv_id = entry
        .id()
        .rsplit('/')
        .next()
        .unwrap_or_else(|| entry.id())
        .to_string();

    let authors: Vec<String> = entry
        .authors()
        .iter()
        .map(|p| p.name().to_string())
        .collect();

    // The export feed does not carry affiliations through the Atom parser;
    // keep one (possibly empty) slot per author so templates line up.
    let affiliations = vec![String::new(); authors.len()];

    let pdf_url = entry
        .links()
        .iter()
        .find(|l| l.title() == Some("pdf"))
        .or_else(|| entry.links().iter().find(|l| l.rel() == "alternate"))
        .map(|l| l.href().to_string())
        .unwrap_or_default();

    let published = entry
        .published()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let updated = entry.updated().format("%Y-%m-%d").to_string();

    let categories: Vec<String> = entry
        .categories()
        .iter()
        .map(|c| c.term().to_string())
        .collect();
    let primary_category = categories.first().cloned().unwrap_or_default();

    Paper {
        title: normalize_whitespace(entry.title().as_str()),
        authors,
        affiliations,
        summary: entry
            .summary()
            .map(|s| normalize_whitespace(s.as_str()))
            .unwrap_or_default(),
        published,
        updated,
        arxiv_id,
        pdf_url,
        primary_category,
        categories,
    }
}

/// Collapse the feed's hard-wrapped text into single-space form.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Persist the fetched batch as the dated audit document.
///
/// Written even for an empty batch, so a no-op run still leaves a record of
/// what the feed returned.
pub async fn save_batch(papers: &[Paper], data_dir: &Path, date: &str) -> PipelineResult<PathBuf> {
    tokio::fs::create_dir_all(data_dir).await?;

    let path = data_dir.join(format!("arxiv_papers_{date}.json"));
    let json = serde_json::to_string_pretty(papers)?;
    tokio::fs::write(&path, json).await?;

    info!("Saved {} papers to {}", papers.len(), path.display());
    Ok(path)
}
