use async_trait::async_trait;

use crate::domain::search_result::SearchResult;

/// Ranked results for a query. Implementations must return an empty list
/// for a query with no results instead of erroring; errors are reserved
/// for transport failure.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str) -> anyhow::Result<Vec<SearchResult>>;
}

/// Extracted text for a URL. An empty string signals the page could not
/// be read.
#[async_trait]
pub trait ScrapeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn scrape(&self, url: &str) -> anyhow::Result<String>;
}
