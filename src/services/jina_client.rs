use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::search_result::{assign_ranks, SearchResult};
use crate::services::providers::{ScrapeProvider, SearchProvider};

/// Client for the Jina reader endpoints: `s.jina.ai` searches the web and
/// returns result objects with extracted content, `r.jina.ai` turns any
/// URL into clean page text.
pub struct JinaClient {
    client: Client,
    api_key: String,
    search_url: String,
    scrape_url: String,
}

#[derive(Deserialize)]
struct JinaSearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

impl JinaClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder().read_timeout(timeout).build().unwrap();

        JinaClient {
            client,
            api_key,
            search_url: "https://s.jina.ai".to_string(),
            scrape_url: "https://r.jina.ai".to_string(),
        }
    }
}

#[async_trait]
impl SearchProvider for JinaClient {
    fn name(&self) -> &'static str {
        "jina"
    }

    async fn search(&self, query: &str) -> anyhow::Result<Vec<SearchResult>> {
        let url = format!("{}/{}", self.search_url, query);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?;

        let body: JinaSearchResponse = response.json().await?;

        let mut results = body.results;
        assign_ranks(&mut results);

        log::info!("Jina returned {} results for query: {}", results.len(), query);
        Ok(results)
    }
}

#[async_trait]
impl ScrapeProvider for JinaClient {
    fn name(&self) -> &'static str {
        "jina"
    }

    async fn scrape(&self, url: &str) -> anyhow::Result<String> {
        let scrape_url = format!("{}/{}", self.scrape_url, url);

        let response = self
            .client
            .get(scrape_url)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?;

        let content = response.text().await?;
        log::info!("Jina scraped {} chars from {}", content.len(), url);
        Ok(content)
    }
}
