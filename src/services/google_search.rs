use std::time::Duration;

use async_trait::async_trait;
use fake_user_agent::get_rua;
use rand::Rng;
use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

use crate::domain::search_result::SearchResult;
use crate::services::providers::SearchProvider;

const NUM_CAPTCHA_RETRIES: u8 = 3; // Should be > 0
const GOOGLE_URL: &str = "https://www.google.com/search";

/// Hosts Google links to from its own chrome; never competitor results.
const GOOGLE_INTERNAL_HOSTS: [&str; 4] = [
    "support.google.com",
    "www.google.com",
    "accounts.google.com",
    "policies.google.com",
];

#[derive(Serialize)]
struct GoogleQuery {
    q: String,
}

enum GooglePageOutcome {
    NotFound,
    CaptchaBlocked,
    Results(Vec<SearchResult>),
}

/// Fallback SERP source: fetches the Google results page directly and
/// parses it. Coarser than an API provider (title-only snippets) but
/// keeps research alive when the primary is down.
pub struct GoogleSearch {
    timeout: Duration,
}

impl GoogleSearch {
    pub fn new(timeout: Duration) -> Self {
        GoogleSearch { timeout }
    }

    async fn fetch_results_page(&self, query: &str) -> anyhow::Result<GooglePageOutcome> {
        let client = reqwest::Client::builder()
            .user_agent(get_rua())
            .cookie_store(true)
            .read_timeout(self.timeout)
            .build()?;

        let response = client
            .get(GOOGLE_URL)
            .query(&GoogleQuery { q: query.to_string() })
            .send()
            .await?;

        let html_content = response.text().await?;
        Ok(parse_results_page(&html_content))
    }
}

#[async_trait]
impl SearchProvider for GoogleSearch {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn search(&self, query: &str) -> anyhow::Result<Vec<SearchResult>> {
        let mut retry_count = 0;

        while retry_count < NUM_CAPTCHA_RETRIES {
            match self.fetch_results_page(query).await {
                Ok(GooglePageOutcome::Results(results)) => {
                    log::info!("Found {} results on query: {}", results.len(), query);
                    return Ok(results);
                }
                Ok(GooglePageOutcome::NotFound) => {
                    log::error!("Found no results on query: {}", query);
                    return Ok(vec![]);
                }
                Ok(GooglePageOutcome::CaptchaBlocked) => {
                    log::error!("Blocked by captcha on query: {}", query);
                    retry_count += 1;
                    backoff().await;
                }
                Err(e) => {
                    log::error!("No response from reqwest, error: {:?}", e);
                    retry_count += 1;
                    backoff().await;
                }
            }
        }

        anyhow::bail!("Captcha blocked after {} retries on query: {}", NUM_CAPTCHA_RETRIES, query)
    }
}

/// Jittered pause before the next identity; retrying immediately keeps
/// the same block.
async fn backoff() {
    let wait_ms = rand::thread_rng().gen_range(500..2_000);
    tokio::time::sleep(Duration::from_millis(wait_ms)).await;
}

fn parse_results_page(html_content: &str) -> GooglePageOutcome {
    let a_tag_selector = Selector::parse("a").unwrap();
    let h3_selector = Selector::parse("h3").unwrap();

    let html_document = Html::parse_document(html_content);

    let headings: Vec<String> = html_document
        .select(&h3_selector)
        .map(|tag| tag.text().collect())
        .collect();

    if headings.is_empty() {
        return match html_content.contains("did not match any documents") {
            true => GooglePageOutcome::NotFound,
            false => GooglePageOutcome::CaptchaBlocked,
        };
    }

    let mut results: Vec<SearchResult> = vec![];

    for a_tag in html_document.select(&a_tag_selector) {
        let href = match a_tag.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        let title: String = match a_tag.select(&h3_selector).next() {
            Some(h3_tag) => h3_tag.text().collect(),
            None => continue,
        };

        if let Some(url) = extract_result_url(href) {
            results.push(SearchResult::new(results.len() + 1, &url, &title, ""));
        }
    }

    GooglePageOutcome::Results(results)
}

/// Google wraps organic links as `/url?q=<target>&...`; direct links show
/// up too. Anything pointing back into Google is chrome, not a result.
fn extract_result_url(href: &str) -> Option<String> {
    let href = match href.strip_prefix("/url?q=") {
        Some(rest) => rest.split('&').next().unwrap_or(rest),
        None => href,
    };

    let parsed = Url::parse(href).ok()?;
    match parsed.host_str() {
        Some("") | None => None,
        Some(host) => {
            if GOOGLE_INTERNAL_HOSTS.contains(&host) || host.contains("google.com") {
                None
            } else {
                Some(href.to_string())
            }
        }
    }
}
