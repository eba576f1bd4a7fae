use std::collections::HashMap;
use std::time::Duration;

use itertools::Itertools;

use crate::configuration::Settings;
use crate::domain::competitor::{
    analyze_page_content, classify_competitor, CompetitorIntel, CompetitorProfile,
};
use crate::domain::keyword_metrics::{estimate_keyword_metrics, Difficulty, SearchIntent};
use crate::domain::market_data::LiveMarketData;
use crate::domain::opportunity::{score_opportunity, MarketOpportunity, OpportunityPolicy};
use crate::domain::search_result::SearchResult;
use crate::services::google_search::GoogleSearch;
use crate::services::jina_client::JinaClient;
use crate::services::providers::{ScrapeProvider, SearchProvider};
use crate::services::research_cache::ResearchCache;

const TOP_COMPETITORS: usize = 10;
const TOP_TITLES: usize = 5;
const MAX_RELATED_KEYWORDS: usize = 10;

const URGENT_MODIFIERS: [&str; 5] = ["emergency", "24 hour", "same day", "urgent", "weekend"];
const TRUST_TERMS: [&str; 4] = ["licensed", "insured", "certified", "guarantee"];
const SERVICE_TERMS: [&str; 8] = [
    "repair",
    "service",
    "installation",
    "maintenance",
    "emergency",
    "licensed",
    "professional",
    "local",
];

/// Runs the research pipeline for one keyword + location and hands the
/// combined record to whoever asked. All collaborators are injected;
/// the coordinator holds no global state.
pub struct DataCoordinator {
    primary: Box<dyn SearchProvider>,
    fallback: Option<Box<dyn SearchProvider>>,
    scraper: Box<dyn ScrapeProvider>,
    cache: ResearchCache,
    policy: OpportunityPolicy,
}

impl DataCoordinator {
    pub fn new(
        primary: Box<dyn SearchProvider>,
        fallback: Option<Box<dyn SearchProvider>>,
        scraper: Box<dyn ScrapeProvider>,
        cache: ResearchCache,
        policy: OpportunityPolicy,
    ) -> Self {
        DataCoordinator {
            primary,
            fallback,
            scraper,
            cache,
            policy,
        }
    }

    /// The standard stack: Jina search and scraping, direct Google SERP
    /// scraping as the search fallback.
    pub fn from_settings(settings: &Settings) -> Self {
        let timeout = Duration::from_secs(settings.research.request_timeout_seconds);

        DataCoordinator::new(
            Box::new(JinaClient::new(settings.api_keys.jina.clone(), timeout)),
            Some(Box::new(GoogleSearch::new(timeout))),
            Box::new(JinaClient::new(settings.api_keys.jina.clone(), timeout)),
            ResearchCache::new(Duration::from_secs(settings.research.cache_ttl_seconds)),
            settings.policy.clone().into(),
        )
    }

    /// Gathers everything the agents need for one market. Never errors:
    /// a dead transport or a degraded stage leaves its fields at their
    /// defaults, and a record with an empty `serp_results` tells the
    /// caller no stage below it had anything to work with.
    pub async fn gather_live_data(&self, keyword: &str, location: &str) -> LiveMarketData {
        if let Some(cached) = self.cache.get(keyword, location) {
            log::info!("Cache hit for {} in {}", keyword, location);
            return cached;
        }

        log::info!("Gathering live data for: {} in {}", keyword, location);
        let mut market_data = LiveMarketData::new(keyword, location);

        // 1. SERP, with fallback provider
        let search_query = format!("{} {}", keyword, location);
        let serp_results = self.fetch_serp(&search_query).await;
        if serp_results.is_empty() {
            log::error!("No SERP data for: {}", search_query);
            return market_data;
        }
        market_data.serp_results = serp_results;
        market_data.competitor_urls = market_data
            .serp_results
            .iter()
            .take(TOP_COMPETITORS)
            .map(|r| r.url.clone())
            .collect();

        // 2. Classify competitors
        let profiles: Vec<CompetitorProfile> = market_data
            .serp_results
            .iter()
            .take(TOP_COMPETITORS)
            .map(|result| classify_competitor(result, keyword))
            .collect();
        for profile in profiles {
            match profile.is_weak {
                true => market_data.weak_competitors.push(profile.clone()),
                false => market_data.strong_competitors.push(profile.clone()),
            }
            market_data.competitor_data.push(profile);
        }

        // 3. Market gaps
        market_data.market_gaps = identify_market_gaps(&market_data.serp_results, location);

        // 4. Opportunity score + difficulty
        let location_missing = location_missing_from_titles(&market_data.serp_results, location);
        market_data.opportunity_score = compute_opportunity_score(
            market_data.weak_ratio(),
            market_data.market_gaps.len(),
            location_missing,
        );
        market_data.difficulty_level = Difficulty::from_weak_ratio(market_data.weak_ratio());

        // 5. Keyword estimates + related keywords
        let metrics = estimate_keyword_metrics(keyword, location, &market_data.serp_results);
        market_data.search_volume_estimate = metrics.search_volume;
        market_data.commercial_intent = matches!(
            metrics.intent,
            SearchIntent::Transactional | SearchIntent::Commercial
        );
        market_data.related_keywords = related_keywords(keyword, &market_data.serp_results);

        // 6. Content opportunities
        let (questions, content_gaps) =
            find_content_opportunities(keyword, &market_data.serp_results);
        market_data.questions_to_answer = questions;
        market_data.content_gaps = content_gaps;

        // 7. Technical factors
        let (mobile_friendly_ratio, schema_usage) =
            analyze_technical_factors(&market_data.serp_results);
        market_data.mobile_friendly_ratio = mobile_friendly_ratio;
        market_data.schema_usage = schema_usage;

        // 8. Revenue potential
        let (estimated_cpc, lead_value, monthly_revenue_potential) =
            revenue_potential(keyword, market_data.difficulty_level);
        market_data.estimated_cpc = estimated_cpc;
        market_data.lead_value = lead_value;
        market_data.monthly_revenue_potential = monthly_revenue_potential;

        log::info!(
            "Data gathering complete for {}. Opportunity score: {}",
            keyword,
            market_data.opportunity_score
        );
        self.cache.put(&market_data);
        market_data
    }

    /// Classifier -> estimator -> scorer over a fresh SERP: the unit of
    /// work behind every scanned keyword. An empty or failed SERP scores
    /// through as zeros and comes out a Skip.
    pub async fn analyze_opportunity(&self, keyword: &str, location: &str) -> MarketOpportunity {
        let serp = self.fetch_serp(&format!("{} {}", keyword, location)).await;
        if serp.is_empty() {
            log::error!("Scoring {} in {} with no SERP data", keyword, location);
        }

        let competitors: Vec<CompetitorProfile> = serp
            .iter()
            .take(TOP_COMPETITORS)
            .map(|result| classify_competitor(result, keyword))
            .collect();
        let metrics = estimate_keyword_metrics(keyword, location, &serp);

        score_opportunity(&metrics, &competitors, &self.policy)
    }

    /// Deep dive on a single ranking page.
    pub async fn analyze_competitor(&self, url: &str) -> CompetitorIntel {
        let content = match self.scraper.scrape(url).await {
            Ok(content) => content,
            Err(e) => {
                log::error!("{} scrape failed for {}: {:?}", self.scraper.name(), url, e);
                String::new()
            }
        };

        analyze_page_content(url, &content)
    }

    async fn fetch_serp(&self, query: &str) -> Vec<SearchResult> {
        match self.primary.search(query).await {
            Ok(results) if !results.is_empty() => return results,
            Ok(_) => log::error!("{} returned no results for: {}", self.primary.name(), query),
            Err(e) => log::error!("{} search failed for {}: {:?}", self.primary.name(), query, e),
        }

        match &self.fallback {
            Some(fallback) => match fallback.search(query).await {
                Ok(results) => results,
                Err(e) => {
                    log::error!("{} search failed for {}: {:?}", fallback.name(), query, e);
                    vec![]
                }
            },
            None => vec![],
        }
    }
}

/// Missing urgency pages, missing local optimization, missing trust
/// wording. Each hole in the top 5 is a page we can own.
fn identify_market_gaps(serp: &[SearchResult], location: &str) -> Vec<String> {
    let mut gaps = vec![];

    let top_titles: Vec<String> = serp
        .iter()
        .take(TOP_TITLES)
        .map(|r| r.title.to_lowercase())
        .collect();

    for modifier in URGENT_MODIFIERS {
        if !top_titles.iter().any(|title| title.contains(modifier)) {
            gaps.push(format!("No dedicated {} service pages in top 5", modifier));
        }
    }

    if location_missing_from_titles(serp, location) {
        gaps.push(format!("Weak local optimization for {}", location));
    }

    let trust_signal_present = serp
        .iter()
        .take(TOP_TITLES)
        .map(|r| r.snippet.to_lowercase())
        .any(|snippet| TRUST_TERMS.iter().any(|term| snippet.contains(term)));
    if !trust_signal_present {
        gaps.push("Missing trust signals in top results".to_string());
    }

    gaps
}

fn location_missing_from_titles(serp: &[SearchResult], location: &str) -> bool {
    let joined_titles = serp
        .iter()
        .take(TOP_TITLES)
        .map(|r| r.title.to_lowercase())
        .join(" ");

    !joined_titles.contains(&location.to_lowercase())
}

/// Weak competition dominates the score; each detected gap and a missing
/// local angle stack on top.
pub fn compute_opportunity_score(
    weak_ratio: f64,
    gap_count: usize,
    location_missing: bool,
) -> f64 {
    let mut score = weak_ratio * 40.0 + gap_count as f64 * 10.0;
    if location_missing {
        score += 20.0;
    }

    score.clamp(0.0, 100.0)
}

fn related_keywords(keyword: &str, serp: &[SearchResult]) -> Vec<String> {
    let all_text = serp
        .iter()
        .map(|r| format!("{} {}", r.title, r.snippet))
        .join(" ")
        .to_lowercase();
    let keyword_lower = keyword.to_lowercase();

    SERVICE_TERMS
        .iter()
        .filter(|term| all_text.contains(*term) && !keyword_lower.contains(*term))
        .map(|term| format!("{} {}", keyword, term))
        .take(MAX_RELATED_KEYWORDS)
        .collect()
}

fn find_content_opportunities(keyword: &str, serp: &[SearchResult]) -> (Vec<String>, Vec<String>) {
    let question_templates = [
        format!("How much does {} cost", keyword),
        format!("How long does {} take", keyword),
        format!("Do I need {}", keyword),
        format!("{} vs alternatives", keyword),
        format!("DIY {}", keyword),
    ];

    let snippets_text = serp
        .iter()
        .map(|r| r.snippet.to_lowercase())
        .join(" ");

    let questions_to_answer: Vec<String> = question_templates
        .into_iter()
        .filter(|question| !snippets_text.contains(&question.to_lowercase()))
        .collect();

    let mut content_gaps = vec![];
    if keyword.to_lowercase().contains("emergency") && !snippets_text.contains("emergency") {
        content_gaps.push("No emergency service content".to_string());
    }
    if !snippets_text.contains("price") && !snippets_text.contains("cost") {
        content_gaps.push("No pricing information".to_string());
    }
    if !snippets_text.contains("guarantee") {
        content_gaps.push("No service guarantees mentioned".to_string());
    }

    (questions_to_answer, content_gaps)
}

fn analyze_technical_factors(serp: &[SearchResult]) -> (f64, HashMap<String, usize>) {
    let mobile_count = serp
        .iter()
        .filter(|r| r.body().to_lowercase().contains("mobile"))
        .count();
    let mobile_friendly_ratio = match serp.is_empty() {
        true => 0.0,
        false => mobile_count as f64 / serp.len() as f64,
    };

    let schema_count = serp
        .iter()
        .filter(|r| {
            let text = format!("{} {}", r.title, r.body()).to_lowercase();
            ["rating", "review", "price"].iter().any(|term| text.contains(term))
        })
        .count();

    let mut schema_usage = HashMap::new();
    schema_usage.insert("LocalBusiness".to_string(), schema_count);

    (mobile_friendly_ratio, schema_usage)
}

/// CPC and lead value by vertical, scaled by how many leads a site in
/// this market can expect to capture per month.
fn revenue_potential(keyword: &str, difficulty: Difficulty) -> (f64, f64, f64) {
    let keyword = keyword.to_lowercase();

    let (estimated_cpc, lead_value) = if keyword.contains("emergency") {
        (25.0, 200.0)
    } else if keyword.contains("lawyer") || keyword.contains("attorney") {
        (50.0, 500.0)
    } else if keyword.contains("plumber") {
        (15.0, 150.0)
    } else {
        (10.0, 100.0)
    };

    let monthly_leads = match difficulty {
        Difficulty::Easy => 50.0,
        Difficulty::Medium => 30.0,
        Difficulty::Hard => 15.0,
    };

    (estimated_cpc, lead_value, monthly_leads * lead_value)
}
