use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::competitor::CompetitorProfile;
use crate::domain::keyword_metrics::Difficulty;
use crate::domain::search_result::SearchResult;

/// Everything the downstream agents need to know about one
/// keyword + location market, gathered in a single pass. Built fresh per
/// research call; callers own any caching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveMarketData {
    pub keyword: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,

    // Search results
    pub serp_results: Vec<SearchResult>,
    pub competitor_urls: Vec<String>,

    // Competitor analysis
    pub competitor_data: Vec<CompetitorProfile>,
    pub weak_competitors: Vec<CompetitorProfile>,
    pub strong_competitors: Vec<CompetitorProfile>,

    // Market insights
    pub market_gaps: Vec<String>,
    pub opportunity_score: f64,
    pub difficulty_level: Difficulty,

    // Keywords & SEO
    pub related_keywords: Vec<String>,
    pub search_volume_estimate: u64,
    pub commercial_intent: bool,

    // Content opportunities
    pub content_gaps: Vec<String>,
    pub questions_to_answer: Vec<String>,

    // Technical data
    pub mobile_friendly_ratio: f64,
    pub schema_usage: HashMap<String, usize>,

    // Revenue potential
    pub estimated_cpc: f64,
    pub lead_value: f64,
    pub monthly_revenue_potential: f64,
}

impl LiveMarketData {
    pub fn new(keyword: &str, location: &str) -> Self {
        LiveMarketData {
            keyword: keyword.to_string(),
            location: location.to_string(),
            timestamp: Utc::now(),
            serp_results: vec![],
            competitor_urls: vec![],
            competitor_data: vec![],
            weak_competitors: vec![],
            strong_competitors: vec![],
            market_gaps: vec![],
            opportunity_score: 0.0,
            difficulty_level: Difficulty::Medium,
            related_keywords: vec![],
            search_volume_estimate: 0,
            commercial_intent: true,
            content_gaps: vec![],
            questions_to_answer: vec![],
            mobile_friendly_ratio: 0.0,
            schema_usage: HashMap::new(),
            estimated_cpc: 0.0,
            lead_value: 0.0,
            monthly_revenue_potential: 0.0,
        }
    }

    /// Share of classified competitors that are weak. Zero on an empty
    /// SERP so downstream scores bottom out instead of dividing by zero.
    pub fn weak_ratio(&self) -> f64 {
        match self.serp_results.is_empty() {
            true => 0.0,
            false => self.weak_competitors.len() as f64 / self.serp_results.len() as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LiveMarketData;
    use crate::domain::search_result::SearchResult;

    #[test]
    fn fresh_record_has_zeroed_scores() {
        let data = LiveMarketData::new("emergency plumber", "Birmingham AL");

        assert_eq!(data.opportunity_score, 0.0);
        assert!(data.serp_results.is_empty());
        assert_eq!(data.weak_ratio(), 0.0);
    }

    #[test]
    fn weak_ratio_uses_serp_size() {
        let mut data = LiveMarketData::new("emergency plumber", "Birmingham AL");
        data.serp_results = (1..=4)
            .map(|i| SearchResult::new(i, &format!("https://site-{}.com", i), "t", "s"))
            .collect();
        data.weak_competitors = vec![
            crate::domain::competitor::CompetitorProfile {
                rank: 1,
                url: "https://site-1.com".to_string(),
                title: "t".to_string(),
                snippet: "s".to_string(),
                weaknesses: vec!["Thin content".to_string()],
                is_weak: true,
            };
            2
        ];

        assert_eq!(data.weak_ratio(), 0.5);
    }

    #[test]
    fn serializes_round_trip() {
        let data = LiveMarketData::new("emergency plumber", "Birmingham AL");
        let json = serde_json::to_string(&data).unwrap();
        let back: LiveMarketData = serde_json::from_str(&json).unwrap();

        assert_eq!(back, data);
    }
}
