use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::search_result::SearchResult;

const COMMERCIAL_TERMS: [&str; 5] = ["buy", "price", "cost", "cheap", "best"];
const LOCAL_TOKENS: [&str; 2] = ["in", "at"];

/// Domains that make a SERP slot hard to take.
const AUTHORITY_DOMAINS: [&str; 7] = [
    ".gov",
    ".edu",
    "wikipedia.org",
    "webmd.com",
    "healthline.com",
    "mayoclinic.org",
    "nih.gov",
];

/// Domains that hold a slot loosely: forums, Q&A, wikis.
const PUSHOVER_DOMAINS: [&str; 6] = [
    "reddit.com",
    "quora.com",
    "stackexchange.com",
    "answers.yahoo.com",
    "forum",
    "wiki",
];

/// Keywords in these verticals carry premium click prices.
const HIGH_VALUE_VERTICALS: [&str; 16] = [
    "lawyer",
    "attorney",
    "legal",
    "dentist",
    "dental",
    "doctor",
    "medical",
    "surgeon",
    "plumber",
    "plumbing",
    "electrician",
    "hvac",
    "roofing",
    "roofer",
    "locksmith",
    "contractor",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Tier from the position-weighted competition score.
    pub fn from_competition(competition_score: f64) -> Self {
        if competition_score < 0.3 {
            Difficulty::Easy
        } else if competition_score < 0.6 {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }

    /// Tier from the share of weak competitors on the SERP. More weak
    /// slots means an easier market.
    pub fn from_weak_ratio(weak_ratio: f64) -> Self {
        if weak_ratio > 0.5 {
            Difficulty::Easy
        } else if weak_ratio > 0.3 {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchIntent {
    Transactional,
    Informational,
    Navigational,
    Commercial,
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMetrics {
    pub keyword: String,
    pub location: String,
    pub search_volume: u64,
    pub competition_score: f64,
    pub difficulty: Difficulty,
    pub cpc_estimate: f64,
    pub intent: SearchIntent,
    pub serp_features: BTreeSet<String>,
    pub opportunity_score: f64,
}

/// Derives demand/competition estimates for a keyword from the shape of
/// the keyword itself and its SERP. These are heuristics, not measured
/// data; they only need to rank keywords against each other.
pub fn estimate_keyword_metrics(
    keyword: &str,
    location: &str,
    serp: &[SearchResult],
) -> KeywordMetrics {
    let search_volume = estimate_search_volume(keyword, serp.len());
    let competition_score = estimate_competition(serp);

    KeywordMetrics {
        keyword: keyword.to_string(),
        location: location.to_string(),
        search_volume,
        competition_score,
        difficulty: Difficulty::from_competition(competition_score),
        cpc_estimate: estimate_cpc(keyword),
        intent: classify_intent(keyword),
        serp_features: detect_serp_features(serp),
        opportunity_score: opportunity_score(search_volume, competition_score),
    }
}

/// Volume by keyword shape: short heads are searched far more than
/// long tails, commercial wording widens the pool, local qualifiers
/// narrow it.
pub fn estimate_search_volume(keyword: &str, result_count: usize) -> u64 {
    let keyword = keyword.to_lowercase();
    let tokens: Vec<&str> = keyword.split_whitespace().collect();

    let base: f64 = match tokens.len() {
        0 => 0.0,
        1 => 10_000.0,
        2 => 1_000.0,
        3 => 500.0,
        _ => 100.0,
    };

    let mut volume = base;
    if result_count >= 10 {
        volume *= 1.5;
    }
    if COMMERCIAL_TERMS.iter().any(|term| tokens.contains(term)) {
        volume *= 2.0;
    }
    if keyword.contains("near me") || LOCAL_TOKENS.iter().any(|t| tokens.contains(t)) {
        volume *= 0.3;
    }

    volume.round() as u64
}

/// Position-weighted competition signal over the top 10: authority
/// domains push the score up, forum/Q&A slots pull it down.
pub fn estimate_competition(serp: &[SearchResult]) -> f64 {
    let mut strong = 0.0;
    let mut weak = 0.0;

    for result in serp.iter().filter(|r| r.rank >= 1 && r.rank <= 10) {
        let url = result.url.to_lowercase();
        let position_weight = (10 - result.rank) as f64;

        if AUTHORITY_DOMAINS.iter().any(|domain| url.contains(domain)) {
            strong += position_weight;
        }
        if PUSHOVER_DOMAINS.iter().any(|domain| url.contains(domain)) {
            weak += position_weight;
        }
    }

    (strong - weak) / 100.0
}

pub fn estimate_cpc(keyword: &str) -> f64 {
    let keyword = keyword.to_lowercase();
    let word_count = keyword.split_whitespace().count() as f64;

    match HIGH_VALUE_VERTICALS.iter().any(|v| keyword.contains(v)) {
        true => 15.0 + 2.0 * word_count,
        false => 2.0 + 0.5 * word_count,
    }
}

/// First matching category wins; the order matters because keywords mix
/// terms ("best emergency plumber" is transactional before it is
/// commercial).
pub fn classify_intent(keyword: &str) -> SearchIntent {
    let keyword = keyword.to_lowercase();

    let transactional = [
        "buy", "hire", "book", "quote", "emergency", "repair", "fix", "install", "near me",
    ];
    let informational = ["how", "what", "why", "when", "guide", "tips", "diy"];
    let navigational = ["login", "website", "official", "hours", "address", "directions"];
    let commercial = ["best", "top", "review", "compare", "cheap", "affordable", "price", "cost"];

    if transactional.iter().any(|t| keyword.contains(t)) {
        SearchIntent::Transactional
    } else if informational.iter().any(|t| keyword.contains(t)) {
        SearchIntent::Informational
    } else if navigational.iter().any(|t| keyword.contains(t)) {
        SearchIntent::Navigational
    } else if commercial.iter().any(|t| keyword.contains(t)) {
        SearchIntent::Commercial
    } else {
        SearchIntent::Mixed
    }
}

fn detect_serp_features(serp: &[SearchResult]) -> BTreeSet<String> {
    let mut features = BTreeSet::new();

    let question_titles = serp
        .iter()
        .filter(|r| {
            let title = r.title.to_lowercase();
            ["how ", "what ", "why "].iter().any(|q| title.starts_with(q))
        })
        .count();
    if question_titles >= 2 {
        features.insert("people_also_ask".to_string());
    }

    if serp.iter().any(|r| {
        let body = r.body().to_lowercase();
        body.contains("review") || body.contains("rating")
    }) {
        features.insert("reviews".to_string());
    }

    if serp.iter().any(|r| r.body().contains('$')) {
        features.insert("pricing".to_string());
    }

    if serp.iter().any(|r| r.url.to_lowercase().contains("google.com/maps")) {
        features.insert("local_pack".to_string());
    }

    features
}

/// Demand contributes up to 50 points, inverse competition up to 50.
/// Clamped on both ends: a negative competition score must not push the
/// total past 100.
pub fn opportunity_score(search_volume: u64, competition_score: f64) -> f64 {
    let volume_points = (search_volume as f64 / 100.0).min(50.0);
    let competition_points = ((1.0 - competition_score) * 50.0).clamp(0.0, 50.0);

    (volume_points + competition_points).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search_result::SearchResult;

    #[test]
    fn single_generic_word_with_empty_serp_gets_base_volume() {
        assert_eq!(estimate_search_volume("plumber", 0), 10_000);
    }

    #[test]
    fn volume_scales_down_with_token_count() {
        assert_eq!(estimate_search_volume("emergency plumber", 0), 1_000);
        assert_eq!(estimate_search_volume("emergency plumber birmingham", 0), 500);
        assert_eq!(
            estimate_search_volume("emergency plumber birmingham alabama usa", 0),
            100
        );
    }

    #[test]
    fn volume_multipliers_apply() {
        // Full SERP bumps the estimate.
        assert_eq!(estimate_search_volume("plumber", 10), 15_000);
        // Commercial term doubles it.
        assert_eq!(estimate_search_volume("best plumber", 0), 2_000);
        // Local intent shrinks it.
        assert_eq!(estimate_search_volume("plumber in birmingham", 0), 150);
        assert_eq!(estimate_search_volume("plumber near me", 0), 150);
    }

    #[test]
    fn empty_keyword_has_zero_volume() {
        assert_eq!(estimate_search_volume("", 10), 0);
    }

    #[test]
    fn authority_heavy_serp_scores_high_competition() {
        let serp = vec![
            SearchResult::new(1, "https://www.cdc.gov/page", "t", "s"),
            SearchResult::new(2, "https://en.wikipedia.org/wiki/Plumbing", "t", "s"),
        ];
        let score = estimate_competition(&serp);
        assert!((score - 0.17).abs() < 1e-9);
    }

    #[test]
    fn forum_heavy_serp_scores_negative_competition() {
        let serp = vec![
            SearchResult::new(1, "https://www.reddit.com/r/plumbing", "t", "s"),
            SearchResult::new(2, "https://www.quora.com/some-question", "t", "s"),
        ];
        assert!(estimate_competition(&serp) < 0.0);
    }

    #[test]
    fn negative_competition_does_not_break_score_bounds() {
        // Inverse competition is capped at 50 points even when the
        // competition score goes negative.
        let score = opportunity_score(100_000, -0.8);
        assert_eq!(score, 100.0);
        assert!(score <= 100.0);

        let floor = opportunity_score(0, 3.0);
        assert_eq!(floor, 0.0);
    }

    #[test]
    fn difficulty_tiers_from_competition() {
        assert_eq!(Difficulty::from_competition(0.1), Difficulty::Easy);
        assert_eq!(Difficulty::from_competition(0.45), Difficulty::Medium);
        assert_eq!(Difficulty::from_competition(0.9), Difficulty::Hard);
    }

    #[test]
    fn difficulty_tiers_from_weak_ratio() {
        assert_eq!(Difficulty::from_weak_ratio(0.6), Difficulty::Easy);
        assert_eq!(Difficulty::from_weak_ratio(0.4), Difficulty::Medium);
        assert_eq!(Difficulty::from_weak_ratio(0.2), Difficulty::Hard);
        // Exactly 0.5 is not "more than half weak".
        assert_eq!(Difficulty::from_weak_ratio(0.5), Difficulty::Medium);
    }

    #[test]
    fn cpc_by_vertical() {
        assert_eq!(estimate_cpc("emergency plumber"), 19.0);
        assert_eq!(estimate_cpc("divorce lawyer birmingham"), 21.0);
        assert_eq!(estimate_cpc("dog walking"), 3.0);
    }

    #[test]
    fn intent_order_resolves_overlaps() {
        assert_eq!(classify_intent("emergency plumber"), SearchIntent::Transactional);
        // "repair" beats the trailing commercial "cost".
        assert_eq!(classify_intent("plumber repair cost"), SearchIntent::Transactional);
        assert_eq!(classify_intent("best emergency plumber"), SearchIntent::Transactional);
        assert_eq!(classify_intent("how to unclog a drain"), SearchIntent::Informational);
        assert_eq!(classify_intent("acme plumbing hours"), SearchIntent::Navigational);
        assert_eq!(classify_intent("cheapest plumbers compared"), SearchIntent::Commercial);
        assert_eq!(classify_intent("plumber"), SearchIntent::Mixed);
    }

    #[test]
    fn full_estimate_holds_invariants() {
        let serp: Vec<SearchResult> = (1..=10)
            .map(|i| {
                SearchResult::new(
                    i,
                    &format!("https://www.reddit.com/r/diy/{}", i),
                    "thread",
                    "snippet",
                )
            })
            .collect();

        let metrics = estimate_keyword_metrics("plumber", "Birmingham AL", &serp);

        assert!(metrics.opportunity_score >= 0.0);
        assert!(metrics.opportunity_score <= 100.0);
        assert_eq!(metrics.difficulty, Difficulty::Easy);
        assert_eq!(metrics.search_volume, 15_000);
    }
}
