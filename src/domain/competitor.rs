use regex::Regex;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::domain::search_result::SearchResult;

/// Directory and listing hosts that rank on volume, not on a dedicated
/// site. Any of these in the top 10 is a slot we can take.
pub const WEAK_DOMAINS: [&str; 11] = [
    "yelp.com",
    "yellowpages.com",
    "facebook.com",
    "nextdoor.com",
    "angi.com",
    "thumbtack.com",
    "manta.com",
    "citysearch.com",
    "superpages.com",
    "wordpress.com",
    "blogspot.",
];

const THIN_CONTENT_CHARS: usize = 500;
const SHORT_TITLE_CHARS: usize = 35;
const TITLE_MATCH_SIMILARITY: f64 = 0.85;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorProfile {
    pub rank: usize,
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub weaknesses: Vec<String>,
    pub is_weak: bool,
}

/// Labels one search result as a weak or strong competitor for the given
/// keyword. Every result gets exactly one of the two labels; anything with
/// a recorded weakness counts as weak.
pub fn classify_competitor(result: &SearchResult, keyword: &str) -> CompetitorProfile {
    let url = result.url.to_lowercase();
    let keyword = keyword.to_lowercase();

    let mut weaknesses: Vec<String> = vec![];

    match WEAK_DOMAINS.iter().any(|domain| url.contains(domain)) {
        true => weaknesses.push("Directory listing, not dedicated site".to_string()),
        false => {
            if result.body().len() < THIN_CONTENT_CHARS {
                weaknesses.push("Thin content".to_string());
            }
            if result.title.len() < SHORT_TITLE_CHARS
                && !title_matches_keyword(&result.title, &keyword)
            {
                weaknesses.push("Poor title optimization".to_string());
            }
            if !result.snippet.to_lowercase().contains(&keyword) {
                weaknesses.push("Weak keyword relevance".to_string());
            }
        }
    }

    CompetitorProfile {
        rank: result.rank,
        url,
        title: result.title.clone(),
        snippet: result.snippet.clone(),
        is_weak: !weaknesses.is_empty(),
        weaknesses,
    }
}

/// Exact containment first, fuzzy match second so "plumbers" still counts
/// for "plumber".
fn title_matches_keyword(title: &str, keyword: &str) -> bool {
    let title = title.to_lowercase();
    title.contains(keyword) || jaro_winkler(&title, keyword) >= TITLE_MATCH_SIMILARITY
}

/// Intelligence pulled out of a scraped competitor page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorIntel {
    pub url: String,
    pub content_length: usize,
    pub word_count: usize,
    pub phone_numbers: Vec<String>,
    pub has_emergency_keywords: bool,
    pub has_weekend_keywords: bool,
    pub mentions_pricing: bool,
    pub has_testimonials: bool,
    pub weaknesses: Vec<String>,
    pub content_gaps: Vec<String>,
}

pub fn analyze_page_content(url: &str, content: &str) -> CompetitorIntel {
    let lower = content.to_lowercase();

    CompetitorIntel {
        url: url.to_string(),
        content_length: content.len(),
        word_count: content.split_whitespace().count(),
        phone_numbers: extract_phone_numbers(content),
        has_emergency_keywords: ["emergency", "24 hour", "urgent", "same day"]
            .iter()
            .any(|kw| lower.contains(kw)),
        has_weekend_keywords: ["weekend", "saturday", "sunday"]
            .iter()
            .any(|kw| lower.contains(kw)),
        mentions_pricing: content.contains('$') || lower.contains("price"),
        has_testimonials: ["review", "testimonial", "customer"]
            .iter()
            .any(|kw| lower.contains(kw)),
        weaknesses: identify_page_weaknesses(content, &lower),
        content_gaps: find_page_content_gaps(content, &lower),
    }
}

fn identify_page_weaknesses(content: &str, lower: &str) -> Vec<String> {
    let mut weaknesses = vec![];

    if content.len() < 500 {
        weaknesses.push("Very thin content - easy to outrank".to_string());
    } else if content.len() < 1000 {
        weaknesses.push("Thin content - can be beaten with comprehensive page".to_string());
    }

    if !lower.contains("emergency") {
        weaknesses.push("No emergency service mentioned".to_string());
    }
    if !["saturday", "sunday", "weekend"].iter().any(|d| lower.contains(d)) {
        weaknesses.push("No weekend availability mentioned".to_string());
    }
    if !["license", "insured", "certified"].iter().any(|w| lower.contains(w)) {
        weaknesses.push("No licensing/insurance mentioned".to_string());
    }
    if !content.contains('$') && !lower.contains("price") {
        weaknesses.push("No pricing transparency".to_string());
    }
    if !lower.contains("near me") {
        weaknesses.push("Not optimized for 'near me' searches".to_string());
    }
    if !["review", "testimonial", "customer"].iter().any(|w| lower.contains(w)) {
        weaknesses.push("No social proof/reviews".to_string());
    }

    weaknesses
}

fn find_page_content_gaps(content: &str, lower: &str) -> Vec<String> {
    let mut gaps = vec![];

    if !lower.contains("emergency") {
        gaps.push("No emergency service page".to_string());
    }
    if !lower.contains("pricing") && !lower.contains("cost") {
        gaps.push("No pricing/cost information".to_string());
    }
    if !lower.contains("service area") {
        gaps.push("No clear service area page".to_string());
    }
    if extract_phone_numbers(content).is_empty() {
        gaps.push("No phone number prominently displayed".to_string());
    }
    if !lower.contains("faq") && !lower.contains("question") {
        gaps.push("No FAQ section".to_string());
    }

    gaps
}

fn extract_phone_numbers(content: &str) -> Vec<String> {
    let pattern = Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap();

    let mut phones: Vec<String> = vec![];
    for found in pattern.find_iter(content) {
        let phone = found.as_str().to_string();
        if !phones.contains(&phone) {
            phones.push(phone);
        }
        if phones.len() == 3 {
            break;
        }
    }

    phones
}
