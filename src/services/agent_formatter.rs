use serde_json::{json, Value};

use crate::domain::market_data::LiveMarketData;

/// Projects one gathered market record into the slice each downstream
/// agent consumes. Pure: same record in, same view out, the record is
/// never touched. Unknown agents get the whole record.
pub fn format_for_agent(agent_name: &str, market_data: &LiveMarketData) -> Value {
    match agent_name {
        "MarketScanner" => json!({
            "keyword": market_data.keyword,
            "location": market_data.location,
            "competitors": market_data.competitor_data,
            "opportunity_score": market_data.opportunity_score,
            "market_gaps": market_data.market_gaps,
        }),
        "SEOStrategist" => json!({
            "keyword": market_data.keyword,
            "related_keywords": market_data.related_keywords,
            "competitor_weaknesses": market_data
                .weak_competitors
                .iter()
                .map(|c| c.weaknesses.clone())
                .collect::<Vec<_>>(),
            "content_gaps": market_data.content_gaps,
            "difficulty": market_data.difficulty_level,
        }),
        "ContentGenerator" => json!({
            "keyword": market_data.keyword,
            "questions_to_answer": market_data.questions_to_answer,
            "content_gaps": market_data.content_gaps,
            "competitor_snippets": market_data
                .serp_results
                .iter()
                .take(5)
                .map(|r| r.snippet.clone())
                .collect::<Vec<_>>(),
        }),
        "WebsiteArchitect" => json!({
            "keyword": market_data.keyword,
            "location": market_data.location,
            "competitor_urls": market_data
                .competitor_urls
                .iter()
                .take(5)
                .collect::<Vec<_>>(),
            "mobile_priority": market_data.mobile_friendly_ratio < 0.5,
            "schema_needed": market_data
                .schema_usage
                .get("LocalBusiness")
                .copied()
                .unwrap_or(0)
                < 3,
        }),
        _ => serde_json::to_value(market_data).unwrap_or(Value::Null),
    }
}
