use serde::{Deserialize, Serialize};

use crate::domain::competitor::CompetitorProfile;
use crate::domain::keyword_metrics::{Difficulty, KeywordMetrics};

/// Assumed share of searchers who click through to a site ranking for
/// the keyword. Fixed across all keywords.
const CLICK_THROUGH_RATE: f64 = 0.10;

/// Dollar value of one converted call, keyed by the leading urgency
/// modifier of the keyword. Two-word modifiers are listed first so
/// "24 hour plumber" does not fall through to the default.
const LEAD_VALUES: [(&str, f64); 10] = [
    ("24 hour", 175.0),
    ("after hours", 130.0),
    ("same day", 120.0),
    ("open now", 90.0),
    ("emergency", 200.0),
    ("sunday", 160.0),
    ("weekend", 150.0),
    ("saturday", 140.0),
    ("today", 110.0),
    ("urgent", 100.0),
];

const DOMAIN_STOPWORDS: [&str; 5] = ["the", "in", "at", "near", "by"];

/// The "worth building" thresholds. The numbers are deliberately
/// configuration, not constants: different campaigns run different
/// floors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityPolicy {
    pub min_monthly_revenue: f64,
    pub max_days_to_rank: u32,
    pub default_lead_value: f64,
}

impl Default for OpportunityPolicy {
    fn default() -> Self {
        OpportunityPolicy {
            min_monthly_revenue: 1500.0,
            max_days_to_rank: 30,
            default_lead_value: 80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    BuildNow,
    Skip,
}

/// Advisory ordering for the build queue. Never part of the build/skip
/// decision itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildPriority {
    Urgent,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOpportunity {
    pub keyword: String,
    pub location: String,
    pub weak_competitors: usize,
    pub strong_competitors: usize,
    pub monthly_searches: u64,
    pub lead_value: f64,
    pub monthly_revenue: f64,
    pub days_to_rank: u32,
    pub difficulty: Difficulty,
    pub action: Action,
    pub build_priority: BuildPriority,
    pub domain_suggestion: String,
}

/// Turns keyword metrics plus the classified SERP into the final
/// build-or-skip record.
pub fn score_opportunity(
    metrics: &KeywordMetrics,
    competitors: &[CompetitorProfile],
    policy: &OpportunityPolicy,
) -> MarketOpportunity {
    let weak_competitors = competitors.iter().filter(|c| c.is_weak).count();
    let strong_competitors = competitors.len() - weak_competitors;

    let lead_value = lead_value_for_keyword(&metrics.keyword, policy);
    let monthly_revenue = (metrics.search_volume as f64 * CLICK_THROUGH_RATE * lead_value).round();
    let days_to_rank = days_to_rank(metrics.difficulty);

    let action = match monthly_revenue > policy.min_monthly_revenue
        && days_to_rank <= policy.max_days_to_rank
    {
        true => Action::BuildNow,
        false => Action::Skip,
    };

    MarketOpportunity {
        keyword: metrics.keyword.clone(),
        location: metrics.location.clone(),
        weak_competitors,
        strong_competitors,
        monthly_searches: metrics.search_volume,
        lead_value,
        monthly_revenue,
        days_to_rank,
        difficulty: metrics.difficulty,
        action,
        build_priority: build_priority(monthly_revenue, weak_competitors, days_to_rank),
        domain_suggestion: suggest_domain(&metrics.keyword, &metrics.location),
    }
}

/// Only the leading modifier counts: "weekend emergency plumber" is a
/// weekend keyword, whatever else it mentions.
pub fn lead_value_for_keyword(keyword: &str, policy: &OpportunityPolicy) -> f64 {
    let keyword = keyword.to_lowercase();

    LEAD_VALUES
        .iter()
        .find(|(modifier, _)| keyword.starts_with(modifier))
        .map(|(_, value)| *value)
        .unwrap_or(policy.default_lead_value)
}

pub fn days_to_rank(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 14,
        Difficulty::Medium => 30,
        Difficulty::Hard => 60,
    }
}

fn build_priority(
    monthly_revenue: f64,
    weak_competitors: usize,
    days_to_rank: u32,
) -> BuildPriority {
    if monthly_revenue > 3000.0 && weak_competitors >= 3 && days_to_rank <= 14 {
        BuildPriority::Urgent
    } else if monthly_revenue > 2000.0 && weak_competitors >= 2 {
        BuildPriority::High
    } else if monthly_revenue > 1000.0 {
        BuildPriority::Medium
    } else {
        BuildPriority::Low
    }
}

/// Deterministic domain slug: keyword tokens minus stopwords (first two
/// when three or more remain), the city token from the location, all
/// hyphen-joined with a .com suffix.
pub fn suggest_domain(keyword: &str, location: &str) -> String {
    let city = location
        .to_lowercase()
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .replace(' ', "-");

    let tokens: Vec<String> = keyword
        .to_lowercase()
        .split_whitespace()
        .filter(|t| !DOMAIN_STOPWORDS.contains(t))
        .map(|t| t.to_string())
        .collect();

    let keyword_part = match tokens.len() >= 3 {
        true => tokens[..2].join("-"),
        false => tokens.join("-"),
    };

    let mut parts = vec![];
    if !keyword_part.is_empty() {
        parts.push(keyword_part);
    }
    if !city.is_empty() {
        parts.push(city);
    }

    let mut domain = format!("{}.com", parts.join("-"));
    while domain.contains("--") {
        domain = domain.replace("--", "-");
    }
    domain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::competitor::CompetitorProfile;
    use crate::domain::keyword_metrics::{Difficulty, SearchIntent};

    fn metrics(keyword: &str, search_volume: u64, difficulty: Difficulty) -> KeywordMetrics {
        KeywordMetrics {
            keyword: keyword.to_string(),
            location: "Birmingham AL".to_string(),
            search_volume,
            competition_score: 0.2,
            difficulty,
            cpc_estimate: 19.0,
            intent: SearchIntent::Transactional,
            serp_features: Default::default(),
            opportunity_score: 60.0,
        }
    }

    fn competitor(rank: usize, is_weak: bool) -> CompetitorProfile {
        CompetitorProfile {
            rank,
            url: format!("https://site-{}.com", rank),
            title: "title".to_string(),
            snippet: "snippet".to_string(),
            weaknesses: match is_weak {
                true => vec!["Thin content".to_string()],
                false => vec![],
            },
            is_weak,
        }
    }

    #[test]
    fn lead_value_keyed_by_leading_modifier() {
        let policy = OpportunityPolicy::default();

        assert_eq!(lead_value_for_keyword("emergency plumber", &policy), 200.0);
        assert_eq!(lead_value_for_keyword("24 hour locksmith", &policy), 175.0);
        assert_eq!(lead_value_for_keyword("weekend electrician", &policy), 150.0);
        // No urgency modifier in front: default applies even when one
        // appears later in the keyword.
        assert_eq!(lead_value_for_keyword("plumber", &policy), 80.0);
        assert_eq!(lead_value_for_keyword("best emergency plumber", &policy), 80.0);
    }

    #[test]
    fn revenue_is_ten_percent_of_searches_times_lead_value() {
        let policy = OpportunityPolicy::default();
        let opportunity = score_opportunity(
            &metrics("emergency plumber", 1_000, Difficulty::Easy),
            &[],
            &policy,
        );

        assert_eq!(opportunity.monthly_revenue, 20_000.0);
        assert_eq!(opportunity.lead_value, 200.0);
    }

    #[test]
    fn days_to_rank_steps_with_difficulty() {
        assert_eq!(days_to_rank(Difficulty::Easy), 14);
        assert_eq!(days_to_rank(Difficulty::Medium), 30);
        assert_eq!(days_to_rank(Difficulty::Hard), 60);
    }

    #[test]
    fn build_now_requires_both_revenue_and_rank_time() {
        let policy = OpportunityPolicy::default();

        // Enough revenue, fast to rank.
        let build = score_opportunity(
            &metrics("emergency plumber", 1_000, Difficulty::Easy),
            &[],
            &policy,
        );
        assert_eq!(build.action, Action::BuildNow);

        // Enough revenue, too slow to rank.
        let slow = score_opportunity(
            &metrics("emergency plumber", 1_000, Difficulty::Hard),
            &[],
            &policy,
        );
        assert_eq!(slow.action, Action::Skip);

        // Fast to rank, not enough revenue: 50 * 0.1 * 200 = 1000 < 1500.
        let poor = score_opportunity(
            &metrics("emergency plumber", 50, Difficulty::Easy),
            &[],
            &policy,
        );
        assert_eq!(poor.action, Action::Skip);
    }

    #[test]
    fn decision_rule_holds_in_both_directions() {
        let policy = OpportunityPolicy::default();

        for volume in [0, 50, 100, 1_000, 10_000] {
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                let opportunity = score_opportunity(
                    &metrics("emergency plumber", volume, difficulty),
                    &[],
                    &policy,
                );

                let qualifies = opportunity.monthly_revenue > policy.min_monthly_revenue
                    && opportunity.days_to_rank <= policy.max_days_to_rank;
                assert_eq!(opportunity.action == Action::BuildNow, qualifies);
            }
        }
    }

    #[test]
    fn competitor_counts_partition_the_input() {
        let policy = OpportunityPolicy::default();
        let competitors = vec![
            competitor(1, true),
            competitor(2, false),
            competitor(3, true),
            competitor(4, false),
            competitor(5, false),
        ];
        let opportunity = score_opportunity(
            &metrics("emergency plumber", 1_000, Difficulty::Easy),
            &competitors,
            &policy,
        );

        assert_eq!(opportunity.weak_competitors, 2);
        assert_eq!(opportunity.strong_competitors, 3);
        assert_eq!(
            opportunity.weak_competitors + opportunity.strong_competitors,
            competitors.len()
        );
    }

    #[test]
    fn suggested_domain_drops_stopwords_and_caps_tokens() {
        assert_eq!(
            suggest_domain("weekend emergency plumber", "Birmingham, AL"),
            "weekend-emergency-birmingham.com"
        );
        assert_eq!(
            suggest_domain("plumber near the river", "Birmingham, AL"),
            "plumber-river-birmingham.com"
        );
        assert_eq!(
            suggest_domain("emergency plumber", "Birmingham AL"),
            "emergency-plumber-birmingham-al.com"
        );
    }

    #[test]
    fn suggested_domain_collapses_repeated_hyphens() {
        let domain = suggest_domain("emergency plumber", "Vestavia  Hills, AL");

        assert_eq!(domain, "emergency-plumber-vestavia-hills.com");
        assert!(!domain.contains("--"));
    }

    #[test]
    fn suggested_domain_survives_empty_inputs() {
        assert_eq!(suggest_domain("", "Birmingham, AL"), "birmingham.com");
        assert_eq!(suggest_domain("emergency plumber", ""), "emergency-plumber.com");
    }
}
