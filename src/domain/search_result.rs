use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    #[serde(default, alias = "description")]
    pub snippet: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub rank: usize,
}

impl SearchResult {
    pub fn new(rank: usize, url: &str, title: &str, snippet: &str) -> Self {
        SearchResult {
            url: url.to_string(),
            title: title.to_string(),
            snippet: snippet.to_string(),
            content: String::new(),
            rank,
        }
    }

    /// Longest text available for this result. Providers that return full
    /// page content fill `content`; SERP-only providers fill `snippet`.
    pub fn body(&self) -> &str {
        match self.content.is_empty() {
            true => &self.snippet,
            false => &self.content,
        }
    }

    pub fn host(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?;
        match host.strip_prefix("www.") {
            Some(h) => Some(h.to_lowercase()),
            None => Some(host.to_lowercase()),
        }
    }
}

/// Results come back from some providers without positions. Ranks are
/// 1-based, SERP order.
pub fn assign_ranks(results: &mut [SearchResult]) {
    for (i, result) in results.iter_mut().enumerate() {
        result.rank = i + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{assign_ranks, SearchResult};

    #[test]
    fn body_prefers_content_over_snippet() {
        let mut result = SearchResult::new(1, "https://example.com", "Title", "short snippet");
        assert_eq!(result.body(), "short snippet");

        result.content = "full page text".to_string();
        assert_eq!(result.body(), "full page text");
    }

    #[test]
    fn host_strips_www_and_lowercases() {
        let result = SearchResult::new(1, "https://www.Yelp.com/biz/some-plumber", "", "");
        assert_eq!(result.host(), Some("yelp.com".to_string()));

        let bad = SearchResult::new(2, "not a url", "", "");
        assert_eq!(bad.host(), None);
    }

    #[test]
    fn assign_ranks_is_one_based() {
        let mut results = vec![
            SearchResult::new(0, "https://a.com", "", ""),
            SearchResult::new(0, "https://b.com", "", ""),
        ];
        assign_ranks(&mut results);

        assert_eq!(results[0].rank, 1);
        assert_eq!(results[1].rank, 2);
    }

    #[test]
    fn deserializes_description_field_as_snippet() {
        let json = r#"{"url": "https://a.com", "title": "T", "description": "from the serp"}"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.snippet, "from the serp");
        assert_eq!(result.content, "");
        assert_eq!(result.rank, 0);
    }
}
