use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::domain::market_data::LiveMarketData;

/// In-process store for gathered market data. Research for one
/// keyword + location is expensive (multiple network round trips), so
/// repeat requests inside the TTL get the stored record verbatim.
pub struct ResearchCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    stored_at: Instant,
    data: LiveMarketData,
}

impl ResearchCache {
    pub fn new(ttl: Duration) -> Self {
        ResearchCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn key(keyword: &str, location: &str) -> String {
        format!(
            "{}:{}",
            keyword.trim().to_lowercase(),
            location.trim().to_lowercase()
        )
    }

    pub fn get(&self, keyword: &str, location: &str) -> Option<LiveMarketData> {
        let key = Self::key(keyword, location);
        let mut entries = self.entries.lock().unwrap();

        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.data.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, data: &LiveMarketData) {
        let key = Self::key(&data.keyword, &data.location);
        let mut entries = self.entries.lock().unwrap();

        entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                data: data.clone(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ResearchCache;
    use crate::domain::market_data::LiveMarketData;

    #[test]
    fn stores_and_returns_records() {
        let cache = ResearchCache::new(Duration::from_secs(7200));
        let data = LiveMarketData::new("emergency plumber", "Birmingham AL");

        cache.put(&data);
        let hit = cache.get("emergency plumber", "Birmingham AL").unwrap();

        assert_eq!(hit, data);
    }

    #[test]
    fn keys_are_normalized() {
        let cache = ResearchCache::new(Duration::from_secs(7200));
        let data = LiveMarketData::new("Emergency Plumber", "Birmingham AL");

        cache.put(&data);

        assert!(cache.get("  emergency plumber ", "birmingham al").is_some());
        assert!(cache.get("weekend plumber", "birmingham al").is_none());
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = ResearchCache::new(Duration::from_secs(0));
        let data = LiveMarketData::new("emergency plumber", "Birmingham AL");

        cache.put(&data);

        assert!(cache.get("emergency plumber", "Birmingham AL").is_none());
    }
}
