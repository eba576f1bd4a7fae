pub mod competitor;
pub mod keyword_metrics;
pub mod market_data;
pub mod opportunity;
pub mod search_result;
