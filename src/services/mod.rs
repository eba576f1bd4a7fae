pub mod agent_formatter;
pub mod data_coordinator;
pub mod google_search;
pub mod jina_client;
pub mod keyword_scanner;
pub mod providers;
pub mod research_cache;

pub use agent_formatter::*;
pub use data_coordinator::*;
pub use google_search::*;
pub use jina_client::*;
pub use keyword_scanner::*;
pub use providers::*;
pub use research_cache::*;
