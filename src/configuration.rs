use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::opportunity::OpportunityPolicy;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub api_keys: ApiKeySettings,
    pub research: ResearchSettings,
    pub policy: PolicySettings,
}

#[derive(Deserialize, Clone)]
pub struct ApiKeySettings {
    pub jina: String,
}

#[derive(Deserialize, Clone)]
pub struct ResearchSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_seconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub cache_ttl_seconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_concurrent_scans: usize,
}

#[derive(Deserialize, Clone)]
pub struct PolicySettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub min_monthly_revenue: f64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_days_to_rank: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub default_lead_value: f64,
}

impl From<PolicySettings> for OpportunityPolicy {
    fn from(settings: PolicySettings) -> Self {
        OpportunityPolicy {
            min_monthly_revenue: settings.min_monthly_revenue,
            max_days_to_rank: settings.max_days_to_rank,
            default_lead_value: settings.default_lead_value,
        }
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
