use serde::Deserialize;

use crate::{
    db::DataSource,
    models::{RankingMode, TimeContext},
    report::OutputFormat,
    services::RunParameters,
};

/// Runner configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite URL of the order-history database
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Product to recommend against
    pub product_name: String,

    /// Day of week, 0 = Sunday
    #[serde(default)]
    pub day_of_week: u8,

    /// Hour of day, 0 = midnight
    #[serde(default = "default_hour_of_day")]
    pub hour_of_day: u8,

    /// Number of recommendations per recommender
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Rank by share of the product's overall purchases instead of raw count
    #[serde(default = "default_proportional")]
    pub proportional: bool,

    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_database_url() -> String {
    "sqlite://instacart.db".to_string()
}

fn default_hour_of_day() -> u8 {
    8
}

fn default_top_n() -> usize {
    crate::models::query::DEFAULT_TOP_N
}

fn default_proportional() -> bool {
    true
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn data_source(&self) -> anyhow::Result<DataSource> {
        Ok(DataSource::from_url(&self.database_url)?)
    }

    pub fn run_parameters(&self) -> anyhow::Result<RunParameters> {
        let time = TimeContext::new(self.day_of_week, self.hour_of_day)?;
        Ok(RunParameters {
            product_name: self.product_name.clone(),
            time,
            top_n: self.top_n,
            ranking: RankingMode::from_proportional(self.proportional),
        })
    }
}
