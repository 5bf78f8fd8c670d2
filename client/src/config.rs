use anyhow::anyhow;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;

/// Runtime configuration for the API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub api_timeout_secs: u64,
    /// Bearer token for the authenticated session, when already known.
    pub auth_token: Option<String>,
    /// Business timezone used for "today" in lead-time prechecks.
    pub time_zone: Tz,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000/api".to_string());

        let api_timeout_secs = env::var("API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let auth_token = env::var("API_AUTH_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let time_zone_name = env::var("APP_TIMEZONE").unwrap_or_else(|_| "Asia/Jakarta".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", time_zone_name))?;

        Ok(Config {
            api_base_url,
            api_timeout_secs,
            auth_token,
            time_zone,
        })
    }

    /// Current date in the configured business timezone.
    pub fn today(&self) -> NaiveDate {
        chrono::Utc::now().with_timezone(&self.time_zone).date_naive()
    }
}
