use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::core::config::{Units, WeatherSettings};
use crate::core::errors::AgentError;

const PROVIDER: &str = "openweathermap";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can produce a raw weather payload for a city.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, city: &str) -> Result<Value, AgentError>;
}

/// Parameters of a single provider lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub city: String,
    pub units: Units,
    pub api_key: String,
}

impl WeatherQuery {
    /// Fails when no provider API key is configured.
    pub fn new(city: &str, settings: &WeatherSettings) -> Result<Self, AgentError> {
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AgentError::configuration("OPENWEATHER_API_KEY is not set."))?;

        Ok(Self {
            city: city.to_string(),
            units: settings.units,
            api_key: api_key.to_string(),
        })
    }

    fn params(&self) -> [(&'static str, &str); 3] {
        [
            ("q", self.city.as_str()),
            ("appid", self.api_key.as_str()),
            ("units", self.units.as_str()),
        ]
    }
}

/// OpenWeatherMap current-weather client.
#[derive(Clone)]
pub struct WeatherClient {
    settings: WeatherSettings,
    client: Client,
}

impl WeatherClient {
    pub fn new(settings: WeatherSettings) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AgentError::provider(PROVIDER, e))?;
        Ok(Self { settings, client })
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn fetch(&self, city: &str) -> Result<Value, AgentError> {
        let query = WeatherQuery::new(city, &self.settings)?;

        tracing::debug!("Fetching weather for {} ({})", query.city, query.units.as_str());

        let res = self
            .client
            .get(&self.settings.base_url)
            .query(&query.params())
            .send()
            .await
            .map_err(|e| AgentError::provider(PROVIDER, e))?;

        let status = res.status();
        if status.as_u16() != 200 {
            let text = res.text().await.unwrap_or_default();
            return Err(AgentError::provider_status(PROVIDER, status.as_u16(), text));
        }

        res.json::<Value>()
            .await
            .map_err(|e| AgentError::provider(PROVIDER, e))
    }
}
