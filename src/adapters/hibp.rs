use crate::config::BreachApiConfig;
use crate::domain::model::BreachName;
use crate::domain::ports::BreachLookup;
use crate::utils::error::{HimayaError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

const API_KEY_HEADER: &str = "hibp-api-key";

/// Client for the Have I Been Pwned v3 API.
#[derive(Debug, Clone)]
pub struct HibpClient {
    client: Client,
    base_url: Url,
    user_agent: String,
    api_key: Option<SecretString>,
}

impl HibpClient {
    pub fn new(config: &BreachApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            HimayaError::InvalidConfigValueError {
                field: "breach_api.base_url".to_string(),
                value: config.base_url.clone(),
                reason: format!("Invalid URL format: {}", e),
            }
        })?;

        if base_url.cannot_be_a_base() {
            return Err(HimayaError::InvalidConfigValueError {
                field: "breach_api.base_url".to_string(),
                value: config.base_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url,
            user_agent: config.user_agent.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent);

        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key.expose_secret()),
            None => request,
        }
    }

    /// Full breach catalogue (`GET /breaches`), used to build the lookup table.
    pub async fn all_breaches(&self) -> Result<Vec<serde_json::Value>> {
        let url = self.endpoint(&["breaches"]);
        tracing::debug!("Fetching breach catalogue from: {}", url);

        let response = self.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HimayaError::upstream(
                "breach API",
                format!("catalogue request returned {}", status),
            ));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl BreachLookup for HibpClient {
    async fn breached_account(&self, identifier: &str) -> Result<Vec<BreachName>> {
        let url = self.endpoint(&["breachedaccount", identifier]);
        let response = self.get(url).send().await?;

        let status = response.status();
        tracing::debug!("Breach API response status: {}", status);

        match status {
            // 查無資料時 API 回傳 404
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            s if s.is_success() => Ok(response.json().await?),
            s => {
                let detail = response.text().await.unwrap_or_default();
                Err(HimayaError::upstream(
                    "breach API",
                    format!("lookup returned {}: {}", s, detail.trim()),
                ))
            }
        }
    }
}
