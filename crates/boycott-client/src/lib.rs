use async_trait::async_trait;
use screening_core::{BoycottRegistry, ScreeningError};
use serde_json::Value;
use std::time::Duration;

const BASE_URL: &str = "https://api.boycottisraeli.biz/v1";

/// Boycott Registry over the public boycott-list API. A company is listed
/// iff the name search returns a non-empty result set. Errors stay typed
/// here; the fail-open conversion to "not listed" is the orchestrator's.
#[derive(Clone)]
pub struct BoycottClient {
    client: reqwest::Client,
    base_url: String,
}

impl BoycottClient {
    pub fn new() -> Self {
        let base_url = std::env::var("BOYCOTT_BASE_URL").unwrap_or_else(|_| BASE_URL.to_string());
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, base_url }
    }
}

impl Default for BoycottClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BoycottRegistry for BoycottClient {
    async fn is_listed(&self, company_name: &str) -> Result<bool, ScreeningError> {
        let url = format!(
            "{}/search/{}",
            self.base_url,
            urlencoding::encode(company_name)
        );
        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ScreeningError::CollaboratorTimeout(format!("Boycott registry: {}", e))
            } else {
                ScreeningError::Collaborator(format!("Boycott registry: {}", e))
            }
        })?;
        if !response.status().is_success() {
            return Err(ScreeningError::Collaborator(format!(
                "Boycott registry: HTTP {}",
                response.status()
            )));
        }
        let entries: Value = response
            .json()
            .await
            .map_err(|e| ScreeningError::Collaborator(format!("Boycott registry: {}", e)))?;
        Ok(entries.as_array().map(|a| !a.is_empty()).unwrap_or(false))
    }
}
