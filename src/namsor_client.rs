use crate::config::Config;
use crate::errors::AppError;
use crate::transport::Transport;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Client for the Namsor v2 REST API.
///
/// Every call carries the configured key as `X-API-KEY`.
#[derive(Clone)]
pub struct NamsorClient {
    client: reqwest::Client,
    base_url: String,
    account_url: String,
    api_key: String,
}

impl fmt::Debug for NamsorClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamsorClient")
            .field("base_url", &self.base_url)
            .field("account_url", &self.account_url)
            .finish_non_exhaustive()
    }
}

impl NamsorClient {
    /// Creates a new `NamsorClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. `https://v2.namsor.com/NamSorAPIv2`.
    /// * `account_url` - Account site used for the credential check.
    /// * `api_key` - The Namsor API key.
    /// * `timeout` - Per-request timeout.
    pub fn new(
        base_url: String,
        account_url: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create Namsor client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            account_url: account_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.namsor_base_url.clone(),
            config.namsor_account_url.clone(),
            config.namsor_api_key.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checks the configured key against the Namsor account service.
    ///
    /// # Returns
    ///
    /// * `Result<serde_json::Value, AppError>` - The account data and enabled features.
    pub async fn verify_credentials(&self) -> Result<Value, AppError> {
        let url = format!("{}/api/add-on/get-user-data-and-features", self.account_url);
        tracing::info!("Verifying Namsor credentials against {}", self.account_url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Credential check failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized(format!(
                "Namsor rejected the API key ({})",
                status
            )));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Transport(format!(
                "Namsor account returned {}: {}",
                status, error_text
            )));
        }

        let data = response.json().await.map_err(|e| {
            AppError::Transport(format!("Failed to parse credential response: {}", e))
        })?;

        tracing::info!("✓ Namsor credentials accepted");
        Ok(data)
    }
}

#[async_trait]
impl Transport for NamsorClient {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: &Value,
        query: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<Value, AppError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::info!("Namsor {} {}", method, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .json(body);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Namsor request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Namsor {} returned {}", path, status);
            return Err(AppError::Transport(format!(
                "Namsor returned {}: {}",
                status, error_text
            )));
        }

        let data = response.json().await.map_err(|e| {
            AppError::Transport(format!("Failed to parse Namsor response: {}", e))
        })?;

        Ok(data)
    }
}
