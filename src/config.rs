use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://v2.namsor.com/NamSorAPIv2";
pub const DEFAULT_ACCOUNT_URL: &str = "https://namsor.app";

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub namsor_api_key: String,
    pub namsor_base_url: String,
    pub namsor_account_url: String,
    pub request_timeout_secs: u64,
}

// The API key never reaches logs, even through `{:?}`.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("namsor_api_key", &"[REDACTED]")
            .field("namsor_base_url", &self.namsor_base_url)
            .field("namsor_account_url", &self.namsor_account_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn http_url(var: &str, value: String) -> anyhow::Result<String> {
    if value.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", var);
    }
    let parsed = url::Url::parse(&value)
        .map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", var, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("{} must start with http:// or https://", var);
    }
    Ok(value.trim_end_matches('/').to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            namsor_api_key: std::env::var("NAMSOR_API_KEY")
                .map_err(|_| anyhow::anyhow!("NAMSOR_API_KEY environment variable required"))
                .and_then(|key| {
                    if key.trim().is_empty() {
                        anyhow::bail!("NAMSOR_API_KEY cannot be empty");
                    }
                    Ok(key)
                })?,
            namsor_base_url: http_url(
                "NAMSOR_BASE_URL",
                std::env::var("NAMSOR_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            )?,
            namsor_account_url: http_url(
                "NAMSOR_ACCOUNT_URL",
                std::env::var("NAMSOR_ACCOUNT_URL")
                    .unwrap_or_else(|_| DEFAULT_ACCOUNT_URL.to_string()),
            )?,
            request_timeout_secs: std::env::var("NAMSOR_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("NAMSOR_TIMEOUT_SECS must be a whole number"))?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Namsor Base URL: {}", config.namsor_base_url);
        tracing::debug!("Namsor Account URL: {}", config.namsor_account_url);
        tracing::debug!("Request timeout: {}s", config.request_timeout_secs);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_must_be_http() {
        assert!(http_url("X", "ftp://namsor.app".into()).is_err());
        assert!(http_url("X", "   ".into()).is_err());
        assert!(http_url("X", "not a url".into()).is_err());
        assert_eq!(
            http_url("X", "https://v2.namsor.com/NamSorAPIv2/".into()).unwrap(),
            DEFAULT_BASE_URL
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = Config {
            port: 3000,
            namsor_api_key: "super-secret-key".into(),
            namsor_base_url: DEFAULT_BASE_URL.into(),
            namsor_account_url: DEFAULT_ACCOUNT_URL.into(),
            request_timeout_secs: 30,
        };
        let shown = format!("{:?}", config);
        assert!(!shown.contains("super-secret-key"));
        assert!(shown.contains("[REDACTED]"));
    }
}
