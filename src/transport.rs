use crate::errors::AppError;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// Outbound HTTP collaborator for the batch engine.
///
/// Implementations authenticate, pick the base URL and report non-2xx answers
/// or network failures as [`AppError::Transport`]. They are invoked, never
/// mutated, and may be shared across invocations.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: &Value,
        query: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<Value, AppError>;
}
