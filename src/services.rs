use crate::batcher::build_batch;
use crate::errors::AppError;
use crate::flattener::flatten;
use crate::kinds::AnalysisKind;
use crate::models::{OutputRow, RawEntryGroup};
use crate::transport::Transport;
use std::sync::Arc;

/// Runs one pipeline invocation: batch, one call, flatten.
///
/// Holds nothing between calls except the shared transport.
#[derive(Clone)]
pub struct NameAnalysisService {
    transport: Arc<dyn Transport>,
}

impl NameAnalysisService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Analyze the names in `groups` with `kind`.
    ///
    /// Validation failures return before the transport is touched; transport
    /// failures are returned as-is, without retry.
    pub async fn analyze(
        &self,
        kind: AnalysisKind,
        groups: &[RawEntryGroup],
    ) -> Result<Vec<OutputRow>, AppError> {
        let request = build_batch(kind, groups)?;

        let response = self
            .transport
            .send(
                request.method.clone(),
                &request.path,
                &request.body,
                &[],
                &request.headers,
            )
            .await?;

        let rows = flatten(&request, &response);
        tracing::info!(
            "{} complete: {} names sent, {} rows emitted",
            kind,
            request.len(),
            rows.len()
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawNameEntry;
    use async_trait::async_trait;
    use reqwest::Method;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct Recorded {
        path: String,
        body: Value,
        headers: Vec<(String, String)>,
    }

    /// Echoes one canned response and remembers what it was asked.
    struct CannedTransport {
        response: Result<Value, AppError>,
        calls: Mutex<Vec<Recorded>>,
    }

    impl CannedTransport {
        fn new(response: Result<Value, AppError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(
            &self,
            method: Method,
            path: &str,
            body: &Value,
            _query: &[(String, String)],
            headers: &[(String, String)],
        ) -> Result<Value, AppError> {
            assert_eq!(method, Method::POST);
            self.calls.lock().unwrap().push(Recorded {
                path: path.to_string(),
                body: body.clone(),
                headers: headers.to_vec(),
            });
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn gender_round_trip() {
        let transport = CannedTransport::new(Ok(json!({
            "personalNames": [{
                "script": "LATIN",
                "firstName": "Joe",
                "lastName": "Smith",
                "likelyGender": "male",
                "probabilityCalibrated": 0.97
            }]
        })));
        let service = NameAnalysisService::new(transport.clone());

        let rows = service
            .analyze(
                AnalysisKind::GenderName,
                &[RawEntryGroup::from(vec![RawNameEntry::split("Joe", "Smith")])],
            )
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["likelyGender"], json!("male"));

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/api2/json/genderBatch");
        assert_eq!(
            calls[0].body,
            json!({ "personalNames": [ { "firstName": "Joe", "lastName": "Smith" } ] })
        );
        assert!(calls[0].headers.is_empty());
    }

    #[tokio::test]
    async fn oversized_batch_never_reaches_transport() {
        let transport = CannedTransport::new(Ok(json!({})));
        let service = NameAnalysisService::new(transport.clone());
        let entries: Vec<_> = (0..201)
            .map(|i| RawNameEntry::split(&format!("First{}", i), "Sharma").with_subdivision("IN-UP"))
            .collect();

        let err = service
            .analyze(AnalysisKind::IndianCasteName, &[RawEntryGroup::from(entries)])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("batch too large"));
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_errors_propagate_unchanged() {
        let transport = CannedTransport::new(Err(AppError::Transport(
            "Namsor returned 401 Unauthorized: invalid key".into(),
        )));
        let service = NameAnalysisService::new(transport.clone());

        let err = service
            .analyze(
                AnalysisKind::UsRaceEthnicityName,
                &[RawEntryGroup::from(vec![RawNameEntry::split("", "Garcia")])],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Transport(ref m) if m.contains("401")));
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/api2/json/usRaceEthnicityBatch");
        assert_eq!(
            calls[0].headers,
            vec![(
                "X-OPTION-USRACEETHNICITY-TAXONOMY".to_string(),
                "USRACEETHNICITY-6CLASSES".to_string()
            )]
        );
    }
}
