/// Request batching for one analysis call.
///
/// Turns the host's repeatable groups into a single validated `BatchRequest`:
/// 1. Flatten groups into entries, preserving order
/// 2. Normalize every field to a string
/// 3. Drop records failing the kind's minimum-field requirement
/// 4. Enforce the 1..=200 batch size
/// 5. Pick the plain or geo endpoint and shape the JSON body
use crate::errors::{AppError, ValidationError};
use crate::kinds::{AnalysisKind, KindProfile, Requirement, API_PREFIX, MAX_BATCH_SIZE};
use crate::models::{NameRecord, RawEntryGroup, RecordField};
use reqwest::Method;
use serde_json::{Map, Value};

/// The single outbound call for one invocation.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub kind: AnalysisKind,
    pub method: Method,
    /// Path relative to the API base URL, e.g. `/api2/json/genderBatch`.
    pub path: String,
    /// Whether the geo-aware endpoint variant was selected.
    pub geo: bool,
    pub body: Value,
    pub headers: Vec<(String, String)>,
    /// The records in the body, positionally aligned with the response.
    pub records: Vec<NameRecord>,
}

impl BatchRequest {
    pub fn profile(&self) -> &'static KindProfile {
        self.kind.profile()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn meets_requirement(requirement: &Requirement, record: &NameRecord) -> bool {
    match requirement {
        Requirement::All(fields) => fields.iter().all(|f| record.has(*f)),
        Requirement::Any(fields) => fields.iter().any(|f| record.has(*f)),
    }
}

/// Flatten and normalize the host groups, keeping only records that satisfy
/// the kind's requirement.
pub fn collect_records(kind: AnalysisKind, groups: &[RawEntryGroup]) -> Vec<NameRecord> {
    let profile = kind.profile();
    groups
        .iter()
        .flat_map(|group| group.name.iter())
        .map(|raw| NameRecord::from_raw(profile.shape, raw))
        .filter(|record| meets_requirement(&profile.requirement, record))
        .collect()
}

/// True when the kind can switch endpoints and some record names a country.
pub fn selects_geo(profile: &KindProfile, records: &[NameRecord]) -> bool {
    profile.supports_geo() && records.iter().any(|r| r.has(RecordField::CountryIso2))
}

fn record_payload(profile: &KindProfile, record: &NameRecord, geo: bool) -> Value {
    let mut obj = Map::new();
    for field in profile.fields {
        // Plain variants of geo-switching kinds never see a country field.
        if *field == RecordField::CountryIso2 && profile.supports_geo() && !geo {
            continue;
        }
        obj.insert(
            field.wire_name().to_string(),
            Value::String(record.get(*field).to_string()),
        );
    }
    Value::Object(obj)
}

/// Build the outbound request for `kind` from raw host groups.
///
/// Fails with [`ValidationError`] before any network activity when nothing
/// survives filtering or more than [`MAX_BATCH_SIZE`] records do.
pub fn build_batch(
    kind: AnalysisKind,
    groups: &[RawEntryGroup],
) -> Result<BatchRequest, AppError> {
    let profile = kind.profile();
    let records = collect_records(kind, groups);

    if records.is_empty() {
        tracing::warn!("{}: no record met the minimum fields", kind);
        return Err(ValidationError::NoValidRecords { hint: profile.hint }.into());
    }
    if records.len() > MAX_BATCH_SIZE {
        tracing::warn!(
            "{}: {} records exceed the batch limit of {}",
            kind,
            records.len(),
            MAX_BATCH_SIZE
        );
        return Err(ValidationError::BatchTooLarge {
            len: records.len(),
            max: MAX_BATCH_SIZE,
        }
        .into());
    }

    let geo = selects_geo(profile, &records);
    let endpoint = profile.endpoint(geo);

    let payload: Vec<Value> = records
        .iter()
        .map(|r| record_payload(profile, r, geo))
        .collect();
    let mut body = Map::new();
    body.insert(profile.batch_field.to_string(), Value::Array(payload));

    let headers = profile
        .extra_headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    tracing::info!(
        "Built {} batch: {} records -> {} (geo: {})",
        kind,
        records.len(),
        endpoint,
        geo
    );

    Ok(BatchRequest {
        kind,
        method: Method::POST,
        path: format!("{}{}", API_PREFIX, endpoint),
        geo,
        body: Value::Object(body),
        headers,
        records,
    })
}
