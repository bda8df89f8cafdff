/// Response flattening.
///
/// Projects each per-name result object into one flat row using the kind's
/// column list. Missing or malformed result arrays yield fewer rows, never an
/// error.
use crate::batcher::BatchRequest;
use crate::kinds::{Column, KindProfile};
use crate::models::{NameRecord, OutputRow};
use serde_json::Value;

fn present(value: Option<&Value>) -> Option<Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.clone()),
    }
}

fn project(profile: &KindProfile, record: &NameRecord, result: &Value) -> OutputRow {
    let mut row = OutputRow::new();

    for column in profile.columns {
        match *column {
            Column::Identity(field) => {
                let key = field.wire_name();
                let value = present(result.get(key)).or_else(|| {
                    let echoed = record.get(field);
                    (!echoed.is_empty()).then(|| Value::String(echoed.to_string()))
                });
                if let Some(v) = value {
                    row.insert(key.to_string(), v);
                }
            }
            Column::Scalar(key) => {
                if let Some(v) = present(result.get(key)) {
                    row.insert(key.to_string(), v);
                }
            }
            Column::Ranked {
                prefix,
                list,
                primary,
                count,
            } => {
                let ranked = result.get(list).and_then(Value::as_array);
                let first = match primary {
                    Some(key) => present(result.get(key)),
                    None => present(ranked.and_then(|l| l.first())),
                };
                if let Some(v) = first {
                    row.insert(prefix.to_string(), v);
                }
                for n in 2..=count {
                    if let Some(v) = present(ranked.and_then(|l| l.get(n - 1))) {
                        row.insert(format!("{}{}", prefix, n), v);
                    }
                }
            }
            Column::Nested { object, field } => {
                if let Some(v) = present(result.get(object).and_then(|o| o.get(field))) {
                    row.insert(field.to_string(), v);
                }
            }
        }
    }

    row
}

/// Flatten a batch response into rows aligned with `request.records`.
///
/// At most `min(records, results)` rows are produced, in request order.
/// Results are paired with records by position before non-object results
/// are dropped, so a skipped entry never shifts later records onto the
/// wrong result.
pub fn flatten(request: &BatchRequest, response: &Value) -> Vec<OutputRow> {
    let profile = request.profile();
    let results = match response.get(profile.batch_field).and_then(Value::as_array) {
        Some(results) => results,
        None => {
            tracing::warn!(
                "{}: response has no '{}' array, emitting no rows",
                request.kind,
                profile.batch_field
            );
            return Vec::new();
        }
    };

    if results.len() != request.records.len() {
        tracing::warn!(
            "{}: {} results for {} requested names",
            request.kind,
            results.len(),
            request.records.len()
        );
    }

    let rows: Vec<OutputRow> = request
        .records
        .iter()
        .zip(results.iter())
        .filter(|(_, result)| result.is_object())
        .map(|(record, result)| project(profile, record, result))
        .collect();

    tracing::debug!("{}: flattened {} rows", request.kind, rows.len());
    rows
}
