use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One flattened result row, keys in emission order.
pub type OutputRow = Map<String, Value>;

/// A single sub-entry of the host's repeatable "name" group.
///
/// Values arrive as whatever the host form produced, so every field is kept
/// as raw JSON until the batcher normalizes it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNameEntry {
    #[serde(default)]
    pub first_name: Option<Value>,
    #[serde(default)]
    pub last_name: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub country_iso2: Option<Value>,
    #[serde(default)]
    pub subdivision_iso: Option<Value>,
}

impl RawNameEntry {
    pub fn split(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: Some(Value::from(first_name)),
            last_name: Some(Value::from(last_name)),
            ..Default::default()
        }
    }

    pub fn full(name: &str) -> Self {
        Self {
            name: Some(Value::from(name)),
            ..Default::default()
        }
    }

    pub fn with_country(mut self, country_iso2: &str) -> Self {
        self.country_iso2 = Some(Value::from(country_iso2));
        self
    }

    pub fn with_subdivision(mut self, subdivision_iso: &str) -> Self {
        self.subdivision_iso = Some(Value::from(subdivision_iso));
        self
    }
}

/// One repeatable group as the host submits it: `{ "name": [ ... ] }`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawEntryGroup {
    #[serde(default)]
    pub name: Vec<RawNameEntry>,
}

impl From<Vec<RawNameEntry>> for RawEntryGroup {
    fn from(name: Vec<RawNameEntry>) -> Self {
        Self { name }
    }
}

/// Body of `POST /api/v1/analyze/:operation`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub entries: Vec<RawEntryGroup>,
}

/// Input shape a kind works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NameShape {
    Split,
    Full,
}

/// A normalized name record. Absent values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRecord {
    Split {
        first_name: String,
        last_name: String,
        country_iso2: String,
        subdivision_iso: String,
    },
    Full {
        name: String,
        country_iso2: String,
        subdivision_iso: String,
    },
}

/// Wire names of the request-side record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    FirstName,
    LastName,
    Name,
    CountryIso2,
    SubdivisionIso,
}

impl RecordField {
    pub fn wire_name(self) -> &'static str {
        match self {
            RecordField::FirstName => "firstName",
            RecordField::LastName => "lastName",
            RecordField::Name => "name",
            RecordField::CountryIso2 => "countryIso2",
            RecordField::SubdivisionIso => "subdivisionIso",
        }
    }
}

/// Host forms hand over strings, numbers or nothing; everything becomes a string.
pub fn normalize_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl NameRecord {
    pub fn from_raw(shape: NameShape, raw: &RawNameEntry) -> Self {
        match shape {
            NameShape::Split => NameRecord::Split {
                first_name: normalize_field(raw.first_name.as_ref()),
                last_name: normalize_field(raw.last_name.as_ref()),
                country_iso2: normalize_field(raw.country_iso2.as_ref()),
                subdivision_iso: normalize_field(raw.subdivision_iso.as_ref()),
            },
            NameShape::Full => NameRecord::Full {
                name: normalize_field(raw.name.as_ref()),
                country_iso2: normalize_field(raw.country_iso2.as_ref()),
                subdivision_iso: normalize_field(raw.subdivision_iso.as_ref()),
            },
        }
    }

    /// Value of `field` for this record; fields the shape lacks read as empty.
    pub fn get(&self, field: RecordField) -> &str {
        match (self, field) {
            (NameRecord::Split { first_name, .. }, RecordField::FirstName) => first_name,
            (NameRecord::Split { last_name, .. }, RecordField::LastName) => last_name,
            (NameRecord::Full { name, .. }, RecordField::Name) => name,
            (NameRecord::Split { country_iso2, .. }, RecordField::CountryIso2)
            | (NameRecord::Full { country_iso2, .. }, RecordField::CountryIso2) => country_iso2,
            (NameRecord::Split { subdivision_iso, .. }, RecordField::SubdivisionIso)
            | (NameRecord::Full { subdivision_iso, .. }, RecordField::SubdivisionIso) => {
                subdivision_iso
            }
            _ => "",
        }
    }

    pub fn has(&self, field: RecordField) -> bool {
        !self.get(field).is_empty()
    }
}
