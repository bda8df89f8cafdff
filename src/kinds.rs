//! The analysis table.
//!
//! Every Namsor operation this step supports is one [`KindProfile`] row:
//! which record shape it takes, which fields it forwards, the minimum fields
//! a record needs, the endpoint pair, extra headers and the output columns.
//! The batcher and flattener are generic over this table.

use crate::errors::AppError;
use crate::models::{NameShape, RecordField};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Largest batch a single Namsor call accepts.
pub const MAX_BATCH_SIZE: usize = 200;

pub const API_PREFIX: &str = "/api2/json/";

pub const TAXONOMY_HEADER: &str = "X-OPTION-USRACEETHNICITY-TAXONOMY";
pub const TAXONOMY_SIX_CLASSES: &str = "USRACEETHNICITY-6CLASSES";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisKind {
    EthnicityName,
    EthnicityFullName,
    GenderName,
    GenderFullName,
    SplitFullNames,
    OriginName,
    OriginFullName,
    UsRaceEthnicityName,
    UsRaceEthnicityFullName,
    IndianCasteName,
    IndianCasteFullName,
    NameType,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 12] = [
        AnalysisKind::EthnicityName,
        AnalysisKind::EthnicityFullName,
        AnalysisKind::GenderName,
        AnalysisKind::GenderFullName,
        AnalysisKind::SplitFullNames,
        AnalysisKind::OriginName,
        AnalysisKind::OriginFullName,
        AnalysisKind::UsRaceEthnicityName,
        AnalysisKind::UsRaceEthnicityFullName,
        AnalysisKind::IndianCasteName,
        AnalysisKind::IndianCasteFullName,
        AnalysisKind::NameType,
    ];

    pub fn profile(self) -> &'static KindProfile {
        match self {
            AnalysisKind::EthnicityName => &ETHNICITY_NAME,
            AnalysisKind::EthnicityFullName => &ETHNICITY_FULL_NAME,
            AnalysisKind::GenderName => &GENDER_NAME,
            AnalysisKind::GenderFullName => &GENDER_FULL_NAME,
            AnalysisKind::SplitFullNames => &SPLIT_FULL_NAMES,
            AnalysisKind::OriginName => &ORIGIN_NAME,
            AnalysisKind::OriginFullName => &ORIGIN_FULL_NAME,
            AnalysisKind::UsRaceEthnicityName => &US_RACE_ETHNICITY_NAME,
            AnalysisKind::UsRaceEthnicityFullName => &US_RACE_ETHNICITY_FULL_NAME,
            AnalysisKind::IndianCasteName => &INDIAN_CASTE_NAME,
            AnalysisKind::IndianCasteFullName => &INDIAN_CASTE_FULL_NAME,
            AnalysisKind::NameType => &NAME_TYPE,
        }
    }

    pub fn operation(self) -> &'static str {
        self.profile().operation
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation())
    }
}

impl FromStr for AnalysisKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisKind::ALL
            .iter()
            .copied()
            .find(|k| k.operation() == s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown operation '{}'", s)))
    }
}

/// Minimum-field predicate a record must satisfy to be sent.
#[derive(Debug, Clone, Copy)]
pub enum Requirement {
    /// Every listed field is non-empty.
    All(&'static [RecordField]),
    /// At least one listed field is non-empty.
    Any(&'static [RecordField]),
}

impl Requirement {
    pub fn fields(&self) -> &'static [RecordField] {
        match self {
            Requirement::All(f) | Requirement::Any(f) => *f,
        }
    }
}

/// One output column, evaluated against a single result object.
#[derive(Debug, Clone, Copy)]
pub enum Column {
    /// Identifying field echoed by the service; falls back to the request record.
    Identity(RecordField),
    /// Scalar copied under the same key.
    Scalar(&'static str),
    /// `prefix`, `prefix2`, ... `prefix{count}`. Column `n >= 2` reads `list[n - 1]`;
    /// the first column reads `primary` when set, otherwise `list[0]`.
    Ranked {
        prefix: &'static str,
        list: &'static str,
        primary: Option<&'static str>,
        count: usize,
    },
    /// `object.field` lifted to the top level as `field`.
    Nested {
        object: &'static str,
        field: &'static str,
    },
}

#[derive(Debug)]
pub struct KindProfile {
    pub kind: AnalysisKind,
    pub operation: &'static str,
    pub shape: NameShape,
    /// Fields forwarded in the request body, in wire order.
    pub fields: &'static [RecordField],
    pub requirement: Requirement,
    /// User-facing explanation attached to an empty batch.
    pub hint: &'static str,
    pub batch_field: &'static str,
    pub plain_endpoint: &'static str,
    /// Present only for kinds that switch endpoint on country presence.
    pub geo_endpoint: Option<&'static str>,
    pub extra_headers: &'static [(&'static str, &'static str)],
    pub columns: &'static [Column],
}

impl KindProfile {
    pub fn supports_geo(&self) -> bool {
        self.geo_endpoint.is_some()
    }

    pub fn endpoint(&self, geo: bool) -> &'static str {
        match (geo, self.geo_endpoint) {
            (true, Some(path)) => path,
            _ => self.plain_endpoint,
        }
    }
}

use Column::{Identity, Nested, Ranked, Scalar};
use RecordField::{CountryIso2, FirstName, LastName, Name, SubdivisionIso};

const PERSONAL_NAMES: &str = "personalNames";
const PROPER_NOUNS: &str = "properNouns";
const SIX_CLASS_TAXONOMY: &[(&str, &str)] = &[(TAXONOMY_HEADER, TAXONOMY_SIX_CLASSES)];

const ETHNICITY: Column = Ranked {
    prefix: "ethnicity",
    list: "ethnicitiesTop",
    primary: None,
    count: 5,
};
const ORIGIN: Column = Ranked {
    prefix: "countryOrigin",
    list: "countriesOriginTop",
    primary: None,
    count: 5,
};
const RACE_ETHNICITY: Column = Ranked {
    prefix: "ethnicity",
    list: "raceEthnicitiesTop",
    primary: Some("raceEthnicity"),
    count: 6,
};
const CASTE_GROUP: Column = Ranked {
    prefix: "castegroup",
    list: "castegroupTop",
    primary: Some("castegroup"),
    count: 5,
};
const SCRIPT: Column = Scalar("script");
const PROBABILITY: Column = Scalar("probabilityCalibrated");

static ETHNICITY_NAME: KindProfile = KindProfile {
    kind: AnalysisKind::EthnicityName,
    operation: "ethnicityName",
    shape: NameShape::Split,
    fields: &[FirstName, LastName, CountryIso2],
    requirement: Requirement::All(&[LastName]),
    hint: "Please add at least one name with a Last Name.",
    batch_field: PERSONAL_NAMES,
    plain_endpoint: "diasporaBatch",
    geo_endpoint: None,
    extra_headers: &[],
    columns: &[
        SCRIPT,
        Identity(FirstName),
        Identity(LastName),
        Identity(CountryIso2),
        ETHNICITY,
        PROBABILITY,
    ],
};

static ETHNICITY_FULL_NAME: KindProfile = KindProfile {
    kind: AnalysisKind::EthnicityFullName,
    operation: "ethnicityFullName",
    shape: NameShape::Full,
    fields: &[Name, CountryIso2],
    requirement: Requirement::All(&[Name]),
    hint: "Please add at least one Full Name.",
    batch_field: PERSONAL_NAMES,
    plain_endpoint: "diasporaFullBatch",
    geo_endpoint: None,
    extra_headers: &[],
    columns: &[
        SCRIPT,
        Identity(Name),
        Identity(CountryIso2),
        ETHNICITY,
        PROBABILITY,
    ],
};

static GENDER_NAME: KindProfile = KindProfile {
    kind: AnalysisKind::GenderName,
    operation: "genderName",
    shape: NameShape::Split,
    fields: &[FirstName, LastName, CountryIso2],
    requirement: Requirement::All(&[FirstName]),
    hint: "Please add at least one entry with a First Name.",
    batch_field: PERSONAL_NAMES,
    plain_endpoint: "genderBatch",
    geo_endpoint: Some("genderGeoBatch"),
    extra_headers: &[],
    columns: &[
        SCRIPT,
        Identity(FirstName),
        Identity(LastName),
        Scalar("likelyGender"),
        PROBABILITY,
    ],
};

static GENDER_FULL_NAME: KindProfile = KindProfile {
    kind: AnalysisKind::GenderFullName,
    operation: "genderFullName",
    shape: NameShape::Full,
    fields: &[Name, CountryIso2],
    requirement: Requirement::All(&[Name]),
    hint: "Please add at least one Full Name.",
    batch_field: PERSONAL_NAMES,
    plain_endpoint: "genderFullBatch",
    geo_endpoint: Some("genderFullGeoBatch"),
    extra_headers: &[],
    columns: &[SCRIPT, Identity(Name), Scalar("likelyGender"), PROBABILITY],
};

static SPLIT_FULL_NAMES: KindProfile = KindProfile {
    kind: AnalysisKind::SplitFullNames,
    operation: "splitFullNames",
    shape: NameShape::Full,
    fields: &[Name, CountryIso2],
    requirement: Requirement::All(&[Name]),
    hint: "Please add at least one Full Name.",
    batch_field: PERSONAL_NAMES,
    plain_endpoint: "parseNameBatch",
    geo_endpoint: Some("parseNameGeoBatch"),
    extra_headers: &[],
    columns: &[
        SCRIPT,
        Identity(Name),
        Identity(CountryIso2),
        Nested {
            object: "firstLastName",
            field: "firstName",
        },
        Nested {
            object: "firstLastName",
            field: "lastName",
        },
    ],
};

static ORIGIN_NAME: KindProfile = KindProfile {
    kind: AnalysisKind::OriginName,
    operation: "originName",
    shape: NameShape::Split,
    fields: &[FirstName, LastName],
    requirement: Requirement::Any(&[FirstName, LastName]),
    hint: "Please add at least one entry with a First or Last Name.",
    batch_field: PERSONAL_NAMES,
    plain_endpoint: "originBatch",
    geo_endpoint: None,
    extra_headers: &[],
    columns: &[
        SCRIPT,
        Identity(FirstName),
        Identity(LastName),
        ORIGIN,
        Scalar("regionOrigin"),
        Scalar("subRegionOrigin"),
        PROBABILITY,
    ],
};

static ORIGIN_FULL_NAME: KindProfile = KindProfile {
    kind: AnalysisKind::OriginFullName,
    operation: "originFullName",
    shape: NameShape::Full,
    fields: &[Name],
    requirement: Requirement::All(&[Name]),
    hint: "Please add at least one Full Name.",
    batch_field: PERSONAL_NAMES,
    plain_endpoint: "originFullBatch",
    geo_endpoint: None,
    extra_headers: &[],
    columns: &[
        SCRIPT,
        Identity(Name),
        ORIGIN,
        Scalar("regionOrigin"),
        Scalar("subRegionOrigin"),
        PROBABILITY,
    ],
};

static US_RACE_ETHNICITY_NAME: KindProfile = KindProfile {
    kind: AnalysisKind::UsRaceEthnicityName,
    operation: "usRaceEthnicityName",
    shape: NameShape::Split,
    fields: &[FirstName, LastName, CountryIso2],
    requirement: Requirement::Any(&[FirstName, LastName]),
    hint: "Please add at least one entry with a First or Last Name.",
    batch_field: PERSONAL_NAMES,
    plain_endpoint: "usRaceEthnicityBatch",
    geo_endpoint: None,
    extra_headers: SIX_CLASS_TAXONOMY,
    columns: &[
        SCRIPT,
        Identity(FirstName),
        Identity(LastName),
        Identity(CountryIso2),
        RACE_ETHNICITY,
        PROBABILITY,
    ],
};

static US_RACE_ETHNICITY_FULL_NAME: KindProfile = KindProfile {
    kind: AnalysisKind::UsRaceEthnicityFullName,
    operation: "usRaceEthnicityFullName",
    shape: NameShape::Full,
    fields: &[Name, CountryIso2],
    requirement: Requirement::All(&[Name]),
    hint: "Please add at least one Full Name.",
    batch_field: PERSONAL_NAMES,
    plain_endpoint: "usRaceEthnicityFullBatch",
    geo_endpoint: None,
    extra_headers: SIX_CLASS_TAXONOMY,
    columns: &[
        SCRIPT,
        Identity(Name),
        Identity(CountryIso2),
        RACE_ETHNICITY,
        PROBABILITY,
    ],
};

static INDIAN_CASTE_NAME: KindProfile = KindProfile {
    kind: AnalysisKind::IndianCasteName,
    operation: "indianCasteName",
    shape: NameShape::Split,
    fields: &[FirstName, LastName, SubdivisionIso],
    requirement: Requirement::All(&[FirstName, LastName, SubdivisionIso]),
    hint: "Please add at least one entry with First Name, Last Name, and subdivisionIso.",
    batch_field: PERSONAL_NAMES,
    plain_endpoint: "castegroupIndianBatch",
    geo_endpoint: None,
    extra_headers: &[],
    columns: &[
        SCRIPT,
        Identity(FirstName),
        Identity(LastName),
        Identity(SubdivisionIso),
        CASTE_GROUP,
        PROBABILITY,
    ],
};

static INDIAN_CASTE_FULL_NAME: KindProfile = KindProfile {
    kind: AnalysisKind::IndianCasteFullName,
    operation: "indianCasteFullName",
    shape: NameShape::Full,
    fields: &[Name, SubdivisionIso],
    requirement: Requirement::All(&[Name, SubdivisionIso]),
    hint: "Please add at least one Full Name with subdivisionIso.",
    batch_field: PERSONAL_NAMES,
    plain_endpoint: "castegroupIndianFullBatch",
    geo_endpoint: None,
    extra_headers: &[],
    columns: &[
        SCRIPT,
        Identity(Name),
        Identity(SubdivisionIso),
        CASTE_GROUP,
        PROBABILITY,
    ],
};

static NAME_TYPE: KindProfile = KindProfile {
    kind: AnalysisKind::NameType,
    operation: "nameType",
    shape: NameShape::Full,
    fields: &[Name, CountryIso2],
    requirement: Requirement::All(&[Name]),
    hint: "Please add at least one Proper Noun.",
    batch_field: PROPER_NOUNS,
    plain_endpoint: "nameTypeBatch",
    geo_endpoint: Some("nameTypeGeoBatch"),
    extra_headers: &[],
    columns: &[
        SCRIPT,
        Identity(Name),
        Scalar("commonType"),
        Scalar("commonTypeAlt"),
    ],
};
