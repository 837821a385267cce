//! Core domain model for patentmap.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `PatentRecord`: one patent filing as served by the data service
//! - `GeographicRegion` / `PatentStatus`: the coarse classifiers used for
//!   filtering, placement and marker styling
//! - `SimilarityScore`: a weighted comparison of two records
//! - `SearchCriteria`: the filter fields of a patent search

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Region a patent was filed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GeographicRegion {
    Turkey,
    Usa,
    Eu,
    Asia,
    /// Reported as "OTHER" by the service
    Other,
}

impl GeographicRegion {
    pub const ALL: [GeographicRegion; 5] = [
        Self::Turkey,
        Self::Usa,
        Self::Eu,
        Self::Asia,
        Self::Other,
    ];

    /// Wire name, as sent to and received from the data service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Turkey => "TURKEY",
            Self::Usa => "USA",
            Self::Eu => "EU",
            Self::Asia => "ASIA",
            Self::Other => "OTHER",
        }
    }

    /// Case-insensitive parse of a wire name. Unrecognized values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TURKEY" => Some(Self::Turkey),
            "USA" => Some(Self::Usa),
            "EU" => Some(Self::Eu),
            "ASIA" => Some(Self::Asia),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for GeographicRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legal status of a patent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatentStatus {
    Active,
    Inactive,
}

impl PatentStatus {
    /// Case-insensitive parse. Unrecognized values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for PatentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One patent filing.
///
/// Field names follow the data service's camelCase JSON. Everything except
/// `patent_no` is optional; empty strings are treated the same as absent
/// values by the helpers below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatentRecord {
    /// Unique key (e.g. "TR2023/990011")
    pub patent_no: String,

    /// Comma-separated keyword terms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    #[serde(
        rename = "abstract",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub abstract_text: Option<String>,

    /// Display-formatted, never parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant: Option<String>,

    /// IPC code, primary class first (e.g. "H04L 9/08")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_region",
        skip_serializing_if = "Option::is_none"
    )]
    pub geographic_region: Option<GeographicRegion>,

    #[serde(
        default,
        deserialize_with = "deserialize_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub patent_status: Option<PatentStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

fn non_empty_raw<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn deserialize_region<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<GeographicRegion>, D::Error> {
    Ok(non_empty_raw(deserializer)?.and_then(|s| GeographicRegion::parse(&s)))
}

fn deserialize_status<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PatentStatus>, D::Error> {
    Ok(non_empty_raw(deserializer)?.and_then(|s| PatentStatus::parse(&s)))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl PatentRecord {
    /// Create a minimal record carrying only its number.
    pub fn new(patent_no: impl Into<String>) -> Self {
        Self {
            patent_no: patent_no.into(),
            keywords: None,
            abstract_text: None,
            application_date: None,
            publication_date: None,
            applicant: None,
            ipc: None,
            cpc: None,
            claims: None,
            geographic_region: None,
            patent_status: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = Some(text.into());
        self
    }

    pub fn with_applicant(mut self, applicant: impl Into<String>) -> Self {
        self.applicant = Some(applicant.into());
        self
    }

    pub fn with_ipc(mut self, ipc: impl Into<String>) -> Self {
        self.ipc = Some(ipc.into());
        self
    }

    pub fn with_region(mut self, region: GeographicRegion) -> Self {
        self.geographic_region = Some(region);
        self
    }

    pub fn with_status(mut self, status: PatentStatus) -> Self {
        self.patent_status = Some(status);
        self
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.latitude = Some(lat);
        self.longitude = Some(lng);
        self
    }

    pub fn keywords(&self) -> Option<&str> {
        non_empty(&self.keywords)
    }

    pub fn abstract_text(&self) -> Option<&str> {
        non_empty(&self.abstract_text)
    }

    pub fn applicant(&self) -> Option<&str> {
        non_empty(&self.applicant)
    }

    pub fn ipc(&self) -> Option<&str> {
        non_empty(&self.ipc)
    }

    /// The stored coordinate, if both halves are present and non-zero.
    ///
    /// A zero latitude or longitude is treated as "not geocoded".
    pub fn stored_coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng))
                if lat != 0.0 && lng != 0.0 && lat.is_finite() && lng.is_finite() =>
            {
                Some(Coordinate::new(lat, lng))
            }
            _ => None,
        }
    }
}

/// The five fields compared by the similarity engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityField {
    Keywords,
    Abstract,
    Classification,
    Region,
    Applicant,
}

impl SimilarityField {
    pub const ALL: [SimilarityField; 5] = [
        Self::Keywords,
        Self::Abstract,
        Self::Classification,
        Self::Region,
        Self::Applicant,
    ];

    /// Get a human-readable label for this field.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Keywords => "Keywords",
            Self::Abstract => "Abstract",
            Self::Classification => "IPC Classification",
            Self::Region => "Geographic Region",
            Self::Applicant => "Applicant",
        }
    }
}

/// What a field comparison was based on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum FieldEvidence {
    /// Keyword terms present on both sides
    CommonKeywords { terms: Vec<String> },

    /// Abstract words found on both sides
    CommonWords { count: usize },

    /// The two raw values that were checked for equality
    Compared { first: String, second: String },
}

/// Score for a single compared field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldScore {
    pub field: SimilarityField,

    /// Full weight of the field
    pub weight: f64,

    /// Earned score, in `[0, weight]`
    pub score: f64,

    /// Whether both records had data for this field
    pub applicable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<FieldEvidence>,
}

impl FieldScore {
    /// A field that could not be compared because data was missing.
    pub fn inapplicable(field: SimilarityField, weight: f64) -> Self {
        Self {
            field,
            weight,
            score: 0.0,
            applicable: false,
            evidence: None,
        }
    }

    /// Earned share of the field weight, 0.0 - 100.0.
    pub fn percent(&self) -> f64 {
        if self.weight > 0.0 {
            self.score / self.weight * 100.0
        } else {
            0.0
        }
    }
}

/// Weighted similarity between two patents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    /// Rounded percentage, 0 - 100
    pub total: u8,

    /// One entry per field, in `SimilarityField::ALL` order
    pub breakdown: Vec<FieldScore>,
}

impl SimilarityScore {
    pub fn field(&self, field: SimilarityField) -> Option<&FieldScore> {
        self.breakdown.iter().find(|f| f.field == field)
    }
}

/// Filter fields of a patent search.
///
/// Absent or empty criteria impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(default)]
    pub patent_no: Option<String>,

    #[serde(default)]
    pub keywords: Option<String>,

    #[serde(default)]
    pub applicant: Option<String>,

    #[serde(default)]
    pub region: Option<GeographicRegion>,

    #[serde(default)]
    pub status: Option<PatentStatus>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patent_no(mut self, patent_no: impl Into<String>) -> Self {
        self.patent_no = Some(patent_no.into());
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_applicant(mut self, applicant: impl Into<String>) -> Self {
        self.applicant = Some(applicant.into());
        self
    }

    pub fn with_region(mut self, region: GeographicRegion) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_status(mut self, status: PatentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn patent_no(&self) -> Option<&str> {
        non_empty(&self.patent_no)
    }

    pub fn keywords(&self) -> Option<&str> {
        non_empty(&self.keywords)
    }

    pub fn applicant(&self) -> Option<&str> {
        non_empty(&self.applicant)
    }

    /// True when no criterion constrains the result.
    pub fn is_empty(&self) -> bool {
        self.patent_no().is_none()
            && self.keywords().is_none()
            && self.applicant().is_none()
            && self.region.is_none()
            && self.status.is_none()
    }
}
