//! Explanation generation for patent display and comparison.
//!
//! Converts similarity breakdowns and patent records into human-readable
//! text suitable for the detail panel, the comparison view and the
//! expandable similarity breakdown.

use patentmap_model::{FieldEvidence, FieldScore, PatentRecord, SimilarityScore};
use serde::{Deserialize, Serialize};

/// Placeholder shown for any missing value.
pub const MISSING: &str = "-";

/// Coarse similarity bands used to color a comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityLevel {
    High,
    Medium,
    Low,
}

impl SimilarityLevel {
    pub fn from_total(total: u8) -> Self {
        if total >= 70 {
            Self::High
        } else if total >= 40 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "HIGH SIMILARITY",
            Self::Medium => "MODERATE SIMILARITY",
            Self::Low => "LOW SIMILARITY",
        }
    }

    /// Display color for the score.
    pub fn color(&self) -> &'static str {
        match self {
            Self::High => "#2ecc71",
            Self::Medium => "#f1c40f",
            Self::Low => "#e74c3c",
        }
    }
}

/// A human-readable explanation of one field comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Field label, e.g. "Keywords"
    pub label: String,

    /// Earned share of the field weight (0.0 - 100.0)
    pub percent: f64,

    /// Short summary (1 line)
    pub summary: String,

    /// What the comparison was based on
    pub detail: String,
}

/// Generate the explanation for a single field score.
pub fn explain_field(score: &FieldScore) -> Explanation {
    let label = score.field.label().to_string();

    if !score.applicable {
        return Explanation {
            summary: format!("{}: not compared", label),
            detail: "Not enough data on both patents to compare this field.".to_string(),
            percent: 0.0,
            label,
        };
    }

    let detail = match &score.evidence {
        Some(FieldEvidence::CommonKeywords { terms }) if terms.is_empty() => {
            "Common keywords: none".to_string()
        }
        Some(FieldEvidence::CommonKeywords { terms }) => {
            format!("Common keywords: {}", terms.join(", "))
        }
        Some(FieldEvidence::CommonWords { count }) => format!("{} common words found", count),
        Some(FieldEvidence::Compared { first, second }) => {
            format!("Patent 1: {}\nPatent 2: {}", first, second)
        }
        None => String::new(),
    };

    Explanation {
        summary: format!("{}: {:.0}%", label, score.percent()),
        percent: score.percent(),
        label,
        detail,
    }
}

/// Generate explanations for every field of a score, in breakdown order.
pub fn explain_score(score: &SimilarityScore) -> Vec<Explanation> {
    score.breakdown.iter().map(explain_field).collect()
}

/// Generate a one-line summary of a similarity score.
pub fn summarize_similarity(score: &SimilarityScore) -> String {
    let level = SimilarityLevel::from_total(score.total);

    let matching: Vec<_> = score
        .breakdown
        .iter()
        .filter(|f| f.applicable && f.score > 0.0)
        .map(|f| f.field.label())
        .collect();

    if matching.is_empty() {
        return format!("{}: {}% - no fields in common", level.label(), score.total);
    }

    format!(
        "{}: {}% ({})",
        level.label(),
        score.total,
        matching.join(", ")
    )
}

/// One labelled row of the patent detail panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

fn or_missing(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING)
        .to_string()
}

/// Rows of the detail panel for one patent.
pub fn detail_rows(record: &PatentRecord) -> Vec<DetailRow> {
    let row = |label, value: Option<&str>| DetailRow {
        label,
        value: or_missing(value),
    };

    vec![
        row("Patent No", Some(record.patent_no.as_str())),
        row("Keywords", record.keywords.as_deref()),
        row("Abstract", record.abstract_text.as_deref()),
        row("Application Date", record.application_date.as_deref()),
        row("Publication Date", record.publication_date.as_deref()),
        row("Applicant", record.applicant.as_deref()),
        row("IPC", record.ipc.as_deref()),
        row("CPC", record.cpc.as_deref()),
        row("Claims", record.claims.as_deref()),
        row(
            "Geographic Region",
            record.geographic_region.as_ref().map(|r| r.as_str()),
        ),
        row(
            "Patent Status",
            record.patent_status.as_ref().map(|s| s.as_str()),
        ),
    ]
}

/// Headline of a result list entry: "<patentNo> - <applicant>".
pub fn list_title(record: &PatentRecord) -> String {
    format!(
        "{} - {}",
        record.patent_no,
        record.applicant().unwrap_or_default()
    )
}

/// Popup lines shown on a map marker.
pub fn popup_lines(record: &PatentRecord) -> Vec<String> {
    vec![
        record.patent_no.clone(),
        record
            .applicant()
            .unwrap_or("Unknown Applicant")
            .to_string(),
        record
            .geographic_region
            .map(|r| r.as_str())
            .unwrap_or("Unknown Region")
            .to_string(),
    ]
}
