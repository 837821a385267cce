//! Query translation and local filtering.
//!
//! Converts abstract `SearchCriteria` into:
//! - Data service query parameters (`ServiceDialect`)
//! - An in-memory filter over the fallback dataset (`filter_local`)
//!
//! Both paths must agree on semantics: case-insensitive substring matching
//! for patent number, keywords and applicant; exact matching for region and
//! status; all criteria ANDed.

use patentmap_model::{PatentRecord, SearchCriteria};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Please enter both patent numbers")]
    MissingComparisonInput,
    #[error("Empty patent number")]
    EmptyPatentNo,
}

/// Trait for translating criteria to backend-specific syntax.
pub trait QueryDialect {
    /// The output type (query parameters, SQL, ...)
    type Output;

    /// Translate criteria to this dialect
    fn translate(&self, criteria: &SearchCriteria) -> Result<Self::Output, QueryError>;
}

/// Query-string dialect of the patent data service's search endpoint.
#[derive(Debug, Default)]
pub struct ServiceDialect;

impl QueryDialect for ServiceDialect {
    type Output = Vec<(&'static str, String)>;

    fn translate(&self, criteria: &SearchCriteria) -> Result<Self::Output, QueryError> {
        let mut params = Vec::new();

        // Only non-empty criteria are sent
        if let Some(patent_no) = criteria.patent_no() {
            params.push(("patentNo", patent_no.to_string()));
        }
        if let Some(keywords) = criteria.keywords() {
            params.push(("keywords", keywords.to_string()));
        }
        if let Some(applicant) = criteria.applicant() {
            params.push(("applicant", applicant.to_string()));
        }
        if let Some(region) = criteria.region {
            params.push(("region", region.as_str().to_string()));
        }
        if let Some(status) = criteria.status {
            params.push(("status", status.as_str().to_string()));
        }

        Ok(params)
    }
}

/// Validate a patent number used for a lookup.
pub fn validate_patent_no(patent_no: &str) -> Result<&str, QueryError> {
    let trimmed = patent_no.trim();
    if trimmed.is_empty() {
        return Err(QueryError::EmptyPatentNo);
    }
    Ok(trimmed)
}

/// Validate the two inputs of a comparison.
pub fn validate_comparison<'a>(
    first: &'a str,
    second: &'a str,
) -> Result<(&'a str, &'a str), QueryError> {
    match (validate_patent_no(first), validate_patent_no(second)) {
        (Ok(first), Ok(second)) => Ok((first, second)),
        _ => Err(QueryError::MissingComparisonInput),
    }
}

fn contains_folded(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

/// Whether a single record satisfies every provided criterion.
pub fn matches(record: &PatentRecord, criteria: &SearchCriteria) -> bool {
    if let Some(patent_no) = criteria.patent_no() {
        if !contains_folded(Some(record.patent_no.as_str()), patent_no) {
            return false;
        }
    }

    if let Some(keywords) = criteria.keywords() {
        if !contains_folded(record.keywords.as_deref(), keywords) {
            return false;
        }
    }

    if let Some(applicant) = criteria.applicant() {
        if !contains_folded(record.applicant.as_deref(), applicant) {
            return false;
        }
    }

    if let Some(region) = criteria.region {
        if record.geographic_region != Some(region) {
            return false;
        }
    }

    if let Some(status) = criteria.status {
        if record.patent_status != Some(status) {
            return false;
        }
    }

    true
}

/// Filter records in memory, preserving order.
pub fn filter_local(records: &[PatentRecord], criteria: &SearchCriteria) -> Vec<PatentRecord> {
    if criteria.is_empty() {
        return records.to_vec();
    }

    let filtered: Vec<PatentRecord> = records
        .iter()
        .filter(|record| matches(record, criteria))
        .cloned()
        .collect();

    tracing::debug!(
        input = records.len(),
        output = filtered.len(),
        "Filtered records locally"
    );

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use patentmap_model::{GeographicRegion, PatentStatus};
    use pretty_assertions::assert_eq;

    fn records() -> Vec<PatentRecord> {
        vec![
            PatentRecord::new("TR2023/990011")
                .with_keywords("defense, aerospace, propulsion")
                .with_applicant("TUSAŞ")
                .with_region(GeographicRegion::Turkey)
                .with_status(PatentStatus::Active),
            PatentRecord::new("US2024/112233")
                .with_keywords("artificial intelligence, healthcare")
                .with_applicant("GE Healthcare")
                .with_region(GeographicRegion::Usa)
                .with_status(PatentStatus::Inactive),
            PatentRecord::new("TR2024/445566")
                .with_keywords("defense, radar, detection")
                .with_applicant("ROKETSAN A.Ş.")
                .with_region(GeographicRegion::Turkey)
                .with_status(PatentStatus::Active),
            PatentRecord::new("XX0001"),
        ]
    }

    fn numbers(records: &[PatentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.patent_no.as_str()).collect()
    }

    #[test]
    fn test_service_params() {
        let criteria = SearchCriteria::new()
            .with_keywords("radar")
            .with_applicant("")
            .with_region(GeographicRegion::Turkey)
            .with_status(PatentStatus::Active);
        let params = ServiceDialect.translate(&criteria).unwrap();
        assert_eq!(
            params,
            vec![
                ("keywords", "radar".to_string()),
                ("region", "TURKEY".to_string()),
                ("status", "active".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_criteria_returns_input() {
        let input = records();
        assert_eq!(filter_local(&input, &SearchCriteria::new()), input);
    }

    #[test]
    fn test_region_filter() {
        let criteria = SearchCriteria::new().with_region(GeographicRegion::Turkey);
        let filtered = filter_local(&records(), &criteria);
        assert_eq!(numbers(&filtered), vec!["TR2023/990011", "TR2024/445566"]);
    }

    #[test]
    fn test_substring_filters_are_case_insensitive() {
        let criteria = SearchCriteria::new().with_patent_no("tr20").with_keywords("RADAR");
        let filtered = filter_local(&records(), &criteria);
        assert_eq!(numbers(&filtered), vec!["TR2024/445566"]);

        let criteria = SearchCriteria::new().with_applicant("healthcare");
        assert_eq!(numbers(&filter_local(&records(), &criteria)), vec!["US2024/112233"]);
    }

    #[test]
    fn test_missing_field_never_matches_criterion() {
        let criteria = SearchCriteria::new().with_keywords("defense");
        let filtered = filter_local(&records(), &criteria);
        assert!(!numbers(&filtered).contains(&"XX0001"));
    }

    #[test]
    fn test_criteria_are_anded() {
        let criteria = SearchCriteria::new()
            .with_region(GeographicRegion::Turkey)
            .with_status(PatentStatus::Inactive);
        assert!(filter_local(&records(), &criteria).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let criteria = SearchCriteria::new()
            .with_keywords("defense")
            .with_status(PatentStatus::Active);
        let once = filter_local(&records(), &criteria);
        let twice = filter_local(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_validate_comparison() {
        assert_eq!(validate_comparison(" A1 ", "B2"), Ok(("A1", "B2")));
        assert_eq!(
            validate_comparison("A1", "  "),
            Err(QueryError::MissingComparisonInput)
        );
        assert_eq!(validate_patent_no(""), Err(QueryError::EmptyPatentNo));
    }
}
