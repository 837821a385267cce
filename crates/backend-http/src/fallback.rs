//! Embedded sample patents used when the data service is unreachable.

use crate::BackendError;
use patentmap_model::{PatentRecord, SearchCriteria};
use patentmap_query::filter_local;

const EMBEDDED_DATASET: &str = include_str!("../data/sample_patents.json");

/// Fixed set of patents served locally.
#[derive(Debug, Clone)]
pub struct FallbackDataset {
    records: Vec<PatentRecord>,
}

impl FallbackDataset {
    /// Load the dataset compiled into the binary.
    pub fn embedded() -> Result<Self, BackendError> {
        let records: Vec<PatentRecord> = serde_json::from_str(EMBEDDED_DATASET)
            .map_err(|e| BackendError::ParseError(format!("embedded dataset: {}", e)))?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[PatentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply the service's search semantics locally.
    pub fn search(&self, criteria: &SearchCriteria) -> Vec<PatentRecord> {
        filter_local(&self.records, criteria)
    }

    /// Linear scan by exact patent number.
    pub fn find(&self, patent_no: &str) -> Option<&PatentRecord> {
        self.records.iter().find(|r| r.patent_no == patent_no)
    }
}
