//! Service-first data access with fallback to the embedded dataset.

use crate::{BackendError, FallbackDataset, PatentService};
use patentmap_model::{PatentRecord, SearchCriteria};
use thiserror::Error;

/// Where a result came from.
///
/// Callers branch on this tag instead of on an error: a fallback result is
/// still a usable result.
#[derive(Debug)]
pub enum Fetched<T> {
    /// Served by the data service
    Live(T),
    /// Served by the embedded dataset after the service failed
    Fallback { data: T, reason: BackendError },
}

impl<T> Fetched<T> {
    pub fn data(&self) -> &T {
        match self {
            Self::Live(data) | Self::Fallback { data, .. } => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            Self::Live(data) | Self::Fallback { data, .. } => data,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Lookup failures that the user must be told about.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    /// Absent from both the service and the fallback dataset
    #[error("Patent not found: {}", .0.join(", "))]
    NotFound(Vec<String>),
}

/// Data access facade over a `PatentService` and the fallback dataset.
///
/// Each operation makes a single attempt against the service; there is no
/// retry and no backoff.
pub struct PatentData<S> {
    service: S,
    fallback: FallbackDataset,
}

impl<S: PatentService> PatentData<S> {
    pub fn new(service: S, fallback: FallbackDataset) -> Self {
        Self { service, fallback }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn fallback(&self) -> &FallbackDataset {
        &self.fallback
    }

    fn log_fallback(&self, operation: &'static str, reason: &BackendError) {
        tracing::warn!(
            service = self.service.name(),
            operation,
            error = %reason,
            "Data service failed, using fallback dataset"
        );
    }

    /// Every patent, from the service or the whole fallback dataset.
    pub async fn fetch_all(&self) -> Fetched<Vec<PatentRecord>> {
        match self.service.fetch_all().await {
            Ok(records) => {
                tracing::info!(count = records.len(), "Fetched patents");
                Fetched::Live(records)
            }
            Err(reason) => {
                self.log_fallback("fetch_all", &reason);
                Fetched::Fallback {
                    data: self.fallback.records().to_vec(),
                    reason,
                }
            }
        }
    }

    /// Search the service, or filter the fallback dataset with the same criteria.
    pub async fn search(&self, criteria: &SearchCriteria) -> Fetched<Vec<PatentRecord>> {
        match self.service.search(criteria).await {
            Ok(records) => {
                tracing::info!(count = records.len(), "Search returned patents");
                Fetched::Live(records)
            }
            Err(reason) => {
                self.log_fallback("search", &reason);
                Fetched::Fallback {
                    data: self.fallback.search(criteria),
                    reason,
                }
            }
        }
    }

    /// Look up one patent by number.
    pub async fn fetch_by_no(
        &self,
        patent_no: &str,
    ) -> Result<Fetched<PatentRecord>, LookupError> {
        match self.service.fetch_by_no(patent_no).await {
            Ok(record) => Ok(Fetched::Live(record)),
            Err(reason) => {
                self.log_fallback("fetch_by_no", &reason);
                match self.fallback.find(patent_no) {
                    Some(record) => Ok(Fetched::Fallback {
                        data: record.clone(),
                        reason,
                    }),
                    None => Err(LookupError::NotFound(vec![patent_no.to_string()])),
                }
            }
        }
    }

    /// Look up two patents concurrently.
    ///
    /// Both must resolve: when either service lookup fails, both records are
    /// taken from the fallback dataset, and a number missing there makes the
    /// whole pair `NotFound`.
    pub async fn fetch_pair_by_no(
        &self,
        first: &str,
        second: &str,
    ) -> Result<Fetched<(PatentRecord, PatentRecord)>, LookupError> {
        let (r1, r2) = tokio::join!(
            self.service.fetch_by_no(first),
            self.service.fetch_by_no(second)
        );

        let reason = match (r1, r2) {
            (Ok(a), Ok(b)) => return Ok(Fetched::Live((a, b))),
            (Err(reason), _) | (_, Err(reason)) => reason,
        };
        self.log_fallback("fetch_pair_by_no", &reason);

        match (self.fallback.find(first), self.fallback.find(second)) {
            (Some(a), Some(b)) => Ok(Fetched::Fallback {
                data: (a.clone(), b.clone()),
                reason,
            }),
            (a, b) => {
                let missing = [(first, a.is_none()), (second, b.is_none())]
                    .into_iter()
                    .filter(|(_, missing)| *missing)
                    .map(|(no, _)| no.to_string())
                    .collect();
                Err(LookupError::NotFound(missing))
            }
        }
    }
}
