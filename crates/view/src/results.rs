//! The current result set.

use patentmap_model::PatentRecord;
use std::collections::HashSet;

/// Identifies one in-flight query; only the newest ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryTicket(u64);

/// Holds the ordered list of patents currently selected for display.
///
/// The list is replaced wholesale on every query, never patched.
#[derive(Debug, Default)]
pub struct ResultSetManager {
    records: Vec<PatentRecord>,
    issued: u64,
}

impl ResultSetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current results, dropping repeated patent numbers.
    pub fn set_results(&mut self, records: Vec<PatentRecord>) -> &[PatentRecord] {
        let mut seen = HashSet::new();
        let total = records.len();
        self.records = records
            .into_iter()
            .filter(|r| seen.insert(r.patent_no.clone()))
            .collect();

        if self.records.len() != total {
            tracing::warn!(
                dropped = total - self.records.len(),
                "Dropped duplicate patent numbers from result set"
            );
        }

        &self.records
    }

    pub fn current_results(&self) -> &[PatentRecord] {
        &self.records
    }

    pub fn find(&self, patent_no: &str) -> Option<&PatentRecord> {
        self.records.iter().find(|r| r.patent_no == patent_no)
    }

    /// Start a query. Any ticket issued earlier becomes stale.
    pub fn begin_query(&mut self) -> QueryTicket {
        self.issued += 1;
        QueryTicket(self.issued)
    }

    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Apply a query's records if its ticket is still the newest.
    ///
    /// Returns `false` and leaves the results untouched for a stale ticket.
    pub fn commit(&mut self, ticket: QueryTicket, records: Vec<PatentRecord>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                newest = self.issued,
                "Dropping stale query response"
            );
            return false;
        }

        self.set_results(records);
        true
    }
}
