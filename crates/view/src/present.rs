//! Presentation-side view models and the `Presenter` trait.

use patentmap_explain::{detail_rows, list_title, DetailRow, Explanation, SimilarityLevel};
use patentmap_model::PatentRecord;
use serde::Serialize;

/// Text shown in place of an empty result list.
pub const NO_RESULTS: &str = "No results found.";

/// Panels and dialogs a front end can close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Details,
    Comparison,
    CompareDialog,
    SimilarityBreakdown,
}

/// UI surface driven by the application.
pub trait Presenter {
    /// Replace the textual result list.
    fn render_results(&mut self, list: &ResultList);

    /// Open the detail panel.
    fn show_details(&mut self, panel: &DetailPanel);

    /// Show two patents side by side with their similarity.
    fn show_comparison(&mut self, view: &ComparisonView);

    /// Show the per-field similarity breakdown.
    fn show_similarity_breakdown(&mut self, breakdown: &SimilarityBreakdown);

    /// List patents that can be picked for comparison.
    fn show_candidates(&mut self, candidates: &[ListItem]);

    fn hide(&mut self, panel: Panel);

    /// Tell the user something went wrong.
    fn alert(&mut self, message: &str);
}

/// One entry of the result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub patent_no: String,
    /// "<patentNo> - <applicant>"
    pub title: String,
    pub keywords: String,
}

impl ListItem {
    pub fn from_record(record: &PatentRecord) -> Self {
        Self {
            patent_no: record.patent_no.clone(),
            title: list_title(record),
            keywords: record.keywords().unwrap_or_default().to_string(),
        }
    }
}

/// The textual result list; empty is an explicit state, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "items", rename_all = "lowercase")]
pub enum ResultList {
    Empty,
    Items(Vec<ListItem>),
}

impl ResultList {
    pub fn from_records(records: &[PatentRecord]) -> Self {
        if records.is_empty() {
            Self::Empty
        } else {
            Self::Items(records.iter().map(ListItem::from_record).collect())
        }
    }

    /// Patent numbers in display order.
    pub fn patent_nos(&self) -> Vec<&str> {
        match self {
            Self::Empty => Vec::new(),
            Self::Items(items) => items.iter().map(|i| i.patent_no.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPanel {
    pub patent_no: String,
    pub rows: Vec<DetailRow>,
}

impl DetailPanel {
    pub fn from_record(record: &PatentRecord) -> Self {
        Self {
            patent_no: record.patent_no.clone(),
            rows: detail_rows(record),
        }
    }
}

/// Two patents side by side with their total score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonView {
    pub first: DetailPanel,
    pub second: DetailPanel,
    pub total: u8,
    pub level: SimilarityLevel,
    /// Display color of the total, by level
    pub color: &'static str,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    pub first_no: String,
    pub second_no: String,
    pub total: u8,
    pub explanations: Vec<Explanation>,
}
