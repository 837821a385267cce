//! Recording fakes for the map, the presenter and the data service.

use crate::map::{FitOptions, MapCapability, MarkerSpec};
use crate::present::{
    ComparisonView, DetailPanel, ListItem, Panel, Presenter, ResultList, SimilarityBreakdown,
};
use patentmap_backend_http::{BackendError, PatentService};
use patentmap_geo::Bounds;
use patentmap_model::{Coordinate, PatentRecord, SearchCriteria};
use patentmap_query::filter_local;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct RecordingMap {
    pub markers: BTreeMap<String, MarkerSpec>,
    pub fits: Vec<(Bounds, FitOptions)>,
    pub views: Vec<(Coordinate, u8)>,
    pub popups: Vec<String>,
}

impl RecordingMap {
    pub fn marker_keys(&self) -> BTreeSet<&str> {
        self.markers.keys().map(String::as_str).collect()
    }
}

impl MapCapability for RecordingMap {
    fn place_marker(&mut self, marker: &MarkerSpec) {
        let previous = self.markers.insert(marker.patent_no.clone(), marker.clone());
        assert!(previous.is_none(), "marker placed twice: {}", marker.patent_no);
    }

    fn remove_marker(&mut self, patent_no: &str) {
        let removed = self.markers.remove(patent_no);
        assert!(removed.is_some(), "removed unknown marker: {}", patent_no);
    }

    fn fit_bounds(&mut self, bounds: Bounds, options: FitOptions) {
        self.fits.push((bounds, options));
    }

    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.views.push((center, zoom));
    }

    fn open_popup(&mut self, patent_no: &str) {
        assert!(self.markers.contains_key(patent_no));
        self.popups.push(patent_no.to_string());
    }
}

#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub lists: Vec<ResultList>,
    pub details: Vec<DetailPanel>,
    pub comparisons: Vec<ComparisonView>,
    pub breakdowns: Vec<SimilarityBreakdown>,
    pub candidates: Vec<Vec<ListItem>>,
    pub hidden: Vec<Panel>,
    pub alerts: Vec<String>,
}

impl RecordingPresenter {
    pub fn last_list(&self) -> &ResultList {
        self.lists.last().expect("no list rendered")
    }
}

impl Presenter for RecordingPresenter {
    fn render_results(&mut self, list: &ResultList) {
        self.lists.push(list.clone());
    }

    fn show_details(&mut self, panel: &DetailPanel) {
        self.details.push(panel.clone());
    }

    fn show_comparison(&mut self, view: &ComparisonView) {
        self.comparisons.push(view.clone());
    }

    fn show_similarity_breakdown(&mut self, breakdown: &SimilarityBreakdown) {
        self.breakdowns.push(breakdown.clone());
    }

    fn show_candidates(&mut self, candidates: &[ListItem]) {
        self.candidates.push(candidates.to_vec());
    }

    fn hide(&mut self, panel: Panel) {
        self.hidden.push(panel);
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

/// In-memory data service; `None` behaves like an unreachable service.
#[derive(Debug, Default)]
pub struct StaticService {
    pub records: Option<Vec<PatentRecord>>,
    pub calls: AtomicUsize,
}

impl StaticService {
    pub fn online(records: Vec<PatentRecord>) -> Self {
        Self {
            records: Some(records),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn offline() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn records(&self) -> Result<&[PatentRecord], BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records
            .as_deref()
            .ok_or_else(|| BackendError::Connection("offline".to_string()))
    }
}

impl PatentService for StaticService {
    async fn fetch_all(&self) -> Result<Vec<PatentRecord>, BackendError> {
        Ok(self.records()?.to_vec())
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<PatentRecord>, BackendError> {
        Ok(filter_local(self.records()?, criteria))
    }

    async fn fetch_by_no(&self, patent_no: &str) -> Result<PatentRecord, BackendError> {
        self.records()?
            .iter()
            .find(|r| r.patent_no == patent_no)
            .cloned()
            .ok_or(BackendError::Status {
                status: 404,
                body: String::new(),
            })
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        self.records().map(|_| ())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
