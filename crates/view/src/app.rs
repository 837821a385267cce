//! Command dispatch: turns user intents into data, scoring and view updates.

use crate::map::MapCapability;
use crate::present::{
    ComparisonView, DetailPanel, ListItem, Panel, Presenter, SimilarityBreakdown,
};
use crate::results::{QueryTicket, ResultSetManager};
use crate::sync::{ViewState, ViewSynchronizer};
use crate::ViewConfig;
use patentmap_backend_http::{Fetched, LookupError, PatentData, PatentService};
use patentmap_explain::{summarize_similarity, SimilarityLevel};
use patentmap_model::{PatentRecord, SearchCriteria, SimilarityScore};
use patentmap_query::{validate_comparison, validate_patent_no, QueryError};
use patentmap_similarity::{score_detailed, DetailedSimilarity};
use rand::Rng;
use thiserror::Error;

const NOT_FOUND_ALERT: &str = "Patent not found!";
const PAIR_NOT_FOUND_ALERT: &str = "One or both patents not found!";

/// A user intent, already decoded from raw UI events.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Show every patent
    LoadAll,
    Search(SearchCriteria),
    Compare { first: String, second: String },
    /// Open the detail panel for a patent number
    SelectDetail(String),
    ClosePanel(Panel),
    /// Show the per-field breakdown of the current comparison
    ExpandSimilarity,
    /// List patents for the comparison picker
    LoadCompareCandidates,
    PickCandidate(String),
}

/// Failures reported back to the caller after the user has been alerted.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] QueryError),

    #[error(transparent)]
    NotFound(#[from] LookupError),

    #[error("No comparison is open")]
    NoComparison,
}

/// Which comparison slot a pick landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickSlot {
    First,
    Second,
    /// Both slots were already taken; the pick was ignored
    Full,
}

/// The two patent numbers chosen for a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparePicker {
    first: Option<String>,
    second: Option<String>,
}

impl ComparePicker {
    /// Fill the first empty slot.
    pub fn pick(&mut self, patent_no: &str) -> PickSlot {
        if self.first.is_none() {
            self.first = Some(patent_no.to_string());
            PickSlot::First
        } else if self.second.is_none() {
            self.second = Some(patent_no.to_string());
            PickSlot::Second
        } else {
            PickSlot::Full
        }
    }

    pub fn first(&self) -> Option<&str> {
        self.first.as_deref()
    }

    pub fn second(&self) -> Option<&str> {
        self.second.as_deref()
    }

    pub fn clear(&mut self) {
        self.first = None;
        self.second = None;
    }
}

struct OpenComparison {
    first_no: String,
    second_no: String,
    similarity: DetailedSimilarity,
}

/// The patent map application.
///
/// Single-threaded: every command runs to completion against `&mut self`,
/// so commands never overlap and each query's ticket is still the newest
/// when its response commits. The ticket check in `ResultSetManager` only
/// drops responses for callers that drive it with concurrent queries.
pub struct PatentMapApp<S, M, P, R> {
    data: PatentData<S>,
    results: ResultSetManager,
    view: ViewSynchronizer<R>,
    map: M,
    presenter: P,
    comparison: Option<OpenComparison>,
    picker: ComparePicker,
}

impl<S, M, P, R> PatentMapApp<S, M, P, R>
where
    S: PatentService,
    M: MapCapability,
    P: Presenter,
    R: Rng,
{
    pub fn new(data: PatentData<S>, map: M, presenter: P, rng: R, config: ViewConfig) -> Self {
        Self {
            data,
            results: ResultSetManager::new(),
            view: ViewSynchronizer::new(config, rng),
            map,
            presenter,
            comparison: None,
            picker: ComparePicker::default(),
        }
    }

    pub fn data(&self) -> &PatentData<S> {
        &self.data
    }

    pub fn current_results(&self) -> &[PatentRecord] {
        self.results.current_results()
    }

    pub fn view_state(&self) -> &ViewState {
        self.view.state()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn picker(&self) -> &ComparePicker {
        &self.picker
    }

    /// Run one command.
    pub async fn dispatch(&mut self, command: Command) -> Result<(), CommandError> {
        tracing::debug!(command = ?command, "Dispatching command");

        match command {
            Command::LoadAll => {
                self.load_all().await;
                Ok(())
            }
            Command::Search(criteria) => {
                self.search(&criteria).await;
                Ok(())
            }
            Command::Compare { first, second } => self.compare(&first, &second).await.map(|_| ()),
            Command::SelectDetail(patent_no) => self.show_patent_details(&patent_no).await,
            Command::ClosePanel(Panel::Comparison) => {
                self.close_comparison();
                Ok(())
            }
            Command::ClosePanel(panel) => {
                self.presenter.hide(panel);
                Ok(())
            }
            Command::ExpandSimilarity => self.expand_similarity(),
            Command::LoadCompareCandidates => {
                self.load_compare_candidates().await;
                Ok(())
            }
            Command::PickCandidate(patent_no) => {
                self.picker.pick(&patent_no);
                Ok(())
            }
        }
    }

    /// Show every patent. Returns `false` if the response was stale.
    pub async fn load_all(&mut self) -> bool {
        let ticket = self.results.begin_query();
        let fetched = self.data.fetch_all().await;
        self.apply(ticket, fetched)
    }

    /// Replace the result set with a search. Returns `false` if the response was stale.
    pub async fn search(&mut self, criteria: &SearchCriteria) -> bool {
        let ticket = self.results.begin_query();
        let fetched = self.data.search(criteria).await;
        self.apply(ticket, fetched)
    }

    fn apply(&mut self, ticket: QueryTicket, fetched: Fetched<Vec<PatentRecord>>) -> bool {
        if fetched.is_fallback() {
            tracing::info!("Showing results from the fallback dataset");
        }
        self.commit_and_sync(ticket, fetched.into_data())
    }

    fn commit_and_sync(&mut self, ticket: QueryTicket, records: Vec<PatentRecord>) -> bool {
        if !self.results.commit(ticket, records) {
            return false;
        }
        self.view.sync(
            self.results.current_results(),
            &mut self.map,
            &mut self.presenter,
        );
        true
    }

    /// Compare two patents and show them side by side.
    ///
    /// Both numbers are required before anything is fetched. On success the
    /// result set becomes exactly the two patents.
    pub async fn compare(
        &mut self,
        first: &str,
        second: &str,
    ) -> Result<SimilarityScore, CommandError> {
        let (first, second) = match validate_comparison(first, second) {
            Ok(pair) => pair,
            Err(e) => {
                self.presenter.alert(&e.to_string());
                return Err(e.into());
            }
        };

        let ticket = self.results.begin_query();
        let (a, b) = match self.data.fetch_pair_by_no(first, second).await {
            Ok(fetched) => fetched.into_data(),
            Err(e) => {
                tracing::info!(error = %e, "Comparison lookup failed");
                self.presenter.alert(PAIR_NOT_FOUND_ALERT);
                return Err(e.into());
            }
        };

        let similarity = score_detailed(&a, &b);
        let score = similarity.score.clone();

        let level = SimilarityLevel::from_total(score.total);
        let view = ComparisonView {
            first: DetailPanel::from_record(&a),
            second: DetailPanel::from_record(&b),
            total: score.total,
            level,
            color: level.color(),
            summary: summarize_similarity(&score),
        };
        let opened = OpenComparison {
            first_no: a.patent_no.clone(),
            second_no: b.patent_no.clone(),
            similarity,
        };

        if self.commit_and_sync(ticket, vec![a, b]) {
            self.presenter.show_comparison(&view);
            self.presenter.hide(Panel::CompareDialog);
            self.picker.clear();
            self.comparison = Some(opened);
        }

        Ok(score)
    }

    /// Open the detail panel for a patent and focus the map on it.
    ///
    /// Leaves the result set and the markers untouched.
    pub async fn show_patent_details(&mut self, patent_no: &str) -> Result<(), CommandError> {
        let patent_no = match validate_patent_no(patent_no) {
            Ok(no) => no,
            Err(e) => {
                self.presenter.alert(NOT_FOUND_ALERT);
                return Err(e.into());
            }
        };

        let record = match self.data.fetch_by_no(patent_no).await {
            Ok(fetched) => fetched.into_data(),
            Err(e) => {
                self.presenter.alert(NOT_FOUND_ALERT);
                return Err(e.into());
            }
        };

        self.presenter.show_details(&DetailPanel::from_record(&record));
        self.view.focus(&record, &mut self.map);
        Ok(())
    }

    /// Hide the comparison and forget its score.
    pub fn close_comparison(&mut self) {
        self.comparison = None;
        self.presenter.hide(Panel::Comparison);
    }

    pub fn expand_similarity(&mut self) -> Result<(), CommandError> {
        let comparison = self.comparison.as_ref().ok_or(CommandError::NoComparison)?;

        self.presenter.show_similarity_breakdown(&SimilarityBreakdown {
            first_no: comparison.first_no.clone(),
            second_no: comparison.second_no.clone(),
            total: comparison.similarity.score.total,
            explanations: comparison.similarity.explanations.clone(),
        });
        Ok(())
    }

    /// List every patent for the comparison picker.
    pub async fn load_compare_candidates(&mut self) {
        let fetched = self.data.fetch_all().await;
        let items: Vec<ListItem> = fetched.data().iter().map(ListItem::from_record).collect();
        self.presenter.show_candidates(&items);
    }

    pub fn pick_candidate(&mut self, patent_no: &str) -> PickSlot {
        self.picker.pick(patent_no)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::ResultList;
    use crate::testing::{RecordingMap, RecordingPresenter, StaticService};
    use patentmap_backend_http::FallbackDataset;
    use patentmap_model::GeographicRegion;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    type TestApp = PatentMapApp<StaticService, RecordingMap, RecordingPresenter, StdRng>;

    fn app(service: StaticService) -> TestApp {
        let fallback = FallbackDataset::embedded().unwrap();
        PatentMapApp::new(
            PatentData::new(service, fallback),
            RecordingMap::default(),
            RecordingPresenter::default(),
            StdRng::seed_from_u64(5),
            ViewConfig::default(),
        )
    }

    fn live_records() -> Vec<PatentRecord> {
        vec![
            PatentRecord::new("US1")
                .with_keywords("ai, health")
                .with_abstract("quantum encryption device")
                .with_ipc("H04L 9/08")
                .with_region(GeographicRegion::Eu)
                .with_applicant("Siemens")
                .with_coordinates(48.1, 11.5),
            PatentRecord::new("EP1")
                .with_keywords("wind, turbine")
                .with_abstract("solar roof panel")
                .with_ipc("H04L 12/00")
                .with_region(GeographicRegion::Eu)
                .with_applicant("SIEMENS"),
        ]
    }

    fn result_keys(app: &TestApp) -> BTreeSet<&str> {
        app.current_results()
            .iter()
            .map(|r| r.patent_no.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_load_all_live() {
        let mut app = app(StaticService::online(live_records()));
        app.dispatch(Command::LoadAll).await.unwrap();

        assert_eq!(result_keys(&app), BTreeSet::from(["EP1", "US1"]));
        assert_eq!(app.map().marker_keys(), result_keys(&app));
        assert_eq!(app.presenter().last_list().patent_nos(), vec!["US1", "EP1"]);
    }

    #[tokio::test]
    async fn test_offline_region_search_uses_fallback() {
        let mut app = app(StaticService::offline());
        let criteria = SearchCriteria::new().with_region(GeographicRegion::Turkey);
        assert!(app.search(&criteria).await);

        assert_eq!(app.current_results().len(), 6);
        assert!(app
            .current_results()
            .iter()
            .all(|r| r.geographic_region == Some(GeographicRegion::Turkey)));
        assert_eq!(app.view_state().marker_keys(), result_keys(&app));
        assert_eq!(app.map().marker_keys(), result_keys(&app));
        assert!(app.presenter().alerts.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_queries_always_commit() {
        let mut app = app(StaticService::online(live_records()));
        assert!(app.load_all().await);
        assert!(app.search(&SearchCriteria::new().with_applicant("siemens")).await);
        assert!(app.load_all().await);
        assert_eq!(result_keys(&app).len(), 2);
    }

    #[tokio::test]
    async fn test_offline_load_all_is_silent() {
        let mut app = app(StaticService::offline());
        app.dispatch(Command::LoadAll).await.unwrap();

        assert_eq!(app.current_results().len(), 36);
        assert_eq!(app.map().markers.len(), 36);
        assert_eq!(app.map().fits.len(), 1);
        assert!(app.presenter().alerts.is_empty());
    }

    #[tokio::test]
    async fn test_search_without_matches_shows_empty_list() {
        let mut app = app(StaticService::online(live_records()));
        app.dispatch(Command::LoadAll).await.unwrap();
        let fits = app.map().fits.len();

        let criteria = SearchCriteria::new().with_applicant("nobody");
        app.dispatch(Command::Search(criteria)).await.unwrap();

        assert!(app.current_results().is_empty());
        assert!(app.map().markers.is_empty());
        assert_eq!(*app.presenter().last_list(), ResultList::Empty);
        assert_eq!(app.map().fits.len(), fits);
        assert!(app.presenter().alerts.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_patent_details_alerts() {
        let mut app = app(StaticService::offline());
        let result = app.show_patent_details("XX9999").await;

        assert!(matches!(result, Err(CommandError::NotFound(_))));
        assert_eq!(app.presenter().alerts, vec!["Patent not found!".to_string()]);
        assert!(app.presenter().details.is_empty());
        assert!(app.map().markers.is_empty());
        assert!(app.map().views.is_empty());
    }

    #[tokio::test]
    async fn test_details_focus_marker() {
        let mut app = app(StaticService::online(live_records()));
        app.dispatch(Command::LoadAll).await.unwrap();
        app.dispatch(Command::SelectDetail("US1".to_string()))
            .await
            .unwrap();

        let panel = &app.presenter().details[0];
        assert_eq!(panel.patent_no, "US1");
        assert_eq!(app.map().popups, vec!["US1".to_string()]);
        assert_eq!(app.map().views[0].1, 8);
        assert_eq!(result_keys(&app).len(), 2);
    }

    #[tokio::test]
    async fn test_details_from_fallback() {
        let mut app = app(StaticService::offline());
        app.show_patent_details("TR2023/990011").await.unwrap();

        assert_eq!(app.presenter().details[0].rows[5].value, "TUSAŞ");
        // Not on the map, so only the stored coordinate is used
        assert_eq!(app.map().views.len(), 1);
        assert!(app.map().popups.is_empty());
        assert!(app.current_results().is_empty());
        assert!(app.presenter().alerts.is_empty());
    }

    #[tokio::test]
    async fn test_compare_requires_both_numbers() {
        let mut app = app(StaticService::online(live_records()));
        let result = app
            .dispatch(Command::Compare {
                first: "US1".to_string(),
                second: "  ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(CommandError::Validation(_))));
        assert_eq!(
            app.presenter().alerts,
            vec!["Please enter both patent numbers".to_string()]
        );
        assert_eq!(app.data().service().call_count(), 0);
    }

    #[tokio::test]
    async fn test_compare_shows_pair() {
        let mut app = app(StaticService::online(live_records()));
        app.dispatch(Command::LoadCompareCandidates).await.unwrap();
        assert_eq!(app.presenter().candidates[0].len(), 2);

        let score = app.compare("US1", "EP1").await.unwrap();
        assert_eq!(score.total, 45);

        let view = &app.presenter().comparisons[0];
        assert_eq!(view.total, 45);
        assert_eq!(view.level, SimilarityLevel::Medium);
        assert_eq!(view.color, "#f1c40f");
        assert_eq!(view.first.patent_no, "US1");
        assert!(app.presenter().hidden.contains(&Panel::CompareDialog));
        assert_eq!(app.map().marker_keys(), BTreeSet::from(["EP1", "US1"]));

        app.dispatch(Command::ExpandSimilarity).await.unwrap();
        let breakdown = &app.presenter().breakdowns[0];
        assert_eq!(breakdown.total, 45);
        assert_eq!(breakdown.explanations.len(), 5);
    }

    #[tokio::test]
    async fn test_compare_missing_patent() {
        let mut app = app(StaticService::offline());
        app.dispatch(Command::LoadAll).await.unwrap();
        let before = app.current_results().len();

        let result = app.compare("TR2023/990011", "XX9999").await;
        assert!(matches!(result, Err(CommandError::NotFound(_))));
        assert_eq!(
            app.presenter().alerts,
            vec!["One or both patents not found!".to_string()]
        );
        assert_eq!(app.current_results().len(), before);
        assert!(app.presenter().comparisons.is_empty());
    }

    #[tokio::test]
    async fn test_compare_patent_with_itself() {
        let mut app = app(StaticService::offline());
        let score = app.compare("CN2024/445566", "CN2024/445566").await.unwrap();

        assert_eq!(score.total, 100);
        assert_eq!(app.current_results().len(), 1);
        assert_eq!(app.map().markers.len(), 1);
        assert_eq!(app.presenter().comparisons.len(), 1);
        assert!(app.presenter().alerts.is_empty());
    }

    #[tokio::test]
    async fn test_close_comparison() {
        let mut app = app(StaticService::online(live_records()));
        app.compare("US1", "EP1").await.unwrap();

        app.dispatch(Command::ClosePanel(Panel::Comparison))
            .await
            .unwrap();
        assert!(app.presenter().hidden.contains(&Panel::Comparison));
        assert!(matches!(
            app.expand_similarity(),
            Err(CommandError::NoComparison)
        ));
    }

    #[tokio::test]
    async fn test_picker_fills_slots_in_order() {
        let mut app = app(StaticService::offline());
        assert_eq!(app.pick_candidate("A"), PickSlot::First);
        app.dispatch(Command::PickCandidate("B".to_string()))
            .await
            .unwrap();
        assert_eq!(app.pick_candidate("C"), PickSlot::Full);
        assert_eq!(app.picker().first(), Some("A"));
        assert_eq!(app.picker().second(), Some("B"));
    }
}
