//! Keeps map markers and the result list consistent with the result set.

use crate::map::{FitOptions, MapCapability, MarkerSpec};
use crate::present::{Presenter, ResultList};
use crate::ViewConfig;
use patentmap_geo::{placement_for, Bounds, Placement};
use patentmap_model::{Coordinate, PatentRecord};
use rand::Rng;
use std::collections::{BTreeSet, HashMap};

/// A marker currently on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    /// The record the marker was drawn from
    pub record: PatentRecord,
    pub placement: Placement,
}

/// Marker collection, keyed by patent number.
#[derive(Debug, Default)]
pub struct ViewState {
    markers: HashMap<String, PlacedMarker>,
}

impl ViewState {
    pub fn marker(&self, patent_no: &str) -> Option<&PlacedMarker> {
        self.markers.get(patent_no)
    }

    pub fn marker_keys(&self) -> BTreeSet<&str> {
        self.markers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Bounding box of every marker.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.markers.values().map(|m| m.placement.coordinate))
    }
}

/// Counts from one synchronization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub removed: usize,
    pub added: usize,
    pub kept: usize,
}

/// Reconciles the marker collection and the result list with a result set.
pub struct ViewSynchronizer<R> {
    state: ViewState,
    config: ViewConfig,
    rng: R,
}

impl<R: Rng> ViewSynchronizer<R> {
    pub fn new(config: ViewConfig, rng: R) -> Self {
        Self {
            state: ViewState::default(),
            config,
            rng,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Bring the map and the list in line with `records`.
    ///
    /// Markers are diffed by patent number, and a marker whose record changed
    /// is redrawn, so the result is the same as clearing and rebuilding.
    pub fn sync<M, P>(
        &mut self,
        records: &[PatentRecord],
        map: &mut M,
        presenter: &mut P,
    ) -> SyncReport
    where
        M: MapCapability,
        P: Presenter,
    {
        let incoming: HashMap<&str, &PatentRecord> = records
            .iter()
            .map(|r| (r.patent_no.as_str(), r))
            .collect();

        let stale: Vec<String> = self
            .state
            .markers
            .iter()
            .filter(|(no, placed)| {
                incoming
                    .get(no.as_str())
                    .map_or(true, |record| **record != placed.record)
            })
            .map(|(no, _)| no.clone())
            .collect();

        for patent_no in &stale {
            map.remove_marker(patent_no);
            self.state.markers.remove(patent_no);
        }

        let mut added = 0;
        for record in records {
            if self.state.markers.contains_key(&record.patent_no) {
                continue;
            }
            let placement = placement_for(record, &mut self.rng);
            map.place_marker(&MarkerSpec::new(record, placement.coordinate));
            self.state.markers.insert(
                record.patent_no.clone(),
                PlacedMarker {
                    record: record.clone(),
                    placement,
                },
            );
            added += 1;
        }

        presenter.render_results(&ResultList::from_records(records));

        if !records.is_empty() {
            if let Some(bounds) = self.state.bounds() {
                map.fit_bounds(
                    bounds,
                    FitOptions {
                        padding: self.config.fit_padding,
                        max_zoom: self.config.fit_max_zoom,
                    },
                );
            }
        }

        let report = SyncReport {
            removed: stale.len(),
            added,
            kept: self.state.len() - added,
        };
        tracing::debug!(
            removed = report.removed,
            added = report.added,
            kept = report.kept,
            "Synchronized map markers"
        );
        report
    }

    /// Center the map on a record and open its popup.
    ///
    /// Uses the marker position when the record is on the map, otherwise its
    /// stored coordinate. Returns the point the map was moved to.
    pub fn focus<M: MapCapability>(
        &self,
        record: &PatentRecord,
        map: &mut M,
    ) -> Option<Coordinate> {
        let marker = self.state.marker(&record.patent_no);
        let center = marker
            .map(|m| m.placement.coordinate)
            .or_else(|| record.stored_coordinate())?;

        map.set_view(center, self.config.detail_zoom);
        if marker.is_some() {
            map.open_popup(&record.patent_no);
        }
        Some(center)
    }
}
