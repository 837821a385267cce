//! View layer for the patent map.
//!
//! Owns the result set and the marker collection, keeps them in step with
//! the map widget and the result list, and turns user commands into calls on
//! the data facade and the similarity engine.
//!
//! The map widget and the UI toolkit stay outside: they are reached through
//! the `MapCapability` and `Presenter` traits.

mod app;
mod map;
mod present;
mod results;
mod sync;

#[cfg(test)]
mod testing;

pub use app::{Command, CommandError, ComparePicker, PatentMapApp, PickSlot};
pub use map::{Emphasis, FitOptions, MapCapability, MarkerSpec, MarkerStyle};
pub use present::{
    ComparisonView, DetailPanel, ListItem, Panel, Presenter, ResultList, SimilarityBreakdown,
    NO_RESULTS,
};
pub use results::{QueryTicket, ResultSetManager};
pub use sync::{PlacedMarker, SyncReport, ViewState, ViewSynchronizer};

/// Map view configuration.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Padding around fitted bounds, in pixels
    pub fit_padding: u32,
    /// Zoom ceiling when fitting bounds
    pub fit_max_zoom: u8,
    /// Zoom level used when focusing a single patent
    pub detail_zoom: u8,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fit_padding: 50,
            fit_max_zoom: 12,
            detail_zoom: 8,
        }
    }
}
