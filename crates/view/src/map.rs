//! The map widget as seen by the view layer.

use patentmap_explain::popup_lines;
use patentmap_geo::Bounds;
use patentmap_model::{Coordinate, GeographicRegion, PatentRecord, PatentStatus};
use serde::{Deserialize, Serialize};

/// Operations the view layer needs from a map widget.
///
/// Markers are addressed by patent number; the widget owns whatever handle
/// it uses internally.
pub trait MapCapability {
    /// Place a marker with its style and popup.
    fn place_marker(&mut self, marker: &MarkerSpec);

    /// Remove the marker for a patent.
    fn remove_marker(&mut self, patent_no: &str);

    /// Adjust the view to show the whole bounding box.
    fn fit_bounds(&mut self, bounds: Bounds, options: FitOptions);

    /// Pan and zoom to a point.
    fn set_view(&mut self, center: Coordinate, zoom: u8);

    /// Open the popup of a placed marker.
    fn open_popup(&mut self, patent_no: &str);
}

/// Visual emphasis of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Normal,
    Highlighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    /// Fill color, CSS hex
    pub color: &'static str,
    /// Outer diameter in pixels
    pub size: u32,
    pub border_width: u32,
    pub emphasis: Emphasis,
}

impl MarkerStyle {
    /// Color by status, emphasis by region.
    pub fn for_record(record: &PatentRecord) -> Self {
        let color = match record.patent_status {
            Some(PatentStatus::Active) => "#2ecc71",
            Some(PatentStatus::Inactive) => "#e74c3c",
            None => "#4a69bd",
        };

        let emphasis = if record.geographic_region == Some(GeographicRegion::Turkey) {
            Emphasis::Highlighted
        } else {
            Emphasis::Normal
        };

        let (size, border_width) = match emphasis {
            Emphasis::Highlighted => (20, 3),
            Emphasis::Normal => (16, 2),
        };

        Self {
            color,
            size,
            border_width,
            emphasis,
        }
    }
}

/// Everything needed to draw one marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub patent_no: String,
    pub coordinate: Coordinate,
    pub style: MarkerStyle,
    pub popup: Vec<String>,
}

impl MarkerSpec {
    pub fn new(record: &PatentRecord, coordinate: Coordinate) -> Self {
        Self {
            patent_no: record.patent_no.clone(),
            coordinate,
            style: MarkerStyle::for_record(record),
            popup: popup_lines(record),
        }
    }
}

/// Options for fitting the view to a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Padding around the box, in pixels
    pub padding: u32,
    pub max_zoom: u8,
}
