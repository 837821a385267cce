//! Terminal stand-ins for the map widget and the UI.

use clap::ValueEnum;
use patentmap_explain::MISSING;
use patentmap_geo::Bounds;
use patentmap_model::Coordinate;
use patentmap_view::{
    ComparisonView, DetailPanel, FitOptions, ListItem, MapCapability, MarkerSpec, Panel,
    Presenter, ResultList, SimilarityBreakdown, NO_RESULTS,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// One compact JSON document tagged with the panel it came from.
fn json_line<T: Serialize>(kind: &str, value: &T) -> serde_json::Result<String> {
    let data = serde_json::to_value(value)?;
    serde_json::to_string(&serde_json::json!({
        "kind": kind,
        "data": data,
    }))
}

/// Logs map operations instead of drawing them.
#[derive(Debug, Default)]
pub struct TerminalMap {
    markers: usize,
}

impl MapCapability for TerminalMap {
    fn place_marker(&mut self, marker: &MarkerSpec) {
        self.markers += 1;
        tracing::debug!(
            patent_no = %marker.patent_no,
            lat = marker.coordinate.lat,
            lng = marker.coordinate.lng,
            color = marker.style.color,
            "Placed marker"
        );
    }

    fn remove_marker(&mut self, patent_no: &str) {
        self.markers = self.markers.saturating_sub(1);
        tracing::debug!(patent_no, "Removed marker");
    }

    fn fit_bounds(&mut self, bounds: Bounds, options: FitOptions) {
        tracing::info!(
            markers = self.markers,
            south = bounds.south,
            west = bounds.west,
            north = bounds.north,
            east = bounds.east,
            max_zoom = options.max_zoom,
            "Fit map to markers"
        );
    }

    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        tracing::info!(lat = center.lat, lng = center.lng, zoom, "Centered map");
    }

    fn open_popup(&mut self, patent_no: &str) {
        tracing::debug!(patent_no, "Opened popup");
    }
}

/// Prints panels to stdout, as text or as JSON lines.
///
/// In JSON mode every panel is one line holding `{"kind": ..., "data": ...}`,
/// so a command that shows several panels (compare, then its breakdown)
/// yields several lines.
#[derive(Debug)]
pub struct TerminalPresenter {
    format: OutputFormat,
}

impl TerminalPresenter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn print_json<T: Serialize>(&self, kind: &str, value: &T) {
        match json_line(kind, value) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!(error = %e, kind, "Failed to serialize output"),
        }
    }

    fn print_panel(panel: &DetailPanel) {
        for row in &panel.rows {
            println!("   {:<18} {}", row.label, row.value);
        }
    }
}

impl Presenter for TerminalPresenter {
    fn render_results(&mut self, list: &ResultList) {
        if self.format == OutputFormat::Json {
            return self.print_json("results", list);
        }

        match list {
            ResultList::Empty => println!("{}", NO_RESULTS),
            ResultList::Items(items) => {
                for (i, item) in items.iter().enumerate() {
                    println!("\n{}. {}", i + 1, item.title);
                    if !item.keywords.is_empty() {
                        println!("   {}", item.keywords);
                    }
                }
                println!("\n---");
                println!("Total: {} patents", items.len());
            }
        }
    }

    fn show_details(&mut self, panel: &DetailPanel) {
        if self.format == OutputFormat::Json {
            return self.print_json("details", panel);
        }

        println!("Patent {}", panel.patent_no);
        println!("---");
        Self::print_panel(panel);
    }

    fn show_comparison(&mut self, view: &ComparisonView) {
        if self.format == OutputFormat::Json {
            return self.print_json("comparison", view);
        }

        println!("{}", view.summary);
        println!("---");
        println!("Patent 1");
        Self::print_panel(&view.first);
        println!("\nPatent 2");
        Self::print_panel(&view.second);
    }

    fn show_similarity_breakdown(&mut self, breakdown: &SimilarityBreakdown) {
        if self.format == OutputFormat::Json {
            return self.print_json("breakdown", breakdown);
        }

        println!(
            "\nSimilarity {} / {}: {}%",
            breakdown.first_no, breakdown.second_no, breakdown.total
        );
        for explanation in &breakdown.explanations {
            println!("   {}", explanation.summary);
            for line in explanation.detail.lines() {
                println!("      {}", line);
            }
        }
    }

    fn show_candidates(&mut self, candidates: &[ListItem]) {
        if self.format == OutputFormat::Json {
            return self.print_json("candidates", &candidates);
        }

        for item in candidates {
            let keywords = if item.keywords.is_empty() {
                MISSING
            } else {
                item.keywords.as_str()
            };
            println!("{:<16} {}", item.patent_no, keywords);
        }
    }

    fn hide(&mut self, panel: Panel) {
        tracing::trace!(panel = ?panel, "Closed panel");
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}
