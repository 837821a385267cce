//! Display placement for patents on the map.
//!
//! Patents carrying their own coordinates are shown where they are. Patents
//! without coordinates are scattered around a fixed center for their region,
//! with uniform jitter inside the region's spread. The random source is
//! passed in so callers decide between entropy and a fixed seed.

use patentmap_model::{Coordinate, GeographicRegion, PatentRecord};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Center and half-extent of the area a region's patents are scattered over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionArea {
    pub center: Coordinate,
    /// Maximum latitude offset from the center, in degrees
    pub lat_spread: f64,
    /// Maximum longitude offset from the center, in degrees
    pub lng_spread: f64,
}

impl RegionArea {
    const fn new(lat: f64, lng: f64, lat_spread: f64, lng_spread: f64) -> Self {
        Self {
            center: Coordinate { lat, lng },
            lat_spread,
            lng_spread,
        }
    }

    /// Whether a coordinate lies within center +/- spread (inclusive).
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (coordinate.lat - self.center.lat).abs() <= self.lat_spread
            && (coordinate.lng - self.center.lng).abs() <= self.lng_spread
    }

    /// Draw a uniformly jittered point inside the area.
    pub fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> Coordinate {
        Coordinate {
            lat: self.center.lat + rng.gen_range(-self.lat_spread..=self.lat_spread),
            lng: self.center.lng + rng.gen_range(-self.lng_spread..=self.lng_spread),
        }
    }
}

const TURKEY: RegionArea = RegionArea::new(39.0, 35.0, 1.5, 2.5);
const USA: RegionArea = RegionArea::new(37.0, -95.0, 2.5, 5.0);
const EU: RegionArea = RegionArea::new(50.0, 10.0, 2.5, 5.0);
const ASIA: RegionArea = RegionArea::new(34.0, 100.0, 5.0, 10.0);
const DEFAULT_AREA: RegionArea = RegionArea::new(39.0, 35.0, 10.0, 20.0);

/// Scatter area for a region; unknown or missing regions get a wide default.
pub fn area_for(region: Option<GeographicRegion>) -> RegionArea {
    match region {
        Some(GeographicRegion::Turkey) => TURKEY,
        Some(GeographicRegion::Usa) => USA,
        Some(GeographicRegion::Eu) => EU,
        Some(GeographicRegion::Asia) => ASIA,
        Some(GeographicRegion::Other) | None => DEFAULT_AREA,
    }
}

/// Where a placement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementSource {
    /// The record's own coordinates
    Stored,
    /// Jittered around the region center
    Synthesized,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub coordinate: Coordinate,
    pub source: PlacementSource,
}

/// Resolve the display coordinate of a patent.
///
/// Not idempotent: a record without stored coordinates gets a fresh random
/// point on every call.
pub fn placement_for<R: Rng + ?Sized>(record: &PatentRecord, rng: &mut R) -> Placement {
    if let Some(coordinate) = record.stored_coordinate() {
        return Placement {
            coordinate,
            source: PlacementSource::Stored,
        };
    }

    let coordinate = area_for(record.geographic_region).jitter(rng);
    tracing::trace!(
        patent_no = %record.patent_no,
        lat = coordinate.lat,
        lng = coordinate.lng,
        "Synthesized placement"
    );

    Placement {
        coordinate,
        source: PlacementSource::Synthesized,
    }
}

/// Axis-aligned bounding box over a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest box containing every coordinate, or `None` for an empty set.
    pub fn enclosing<I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        coordinates.into_iter().fold(None, |bounds, c| {
            Some(match bounds {
                None => Bounds {
                    south: c.lat,
                    west: c.lng,
                    north: c.lat,
                    east: c.lng,
                },
                Some(b) => Bounds {
                    south: b.south.min(c.lat),
                    west: b.west.min(c.lng),
                    north: b.north.max(c.lat),
                    east: b.east.max(c.lng),
                },
            })
        })
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            lat: (self.south + self.north) / 2.0,
            lng: (self.west + self.east) / 2.0,
        }
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.lat >= self.south
            && coordinate.lat <= self.north
            && coordinate.lng >= self.west
            && coordinate.lng <= self.east
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_stored_coordinate_is_returned_unchanged() {
        let mut rng = StdRng::seed_from_u64(7);
        let record = PatentRecord::new("US1")
            .with_region(GeographicRegion::Asia)
            .with_coordinates(41.8781, -87.6298);

        let placement = placement_for(&record, &mut rng);
        assert_eq!(placement.source, PlacementSource::Stored);
        assert_eq!(placement.coordinate, Coordinate::new(41.8781, -87.6298));
    }

    #[test]
    fn test_synthesized_stays_within_region_area() {
        let mut rng = StdRng::seed_from_u64(42);
        let regions = GeographicRegion::ALL.iter().copied().map(Some).chain([None]);

        for region in regions {
            let mut record = PatentRecord::new("X");
            record.geographic_region = region;
            let area = area_for(region);

            for _ in 0..500 {
                let placement = placement_for(&record, &mut rng);
                assert_eq!(placement.source, PlacementSource::Synthesized);
                assert!(
                    area.contains(placement.coordinate),
                    "{:?} outside {:?}",
                    placement.coordinate,
                    area
                );
            }
        }
    }

    #[test]
    fn test_zero_coordinates_trigger_synthesis() {
        let mut rng = StdRng::seed_from_u64(1);
        let record = PatentRecord::new("TR1")
            .with_region(GeographicRegion::Turkey)
            .with_coordinates(0.0, 0.0);
        let placement = placement_for(&record, &mut rng);
        assert_eq!(placement.source, PlacementSource::Synthesized);
        assert!(TURKEY.contains(placement.coordinate));
    }

    #[test]
    fn test_synthesis_is_not_idempotent() {
        let mut rng = StdRng::seed_from_u64(3);
        let record = PatentRecord::new("EP1").with_region(GeographicRegion::Eu);
        let first = placement_for(&record, &mut rng);
        let second = placement_for(&record, &mut rng);
        assert_ne!(first.coordinate, second.coordinate);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(Bounds::enclosing(Vec::new()), None);

        let bounds = Bounds::enclosing([
            Coordinate::new(39.9, 32.8),
            Coordinate::new(41.8, -87.6),
            Coordinate::new(35.6, 139.6),
        ])
        .unwrap();
        assert_eq!(bounds.south, 35.6);
        assert_eq!(bounds.north, 41.8);
        assert_eq!(bounds.west, -87.6);
        assert_eq!(bounds.east, 139.6);
        assert!(bounds.contains(bounds.center()));
    }
}
