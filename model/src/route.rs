use anyhow::Result;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees. Serializes as `{"lng", "lat"}`, the shape map
/// layers want for polyline coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    #[serde(rename = "lng", alias = "lon", alias = "longitude")]
    pub lon: f64,
    #[serde(alias = "latitude")]
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// One tracked sample from the upstream feed, after road snapping and gap
/// prediction have already run. Feed versions disagree about casing, so
/// deserialization accepts camelCase, PascalCase, and snake_case spellings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPoint {
    #[serde(alias = "Latitude")]
    pub latitude: f64,
    #[serde(alias = "Longitude")]
    pub longitude: f64,
    /// When the sample was captured, as written by the feed. Display only;
    /// playback pacing never reads it.
    #[serde(default, alias = "Timestamp")]
    pub timestamp: String,
    /// True when the point was synthesized to fill a coverage gap rather than
    /// sampled from the device.
    #[serde(default, alias = "IsPredicted", alias = "is_predicted")]
    pub is_predicted: bool,
}

impl LocationPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: String::new(),
            is_predicted: false,
        }
    }

    pub fn lon_lat(&self) -> LonLat {
        LonLat::new(self.longitude, self.latitude)
    }

    /// Feeds write either RFC 3339 or a bare local datetime.
    pub fn time(&self) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(dt.naive_local());
        }
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S").ok()
    }
}

/// The ordered points of one executive's day. Any length is allowed; replay
/// degrades gracefully on empty and single-point routes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePath(Vec<LocationPoint>);

impl RoutePath {
    pub fn new(points: Vec<LocationPoint>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[LocationPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn predicted_count(&self) -> usize {
        self.0.iter().filter(|pt| pt.is_predicted).count()
    }

    /// First and last parseable capture times, for display next to the
    /// scrubber. None if no point has one.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut times = self.0.iter().filter_map(|pt| pt.time());
        let first = times.next()?;
        let last = times.last().unwrap_or(first);
        Some((first, last))
    }

    pub fn extend(&mut self, other: RoutePath) {
        self.0.extend(other.0);
    }

    /// Stable, so points without a parseable time keep their relative order.
    pub fn sort_by_time(&mut self) {
        self.0.sort_by_cached_key(|pt| pt.time());
    }
}

/// Parses the route payload the upstream service returns: a JSON array of
/// location points.
pub fn route_from_json_str(raw: &str) -> Result<RoutePath> {
    let points: Vec<LocationPoint> = serde_json::from_str(raw)?;
    Ok(RoutePath::new(points))
}
