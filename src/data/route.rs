//! The route result handed over by the routing backend
//!
//! Positions arrive as `[lat, lon]` pairs (or `{lat, lng}` objects), route
//! geometries as GeoJSON `LineString`s in `[lon, lat]` order. Any entry may
//! be `null`: the destination could not be geocoded or routed.

use crate::{core::geo::LatLng, data::geojson::RouteGeometry, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel the backend emits when no route is recommended
pub const NO_BEST_INDEX: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRouteResult")]
pub struct RouteResult {
    pub origin: Option<LatLng>,
    pub destinations: Vec<Option<LatLng>>,
    /// Aligned by index with `destinations`
    pub geometries: Vec<Option<RouteGeometry>>,
    /// Negative or out of range means no recommendation
    pub best_index: i64,
    /// Hospital names as typed by the operator, aligned by index
    pub hospitals: Vec<String>,
    /// Travel time in seconds, aligned by index
    pub durations_s: Vec<Option<f64>>,
}

impl Default for RouteResult {
    fn default() -> Self {
        Self {
            origin: None,
            destinations: Vec::new(),
            geometries: Vec::new(),
            best_index: NO_BEST_INDEX,
            hospitals: Vec::new(),
            durations_s: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PositionRepr {
    Pair([f64; 2]),
    Object { lat: f64, lng: f64 },
}

impl From<PositionRepr> for LatLng {
    fn from(repr: PositionRepr) -> Self {
        match repr {
            PositionRepr::Pair([lat, lng]) => LatLng::new(lat, lng),
            PositionRepr::Object { lat, lng } => LatLng::new(lat, lng),
        }
    }
}

fn no_best_index() -> i64 {
    NO_BEST_INDEX
}

#[derive(Deserialize)]
struct RawRouteResult {
    #[serde(default)]
    origin: Option<PositionRepr>,
    #[serde(default)]
    destinations: Vec<Option<PositionRepr>>,
    #[serde(default)]
    geometries: Vec<Option<RouteGeometry>>,
    #[serde(default = "no_best_index")]
    best_index: i64,
    #[serde(default)]
    hospitals: Vec<String>,
    #[serde(default)]
    durations_s: Vec<Option<f64>>,
}

impl From<RawRouteResult> for RouteResult {
    fn from(raw: RawRouteResult) -> Self {
        Self {
            origin: raw.origin.map(LatLng::from),
            destinations: raw
                .destinations
                .into_iter()
                .map(|d| d.map(LatLng::from))
                .collect(),
            geometries: raw.geometries,
            best_index: raw.best_index,
            hospitals: raw.hospitals,
            durations_s: raw.durations_s,
        }
    }
}

impl RouteResult {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// The recommended index, if it designates an existing destination
    pub fn best_index(&self) -> Option<usize> {
        let index = usize::try_from(self.best_index).ok()?;
        let len = self.destinations.len().max(self.geometries.len());
        (index < len).then_some(index)
    }

    pub fn is_best(&self, index: usize) -> bool {
        self.best_index() == Some(index)
    }

    /// Whether there is anything to draw: an origin and at least one route slot
    pub fn should_render(&self) -> bool {
        self.origin.is_some() && !self.geometries.is_empty()
    }

    pub fn destination(&self, index: usize) -> Option<LatLng> {
        self.destinations.get(index).copied().flatten()
    }

    pub fn geometry(&self, index: usize) -> Option<&RouteGeometry> {
        self.geometries.get(index).and_then(Option::as_ref)
    }

    /// One row per destination slot
    pub fn summary(&self) -> Vec<RouteSummaryRow> {
        let slots = self
            .destinations
            .len()
            .max(self.geometries.len())
            .max(self.hospitals.len());

        (0..slots)
            .map(|index| {
                let destination = self.destination(index);
                let status = match (destination, self.geometry(index)) {
                    (None, _) => RouteStatus::LocationNotFound,
                    (Some(_), None) => RouteStatus::RoutingFailed,
                    (Some(_), Some(_)) => match self.durations_s.get(index).copied().flatten() {
                        Some(seconds) => RouteStatus::Eta {
                            minutes: (seconds / 60.0 * 10.0).round() / 10.0,
                        },
                        None => RouteStatus::Routed,
                    },
                };

                RouteSummaryRow {
                    index,
                    hospital: self.hospitals.get(index).cloned(),
                    destination,
                    status,
                    is_best: self.is_best(index),
                }
            })
            .collect()
    }

    pub fn best(&self) -> Option<RouteSummaryRow> {
        let index = self.best_index()?;
        self.summary().into_iter().nth(index)
    }
}

/// Outcome of routing to one destination
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteStatus {
    /// Routed with a known travel time, in minutes rounded to one decimal
    Eta { minutes: f64 },
    /// Routed, travel time unknown
    Routed,
    LocationNotFound,
    RoutingFailed,
}

impl RouteStatus {
    pub fn is_routed(&self) -> bool {
        matches!(self, RouteStatus::Eta { .. } | RouteStatus::Routed)
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteStatus::Eta { minutes } => write!(f, "{minutes:.1} min"),
            RouteStatus::Routed => write!(f, "Routed"),
            RouteStatus::LocationNotFound => write!(f, "Location not found"),
            RouteStatus::RoutingFailed => write!(f, "Routing failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummaryRow {
    pub index: usize,
    pub hospital: Option<String>,
    pub destination: Option<LatLng>,
    pub status: RouteStatus,
    pub is_best: bool,
}
