use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

/// A route polyline as returned by the routing backend.
///
/// This is a GeoJSON `LineString` geometry: positions are stored in
/// `[longitude, latitude]` order and must be flipped before drawing.
/// The `type` member is optional since only the coordinates are read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteGeometry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

impl RouteGeometry {
    pub fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            kind: Some("LineString".to_string()),
            coordinates,
        }
    }

    /// Converts the stored `[lon, lat]` pairs to drawable positions
    pub fn to_lat_lngs(&self) -> Vec<LatLng> {
        self.coordinates
            .iter()
            .copied()
            .map(LatLng::from_lng_lat)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(&self.to_lat_lngs())
    }
}
