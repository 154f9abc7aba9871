//! Configuration for the dispatch map
//!
//! Every constant the dispatch page relies on (initial view, tracking zoom,
//! icons, popup texts, route colors, form field names, position options)
//! lives in [`DispatchConfig`]. Defaults reproduce the stock dispatch page;
//! a JSON file can override any subset of keys.

use crate::{
    constants,
    core::geo::{LatLng, Point},
    geolocation::PositionOptions,
    layers::{marker::MarkerIcon, tile::TileLayerOptions, vector::SerializableColor},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub view: ViewConfig,
    pub tiles: TileLayerOptions,
    pub icons: IconSet,
    pub popups: PopupTexts,
    pub routes: RouteStyleConfig,
    pub form: FormConfig,
    pub tracking: PositionOptions,
}

impl DispatchConfig {
    /// Parses a (possibly partial) JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        let max_zoom = self.tiles.max_zoom as f64;
        for (name, zoom) in [
            ("view.zoom", self.view.zoom),
            ("view.tracking_zoom", self.view.tracking_zoom),
        ] {
            if !zoom.is_finite() || zoom < 0.0 || zoom > max_zoom {
                return Err(MapError::Config(format!(
                    "{name} must be within 0..={max_zoom}, got {zoom}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.routes.opacity) {
            return Err(MapError::Config(format!(
                "routes.opacity must be within 0..=1, got {}",
                self.routes.opacity
            )));
        }

        if self.routes.weight <= 0.0 {
            return Err(MapError::Config("routes.weight must be positive".to_string()));
        }

        if self.view.size.x <= 0.0 || self.view.size.y <= 0.0 {
            return Err(MapError::Config("view.size must be positive".to_string()));
        }

        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            tiles: TileLayerOptions::default(),
            icons: IconSet::default(),
            popups: PopupTexts::default(),
            routes: RouteStyleConfig::default(),
            form: FormConfig::default(),
            tracking: PositionOptions::high_accuracy(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub center: LatLng,
    pub zoom: f64,
    /// Zoom applied on every live position fix
    pub tracking_zoom: f64,
    /// Container size in pixels, used by `fit_bounds`
    pub size: Point,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let (lat, lng) = constants::DEFAULT_CENTER;
        Self {
            center: LatLng::new(lat, lng),
            zoom: constants::DEFAULT_ZOOM,
            tracking_zoom: constants::TRACKING_ZOOM,
            size: Point::new(1024.0, 768.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSet {
    /// Route origin drawn by the static renderer
    pub origin: MarkerIcon,
    /// Ambulance marker created by the first live fix
    pub live: MarkerIcon,
    pub best: MarkerIcon,
    pub ordinary: MarkerIcon,
}

impl Default for IconSet {
    fn default() -> Self {
        let ambulance = MarkerIcon::new(constants::AMBULANCE_ICON_URL, constants::LARGE_ICON_SIZE);
        Self {
            origin: ambulance.clone(),
            live: ambulance,
            best: MarkerIcon::new(constants::BEST_HOSPITAL_ICON_URL, constants::LARGE_ICON_SIZE),
            ordinary: MarkerIcon::new(constants::HOSPITAL_ICON_URL, constants::SMALL_ICON_SIZE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupTexts {
    pub origin: String,
    pub best: String,
    pub ordinary: String,
    pub live: String,
    pub manual: String,
}

impl Default for PopupTexts {
    fn default() -> Self {
        Self {
            origin: "Ambulance Location".to_string(),
            best: "Best Hospital (Nearest)".to_string(),
            ordinary: "Hospital".to_string(),
            live: "🚑 Live Ambulance".to_string(),
            manual: "Ambulance".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteStyleConfig {
    /// Color of the best route
    pub highlight: SerializableColor,
    /// Color of every other route
    pub muted: SerializableColor,
    pub weight: f32,
    pub opacity: f32,
}

impl Default for RouteStyleConfig {
    fn default() -> Self {
        Self {
            highlight: SerializableColor::GREEN,
            muted: SerializableColor::GRAY,
            weight: constants::ROUTE_WEIGHT,
            opacity: constants::ROUTE_OPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub origin_field_id: String,
    pub hospitals_field_name: String,
    pub hospital_placeholder: String,
    pub hospital_required: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            origin_field_id: constants::ORIGIN_FIELD_ID.to_string(),
            hospitals_field_name: constants::HOSPITALS_FIELD_NAME.to_string(),
            hospital_placeholder: "Enter hospital location".to_string(),
            hospital_required: true,
        }
    }
}
