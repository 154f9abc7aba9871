//! # Ambumap
//!
//! A headless, Leaflet-style map state library for ambulance dispatch.
//!
//! The crate keeps a single ambulance marker in sync with a live position
//! stream (or a manual map click), draws candidate hospital destinations
//! with their pre-computed routes, and highlights the best one. Rendering
//! itself is left to whoever consumes the [`Map`] layer list.

pub mod core;
pub mod data;
pub mod dispatch;
pub mod geolocation;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod runtime;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::DispatchConfig,
    geo::{LatLng, LatLngBounds, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use layers::{
    base::LayerTrait,
    marker::{Marker, MarkerIcon, MarkerRole},
    tile::TileLayer,
    vector::Polyline,
};

pub use input::{events::InputEvent, events::MapEvent, handler::EventManager};

pub use data::{geojson::RouteGeometry, route::RouteResult};

pub use geolocation::{GeolocationError, GeolocationProvider, PositionEvent, PositionOptions};

pub use dispatch::{
    ambulance::{AmbulanceController, PositionSource},
    form::DispatchForm,
    renderer::StaticRouteRenderer,
    tracker::{LiveTracker, TrackingSession},
    view::DispatchView,
};

pub use traits::{MapSurface, Notifier};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Geolocation is not supported by this device")]
    GeolocationUnavailable,

    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
