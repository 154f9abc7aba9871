//! Prelude module for common ambumap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use ambumap::prelude::*;`

pub use crate::core::{
    config::{DispatchConfig, FormConfig, IconSet, PopupTexts, RouteStyleConfig, ViewConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use crate::layers::{
    base::{LayerTrait, LayerType},
    manager::LayerManager,
    marker::{Marker, MarkerIcon, MarkerRole},
    tile::{TileLayer, TileLayerOptions},
    vector::{LineStyle, Polyline, SerializableColor},
};

pub use crate::input::{
    events::{InputEvent, MapEvent, MouseButton},
    handler::EventManager,
};

pub use crate::data::{
    geojson::RouteGeometry,
    route::{RouteResult, RouteStatus, RouteSummaryRow},
};

pub use crate::geolocation::{
    ChannelGeolocation, GeolocationError, GeolocationProvider, PositionEvent, PositionOptions,
    PositionSink, UnsupportedGeolocation, WatchHandle,
};

#[cfg(feature = "tokio-runtime")]
pub use crate::geolocation::ReplayGeolocation;

pub use crate::dispatch::{
    ambulance::{AmbulanceController, PositionSource},
    form::{DispatchForm, FormInput},
    renderer::{RenderedRoutes, StaticRouteRenderer},
    tracker::{LiveTracker, TrackingSession},
    view::{DispatchView, ViewEvent},
};

pub use crate::traits::{LogNotifier, MapSurface, Notifier};

pub use crate::runtime::{spawn, AsyncHandle};

pub use crate::{Error as MapError, Result};

pub use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use futures::Future;
pub use std::pin::Pin;
