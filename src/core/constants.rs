//! Dispatch-map defaults: the Karachi dispatch view, Leaflet-style route
//! styling and the icon assets the dispatch page ships with.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Initial map center before any route or GPS fix is known (Karachi).
pub const DEFAULT_CENTER: (f64, f64) = (24.8607, 67.0011);

/// Initial zoom level of the dispatch map.
pub const DEFAULT_ZOOM: f64 = 12.0;

/// Zoom used when re-centering on a live GPS fix.
pub const TRACKING_ZOOM: f64 = 14.0;

/// Highest zoom the base tile layer serves.
pub const TILE_MAX_ZOOM: u8 = 19;

pub const OSM_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Ambulance icon, used for the route origin and the live marker.
pub const AMBULANCE_ICON_URL: &str = "https://cdn-icons-png.flaticon.com/512/2961/2961948.png";

pub const BEST_HOSPITAL_ICON_URL: &str = "https://cdn-icons-png.flaticon.com/512/684/684908.png";

pub const HOSPITAL_ICON_URL: &str = "https://cdn-icons-png.flaticon.com/512/854/854878.png";

/// Ambulance and best-hospital icons are drawn slightly larger.
pub const LARGE_ICON_SIZE: (u32, u32) = (30, 30);

pub const SMALL_ICON_SIZE: (u32, u32) = (25, 25);

/// Stroke weight in pixels shared by every route line.
pub const ROUTE_WEIGHT: f32 = 5.0;

pub const ROUTE_OPACITY: f32 = 0.7;

/// DOM id of the field handed to the route backend on submit.
pub const ORIGIN_FIELD_ID: &str = "origin";

/// Form name shared by every hospital input (grouped submission).
pub const HOSPITALS_FIELD_NAME: &str = "hospitals";
