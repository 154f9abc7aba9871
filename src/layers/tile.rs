use crate::{
    constants,
    core::geo::TileCoord,
    layers::base::{LayerProperties, LayerTrait, LayerType},
};
use serde::{Deserialize, Serialize};

/// Configuration for a tile layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerOptions {
    /// URL template for tiles (e.g., "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png")
    pub url_template: String,
    /// Available subdomains for load balancing
    pub subdomains: Vec<String>,
    /// Attribution text
    pub attribution: String,
    /// Tile size in pixels
    pub tile_size: u32,
    /// Maximum zoom level for this tile source
    pub max_zoom: u8,
    /// Minimum zoom level for this tile source
    pub min_zoom: u8,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: constants::OSM_URL_TEMPLATE.to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: constants::OSM_ATTRIBUTION.to_string(),
            tile_size: constants::TILE_SIZE,
            max_zoom: constants::TILE_MAX_ZOOM,
            min_zoom: 0,
        }
    }
}

/// Base map layer. Tiles are described, not fetched: the consumer that
/// draws the map resolves [`TileLayer::tile_url`] itself.
pub struct TileLayer {
    properties: LayerProperties,
    options: TileLayerOptions,
}

impl TileLayer {
    pub fn new(id: String, name: String) -> Self {
        Self::with_options(id, name, TileLayerOptions::default())
    }

    pub fn with_options(id: String, name: String, options: TileLayerOptions) -> Self {
        let properties = LayerProperties::new(id, name, LayerType::Tile);
        Self {
            properties,
            options,
        }
    }

    pub fn tile_options(&self) -> &TileLayerOptions {
        &self.options
    }

    /// Builds the URL of `coord`, or `None` outside the served zoom range
    pub fn tile_url(&self, coord: TileCoord) -> Option<String> {
        if coord.z < self.options.min_zoom || coord.z > self.options.max_zoom {
            return None;
        }

        let subdomain = if self.options.subdomains.is_empty() {
            ""
        } else {
            let idx = ((coord.x + coord.y) % self.options.subdomains.len() as u32) as usize;
            self.options.subdomains[idx].as_str()
        };

        Some(
            self.options
                .url_template
                .replace("{s}", subdomain)
                .replace("{z}", &coord.z.to_string())
                .replace("{x}", &coord.x.to_string())
                .replace("{y}", &coord.y.to_string()),
        )
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(&self.options).unwrap_or(serde_json::Value::Null)
    }
}
