use crate::{
    core::{
        config::DispatchConfig,
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    input::{EventManager, InputEvent, MapEvent, MapOperations, MouseButton},
    layers::{
        base::LayerTrait,
        manager::LayerManager,
        marker::{Marker, MarkerRole},
        tile::TileLayer,
        vector::Polyline,
    },
    traits::MapSurface,
    Result,
};

/// Headless map: a viewport, an ordered layer stack and an event queue
pub struct Map {
    pub viewport: Viewport,
    layer_manager: LayerManager,
    event_manager: EventManager,
    /// Padding in pixels applied by `fit_bounds`
    fit_padding: Option<f64>,
    next_layer_seq: u64,
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            viewport: Viewport::new(center, zoom, size),
            layer_manager: LayerManager::new(),
            event_manager: EventManager::new(),
            fit_padding: None,
            next_layer_seq: 0,
        }
    }

    /// Builds the base dispatch map: initial view plus the tile layer
    pub fn from_config(config: &DispatchConfig) -> Result<Self> {
        let mut map = Self::new(config.view.center, config.view.zoom, config.view.size);
        map.viewport
            .set_zoom_limits(config.tiles.min_zoom as f64, config.tiles.max_zoom as f64);
        map.viewport.set_zoom(config.view.zoom);

        let tiles = TileLayer::with_options(
            "base-tiles".to_string(),
            "OpenStreetMap".to_string(),
            config.tiles.clone(),
        );
        map.add_layer(Box::new(tiles))?;
        // The base layer is part of the initial state, not a change
        map.event_manager.clear_events();

        Ok(map)
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        if MapOperations::set_view(&mut self.viewport, center, zoom)? {
            self.event_manager.emit(MapEvent::ViewChanged {
                center: self.viewport.center,
                zoom: self.viewport.zoom,
            });
        }
        Ok(())
    }

    pub fn set_fit_padding(&mut self, padding: Option<f64>) {
        self.fit_padding = padding;
    }

    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Option<f64>) -> Result<()> {
        MapOperations::fit_bounds(&mut self.viewport, bounds, padding.or(self.fit_padding))?;
        self.event_manager
            .emit(MapEvent::BoundsFitted { bounds: bounds.clone() });
        self.event_manager.emit(MapEvent::ViewChanged {
            center: self.viewport.center,
            zoom: self.viewport.zoom,
        });
        Ok(())
    }

    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        self.layer_manager.add_layer(layer)?;
        self.event_manager.emit(MapEvent::LayerAdd { layer_id });
        Ok(())
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Result<()> {
        if self.layer_manager.remove_layer(layer_id).is_some() {
            self.event_manager.emit(MapEvent::LayerRemove {
                layer_id: layer_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layer_manager.with_layer_mut(layer_id, f)
    }

    pub fn list_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    pub fn layer_count(&self) -> usize {
        self.layer_manager.len()
    }

    pub fn marker(&self, layer_id: &str) -> Option<&Marker> {
        self.get_layer(layer_id)?.as_any().downcast_ref::<Marker>()
    }

    /// Marker layers in draw order
    pub fn markers(&self) -> Vec<&Marker> {
        self.layer_manager
            .layers()
            .into_iter()
            .filter_map(|layer| layer.as_any().downcast_ref::<Marker>())
            .collect()
    }

    pub fn markers_with_role(&self, role: MarkerRole) -> Vec<&Marker> {
        self.markers()
            .into_iter()
            .filter(|marker| marker.role() == role)
            .collect()
    }

    /// Polyline layers in draw order
    pub fn polylines(&self) -> Vec<&Polyline> {
        self.layer_manager
            .layers()
            .into_iter()
            .filter_map(|layer| layer.as_any().downcast_ref::<Polyline>())
            .collect()
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    /// Translates raw input into map events.
    /// Returns the geographic position of a primary-button click; other
    /// buttons are not map clicks.
    pub fn handle_input(&mut self, input: InputEvent) -> Option<LatLng> {
        match input {
            InputEvent::Click {
                button: MouseButton::Left,
                position,
            } => {
                let lat_lng = self.viewport.pixel_to_lat_lng(&position);
                self.event_manager.emit(MapEvent::Click {
                    lat_lng,
                    pixel: position,
                });
                Some(lat_lng)
            }
            InputEvent::Click { .. } => None,
            InputEvent::Resize { size } => {
                self.viewport.set_size(size);
                None
            }
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }
}

impl MapSurface for Map {
    fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        Map::set_view(self, center, zoom)
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) -> Result<()> {
        Map::fit_bounds(self, bounds, None)
    }

    fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        Map::add_layer(self, layer)
    }

    fn remove_layer(&mut self, layer_id: &str) -> Result<()> {
        Map::remove_layer(self, layer_id)
    }

    fn has_layer(&self, layer_id: &str) -> bool {
        self.layer_manager.contains(layer_id)
    }

    fn marker(&self, layer_id: &str) -> Option<&Marker> {
        Map::marker(self, layer_id)
    }

    fn marker_mut(&mut self, layer_id: &str) -> Option<&mut Marker> {
        self.layer_manager
            .get_layer_mut(layer_id)?
            .as_any_mut()
            .downcast_mut::<Marker>()
    }

    fn next_layer_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_layer_seq += 1;
            let id = format!("{prefix}-{}", self.next_layer_seq);
            if !self.layer_manager.contains(&id) {
                return id;
            }
        }
    }

    fn popup_opened(&mut self, layer_id: &str) {
        self.event_manager.emit(MapEvent::PopupOpen {
            layer_id: layer_id.to_string(),
        });
    }
}
