use crate::{
    core::{
        config::{DispatchConfig, IconSet, PopupTexts},
        geo::LatLng,
    },
    layers::{
        base::LayerTrait,
        marker::{Marker, MarkerIcon, MarkerRole},
    },
    traits::MapSurface,
    Result,
};

/// Where an ambulance position came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    /// Operator clicked the map
    Manual,
    /// Position stream fix
    Live,
}

/// Single owner of the ambulance marker.
///
/// Both the click handler and the position stream go through
/// [`AmbulanceController::set_position`]; the last call wins. A live fix
/// moves the existing marker in place (same layer id, popup untouched). A
/// manual position removes the existing marker and adds a fresh one with
/// its popup open. Either way at most one ambulance marker is on the map.
#[derive(Debug, Clone)]
pub struct AmbulanceController {
    marker_id: Option<String>,
    live_icon: MarkerIcon,
    live_popup: String,
    manual_popup: String,
}

impl AmbulanceController {
    pub fn new(icons: &IconSet, popups: &PopupTexts) -> Self {
        Self {
            marker_id: None,
            live_icon: icons.live.clone(),
            live_popup: popups.live.clone(),
            manual_popup: popups.manual.clone(),
        }
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new(&config.icons, &config.popups)
    }

    /// Layer id of the current ambulance marker
    pub fn marker_id(&self) -> Option<&str> {
        self.marker_id.as_deref()
    }

    pub fn position<S: MapSurface + ?Sized>(&self, surface: &S) -> Option<LatLng> {
        let id = self.marker_id.as_deref()?;
        surface.marker(id).map(Marker::position)
    }

    /// Moves the ambulance to `position`. Returns the marker's layer id.
    pub fn set_position<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        position: LatLng,
        source: PositionSource,
    ) -> Result<String> {
        match source {
            PositionSource::Live => {
                if let Some(id) = self.marker_id.as_deref() {
                    if let Some(marker) = surface.marker_mut(id) {
                        marker.set_position(position);
                        log::debug!("ambulance {} relocated to {}", id, position);
                        return Ok(id.to_string());
                    }
                    log::debug!("ambulance {} no longer on the map, recreating", id);
                }

                let id = surface.next_layer_id("ambulance");
                let marker = Marker::new(id, position)
                    .with_icon(self.live_icon.clone())
                    .with_popup(self.live_popup.clone());
                self.place(surface, marker)
            }
            PositionSource::Manual => {
                if let Some(old) = self.marker_id.as_deref() {
                    surface.remove_layer(old)?;
                    log::debug!("ambulance {} removed for manual placement", old);
                    self.marker_id = None;
                }

                let id = surface.next_layer_id("ambulance");
                let marker = Marker::new(id, position).with_popup(self.manual_popup.clone());
                self.place(surface, marker)
            }
        }
    }

    fn place<S: MapSurface + ?Sized>(&mut self, surface: &mut S, marker: Marker) -> Result<String> {
        let id = marker.id().to_string();
        let position = marker.position();
        let mut marker = marker.with_role(MarkerRole::Ambulance);
        marker.open_popup();

        surface.add_layer(Box::new(marker))?;
        surface.popup_opened(&id);
        log::debug!("ambulance {} placed at {}", id, position);

        self.marker_id = Some(id.clone());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::geo::LatLngBounds, core::map::Map, MapError};

    /// Map whose layers cannot be removed
    struct PinnedLayers(Map);

    impl MapSurface for PinnedLayers {
        fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
            self.0.set_view(center, zoom)
        }

        fn fit_bounds(&mut self, bounds: &LatLngBounds) -> Result<()> {
            MapSurface::fit_bounds(&mut self.0, bounds)
        }

        fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
            MapSurface::add_layer(&mut self.0, layer)
        }

        fn remove_layer(&mut self, layer_id: &str) -> Result<()> {
            Err(MapError::Layer(format!("{} is pinned", layer_id)))
        }

        fn has_layer(&self, layer_id: &str) -> bool {
            MapSurface::has_layer(&self.0, layer_id)
        }

        fn marker(&self, layer_id: &str) -> Option<&Marker> {
            MapSurface::marker(&self.0, layer_id)
        }

        fn marker_mut(&mut self, layer_id: &str) -> Option<&mut Marker> {
            MapSurface::marker_mut(&mut self.0, layer_id)
        }

        fn next_layer_id(&mut self, prefix: &str) -> String {
            MapSurface::next_layer_id(&mut self.0, prefix)
        }
    }

    fn setup() -> (Map, AmbulanceController) {
        let config = DispatchConfig::default();
        (
            Map::from_config(&config).unwrap(),
            AmbulanceController::from_config(&config),
        )
    }

    #[test]
    fn test_first_live_fix_creates_marker_with_open_popup() {
        let (mut map, mut controller) = setup();
        let id = controller
            .set_position(&mut map, LatLng::new(24.9, 67.1), PositionSource::Live)
            .unwrap();

        let marker = map.marker(&id).unwrap();
        assert_eq!(marker.role(), MarkerRole::Ambulance);
        assert_eq!(marker.popup_text(), Some("🚑 Live Ambulance"));
        assert!(marker.is_popup_open());
        assert_eq!(marker.icon().unwrap().size, (30, 30));
    }

    #[test]
    fn test_live_fix_relocates_in_place() {
        let (mut map, mut controller) = setup();
        let first = controller
            .set_position(&mut map, LatLng::new(24.9, 67.1), PositionSource::Live)
            .unwrap();
        map.marker_mut(&first).unwrap().close_popup();

        let second = controller
            .set_position(&mut map, LatLng::new(24.95, 67.15), PositionSource::Live)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(controller.position(&map), Some(LatLng::new(24.95, 67.15)));
        // Relocation leaves the popup alone
        assert!(!map.marker(&second).unwrap().is_popup_open());
        assert_eq!(map.markers_with_role(MarkerRole::Ambulance).len(), 1);
    }

    #[test]
    fn test_manual_replaces_marker() {
        let (mut map, mut controller) = setup();
        let live = controller
            .set_position(&mut map, LatLng::new(24.9, 67.1), PositionSource::Live)
            .unwrap();
        let manual = controller
            .set_position(&mut map, LatLng::new(24.8, 67.0), PositionSource::Manual)
            .unwrap();

        assert_ne!(live, manual);
        assert!(map.marker(&live).is_none());
        let marker = map.marker(&manual).unwrap();
        assert_eq!(marker.popup_text(), Some("Ambulance"));
        assert!(marker.is_popup_open());
        assert!(marker.icon().is_none());
        assert_eq!(map.markers_with_role(MarkerRole::Ambulance).len(), 1);
    }

    #[test]
    fn test_live_after_manual_overrides_position() {
        let (mut map, mut controller) = setup();
        let manual = controller
            .set_position(&mut map, LatLng::new(24.8, 67.0), PositionSource::Manual)
            .unwrap();
        let live = controller
            .set_position(&mut map, LatLng::new(24.9, 67.1), PositionSource::Live)
            .unwrap();

        assert_eq!(manual, live);
        assert_eq!(controller.position(&map), Some(LatLng::new(24.9, 67.1)));
    }

    #[test]
    fn test_recreates_marker_removed_behind_its_back() {
        let (mut map, mut controller) = setup();
        let id = controller
            .set_position(&mut map, LatLng::new(24.9, 67.1), PositionSource::Live)
            .unwrap();
        map.remove_layer(&id).unwrap();

        let new_id = controller
            .set_position(&mut map, LatLng::new(24.91, 67.11), PositionSource::Live)
            .unwrap();
        assert_ne!(id, new_id);
        assert_eq!(map.markers_with_role(MarkerRole::Ambulance).len(), 1);
    }

    #[test]
    fn test_failed_removal_keeps_tracking_the_marker() {
        let (map, mut controller) = setup();
        let mut surface = PinnedLayers(map);
        let id = controller
            .set_position(&mut surface, LatLng::new(24.9, 67.1), PositionSource::Live)
            .unwrap();

        let result =
            controller.set_position(&mut surface, LatLng::new(24.85, 67.05), PositionSource::Manual);
        assert!(matches!(result, Err(MapError::Layer(_))));
        assert_eq!(controller.marker_id(), Some(id.as_str()));
        assert_eq!(surface.0.markers_with_role(MarkerRole::Ambulance).len(), 1);

        // The next fix still relocates the same marker
        let relocated = controller
            .set_position(&mut surface, LatLng::new(24.91, 67.11), PositionSource::Live)
            .unwrap();
        assert_eq!(relocated, id);
        assert_eq!(controller.position(&surface.0), Some(LatLng::new(24.91, 67.11)));
    }
}
