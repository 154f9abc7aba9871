use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};

/// Raw input delivered to the map container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Single click/tap at a container pixel
    Click {
        position: Point,
        button: MouseButton,
    },
    /// Viewport/window resize
    Resize { size: Point },
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::Click { position, .. } => Some(*position),
            InputEvent::Resize { .. } => None,
        }
    }
}

/// Map event types that can be emitted by the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Map view has changed (center or zoom)
    ViewChanged { center: LatLng, zoom: f64 },
    /// View was fitted to the given bounds
    BoundsFitted { bounds: LatLngBounds },
    /// Mouse/touch click on the map
    Click { lat_lng: LatLng, pixel: Point },
    /// Layer was added to the map
    LayerAdd { layer_id: String },
    /// Layer was removed from the map
    LayerRemove { layer_id: String },
    /// A marker popup was opened
    PopupOpen { layer_id: String },
}

impl MapEvent {
    /// Listener key, Leaflet style
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::BoundsFitted { .. } => "boundsfitted",
            MapEvent::Click { .. } => "click",
            MapEvent::LayerAdd { .. } => "layeradd",
            MapEvent::LayerRemove { .. } => "layerremove",
            MapEvent::PopupOpen { .. } => "popupopen",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_event_position() {
        let click = InputEvent::Click {
            position: Point::new(100.0, 200.0),
            button: MouseButton::Left,
        };
        assert_eq!(click.position(), Some(Point::new(100.0, 200.0)));

        let resize = InputEvent::Resize {
            size: Point::new(640.0, 480.0),
        };
        assert_eq!(resize.position(), None);
    }

    #[test]
    fn test_event_types() {
        let click = MapEvent::Click {
            lat_lng: LatLng::new(24.86, 67.01),
            pixel: Point::new(0.0, 0.0),
        };
        assert_eq!(click.event_type(), "click");
        assert_eq!(
            MapEvent::PopupOpen {
                layer_id: "ambulance-1".to_string()
            }
            .event_type(),
            "popupopen"
        );
    }
}
