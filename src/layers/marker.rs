use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::base::{LayerProperties, LayerTrait, LayerType},
};
use serde::{Deserialize, Serialize};

/// Image icon for a marker, sized in pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub url: String,
    pub size: (u32, u32),
}

impl MarkerIcon {
    pub fn new(url: impl Into<String>, size: (u32, u32)) -> Self {
        Self {
            url: url.into(),
            size,
        }
    }
}

/// What a marker stands for on the dispatch map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerRole {
    /// Plain pin with the default icon
    Plain,
    /// Route origin drawn from a route result
    Origin,
    /// The single, movable ambulance marker
    Ambulance,
    BestDestination,
    Destination,
}

impl MarkerRole {
    pub fn is_destination(&self) -> bool {
        matches!(self, MarkerRole::BestDestination | MarkerRole::Destination)
    }
}

pub struct Marker {
    properties: LayerProperties,
    position: LatLng,
    role: MarkerRole,
    /// `None` draws the default pin
    icon: Option<MarkerIcon>,
    popup_text: Option<String>,
    popup_open: bool,
}

impl Marker {
    pub fn new(id: String, position: LatLng) -> Self {
        let properties = LayerProperties::new(id, "Marker".to_string(), LayerType::Marker);
        Self {
            properties,
            position,
            role: MarkerRole::Plain,
            icon: None,
            popup_text: None,
            popup_open: false,
        }
    }

    pub fn with_role(mut self, role: MarkerRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_icon(mut self, icon: MarkerIcon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Binds popup content; the popup stays closed until [`Marker::open_popup`]
    pub fn with_popup(mut self, text: impl Into<String>) -> Self {
        self.popup_text = Some(text.into());
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    /// Moves the marker in place; popup state is left untouched
    pub fn set_position(&mut self, position: LatLng) {
        self.position = position;
    }

    pub fn role(&self) -> MarkerRole {
        self.role
    }

    pub fn icon(&self) -> Option<&MarkerIcon> {
        self.icon.as_ref()
    }

    pub fn popup_text(&self) -> Option<&str> {
        self.popup_text.as_deref()
    }

    /// Opens the bound popup. Returns false when no popup is bound.
    pub fn open_popup(&mut self) -> bool {
        self.popup_open = self.popup_text.is_some();
        self.popup_open
    }

    pub fn close_popup(&mut self) {
        self.popup_open = false;
    }

    pub fn is_popup_open(&self) -> bool {
        self.popup_open
    }
}

impl LayerTrait for Marker {
    crate::impl_layer_trait!(Marker, properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "position": {
                "lat": self.position.lat,
                "lng": self.position.lng
            },
            "role": self.role,
            "icon": self.icon,
            "popup": self.popup_text,
            "popup_open": self.popup_open
        })
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(LatLngBounds::new(self.position, self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_requires_content() {
        let mut bare = Marker::new("bare".to_string(), LatLng::new(24.86, 67.01));
        assert!(!bare.open_popup());
        assert!(!bare.is_popup_open());

        let mut marker = Marker::new("m".to_string(), LatLng::new(24.86, 67.01)).with_popup("Hospital");
        assert!(!marker.is_popup_open());
        assert!(marker.open_popup());
        assert_eq!(marker.popup_text(), Some("Hospital"));

        marker.close_popup();
        assert!(!marker.is_popup_open());
    }

    #[test]
    fn test_set_position_keeps_popup_state() {
        let mut marker = Marker::new("m".to_string(), LatLng::new(24.86, 67.01)).with_popup("Ambulance");
        marker.open_popup();

        marker.set_position(LatLng::new(24.9, 67.1));

        assert_eq!(marker.position(), LatLng::new(24.9, 67.1));
        assert!(marker.is_popup_open());
        assert_eq!(marker.id(), "m");
    }

    #[test]
    fn test_options_snapshot() {
        let marker = Marker::new("best".to_string(), LatLng::new(24.9, 67.1))
            .with_role(MarkerRole::BestDestination)
            .with_icon(MarkerIcon::new("best.png", (30, 30)));

        let options = marker.options();
        assert_eq!(options["role"], "best_destination");
        assert_eq!(options["icon"]["url"], "best.png");
        assert_eq!(options["position"]["lat"], 24.9);
    }
}
