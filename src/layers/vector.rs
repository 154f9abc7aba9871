use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::base::{LayerProperties, LayerTrait, LayerType},
};
use serde::{Deserialize, Serialize};

/// Serializable RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    /// CSS `green`
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    /// CSS `gray`
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#rrggbb` form, alpha omitted
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Style for line features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Line color
    pub color: SerializableColor,
    /// Stroke weight in pixels
    pub weight: f32,
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
    /// Line dash pattern (empty for solid line)
    pub dash_pattern: Vec<f32>,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::rgb(0, 0, 255),
            weight: 3.0,
            opacity: 1.0,
            dash_pattern: Vec::new(),
        }
    }
}

/// A polyline layer, drawn through `points` in order
pub struct Polyline {
    properties: LayerProperties,
    points: Vec<LatLng>,
    style: LineStyle,
}

impl Polyline {
    pub fn new(id: String, points: Vec<LatLng>) -> Self {
        let properties = LayerProperties::new(id, "Polyline".to_string(), LayerType::Vector);
        Self {
            properties,
            points,
            style: LineStyle::default(),
        }
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.properties.opacity = style.opacity.clamp(0.0, 1.0);
        self.style = style;
        self
    }

    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    pub fn style(&self) -> &LineStyle {
        &self.style
    }
}

impl LayerTrait for Polyline {
    crate::impl_layer_trait!(Polyline, properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "points": self.points.iter().map(|p| [p.lat, p.lng]).collect::<Vec<_>>(),
            "color": self.style.color.to_hex(),
            "weight": self.style.weight,
            "opacity": self.style.opacity,
        })
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(&self.points)
    }
}
