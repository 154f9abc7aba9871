//! Shared trait abstractions
//!
//! The dispatch components never talk to a concrete map: they go through
//! [`MapSurface`], which [`crate::core::map::Map`] implements. User-facing
//! alerts go through [`Notifier`].

use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::{base::LayerTrait, marker::Marker},
    Result,
};

/// Trait for layer-like objects
pub trait LayerOperations: Send + Sync {
    /// Get layer ID
    fn id(&self) -> &str;

    /// Get layer name
    fn name(&self) -> &str;

    /// Get layer type
    fn layer_type(&self) -> crate::layers::base::LayerType;

    /// Check if layer is visible
    fn is_visible(&self) -> bool;

    /// Set layer visibility
    fn set_visible(&mut self, visible: bool);

    /// Get layer opacity (0.0 to 1.0)
    fn opacity(&self) -> f32;

    /// Set layer opacity
    fn set_opacity(&mut self, opacity: f32);

    /// Get layer z-index for ordering
    fn z_index(&self) -> i32;

    /// Set layer z-index
    fn set_z_index(&mut self, z_index: i32);

    /// Get layer bounds if applicable
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    /// Snapshot of the layer's drawable state
    fn options(&self) -> serde_json::Value;

    /// Dynamic casting support
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// The mapping surface the dispatch components draw onto
pub trait MapSurface {
    /// Centers the view, overriding any previous view
    fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()>;

    /// Fits the view to `bounds`
    fn fit_bounds(&mut self, bounds: &LatLngBounds) -> Result<()>;

    fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()>;

    /// Removes a layer; removing an unknown id is a no-op
    fn remove_layer(&mut self, layer_id: &str) -> Result<()>;

    fn has_layer(&self, layer_id: &str) -> bool;

    /// Read access to a marker layer, `None` if absent or not a marker
    fn marker(&self, layer_id: &str) -> Option<&Marker>;

    /// Mutable access to a marker layer, `None` if absent or not a marker
    fn marker_mut(&mut self, layer_id: &str) -> Option<&mut Marker>;

    /// Hands out a layer id never used before on this surface
    fn next_layer_id(&mut self, prefix: &str) -> String;

    /// Records that a marker's popup was opened
    fn popup_opened(&mut self, _layer_id: &str) {}
}

/// Sink for blocking, user-facing messages
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Default notifier: alerts become warnings in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        log::warn!("alert: {}", message);
    }
}
