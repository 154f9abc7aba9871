use crate::{
    core::{
        geo::{LatLng, LatLngBounds},
        viewport::Viewport,
    },
    input::events::MapEvent,
    prelude::{HashMap, VecDeque},
    Result,
};

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Event management system for the map
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Process all queued events in emission order
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    /// Clear all events from the queue
    pub fn clear_events(&mut self) {
        self.event_queue.clear();
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

/// Map operation implementations
pub struct MapOperations;

impl MapOperations {
    /// Set the map view to a specific center and zoom.
    /// Returns whether the view actually changed.
    pub fn set_view(viewport: &mut Viewport, center: LatLng, zoom: f64) -> Result<bool> {
        let old_center = viewport.center;
        let old_zoom = viewport.zoom;

        if old_center != center || old_zoom != zoom {
            viewport.set_center(center);
            viewport.set_zoom(zoom);
        }

        Ok(viewport.center != old_center || viewport.zoom != old_zoom)
    }

    /// Fit the map to specific bounds
    pub fn fit_bounds(
        viewport: &mut Viewport,
        bounds: &LatLngBounds,
        padding: Option<f64>,
    ) -> Result<()> {
        viewport.fit_bounds(bounds, padding);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn test_listeners_receive_matching_events() {
        let mut manager = EventManager::new();
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = clicks.clone();
        manager.on("click", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.emit(MapEvent::Click {
            lat_lng: LatLng::new(24.86, 67.01),
            pixel: Point::new(10.0, 10.0),
        });
        manager.emit(MapEvent::LayerAdd {
            layer_id: "route-0".to_string(),
        });
        assert_eq!(manager.pending_events(), 2);

        let events = manager.process_events();
        assert_eq!(events.len(), 2);
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        assert_eq!(manager.pending_events(), 0);
    }

    #[test]
    fn test_set_view_reports_change() {
        let mut viewport = Viewport::new(LatLng::new(24.86, 67.0), 12.0, Point::new(800.0, 600.0));

        assert!(MapOperations::set_view(&mut viewport, LatLng::new(24.9, 67.1), 14.0).unwrap());
        assert!(!MapOperations::set_view(&mut viewport, LatLng::new(24.9, 67.1), 14.0).unwrap());
        assert_eq!(viewport.zoom, 14.0);
    }
}
