//! The dispatch page as a single-threaded event loop
//!
//! Position fixes, map clicks and the load event all land on one queue and
//! are handled to completion, one at a time, in arrival order by
//! [`DispatchView::pump`]. Nothing else mutates the map.

use crate::{
    core::{
        config::DispatchConfig,
        geo::{LatLng, Point},
        map::Map,
    },
    data::route::RouteResult,
    dispatch::{
        ambulance::{AmbulanceController, PositionSource},
        form::DispatchForm,
        renderer::{RenderedRoutes, StaticRouteRenderer},
        tracker::{LiveTracker, TrackingSession},
    },
    geolocation::{GeolocationProvider, PositionEvent, PositionSink},
    input::{InputEvent, MouseButton},
    traits::{LogNotifier, Notifier},
    MapError, Result,
};
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Everything the view reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Page finished loading; starts live tracking
    Load,
    Position(PositionEvent),
    /// Raw container input (pixel clicks, resizes)
    Input(InputEvent),
    /// Click already resolved to a map position
    Click(LatLng),
}

impl From<PositionEvent> for ViewEvent {
    fn from(event: PositionEvent) -> Self {
        ViewEvent::Position(event)
    }
}

impl From<InputEvent> for ViewEvent {
    fn from(event: InputEvent) -> Self {
        ViewEvent::Input(event)
    }
}

pub struct DispatchView {
    map: Map,
    controller: AmbulanceController,
    form: DispatchForm,
    renderer: StaticRouteRenderer,
    tracker: LiveTracker,
    route_result: Option<RouteResult>,
    rendered: Option<RenderedRoutes>,
    session: Option<TrackingSession>,
    provider: Box<dyn GeolocationProvider>,
    notifier: Box<dyn Notifier>,
    sender: Sender<ViewEvent>,
    receiver: Receiver<ViewEvent>,
    mounted: bool,
}

impl DispatchView {
    pub fn new(config: &DispatchConfig, provider: Box<dyn GeolocationProvider>) -> Result<Self> {
        config.validate()?;
        let (sender, receiver) = unbounded();

        Ok(Self {
            map: Map::from_config(config)?,
            controller: AmbulanceController::from_config(config),
            form: DispatchForm::new(config.form.clone()),
            renderer: StaticRouteRenderer::from_config(config),
            tracker: LiveTracker::from_config(config),
            route_result: None,
            rendered: None,
            session: None,
            provider,
            notifier: Box::new(LogNotifier),
            sender,
            receiver,
            mounted: false,
        })
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_form(mut self, form: DispatchForm) -> Self {
        self.form = form;
        self
    }

    /// Route result drawn once on mount
    pub fn with_route_result(mut self, result: RouteResult) -> Self {
        self.route_result = Some(result);
        self
    }

    /// Draws the route result and queues the load event. A second mount
    /// without an unmount in between does nothing.
    pub fn mount(&mut self) -> Result<()> {
        if self.mounted {
            return Ok(());
        }
        self.mounted = true;

        if self.rendered.is_none() {
            if let Some(result) = &self.route_result {
                self.rendered = Some(self.renderer.render(result, &mut self.map)?);
            }
        }

        self.post(ViewEvent::Load);
        Ok(())
    }

    /// Stops tracking and drops events still queued
    pub fn unmount(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
        let dropped = self.receiver.try_iter().count();
        if dropped > 0 {
            log::debug!("discarded {} queued event(s) on unmount", dropped);
        }
        self.mounted = false;
    }

    /// Handle for event sources living outside the view
    pub fn sender(&self) -> Sender<ViewEvent> {
        self.sender.clone()
    }

    pub fn post(&self, event: ViewEvent) {
        // The view owns the receiver, so the channel is never disconnected here
        let _ = self.sender.send(event);
    }

    /// Queues a click at a container pixel
    pub fn click_pixel(&self, position: Point) {
        self.post(ViewEvent::Input(InputEvent::Click {
            position,
            button: MouseButton::Left,
        }));
    }

    pub fn click_at(&self, position: LatLng) {
        self.post(ViewEvent::Click(position));
    }

    /// Handles every queued event in order, then dispatches the map events
    /// they produced to the map's listeners. Returns how many were handled.
    pub fn pump(&mut self) -> Result<usize> {
        let mut handled = 0;
        while let Ok(event) = self.receiver.try_recv() {
            let outcome = self.handle(event);
            self.map.process_events();
            outcome?;
            handled += 1;
        }
        self.map.process_events();
        Ok(handled)
    }

    fn handle(&mut self, event: ViewEvent) -> Result<()> {
        match event {
            ViewEvent::Load => self.start_tracking(),
            ViewEvent::Position(event) => self.tracker.handle_event(
                &event,
                &mut self.controller,
                &mut self.form,
                &mut self.map,
            ),
            ViewEvent::Input(input) => match self.map.handle_input(input) {
                Some(position) => self.handle_click(position),
                None => Ok(()),
            },
            ViewEvent::Click(position) => self.handle_click(position),
        }
    }

    fn start_tracking(&mut self) -> Result<()> {
        if !self.mounted || self.session.is_some() {
            return Ok(());
        }

        let sink = PositionSink::new(self.sender.clone());
        match self
            .tracker
            .start(self.provider.as_ref(), self.notifier.as_ref(), sink)
        {
            Ok(session) => {
                self.session = Some(session);
                Ok(())
            }
            // Already reported to the user; the rest of the page keeps working
            Err(MapError::GeolocationUnavailable) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn handle_click(&mut self, position: LatLng) -> Result<()> {
        self.controller
            .set_position(&mut self.map, position, PositionSource::Manual)?;
        self.form.set_origin(position);
        Ok(())
    }

    pub fn is_tracking(&self) -> bool {
        self.session.as_ref().is_some_and(TrackingSession::is_active)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    pub fn controller(&self) -> &AmbulanceController {
        &self.controller
    }

    pub fn form(&self) -> &DispatchForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut DispatchForm {
        &mut self.form
    }

    pub fn rendered(&self) -> Option<&RenderedRoutes> {
        self.rendered.as_ref()
    }

    pub fn ambulance_position(&self) -> Option<LatLng> {
        self.controller.position(&self.map)
    }
}

impl Drop for DispatchView {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geolocation::ChannelGeolocation, layers::marker::MarkerRole};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn view() -> (DispatchView, ChannelGeolocation) {
        let provider = ChannelGeolocation::new();
        let view =
            DispatchView::new(&DispatchConfig::default(), Box::new(provider.clone())).unwrap();
        (view, provider)
    }

    #[test]
    fn test_tracking_starts_on_load_event() {
        let (mut view, provider) = view();
        view.mount().unwrap();
        assert!(!view.is_tracking());

        assert_eq!(view.pump().unwrap(), 1);
        assert!(view.is_tracking());
        assert_eq!(provider.watcher_count(), 1);
    }

    #[test]
    fn test_events_handled_in_arrival_order() {
        let (mut view, provider) = view();
        view.mount().unwrap();
        view.pump().unwrap();

        provider.push_fix(24.9, 67.1);
        view.click_at(LatLng::new(24.8, 67.0));
        provider.push_fix(24.95, 67.15);
        assert_eq!(view.pump().unwrap(), 3);

        // The fix after the click wins
        assert_eq!(view.ambulance_position(), Some(LatLng::new(24.95, 67.15)));
        assert_eq!(view.form().origin_value(), Some("24.95,67.15"));
        assert_eq!(view.map().markers_with_role(MarkerRole::Ambulance).len(), 1);
    }

    #[test]
    fn test_pixel_click_places_marker() {
        let (mut view, _provider) = view();
        view.click_pixel(Point::new(512.0, 384.0));
        view.pump().unwrap();

        let position = view.ambulance_position().unwrap();
        assert!((position.lat - 24.8607).abs() < 1e-6);
        assert!((position.lng - 67.0011).abs() < 1e-6);
    }

    #[test]
    fn test_secondary_click_leaves_ambulance_alone() {
        let (mut view, _provider) = view();
        view.click_at(LatLng::new(24.86, 67.0));
        view.pump().unwrap();
        let id = view.controller().marker_id().unwrap().to_string();

        for button in [MouseButton::Right, MouseButton::Middle] {
            view.post(ViewEvent::Input(InputEvent::Click {
                position: Point::new(100.0, 100.0),
                button,
            }));
        }
        view.pump().unwrap();

        assert_eq!(view.controller().marker_id(), Some(id.as_str()));
        assert_eq!(view.ambulance_position(), Some(LatLng::new(24.86, 67.0)));
        assert_eq!(view.form().origin_value(), Some("24.86,67"));
    }

    #[test]
    fn test_map_events_do_not_pile_up_while_tracking() {
        let (mut view, provider) = view();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        view.map_mut().on("viewchanged", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        view.mount().unwrap();
        view.pump().unwrap();

        for step in 0..2_000 {
            let offset = step as f64 * 1e-5;
            provider.push_fix(24.9 + offset, 67.1 + offset);
            view.pump().unwrap();
        }

        assert!(view.map_mut().process_events().is_empty());
        assert_eq!(seen.load(Ordering::SeqCst), 2_000);
    }

    #[test]
    fn test_unmount_stops_tracking_and_drops_queue() {
        let (mut view, provider) = view();
        view.mount().unwrap();
        view.pump().unwrap();
        provider.push_fix(24.9, 67.1);

        view.unmount();
        assert!(!view.is_tracking());
        assert_eq!(provider.watcher_count(), 0);
        assert_eq!(view.pump().unwrap(), 0);
        assert!(view.ambulance_position().is_none());
    }

    #[test]
    fn test_remount_restarts_tracking() {
        let (mut view, provider) = view();
        view.mount().unwrap();
        view.pump().unwrap();
        view.unmount();

        view.mount().unwrap();
        view.pump().unwrap();
        assert!(view.is_tracking());
        assert_eq!(provider.watcher_count(), 1);
    }
}
