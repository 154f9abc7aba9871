use crate::{
    core::config::DispatchConfig,
    dispatch::{
        ambulance::{AmbulanceController, PositionSource},
        form::DispatchForm,
    },
    geolocation::{GeolocationProvider, PositionEvent, PositionOptions, PositionSink, WatchHandle},
    traits::{MapSurface, Notifier},
    MapError, Result,
};

/// Shown when the device has no geolocation capability
pub const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported by your browser.";

/// Follows a position stream: each fix moves the ambulance, writes the
/// origin field and re-centers the map at the tracking zoom.
#[derive(Debug, Clone)]
pub struct LiveTracker {
    options: PositionOptions,
    tracking_zoom: f64,
}

impl LiveTracker {
    pub fn new(options: PositionOptions, tracking_zoom: f64) -> Self {
        Self {
            options,
            tracking_zoom,
        }
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new(config.tracking.clone(), config.view.tracking_zoom)
    }

    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Subscribes `sink` to `provider`.
    ///
    /// Without a geolocation capability the user is alerted once and
    /// tracking does not start.
    pub fn start(
        &self,
        provider: &dyn GeolocationProvider,
        notifier: &dyn Notifier,
        sink: PositionSink,
    ) -> Result<TrackingSession> {
        if !provider.is_available() {
            log::warn!("geolocation unavailable, live tracking not started");
            notifier.alert(UNSUPPORTED_MESSAGE);
            return Err(MapError::GeolocationUnavailable);
        }

        match provider.watch_position(&self.options, sink) {
            Ok(watch) => {
                log::info!(
                    "live tracking started (high accuracy: {})",
                    self.options.enable_high_accuracy
                );
                Ok(TrackingSession { watch: Some(watch) })
            }
            Err(MapError::GeolocationUnavailable) => {
                log::warn!("geolocation unavailable, live tracking not started");
                notifier.alert(UNSUPPORTED_MESSAGE);
                Err(MapError::GeolocationUnavailable)
            }
            Err(e) => Err(e),
        }
    }

    /// Applies one stream event. Errors are logged and change nothing.
    pub fn handle_event<S: MapSurface + ?Sized>(
        &self,
        event: &PositionEvent,
        controller: &mut AmbulanceController,
        form: &mut DispatchForm,
        surface: &mut S,
    ) -> Result<()> {
        match event {
            PositionEvent::Fix(position) => {
                controller.set_position(surface, *position, PositionSource::Live)?;
                form.set_origin(*position);
                surface.set_view(*position, self.tracking_zoom)
            }
            PositionEvent::Error(e) => {
                log::error!("GPS error: {}", e);
                Ok(())
            }
        }
    }
}

/// A running position watch. Stopping or dropping it releases the
/// provider subscription.
#[derive(Debug)]
pub struct TrackingSession {
    watch: Option<WatchHandle>,
}

impl TrackingSession {
    pub fn stop(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.cancel();
            log::info!("live tracking stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.watch.as_ref().is_some_and(WatchHandle::is_active)
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        self.stop();
    }
}
