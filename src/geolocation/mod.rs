//! Position streams
//!
//! A [`GeolocationProvider`] repeatedly reports fixes or errors into a
//! [`PositionSink`] until the returned [`WatchHandle`] is cancelled or
//! dropped. Providers never call back into map state directly: the sink
//! forwards events onto the consumer's queue, which handles them in
//! delivery order.

pub mod channel;
#[cfg(feature = "tokio-runtime")]
pub mod replay;

pub use channel::ChannelGeolocation;
#[cfg(feature = "tokio-runtime")]
pub use replay::ReplayGeolocation;

use crate::{core::geo::LatLng, runtime::AsyncHandle, MapError, Result};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Per-update provider failure, mirroring the W3C error codes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeolocationError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timeout expired")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

impl GeolocationError {
    pub fn from_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            2 => GeolocationError::PositionUnavailable,
            3 => GeolocationError::Timeout,
            _ => GeolocationError::Other(message.into()),
        }
    }

    /// W3C code; `0` for errors outside the standard set
    pub fn code(&self) -> u16 {
        match self {
            GeolocationError::PermissionDenied => 1,
            GeolocationError::PositionUnavailable => 2,
            GeolocationError::Timeout => 3,
            GeolocationError::Other(_) => 0,
        }
    }
}

/// Options passed to `watch_position`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: Option<u64>,
    pub maximum_age_ms: Option<u64>,
}

impl PositionOptions {
    pub fn high_accuracy() -> Self {
        Self {
            enable_high_accuracy: true,
            ..Self::default()
        }
    }
}

/// One report from a position stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionEvent {
    Fix(LatLng),
    Error(GeolocationError),
}

impl PositionEvent {
    pub fn fix(lat: f64, lng: f64) -> Self {
        PositionEvent::Fix(LatLng::new(lat, lng))
    }
}

type Deliver = dyn Fn(PositionEvent) -> bool + Send + Sync;

/// Delivery end of a watch, handed to the provider
#[derive(Clone)]
pub struct PositionSink {
    deliver: Arc<Deliver>,
    active: Arc<AtomicBool>,
}

impl PositionSink {
    /// Forwards events into `sender`, converting them into the queue's
    /// item type
    pub fn new<T>(sender: Sender<T>) -> Self
    where
        T: From<PositionEvent> + Send + 'static,
    {
        Self::from_fn(move |event| sender.send(T::from(event)).is_ok())
    }

    pub fn from_fn<F>(deliver: F) -> Self
    where
        F: Fn(PositionEvent) -> bool + Send + Sync + 'static,
    {
        Self {
            deliver: Arc::new(deliver),
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Delivers one event. Returns false once the watch is cancelled or
    /// the receiving side is gone; providers should stop then.
    pub fn send(&self, event: PositionEvent) -> bool {
        if !self.is_active() {
            return false;
        }
        if (self.deliver)(event) {
            true
        } else {
            self.active.store(false, Ordering::SeqCst);
            false
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for PositionSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionSink")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Subscription returned by `watch_position`; cancels on drop
pub struct WatchHandle {
    active: Arc<AtomicBool>,
    task: Option<Box<dyn AsyncHandle>>,
}

impl WatchHandle {
    pub fn new(sink: &PositionSink) -> Self {
        Self {
            active: sink.active.clone(),
            task: None,
        }
    }

    /// Ties a background task to the watch; cancelling aborts it
    pub fn with_task(sink: &PositionSink, task: Box<dyn AsyncHandle>) -> Self {
        Self {
            active: sink.active.clone(),
            task: Some(task),
        }
    }

    pub fn cancel(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            log::debug!("position watch cancelled");
        }
        if let Some(task) = &self.task {
            task.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.is_active())
            .field("has_task", &self.task.is_some())
            .finish()
    }
}

/// Source of continuous device positions
pub trait GeolocationProvider {
    /// Whether the capability exists at all on this device
    fn is_available(&self) -> bool {
        true
    }

    /// Starts streaming positions into `sink` until the handle is cancelled
    fn watch_position(&self, options: &PositionOptions, sink: PositionSink) -> Result<WatchHandle>;
}

/// Provider for devices without geolocation support
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedGeolocation;

impl GeolocationProvider for UnsupportedGeolocation {
    fn is_available(&self) -> bool {
        false
    }

    fn watch_position(&self, _options: &PositionOptions, _sink: PositionSink) -> Result<WatchHandle> {
        Err(MapError::GeolocationUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_error_codes() {
        assert_eq!(GeolocationError::from_code(1, ""), GeolocationError::PermissionDenied);
        assert_eq!(GeolocationError::from_code(3, ""), GeolocationError::Timeout);
        assert_eq!(
            GeolocationError::from_code(9, "glitch"),
            GeolocationError::Other("glitch".to_string())
        );
        assert_eq!(GeolocationError::PositionUnavailable.code(), 2);
    }

    #[test]
    fn test_sink_stops_after_cancel() {
        let (tx, rx) = unbounded::<PositionEvent>();
        let sink = PositionSink::new(tx);
        let handle = WatchHandle::new(&sink);

        assert!(sink.send(PositionEvent::fix(24.9, 67.1)));
        handle.cancel();
        assert!(!handle.is_active());
        assert!(!sink.send(PositionEvent::fix(25.0, 67.2)));

        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_drop_cancels_watch() {
        let (tx, _rx) = unbounded::<PositionEvent>();
        let sink = PositionSink::new(tx);
        drop(WatchHandle::new(&sink));
        assert!(!sink.is_active());
    }

    #[test]
    fn test_sink_deactivates_when_receiver_is_gone() {
        let (tx, rx) = unbounded::<PositionEvent>();
        let sink = PositionSink::new(tx);
        drop(rx);
        assert!(!sink.send(PositionEvent::fix(24.9, 67.1)));
        assert!(!sink.is_active());
    }

    #[test]
    fn test_track_json_format() {
        let events: Vec<PositionEvent> = serde_json::from_str(
            r#"[{ "fix": { "lat": 24.9, "lng": 67.1 } }, { "error": "timeout" }]"#,
        )
        .unwrap();
        assert_eq!(events[0], PositionEvent::fix(24.9, 67.1));
        assert_eq!(events[1], PositionEvent::Error(GeolocationError::Timeout));
    }

    #[test]
    fn test_unsupported_provider() {
        let (tx, _rx) = unbounded::<PositionEvent>();
        let provider = UnsupportedGeolocation;
        assert!(!provider.is_available());
        assert!(matches!(
            provider.watch_position(&PositionOptions::default(), PositionSink::new(tx)),
            Err(MapError::GeolocationUnavailable)
        ));
    }
}
