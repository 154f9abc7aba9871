use crate::{
    geolocation::{GeolocationProvider, PositionEvent, PositionOptions, PositionSink, WatchHandle},
    prelude::Duration,
    runtime, MapError, Result,
};

/// Replays a recorded track at a fixed interval on the tokio runtime.
///
/// The first event is delivered immediately, the rest one `interval`
/// apart. The stream ends after the last event; cancelling the watch
/// aborts the replay task.
#[derive(Debug, Clone)]
pub struct ReplayGeolocation {
    track: Vec<PositionEvent>,
    interval: Duration,
}

impl ReplayGeolocation {
    pub fn new(track: Vec<PositionEvent>, interval: Duration) -> Self {
        Self { track, interval }
    }

    /// Parses a JSON track, e.g. `[{"fix": {"lat": 24.9, "lng": 67.1}}, {"error": "timeout"}]`
    pub fn from_json_str(json: &str, interval: Duration) -> Result<Self> {
        let track: Vec<PositionEvent> = serde_json::from_str(json)?;
        Ok(Self::new(track, interval))
    }

    pub fn track(&self) -> &[PositionEvent] {
        &self.track
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl GeolocationProvider for ReplayGeolocation {
    /// Needs a running tokio runtime. Without one the replay is misconfigured
    /// rather than unsupported, so the user is not alerted.
    fn watch_position(&self, _options: &PositionOptions, sink: PositionSink) -> Result<WatchHandle> {
        if ::tokio::runtime::Handle::try_current().is_err() {
            return Err(no_runtime());
        }

        let track = self.track.clone();
        let period = self.interval.max(Duration::from_millis(1));
        let task_sink = sink.clone();

        let task = runtime::spawn(async move {
            let mut ticker = ::tokio::time::interval(period);
            for event in track {
                ticker.tick().await;
                if !task_sink.send(event) {
                    log::debug!("replay stopped: watch released");
                    return;
                }
            }
            log::debug!("replay finished");
        })
        .ok_or_else(no_runtime)?;

        Ok(WatchHandle::with_task(&sink, task))
    }
}

fn no_runtime() -> MapError {
    MapError::Config("track replay needs a running tokio runtime".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[::tokio::test]
    async fn test_replay_delivers_track_in_order() {
        let provider = ReplayGeolocation::new(
            vec![PositionEvent::fix(24.9, 67.1), PositionEvent::fix(24.91, 67.11)],
            Duration::from_millis(5),
        );
        let (tx, rx) = unbounded::<PositionEvent>();
        let _handle = provider
            .watch_position(&PositionOptions::high_accuracy(), PositionSink::new(tx))
            .unwrap();

        ::tokio::time::sleep(Duration::from_millis(100)).await;
        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(received, provider.track().to_vec());
    }

    #[::tokio::test]
    async fn test_cancel_stops_replay() {
        let provider = ReplayGeolocation::new(
            vec![PositionEvent::fix(24.9, 67.1); 50],
            Duration::from_millis(20),
        );
        let (tx, rx) = unbounded::<PositionEvent>();
        let handle = provider
            .watch_position(&PositionOptions::default(), PositionSink::new(tx))
            .unwrap();

        ::tokio::time::sleep(Duration::from_millis(30)).await;
        handle.cancel();
        let delivered = rx.try_iter().count();
        ::tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(delivered < 50);
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_missing_runtime_is_a_config_error() {
        let provider =
            ReplayGeolocation::new(vec![PositionEvent::fix(24.9, 67.1)], Duration::from_millis(5));
        assert!(provider.is_available());

        let (tx, _rx) = unbounded::<PositionEvent>();
        let result = provider.watch_position(&PositionOptions::default(), PositionSink::new(tx));
        assert!(matches!(result, Err(MapError::Config(_))));
    }
}
