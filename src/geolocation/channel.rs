use crate::{
    geolocation::{GeolocationError, GeolocationProvider, PositionEvent, PositionOptions, PositionSink, WatchHandle},
    prelude::{Arc, Mutex},
    Result,
};

/// Provider fed by hand: every pushed event goes to all active watches.
///
/// Clones share the same watch list, so one clone can be handed to a
/// tracker while another keeps pushing fixes.
#[derive(Clone, Default)]
pub struct ChannelGeolocation {
    sinks: Arc<Mutex<Vec<PositionSink>>>,
}

impl ChannelGeolocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every active watch. Returns how many received it.
    pub fn push(&self, event: PositionEvent) -> usize {
        let Ok(mut sinks) = self.sinks.lock() else {
            return 0;
        };
        sinks.retain(PositionSink::is_active);
        sinks.iter().filter(|sink| sink.send(event.clone())).count()
    }

    pub fn push_fix(&self, lat: f64, lng: f64) -> usize {
        self.push(PositionEvent::fix(lat, lng))
    }

    pub fn push_error(&self, error: GeolocationError) -> usize {
        self.push(PositionEvent::Error(error))
    }

    /// Number of watches still subscribed
    pub fn watcher_count(&self) -> usize {
        self.sinks
            .lock()
            .map(|sinks| sinks.iter().filter(|sink| sink.is_active()).count())
            .unwrap_or(0)
    }
}

impl GeolocationProvider for ChannelGeolocation {
    fn watch_position(&self, options: &PositionOptions, sink: PositionSink) -> Result<WatchHandle> {
        log::debug!(
            "channel geolocation watch started (high accuracy: {})",
            options.enable_high_accuracy
        );
        let handle = WatchHandle::new(&sink);
        if let Ok(mut sinks) = self.sinks.lock() {
            sinks.push(sink);
        }
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_push_reaches_active_watches_only() {
        let provider = ChannelGeolocation::new();
        let (tx, rx) = unbounded::<PositionEvent>();

        let first = provider
            .watch_position(&PositionOptions::high_accuracy(), PositionSink::new(tx.clone()))
            .unwrap();
        let second = provider
            .watch_position(&PositionOptions::high_accuracy(), PositionSink::new(tx))
            .unwrap();
        assert_eq!(provider.watcher_count(), 2);

        assert_eq!(provider.push_fix(24.9, 67.1), 2);
        drop(first);
        assert_eq!(provider.push_error(GeolocationError::Timeout), 1);
        second.cancel();
        assert_eq!(provider.push_fix(25.0, 67.2), 0);
        assert_eq!(provider.watcher_count(), 0);

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(received.len(), 3);
        assert_eq!(received[2], PositionEvent::Error(GeolocationError::Timeout));
    }
}
