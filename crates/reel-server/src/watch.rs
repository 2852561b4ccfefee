//! Marking a video watched once enough of it has been served.

use std::sync::Arc;

use reel_stream::CrossingDetector;
use tokio::runtime::Handle;

use crate::library::WatchedStatusStore;
use crate::resolver::WatchContext;

/// Builds crossing detectors whose callback records a view in the store.
///
/// The write runs on the blocking pool of the runtime that built the
/// notifier. Nothing awaits it: the response keeps streaming, and a failed
/// write is logged and dropped.
#[derive(Clone)]
pub struct WatchNotifier {
    handle: Handle,
    store: Arc<dyn WatchedStatusStore>,
}

impl WatchNotifier {
    /// Must be called from within a Tokio runtime.
    pub fn new(store: Arc<dyn WatchedStatusStore>) -> Self {
        Self {
            handle: Handle::current(),
            store,
        }
    }

    /// A detector for a file of `total` bytes that marks `watch` as watched
    /// once `fraction` of it has been read.
    pub fn detector(&self, watch: WatchContext, total: u64, fraction: f64) -> CrossingDetector {
        let notifier = self.clone();
        CrossingDetector::for_file(total, fraction, move || notifier.dispatch(watch))
    }

    fn dispatch(&self, watch: WatchContext) {
        let store = self.store.clone();
        // Detached: the join handle is dropped, so a panic stays in the task.
        drop(self.handle.spawn_blocking(move || {
            match store.mark_watched(watch.video, watch.user) {
                Ok(()) => tracing::info!(
                    video = %watch.video,
                    user = %watch.user,
                    "Marked video watched"
                ),
                Err(e) => tracing::warn!(
                    video = %watch.video,
                    user = %watch.user,
                    "Failed to mark video watched: {e}"
                ),
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use reel_core::{UserId, VideoId};
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingStore {
        marks: Mutex<Vec<(VideoId, UserId)>>,
    }

    impl WatchedStatusStore for RecordingStore {
        fn mark_watched(&self, video: VideoId, user: UserId) -> reel_core::Result<()> {
            self.marks.lock().push((video, user));
            Ok(())
        }
    }

    #[derive(Default)]
    struct FailingStore {
        calls: Mutex<usize>,
    }

    impl WatchedStatusStore for FailingStore {
        fn mark_watched(&self, _: VideoId, _: UserId) -> reel_core::Result<()> {
            *self.calls.lock() += 1;
            Err(reel_core::Error::Internal("store offline".into()))
        }
    }

    async fn wait_for(store: &RecordingStore, n: usize) -> bool {
        for _ in 0..100 {
            if store.marks.lock().len() >= n {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn crossing_records_one_view() {
        let store = Arc::new(RecordingStore::default());
        let notifier = WatchNotifier::new(store.clone());
        let watch = WatchContext {
            video: VideoId::new(),
            user: UserId::new(),
        };

        let mut detector = notifier.detector(watch, 1000, 0.89);
        detector.observe(500);
        detector.observe(890);
        detector.observe(1000);

        assert!(wait_for(&store, 1).await);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*store.marks.lock(), vec![(watch.video, watch.user)]);
    }

    #[tokio::test]
    async fn below_threshold_records_nothing() {
        let store = Arc::new(RecordingStore::default());
        let notifier = WatchNotifier::new(store.clone());
        let watch = WatchContext {
            video: VideoId::new(),
            user: UserId::new(),
        };

        let mut detector = notifier.detector(watch, 1000, 0.89);
        detector.observe(889);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.marks.lock().is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_swallowed() {
        let store = Arc::new(FailingStore::default());
        let notifier = WatchNotifier::new(store.clone());
        let watch = WatchContext {
            video: VideoId::new(),
            user: UserId::new(),
        };
        let mut detector = notifier.detector(watch, 10, 0.5);
        detector.observe(10);
        detector.observe(10);
        assert!(detector.state().fired());

        for _ in 0..100 {
            if *store.calls.lock() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*store.calls.lock(), 1);
    }
}
