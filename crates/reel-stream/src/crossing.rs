//! One-shot detection of the "watched" threshold.
//!
//! A [`CrossingDetector`] is attached to a single response. It is fed the
//! absolute file position after every read and runs its callback the first
//! time that position reaches the threshold. The callback never runs twice
//! and the state is dropped with the response.

use std::fmt;

/// Byte offset at which a file of `total` bytes counts as watched.
pub fn threshold_bytes(total: u64, fraction: f64) -> u64 {
    (total as f64 * fraction).floor() as u64
}

/// Mutable per-response crossing bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossingState {
    /// Last absolute position observed.
    pub position: u64,
    /// Position at or beyond which the crossing fires.
    pub threshold: u64,
    fired: bool,
}

impl CrossingState {
    pub fn new(threshold: u64) -> Self {
        Self {
            position: 0,
            threshold,
            fired: false,
        }
    }

    pub fn fired(&self) -> bool {
        self.fired
    }

    /// Record `position`; returns `true` only on the observation that crosses.
    pub fn advance(&mut self, position: u64) -> bool {
        self.position = position;
        if !self.fired && position >= self.threshold {
            self.fired = true;
            return true;
        }
        false
    }
}

type OnCross = Box<dyn FnOnce() + Send + 'static>;

/// A [`CrossingState`] paired with the callback to run when it crosses.
pub struct CrossingDetector {
    state: CrossingState,
    on_cross: Option<OnCross>,
}

impl CrossingDetector {
    pub fn new(threshold: u64, on_cross: impl FnOnce() + Send + 'static) -> Self {
        Self {
            state: CrossingState::new(threshold),
            on_cross: Some(Box::new(on_cross)),
        }
    }

    /// Detector for a file of `total` bytes using `fraction` of its size.
    pub fn for_file(total: u64, fraction: f64, on_cross: impl FnOnce() + Send + 'static) -> Self {
        Self::new(threshold_bytes(total, fraction), on_cross)
    }

    /// Observe an absolute position, running the callback if this is the
    /// crossing observation.
    pub fn observe(&mut self, position: u64) {
        if self.state.advance(position) {
            tracing::debug!(
                position,
                threshold = self.state.threshold,
                "watched threshold crossed"
            );
            if let Some(on_cross) = self.on_cross.take() {
                on_cross();
            }
        }
    }

    pub fn state(&self) -> &CrossingState {
        &self.state
    }
}

impl fmt::Debug for CrossingDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossingDetector")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_detector(threshold: u64) -> (CrossingDetector, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let detector = CrossingDetector::new(threshold, move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        (detector, hits)
    }

    #[test]
    fn threshold_is_floor_of_fraction() {
        assert_eq!(threshold_bytes(1000, 0.89), 890);
        assert_eq!(threshold_bytes(999, 0.89), 889);
        assert_eq!(threshold_bytes(0, 0.89), 0);
        assert_eq!(threshold_bytes(10, 0.5), 5);
    }

    #[test]
    fn fires_once_at_threshold() {
        let (mut d, hits) = counting_detector(890);

        for pos in (10..=880).step_by(10) {
            d.observe(pos);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(!d.state().fired());

        d.observe(890);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(d.state().fired());

        d.observe(900);
        d.observe(1000);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(d.state().position, 1000);
    }

    #[test]
    fn fires_when_jumping_past_threshold() {
        let (mut d, hits) = counting_detector(890);
        d.observe(950);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn never_fires_below_threshold() {
        let (mut d, hits) = counting_detector(890);
        for pos in 0..890 {
            d.observe(pos);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn state_advance_reports_only_the_crossing() {
        let mut s = CrossingState::new(5);
        assert!(!s.advance(4));
        assert!(s.advance(5));
        assert!(!s.advance(6));
        assert!(s.fired());
    }
}
