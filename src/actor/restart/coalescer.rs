use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;

use crate::resource::ResourceId;

/// Default coalescing window.
pub const DEFAULT_DELAY_MS: u64 = 3000;

/// State of the single flush timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Idle,
    Armed(Instant),
    /// Batch handed out, waiting for [`Coalescer::settle`]
    Dispatching,
}

/// Pure restart coalescer: pending set plus a single fire-once deadline.
///
/// The deadline is armed when the set goes from empty to non-empty and is
/// never pushed back by later arrivals, so a steady stream of changes cannot
/// starve restarts. Time is passed in by the caller.
#[derive(Debug)]
pub struct Coalescer {
    delay: Duration,
    /// Insertion-ordered pending ids
    pending: Vec<ResourceId>,
    /// Membership index for `pending`
    index: FxHashSet<ResourceId>,
    timer: Timer,
}

impl Coalescer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Vec::new(),
            index: FxHashSet::default(),
            timer: Timer::Idle,
        }
    }

    /// Queue a resource for restart.
    ///
    /// Returns `true` if this call armed the timer.
    pub fn add(&mut self, id: ResourceId, now: Instant) -> bool {
        if !self.index.insert(id.clone()) {
            return false;
        }
        let was_empty = self.pending.is_empty();
        self.pending.push(id);

        if was_empty && self.timer == Timer::Idle {
            self.timer = Timer::Armed(now + self.delay);
            return true;
        }
        false
    }

    /// Drain the pending set once the deadline has passed.
    ///
    /// The returned batch must be followed by [`settle`](Self::settle) after
    /// dispatch. Never returns an empty batch.
    pub fn flush(&mut self, now: Instant) -> Option<Vec<ResourceId>> {
        if !self.is_due(now) {
            return None;
        }

        let drained = std::mem::take(&mut self.pending);
        self.index.clear();

        let mut seen = FxHashSet::default();
        let batch: Vec<_> = drained
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        if batch.is_empty() {
            self.timer = Timer::Idle;
            return None;
        }
        self.timer = Timer::Dispatching;
        Some(batch)
    }

    /// Close out a dispatched batch.
    ///
    /// Ids queued while the batch was out get a fresh window right away;
    /// otherwise the timer goes idle and the next `add` arms it.
    pub fn settle(&mut self, now: Instant) {
        if self.timer != Timer::Dispatching {
            return;
        }
        self.timer = if self.pending.is_empty() {
            Timer::Idle
        } else {
            Timer::Armed(now + self.delay)
        };
    }

    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.timer, Timer::Armed(deadline) if now >= deadline)
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        matches!(self.timer, Timer::Armed(_))
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.timer == Timer::Idle
    }

    pub fn pending(&self) -> &[ResourceId] {
        &self.pending
    }

    /// Time left until the deadline; effectively forever when not armed.
    pub fn sleep_duration(&self, now: Instant) -> Duration {
        match self.timer {
            Timer::Armed(deadline) => deadline.saturating_duration_since(now),
            Timer::Idle | Timer::Dispatching => Duration::from_secs(86400),
        }
    }
}

impl Default for Coalescer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DELAY_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn names(batch: &[ResourceId]) -> Vec<&str> {
        batch.iter().map(ResourceId::as_str).collect()
    }

    #[test]
    fn test_idle_coalescer() {
        let c = Coalescer::default();
        let now = Instant::now();
        assert!(!c.is_armed());
        assert!(!c.is_due(now));
        assert!(c.sleep_duration(now) >= Duration::from_secs(3600));
    }

    #[test]
    fn test_first_add_arms_window() {
        let mut c = Coalescer::default();
        let t0 = Instant::now();

        assert!(c.add("a".into(), t0));
        assert!(c.is_armed());
        assert_eq!(c.sleep_duration(t0), ms(DEFAULT_DELAY_MS));
    }

    #[test]
    fn test_same_id_collapses() {
        let mut c = Coalescer::default();
        let t0 = Instant::now();

        for i in 0..10 {
            c.add("a".into(), t0 + ms(i * 10));
        }
        assert_eq!(c.pending().len(), 1);

        let batch = c.flush(t0 + ms(DEFAULT_DELAY_MS)).unwrap();
        assert_eq!(names(&batch), ["a"]);
    }

    #[test]
    fn test_distinct_ids_batch_into_one_flush() {
        let mut c = Coalescer::default();
        let t0 = Instant::now();

        c.add("a".into(), t0);
        c.add("b".into(), t0 + ms(100));
        c.add("c".into(), t0 + ms(200));

        assert!(c.flush(t0 + ms(2999)).is_none());
        let batch = c.flush(t0 + ms(3000)).unwrap();
        assert_eq!(names(&batch), ["a", "b", "c"]);
        c.settle(t0 + ms(3000));
        assert!(c.is_idle());
        assert!(c.flush(t0 + ms(9000)).is_none());
    }

    #[test]
    fn test_arrival_does_not_extend_window() {
        let mut c = Coalescer::default();
        let t0 = Instant::now();

        assert!(c.add("a".into(), t0));
        assert!(!c.add("b".into(), t0 + ms(2500)));

        // Deadline still anchored at t0 + 3000
        assert_eq!(c.sleep_duration(t0 + ms(2500)), ms(500));
        assert!(c.is_due(t0 + ms(3000)));
    }

    #[test]
    fn test_duplicate_window_then_new_window() {
        let mut c = Coalescer::default();
        let t0 = Instant::now();

        c.add("a".into(), t0);
        c.add("b".into(), t0 + ms(200));
        c.add("a".into(), t0 + ms(400));
        let batch = c.flush(t0 + ms(3000)).unwrap();
        assert_eq!(names(&batch), ["a", "b"]);
        c.settle(t0 + ms(3000));
        assert!(c.is_idle());

        // Same resource changes again after the flush
        assert!(c.add("a".into(), t0 + ms(3500)));
        assert!(c.flush(t0 + ms(6499)).is_none());
        let batch = c.flush(t0 + ms(6500)).unwrap();
        assert_eq!(names(&batch), ["a"]);
    }

    #[test]
    fn test_settle_rearms_when_refilled() {
        let mut c = Coalescer::default();
        let t0 = Instant::now();

        c.add("a".into(), t0);
        let _ = c.flush(t0 + ms(3000)).unwrap();
        assert!(!c.is_armed());
        assert!(!c.is_idle());

        // Arrives while the batch is being dispatched: no second timer
        assert!(!c.add("b".into(), t0 + ms(3001)));
        assert!(!c.is_armed());

        c.settle(t0 + ms(3002));
        assert!(c.is_armed());
        assert_eq!(c.sleep_duration(t0 + ms(3002)), ms(DEFAULT_DELAY_MS));
        let batch = c.flush(t0 + ms(6002)).unwrap();
        assert_eq!(names(&batch), ["b"]);
    }

    #[test]
    fn test_settle_on_empty_keeps_idle() {
        let mut c = Coalescer::new(ms(50));
        let t0 = Instant::now();
        c.add("a".into(), t0);
        let _ = c.flush(t0 + ms(50));
        c.settle(t0 + ms(50));
        assert!(c.is_idle());
        assert!(c.pending().is_empty());
    }

    #[test]
    fn test_flush_before_deadline_keeps_pending() {
        let mut c = Coalescer::default();
        let t0 = Instant::now();
        c.add("a".into(), t0);

        assert!(c.flush(t0 + ms(10)).is_none());
        assert_eq!(c.pending().len(), 1);
        assert!(c.is_armed());
    }
}
