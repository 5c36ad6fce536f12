//! Owned timer handles
//!
//! Every pending callback lives in a `Timers` list owned by the component that
//! scheduled it. Dropping or clearing the list cancels everything, so no timer
//! can fire against torn-down state.

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Timer<K> {
    handle: TimerHandle,
    start: f64,
    deadline: f64,
    kind: K,
}

/// A list of pending one-shot timers driven by simulation time
#[derive(Debug, Clone)]
pub struct Timers<K> {
    /// Seconds since this list was created
    now: f64,
    next_id: u64,
    pending: Vec<Timer<K>>,
}

impl<K> Default for Timers<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Timers<K> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Current clock in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `kind` to fire after `delay_ms`
    pub fn schedule(&mut self, delay_ms: u32, kind: K) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Timer {
            handle,
            start: self.now,
            deadline: self.now + delay_ms as f64 / 1000.0,
            kind,
        });
        handle
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        self.pending.len() != before
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|t| t.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Fraction of the timer's delay already elapsed (0-1)
    pub fn progress(&self, handle: TimerHandle) -> Option<f32> {
        self.pending.iter().find(|t| t.handle == handle).map(|t| {
            let span = t.deadline - t.start;
            if span <= 0.0 {
                1.0
            } else {
                ((self.now - t.start) / span).clamp(0.0, 1.0) as f32
            }
        })
    }

    /// Advance the clock and return fired timers in deadline order
    pub fn advance(&mut self, dt: f32) -> Vec<(TimerHandle, K)> {
        self.now += dt as f64;
        let now = self.now;

        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            // Small tolerance so a deadline landing exactly on a tick boundary fires on it
            if self.pending[i].deadline <= now + 1e-9 {
                fired.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        // Stable sort keeps schedule order for equal deadlines
        fired.sort_by(|a, b| a.deadline.total_cmp(&b.deadline));
        fired.into_iter().map(|t| (t.handle, t.kind)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut timers = Timers::new();
        let handle = timers.schedule(100, "popup");
        assert!(timers.advance(0.05).is_empty());
        assert!(timers.is_pending(handle));
        let fired = timers.advance(0.05);
        assert_eq!(fired, vec![(handle, "popup")]);
        assert!(!timers.is_pending(handle));
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timers = Timers::new();
        let handle = timers.schedule(10, 1u8);
        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));
        assert!(timers.advance(1.0).is_empty());
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = Timers::new();
        timers.schedule(10, 'a');
        timers.schedule(20, 'b');
        assert_eq!(timers.cancel_all(), 2);
        assert_eq!(timers.pending_count(), 0);
        assert!(timers.advance(1.0).is_empty());
    }

    #[test]
    fn test_fire_order() {
        let mut timers = Timers::new();
        timers.schedule(30, 'c');
        timers.schedule(10, 'a');
        timers.schedule(10, 'b');
        let kinds: Vec<char> = timers.advance(1.0).into_iter().map(|(_, k)| k).collect();
        assert_eq!(kinds, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_progress() {
        let mut timers = Timers::new();
        let handle = timers.schedule(1000, ());
        timers.advance(0.25);
        assert!((timers.progress(handle).unwrap() - 0.25).abs() < 1e-4);
        timers.advance(1.0);
        assert_eq!(timers.progress(handle), None);
    }
}
