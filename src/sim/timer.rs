//! One-shot deferred actions keyed on the session clock
//!
//! Sessions never reach for ambient timers. A delayed completion report or ball
//! reset is queued here with a fire time, polled every frame, and dropped for
//! good once the owning session is torn down.

/// A queued action with its fire time (session clock, ms)
#[derive(Debug, Clone, PartialEq)]
struct Pending<A> {
    fire_at_ms: f64,
    action: A,
}

/// Cancellable one-shot timer queue
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    pending: Vec<Pending<A>>,
    cancelled: bool,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            cancelled: false,
        }
    }

    /// Queue `action` to fire `delay_ms` after `now_ms`. Ignored once cancelled.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, action: A) {
        if self.cancelled {
            return;
        }
        self.pending.push(Pending {
            fire_at_ms: now_ms + delay_ms,
            action,
        });
    }

    /// Remove and return every action due at `now_ms`, in scheduling order
    pub fn poll(&mut self, now_ms: f64) -> Vec<A> {
        if self.cancelled {
            return Vec::new();
        }
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].fire_at_ms <= now_ms {
                due.push(self.pending.remove(i).action);
            } else {
                i += 1;
            }
        }
        due
    }

    /// Drop everything pending and refuse future work
    pub fn cancel(&mut self) {
        self.pending.clear();
        self.cancelled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_when_due() {
        let mut timers = Scheduler::new();
        timers.schedule(0.0, 1500.0, "report");
        assert!(timers.poll(1499.0).is_empty());
        assert_eq!(timers.poll(1500.0), vec!["report"]);
        assert!(timers.poll(5000.0).is_empty());
        assert!(timers.pending.is_empty());
    }

    #[test]
    fn test_preserves_scheduling_order() {
        let mut timers = Scheduler::new();
        timers.schedule(0.0, 100.0, 1);
        timers.schedule(0.0, 50.0, 2);
        timers.schedule(0.0, 500.0, 3);
        assert_eq!(timers.poll(200.0), vec![1, 2]);
        assert!(timers.poll(499.0).is_empty());
        assert_eq!(timers.poll(500.0), vec![3]);
    }

    #[test]
    fn test_cancel_suppresses_pending_and_future() {
        let mut timers = Scheduler::new();
        timers.schedule(0.0, 10.0, ());
        timers.cancel();
        assert!(timers.poll(100.0).is_empty());
        timers.schedule(100.0, 0.0, ());
        assert!(timers.poll(200.0).is_empty());
        assert!(timers.cancelled);
    }
}
