//! Cancellable one-shot timers on a caller-supplied clock.
//!
//! Time is a `Duration` offset from whatever origin the host picks; the
//! terminal host uses the elapsed time since start-up, tests use literal
//! values. Every scheduled timer is identified by a [`TimerHandle`] owned by
//! exactly one state; cancelling a handle guarantees its event is never
//! returned by [`TimerQueue::pop_due`].

use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Entry<E> {
    deadline: Duration,
    event: E,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    next_id: u64,
    pending: BTreeMap<u64, Entry<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Duration, delay: Duration, event: E) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert(
            id,
            Entry {
                deadline: now.saturating_add(delay),
                event,
            },
        );
        TimerHandle(id)
    }

    /// Returns whether the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.pending.remove(&handle.0).is_some()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle.0)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.values().map(|entry| entry.deadline).min()
    }

    /// Remove and return the earliest timer due at `now`. Ties fire in
    /// scheduling order. Timers are popped one at a time so a handler may
    /// cancel others before they are considered.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerHandle, E)> {
        let id = self
            .pending
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .min_by_key(|(id, entry)| (entry.deadline, **id))
            .map(|(id, _)| *id)?;
        self.pending
            .remove(&id)
            .map(|entry| (TimerHandle(id), entry.event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn fires_in_deadline_then_schedule_order() {
        let mut q = TimerQueue::new();
        let late = q.schedule(ms(0), ms(30), "late");
        let a = q.schedule(ms(0), ms(10), "a");
        let b = q.schedule(ms(0), ms(10), "b");
        assert_eq!(q.next_deadline(), Some(ms(10)));
        assert_eq!(q.pop_due(ms(5)), None);
        assert_eq!(q.pop_due(ms(40)), Some((a, "a")));
        assert_eq!(q.pop_due(ms(40)), Some((b, "b")));
        assert_eq!(q.pop_due(ms(40)), Some((late, "late")));
        assert!(q.is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let h = q.schedule(ms(0), ms(10), ());
        assert!(q.is_pending(h));
        assert!(q.cancel(h));
        assert!(!q.cancel(h));
        assert_eq!(q.pop_due(ms(100)), None);
    }
}
