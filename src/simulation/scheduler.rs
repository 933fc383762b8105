//! Cooperative timer queue driving session ticks
//! Location: src/simulation/scheduler.rs
//!
//! Events are ordered by due time, then kind (ticks before expiries so a
//! tick landing exactly on the duration boundary still fires), then
//! insertion order. `cancel` drops a session's pending entries eagerly; the
//! registry still ignores any popped event whose session is no longer live.

use super::session::SessionId;
use chrono::{DateTime, Utc};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerKind {
    Tick,
    Expire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub due: DateTime<Utc>,
    pub kind: TimerKind,
    pub session_id: SessionId,
    seq: u64,
}

impl Ord for TimerEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then(self.kind.cmp(&other.kind))
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for TimerEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of pending session timers
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<TimerEvent>>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, session_id: SessionId, kind: TimerKind, due: DateTime<Utc>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(TimerEvent {
            due,
            kind,
            session_id,
            seq,
        }));
    }

    /// Pop the earliest event due at or before `now`
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        match self.heap.peek() {
            Some(Reverse(event)) if event.due <= now => self.heap.pop().map(|Reverse(e)| e),
            _ => None,
        }
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.heap.peek().map(|Reverse(event)| event.due)
    }

    /// Drop every pending event of a session
    pub fn cancel(&mut self, session_id: SessionId) {
        self.heap.retain(|Reverse(event)| event.session_id != session_id);
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(seconds)
    }

    #[test]
    fn test_events_pop_in_time_order() {
        let mut queue = TimerQueue::new();
        let a = SessionId::new();
        let b = SessionId::new();

        queue.schedule(a, TimerKind::Tick, t(20));
        queue.schedule(b, TimerKind::Tick, t(10));
        queue.schedule(a, TimerKind::Tick, t(30));

        assert_eq!(queue.pop_due(t(100)).unwrap().due, t(10));
        assert_eq!(queue.pop_due(t(100)).unwrap().due, t(20));
        assert_eq!(queue.pop_due(t(25)), None);
        assert_eq!(queue.next_due(), Some(t(30)));
    }

    #[test]
    fn test_tick_precedes_expiry_at_same_instant() {
        let mut queue = TimerQueue::new();
        let id = SessionId::new();

        queue.schedule(id, TimerKind::Expire, t(30));
        queue.schedule(id, TimerKind::Tick, t(30));

        assert_eq!(queue.pop_due(t(30)).unwrap().kind, TimerKind::Tick);
        assert_eq!(queue.pop_due(t(30)).unwrap().kind, TimerKind::Expire);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_insertion_order_breaks_ties() {
        let mut queue = TimerQueue::new();
        let first = SessionId::new();
        let second = SessionId::new();

        queue.schedule(first, TimerKind::Tick, t(5));
        queue.schedule(second, TimerKind::Tick, t(5));

        assert_eq!(queue.pop_due(t(5)).unwrap().session_id, first);
        assert_eq!(queue.pop_due(t(5)).unwrap().session_id, second);
    }

    #[test]
    fn test_cancel_removes_session_events() {
        let mut queue = TimerQueue::new();
        let keep = SessionId::new();
        let drop_me = SessionId::new();

        queue.schedule(keep, TimerKind::Tick, t(1));
        queue.schedule(drop_me, TimerKind::Tick, t(1));
        queue.schedule(drop_me, TimerKind::Expire, t(2));
        queue.cancel(drop_me);

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_due(t(10)).unwrap().session_id, keep);
    }
}
