// Scheduled-emission list. Deferred work (staggered panic alerts, badge-cue
// expiry, debounced search suggestions) is queued here with a due instant and
// drained by the coordinator tick. Entries can carry a session key so a whole
// panic session cancels as a unit.

use std::time::Instant;

pub type SessionId = u64;

struct Entry<T> {
    due: Instant,
    session: Option<SessionId>,
    seq: u64,
    payload: T,
}

pub struct Timeline<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due: Instant, payload: T) {
        self.push(due, None, payload);
    }

    pub fn schedule_for_session(&mut self, due: Instant, session: SessionId, payload: T) {
        self.push(due, Some(session), payload);
    }

    fn push(&mut self, due: Instant, session: Option<SessionId>, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            due,
            session,
            seq,
            payload,
        });
    }

    /// Drop every pending entry of one session. Returns how many were removed.
    pub fn cancel_session(&mut self, session: SessionId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.session != Some(session));
        before - self.entries.len()
    }

    /// Drop pending entries matching a predicate (used to cancel a debounce
    /// timer when a new keystroke arrives).
    pub fn cancel_where(&mut self, pred: impl Fn(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(&e.payload));
        before - self.entries.len()
    }

    /// Take everything due at `now`, ordered by due instant; ties fire in
    /// registration order.
    pub fn fire_due(&mut self, now: Instant) -> Vec<T> {
        let mut fired = Vec::new();
        let mut remaining = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.due <= now {
                fired.push(entry);
            } else {
                remaining.push(entry);
            }
        }
        self.entries = remaining;
        fired.sort_by_key(|e| (e.due, e.seq));
        fired.into_iter().map(|e| e.payload).collect()
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fires_in_due_order_with_stable_ties() {
        let start = Instant::now();
        let mut timeline = Timeline::new();
        timeline.schedule(start + Duration::from_secs(8), "efir");
        timeline.schedule(start + Duration::from_secs(3), "dispatch");
        timeline.schedule(start + Duration::from_secs(3), "dispatch-2");
        timeline.schedule(start + Duration::from_secs(5), "contact");

        assert_eq!(timeline.fire_due(start + Duration::from_secs(1)), Vec::<&str>::new());

        let fired = timeline.fire_due(start + Duration::from_secs(5));
        assert_eq!(fired, vec!["dispatch", "dispatch-2", "contact"]);
        assert_eq!(timeline.pending(), 1);

        let fired = timeline.fire_due(start + Duration::from_secs(10));
        assert_eq!(fired, vec!["efir"]);
    }

    #[test]
    fn test_cancel_session_only_touches_that_session() {
        let start = Instant::now();
        let mut timeline = Timeline::new();
        timeline.schedule_for_session(start + Duration::from_secs(3), 1, "old");
        timeline.schedule_for_session(start + Duration::from_secs(5), 1, "old-2");
        timeline.schedule_for_session(start + Duration::from_secs(3), 2, "new");
        timeline.schedule(start + Duration::from_secs(5), "plain");

        assert_eq!(timeline.cancel_session(1), 2);
        let fired = timeline.fire_due(start + Duration::from_secs(10));
        assert_eq!(fired, vec!["new", "plain"]);
    }

    #[test]
    fn test_cancel_where_predicate() {
        let start = Instant::now();
        let mut timeline = Timeline::new();
        timeline.schedule(start + Duration::from_millis(300), "suggest:war");
        timeline.schedule(start + Duration::from_secs(5), "badge-end");

        assert_eq!(timeline.cancel_where(|p| p.starts_with("suggest")), 1);
        assert_eq!(timeline.pending(), 1);
    }
}
