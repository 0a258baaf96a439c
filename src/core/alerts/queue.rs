use chrono::{DateTime, Utc};

use super::model::{Alert, AlertCategory, AlertId, AlertView, Severity};

pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded, newest-first alert log. None of the operations fail: a missing
/// id on `mark_read` is a silent no-op and eviction simply drops the oldest
/// entries beyond capacity.
pub struct AlertQueue {
    alerts: Vec<Alert>,
    next_id: AlertId,
    capacity: usize,
}

impl AlertQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            alerts: Vec::new(),
            next_id: 1,
            capacity: capacity.max(1),
        }
    }

    /// Prepend a fresh unread alert, evicting the oldest beyond capacity.
    pub fn push(
        &mut self,
        category: AlertCategory,
        message: impl Into<String>,
        severity: Severity,
        now: DateTime<Utc>,
    ) -> AlertId {
        let id = self.next_id;
        self.next_id += 1;

        self.alerts.insert(
            0,
            Alert {
                id,
                category,
                message: message.into(),
                severity,
                created_at: now,
                read: false,
            },
        );
        self.alerts.truncate(self.capacity);
        id
    }

    /// Acknowledge one alert. Idempotent; absent ids are not an error.
    pub fn mark_read(&mut self, id: AlertId) {
        if let Some(alert) = self.alerts.iter_mut().find(|a| a.id == id) {
            alert.read = true;
        }
    }

    /// Empty the queue, then announce the clear so the user never observes
    /// a truly empty log.
    pub fn clear(&mut self, now: DateTime<Utc>) {
        self.alerts.clear();
        self.push(
            AlertCategory::System,
            "All alerts cleared",
            Severity::Info,
            now,
        );
    }

    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.read).count()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Newest-first render projection.
    pub fn snapshot(&self) -> Vec<AlertView> {
        self.alerts.iter().map(Alert::view).collect()
    }
}

impl Default for AlertQueue {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_queue_bounded_and_newest_first() {
        let mut queue = AlertQueue::new(DEFAULT_CAPACITY);
        for i in 0..30 {
            queue.push(
                AlertCategory::System,
                format!("alert {i}"),
                Severity::Info,
                now(),
            );
        }

        assert_eq!(queue.len(), DEFAULT_CAPACITY);
        let snapshot = queue.snapshot();
        assert_eq!(snapshot[0].message, "alert 29");
        assert_eq!(snapshot.last().unwrap().message, "alert 10");
        // Strictly newest-first by insertion.
        for pair in snapshot.windows(2) {
            assert!(pair[0].id > pair[1].id);
        }
    }

    #[test]
    fn test_mark_read_idempotent() {
        let mut queue = AlertQueue::default();
        let id = queue.push(AlertCategory::Ai, "check", Severity::Warning, now());
        queue.push(AlertCategory::System, "other", Severity::Info, now());

        assert_eq!(queue.unread_count(), 2);
        queue.mark_read(id);
        assert_eq!(queue.unread_count(), 1);
        queue.mark_read(id);
        assert_eq!(queue.unread_count(), 1);
    }

    #[test]
    fn test_mark_read_missing_id_is_noop() {
        let mut queue = AlertQueue::default();
        queue.push(AlertCategory::System, "only", Severity::Info, now());
        queue.mark_read(9999);
        assert_eq!(queue.unread_count(), 1);
    }

    #[test]
    fn test_clear_reseeds_system_alert() {
        let mut queue = AlertQueue::default();
        for _ in 0..5 {
            queue.push(AlertCategory::Emergency, "panic", Severity::Danger, now());
        }

        queue.clear(now());

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.unread_count(), 1);
        let snapshot = queue.snapshot();
        assert_eq!(snapshot[0].message, "All alerts cleared");
        assert_eq!(snapshot[0].category, "system");
    }

    #[test]
    fn test_ids_are_monotonic_across_eviction() {
        let mut queue = AlertQueue::new(2);
        let a = queue.push(AlertCategory::System, "a", Severity::Info, now());
        let b = queue.push(AlertCategory::System, "b", Severity::Info, now());
        let c = queue.push(AlertCategory::System, "c", Severity::Info, now());
        assert!(a < b && b < c);
        assert_eq!(queue.len(), 2);
    }
}
