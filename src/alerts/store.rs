//! Notification storage.
//!
//! The engine writes through an injected [`NotificationStore`] instead
//! of a shared module-level list: upsert-by-identity keeps re-runs
//! idempotent, and the trait boundary lets production swap in a durable
//! repository while tests use [`InMemoryNotificationStore`].

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::models::Notification;

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The identity was new; a record was added.
    Inserted,
    /// The identity existed; the record was refreshed.
    Updated,
}

/// A thread-safe notification repository.
///
/// Implementations must make `upsert` atomic per identity: concurrent
/// engine runs over the same facts may race on the same ids.
pub trait NotificationStore: Send + Sync {
    /// Inserts or refreshes by `notification.id`.
    ///
    /// On refresh, the stored `created_at` and `read` flag are kept so
    /// acknowledgements survive re-evaluation; everything else is
    /// replaced by the incoming record.
    fn upsert(&self, notification: Notification) -> UpsertOutcome;

    /// All stored notifications, oldest first (ties broken by id).
    fn list(&self) -> Vec<Notification>;

    /// Looks up one notification.
    fn get(&self, id: &str) -> Option<Notification>;

    /// Marks a notification as acknowledged. Returns `false` when the
    /// id is unknown.
    fn mark_read(&self, id: &str) -> bool;

    /// Number of unacknowledged notifications.
    fn unread_count(&self) -> usize;
}

/// In-memory store backed by a read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    inner: RwLock<HashMap<String, Notification>>,
}

impl InMemoryNotificationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored notifications.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl NotificationStore for InMemoryNotificationStore {
    fn upsert(&self, mut notification: Notification) -> UpsertOutcome {
        let mut map = self.inner.write();
        match map.get(&notification.id) {
            Some(existing) => {
                notification.created_at = existing.created_at;
                notification.read = existing.read;
                map.insert(notification.id.clone(), notification);
                UpsertOutcome::Updated
            }
            None => {
                map.insert(notification.id.clone(), notification);
                UpsertOutcome::Inserted
            }
        }
    }

    fn list(&self) -> Vec<Notification> {
        let mut all: Vec<Notification> = self.inner.read().values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        all
    }

    fn get(&self, id: &str) -> Option<Notification> {
        self.inner.read().get(id).cloned()
    }

    fn mark_read(&self, id: &str) -> bool {
        match self.inner.write().get_mut(id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    fn unread_count(&self) -> usize {
        self.inner.read().values().filter(|n| !n.read).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NotificationCategory, Severity};
    use chrono::NaiveDate;

    fn notification(id: &str, severity: Severity) -> Notification {
        let at = NaiveDate::from_ymd_opt(2025, 6, 25)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Notification::new(id, NotificationCategory::System, severity, "title", at)
    }

    #[test]
    fn test_upsert_insert_then_update() {
        let store = InMemoryNotificationStore::new();
        assert_eq!(
            store.upsert(notification("n1", Severity::Warning)),
            UpsertOutcome::Inserted
        );
        assert_eq!(
            store.upsert(notification("n1", Severity::Error)),
            UpsertOutcome::Updated
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("n1").unwrap().severity, Severity::Error);
    }

    #[test]
    fn test_update_preserves_read_flag() {
        let store = InMemoryNotificationStore::new();
        store.upsert(notification("n1", Severity::Warning));
        assert!(store.mark_read("n1"));

        store.upsert(notification("n1", Severity::Error));
        let n = store.get("n1").unwrap();
        assert!(n.read, "acknowledgement must survive a refresh");
        assert_eq!(store.unread_count(), 0);
    }

    #[test]
    fn test_mark_read_unknown_id() {
        let store = InMemoryNotificationStore::new();
        assert!(!store.mark_read("missing"));
    }

    #[test]
    fn test_list_sorted_and_stable() {
        let store = InMemoryNotificationStore::new();
        store.upsert(notification("b", Severity::Info));
        store.upsert(notification("a", Severity::Info));

        let ids: Vec<String> = store.list().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_unread_count() {
        let store = InMemoryNotificationStore::new();
        store.upsert(notification("n1", Severity::Info));
        store.upsert(notification("n2", Severity::Info));
        store.mark_read("n1");
        assert_eq!(store.unread_count(), 1);
    }
}
