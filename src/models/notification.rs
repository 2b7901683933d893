//! Notification model.
//!
//! Notifications are the alert engine's output: prioritized, categorized
//! messages with suggested actions. The core decides *that* and *what*
//! to notify; delivery (email, push) belongs to external collaborators
//! consuming these records.
//!
//! # Identity
//! A notification's id is deterministic — category, related entity, a
//! rule-specific discriminator, and a day bucket. Re-running the engine
//! on the same facts regenerates the same ids, which is what makes
//! upsert-based deduplication work.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Informational.
    Info,
    /// Positive confirmation.
    Success,
    /// Needs attention soon.
    Warning,
    /// Needs attention now.
    Error,
    /// Business-critical.
    Critical,
}

/// Source category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationCategory {
    /// A required-by date is close or passed.
    CriticalDate,
    /// A list and its orders disagree.
    Coherence,
    /// A project budget threshold was crossed.
    Budget,
    /// A resource is overloaded.
    ResourceLoad,
    /// Volume and trend observations.
    System,
}

impl NotificationCategory {
    /// Stable slug used in deterministic ids.
    pub fn slug(&self) -> &'static str {
        match self {
            NotificationCategory::CriticalDate => "critical-date",
            NotificationCategory::Coherence => "coherence",
            NotificationCategory::Budget => "budget",
            NotificationCategory::ResourceLoad => "resource-load",
            NotificationCategory::System => "system",
        }
    }
}

/// Handling priority, independent of severity wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal queue.
    Medium,
    /// Ahead of the queue.
    High,
    /// Drop everything.
    Critical,
}

/// A suggested follow-up action attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    /// Button label (e.g. "Review order").
    pub label: String,
    /// Machine-readable action key for the consuming UI.
    pub command: String,
}

impl NotificationAction {
    /// Creates an action.
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
        }
    }
}

/// A prioritized alert produced by the alert engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Deterministic identity (see module docs).
    pub id: String,
    /// Severity tier.
    pub severity: Severity,
    /// Source category.
    pub category: NotificationCategory,
    /// Short headline.
    pub title: String,
    /// One-sentence body.
    pub message: String,
    /// Longer context for a detail view.
    pub detail: String,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
    /// Deadline the notification refers to, when date-driven.
    pub due_at: Option<NaiveDate>,
    /// Whether a recipient acknowledged it.
    pub read: bool,
    /// Whether the business process blocks until someone acts.
    pub requires_action: bool,
    /// Handling priority.
    pub priority: Priority,
    /// Delivery targets (resolved by the engine from configuration).
    pub recipients: Vec<String>,
    /// Entity the notification is about.
    pub related_entity_id: Option<String>,
    /// Suggested follow-up actions.
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    /// Builds the deterministic identity string.
    ///
    /// Shape: `<category>/<entity>/<discriminator>@<day>`. The day bucket
    /// makes an alert re-fire on a later day while staying deduplicated
    /// within one.
    pub fn identity(
        category: NotificationCategory,
        entity_id: &str,
        discriminator: &str,
        bucket: NaiveDate,
    ) -> String {
        format!("{}/{entity_id}/{discriminator}@{bucket}", category.slug())
    }

    /// Creates a notification with the given identity and severity.
    ///
    /// Priority mirrors severity by default; override with
    /// [`with_priority`](Self::with_priority) where a rule says otherwise.
    pub fn new(
        id: impl Into<String>,
        category: NotificationCategory,
        severity: Severity,
        title: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        let priority = match severity {
            Severity::Info | Severity::Success => Priority::Low,
            Severity::Warning => Priority::Medium,
            Severity::Error => Priority::High,
            Severity::Critical => Priority::Critical,
        };
        Self {
            id: id.into(),
            severity,
            category,
            title: title.into(),
            message: String::new(),
            detail: String::new(),
            created_at,
            due_at: None,
            read: false,
            requires_action: false,
            priority,
            recipients: Vec::new(),
            related_entity_id: None,
            actions: Vec::new(),
        }
    }

    /// Sets the message body.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the detail text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Sets the referenced deadline.
    pub fn with_due_at(mut self, due_at: NaiveDate) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Marks the notification as action-requiring.
    pub fn with_requires_action(mut self, requires_action: bool) -> Self {
        self.requires_action = requires_action;
        self
    }

    /// Overrides the severity-derived priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the related entity.
    pub fn about(mut self, entity_id: impl Into<String>) -> Self {
        self.related_entity_id = Some(entity_id.into());
        self
    }

    /// Adds a suggested action.
    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.actions.push(action);
        self
    }
}
