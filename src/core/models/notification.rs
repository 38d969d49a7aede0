//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification delivered to a single recipient
///
/// Rows are created by store-side triggers; the only client mutation is
/// stamping `read_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification id
    pub id: String,
    /// Recipient profile id
    pub user_id: String,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Free-text type tag such as `certificate_approved`
    #[serde(rename = "type")]
    pub kind: String,
    /// When the recipient read it
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Display category derived from the notification type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    /// A certificate or activity was approved
    Approved,
    /// A certificate or activity was rejected
    Rejected,
    /// Any other certificate or activity event (submitted, under review)
    Review,
    /// Direct message
    Message,
    /// Achievement unlocked
    Achievement,
    /// Anything else
    General,
}

impl NotificationCategory {
    /// Short label used in listings
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Review => "review",
            Self::Message => "message",
            Self::Achievement => "achievement",
            Self::General => "general",
        }
    }
}

impl Notification {
    /// Whether the notification has not been read yet
    #[must_use]
    pub const fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }

    /// Classify the type tag; the first matching rule wins
    #[must_use]
    pub fn category(&self) -> NotificationCategory {
        let kind = self.kind.as_str();
        if kind.contains("certificate_approved") || kind.contains("activity_approved") {
            NotificationCategory::Approved
        } else if kind.contains("certificate_rejected") || kind.contains("activity_rejected") {
            NotificationCategory::Rejected
        } else if kind.contains("certificate") || kind.contains("activity") {
            NotificationCategory::Review
        } else if kind.contains("message") {
            NotificationCategory::Message
        } else if kind.contains("achievement") {
            NotificationCategory::Achievement
        } else {
            NotificationCategory::General
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_kind(kind: &str) -> Notification {
        Notification {
            id: "n1".to_string(),
            user_id: "stu-1".to_string(),
            title: "t".to_string(),
            message: "m".to_string(),
            kind: kind.to_string(),
            read_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn classifies_type_tags() {
        assert_eq!(with_kind("certificate_approved").category(), NotificationCategory::Approved);
        assert_eq!(with_kind("activity_rejected").category(), NotificationCategory::Rejected);
        assert_eq!(with_kind("activity_submitted").category(), NotificationCategory::Review);
        assert_eq!(with_kind("message").category(), NotificationCategory::Message);
        assert_eq!(with_kind("achievement_unlocked").category(), NotificationCategory::Achievement);
        assert_eq!(with_kind("system").category(), NotificationCategory::General);
    }
}
