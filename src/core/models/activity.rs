//! Activity model

use super::Category;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of an activity record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    /// Saved but not yet submitted for review
    Draft,
    /// Awaiting a faculty decision
    Submitted,
    /// Accepted; credits count toward totals
    Approved,
    /// Declined
    Rejected,
}

impl ActivityStatus {
    /// Wire value of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Kind of co-curricular activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// Student bodies, committees
    Leadership,
    /// Tournaments and athletics
    Sports,
    /// Performances and festivals
    Cultural,
    /// Community service
    Volunteering,
    /// Contests and hackathons
    Competition,
    /// Any type not listed above
    #[serde(other)]
    Other,
}

impl ActivityType {
    /// Wire value of the type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Leadership => "leadership",
            Self::Sports => "sports",
            Self::Cultural => "cultural",
            Self::Volunteering => "volunteering",
            Self::Competition => "competition",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Student activity stored in the `activities` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity id
    pub id: String,
    /// Owning student's profile id
    pub student_id: String,
    /// Title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Kind of activity
    pub activity_type: ActivityType,
    /// Academic or co-curricular
    pub category: Category,
    /// Lifecycle state
    pub status: ActivityStatus,
    /// First day of the activity
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of the activity
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Organizing body
    #[serde(default)]
    pub organization: Option<String>,
    /// Venue
    #[serde(default)]
    pub location: Option<String>,
    /// Credits awarded; missing values count as zero
    #[serde(default)]
    pub credits_earned: Option<u32>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Credits awarded, zero when unset
    #[must_use]
    pub fn credits(&self) -> u32 {
        self.credits_earned.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_activity_type_maps_to_other() {
        let json = serde_json::json!({
            "id": "a1",
            "student_id": "stu-1",
            "title": "Robotics Club",
            "activity_type": "robotics",
            "category": "co_curricular",
            "status": "submitted",
            "credits_earned": null,
            "created_at": "2024-02-10T00:00:00Z"
        });
        let activity: Activity = serde_json::from_value(json).expect("activity");
        assert_eq!(activity.activity_type, ActivityType::Other);
        assert_eq!(activity.credits(), 0);
        assert!(activity.start_date.is_none());
    }
}
