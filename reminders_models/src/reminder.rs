use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderCategory {
    #[default]
    Call,
    Meeting,
    Task,
    Birthday,
    Other,
}

impl ReminderCategory {
    pub const ALL: [ReminderCategory; 5] = [
        ReminderCategory::Call,
        ReminderCategory::Meeting,
        ReminderCategory::Task,
        ReminderCategory::Birthday,
        ReminderCategory::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReminderCategory::Call => "Call",
            ReminderCategory::Meeting => "Meeting",
            ReminderCategory::Task => "Task",
            ReminderCategory::Birthday => "Birthday",
            ReminderCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ReminderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reminder as entered by the user. Lives only until it is handed to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub category: ReminderCategory,
    pub fire_at: DateTime<Utc>,
}

impl Reminder {
    pub fn payload(&self) -> ReminderPayload {
        ReminderPayload::for_reminder(&self.title, self.category)
    }
}

/// Data carried by a deferred job and rendered as a notification when it fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPayload {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl ReminderPayload {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn for_reminder(title: &str, category: ReminderCategory) -> Self {
        Self::new(format!("Todo: {category}"), title)
    }
}
