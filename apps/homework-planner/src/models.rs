//! Data models for homework planning.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique homework identifier, derived from the creation instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HomeworkId(String);

impl HomeworkId {
    /// Build an id from a Unix timestamp in milliseconds.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HomeworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Homework priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Ordering weight used by the plan generator.
    pub fn weight(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Priority::Low => "○",
            Priority::Medium => "◐",
            Priority::High => "●",
        }
    }
}

/// Subjects offered by the add dialog.
pub const SUBJECTS: [&str; 5] = ["Math", "Science", "English", "History", "Other"];

/// A logged homework assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Homework {
    pub id: HomeworkId,
    pub subject: String,
    pub title: String,
    pub description: String,
    /// Estimated effort in minutes, always positive.
    pub estimated_minutes: u32,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: NaiveDate,
}

impl Homework {
    pub fn from_new(id: HomeworkId, new: NewHomework) -> Self {
        Self {
            id,
            subject: new.subject,
            title: new.title,
            description: new.description,
            estimated_minutes: new.estimated_minutes,
            completed: false,
            priority: new.priority,
            due_date: new.due_date,
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date < today
    }
}

/// Input for adding homework: a record without its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHomework {
    pub subject: String,
    pub title: String,
    pub description: String,
    pub estimated_minutes: u32,
    pub priority: Priority,
    pub due_date: NaiveDate,
}

impl NewHomework {
    pub fn new(
        subject: impl Into<String>,
        title: impl Into<String>,
        estimated_minutes: u32,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            subject: subject.into(),
            title: title.into(),
            description: String::new(),
            estimated_minutes,
            priority: Priority::default(),
            due_date,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Format a minute count as `Xh Ym`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}
