//! Add-homework dialog state and validation.

use crate::models::{NewHomework, Priority, SUBJECTS};
use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// Why a submitted form was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Estimated time must be a positive number of minutes (got '{0}')")]
    InvalidEstimate(String),
    #[error("Due date must look like YYYY-MM-DD (got '{0}')")]
    InvalidDueDate(String),
    #[error("Due date {0} is in the past")]
    DueDateInPast(NaiveDate),
}

/// Dialog fields in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Subject,
    Priority,
    Title,
    Description,
    Estimate,
    DueDate,
}

impl FormField {
    pub const ORDER: [FormField; 6] = [
        FormField::Subject,
        FormField::Priority,
        FormField::Title,
        FormField::Description,
        FormField::Estimate,
        FormField::DueDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Subject => "Subject",
            Self::Priority => "Priority",
            Self::Title => "Assignment Title",
            Self::Description => "Description (optional)",
            Self::Estimate => "Estimated Time (minutes)",
            Self::DueDate => "Due Date",
        }
    }

    /// Choice fields cycle through options instead of taking text.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Subject | Self::Priority)
    }

    fn index(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(&self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.index() + len - 1) % len]
    }
}

/// State of the add-homework dialog.
#[derive(Debug, Clone)]
pub struct HomeworkForm {
    /// Index into [`SUBJECTS`]; `None` until one is chosen.
    pub subject: Option<usize>,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub estimate: String,
    pub due_date: String,
    pub focused: FormField,
    pub error: Option<ValidationError>,
}

impl HomeworkForm {
    /// Empty form with the due date prefilled to tomorrow.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            subject: None,
            priority: Priority::default(),
            title: String::new(),
            description: String::new(),
            estimate: String::new(),
            due_date: (today + Duration::days(1)).format("%Y-%m-%d").to_string(),
            focused: FormField::Subject,
            error: None,
        }
    }

    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    pub fn subject_label(&self) -> &'static str {
        self.subject.map(|i| SUBJECTS[i]).unwrap_or("Select subject")
    }

    pub fn text(&self, field: FormField) -> &str {
        match field {
            FormField::Subject => self.subject_label(),
            FormField::Priority => self.priority.label(),
            FormField::Title => &self.title,
            FormField::Description => &self.description,
            FormField::Estimate => &self.estimate,
            FormField::DueDate => &self.due_date,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focused {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Estimate => Some(&mut self.estimate),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Subject | FormField::Priority => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn focus_previous(&mut self) {
        self.focused = self.focused.previous();
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Step the focused choice field forward or backward.
    pub fn cycle(&mut self, forward: bool) {
        match self.focused {
            FormField::Subject => {
                let len = SUBJECTS.len();
                self.subject = Some(match (self.subject, forward) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                });
            }
            FormField::Priority => {
                let all = Priority::ALL;
                let i = all.iter().position(|p| *p == self.priority).unwrap_or(1);
                let next = if forward { (i + 1) % all.len() } else { (i + all.len() - 1) % all.len() };
                self.priority = all[next];
            }
            _ => {}
        }
    }

    /// Check the form against `today` and build the new record.
    pub fn validate(&self, today: NaiveDate) -> Result<NewHomework, ValidationError> {
        let subject = self
            .subject
            .map(|i| SUBJECTS[i])
            .ok_or(ValidationError::MissingField("Subject"))?;
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("Title"));
        }
        let estimate = self.estimate.trim();
        if estimate.is_empty() {
            return Err(ValidationError::MissingField("Estimated time"));
        }
        let due = self.due_date.trim();
        if due.is_empty() {
            return Err(ValidationError::MissingField("Due date"));
        }

        let estimated_minutes = match estimate.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => return Err(ValidationError::InvalidEstimate(estimate.to_string())),
        };
        let due_date = NaiveDate::parse_from_str(due, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDueDate(due.to_string()))?;
        if due_date < today {
            return Err(ValidationError::DueDateInPast(due_date));
        }

        // Text fields are stored as typed.
        Ok(NewHomework::new(subject, self.title.as_str(), estimated_minutes, due_date)
            .with_priority(self.priority)
            .with_description(self.description.as_str()))
    }
}
