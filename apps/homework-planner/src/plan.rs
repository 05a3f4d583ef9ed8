//! Study plan generation.
//!
//! Assignments are ordered by priority (high first) then due date, and laid
//! end to end starting at the next slot boundary, with a break between
//! consecutive study sessions.

use crate::config::PlanConfig;
use crate::models::{Homework, HomeworkId};
use chrono::{Duration, NaiveDateTime, Timelike};
use tracing::info;

/// Kind of a planned block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Study,
    Break,
}

/// A single timed block in a study plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySession {
    pub id: String,
    pub kind: SessionKind,
    /// Homework this block is for; may no longer exist in the store.
    pub homework: Option<HomeworkId>,
    pub duration_minutes: u32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// An ordered sequence of study and break sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyPlan {
    pub sessions: Vec<StudySession>,
    /// Number of assignments the plan was generated from.
    pub assignment_count: usize,
}

impl StudyPlan {
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn total_study_minutes(&self) -> u32 {
        self.sessions
            .iter()
            .filter(|s| s.kind == SessionKind::Study)
            .map(|s| s.duration_minutes)
            .sum()
    }

    pub fn break_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.kind == SessionKind::Break)
            .count()
    }

    /// End of the last session.
    pub fn estimated_end(&self) -> Option<NaiveDateTime> {
        self.sessions.last().map(|s| s.end)
    }
}

/// Round `now` up to the next slot boundary on the minute of the hour.
///
/// Seconds are dropped first, so a time already on a boundary stays put.
pub fn plan_start(now: NaiveDateTime, slot_mins: u32) -> NaiveDateTime {
    let truncated = now
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    let slot = slot_mins.max(1);
    let offset = truncated.minute() % slot;
    if offset == 0 {
        truncated
    } else {
        truncated + Duration::minutes(i64::from(slot - offset))
    }
}

/// Generate a plan for `homework` starting from `now`.
pub fn generate(homework: &[Homework], now: NaiveDateTime, config: &PlanConfig) -> StudyPlan {
    if homework.is_empty() {
        return StudyPlan::default();
    }

    let mut sorted: Vec<&Homework> = homework.iter().collect();
    // Stable sort keeps input order for equal (priority, due date).
    sorted.sort_by(|a, b| {
        b.priority
            .weight()
            .cmp(&a.priority.weight())
            .then(a.due_date.cmp(&b.due_date))
    });

    let mut clock = plan_start(now, config.slot_mins);
    let mut sessions = Vec::with_capacity(sorted.len() * 2);
    let last = sorted.len() - 1;

    for (index, hw) in sorted.iter().enumerate() {
        let start = clock;
        clock += Duration::minutes(i64::from(hw.estimated_minutes));
        sessions.push(StudySession {
            id: format!("study-{}", hw.id),
            kind: SessionKind::Study,
            homework: Some(hw.id.clone()),
            duration_minutes: hw.estimated_minutes,
            start,
            end: clock,
        });

        if index < last {
            let duration = if hw.estimated_minutes >= config.long_session_mins {
                config.long_break_mins
            } else {
                config.short_break_mins
            };
            let start = clock;
            clock += Duration::minutes(i64::from(duration));
            sessions.push(StudySession {
                id: format!("break-{}", index),
                kind: SessionKind::Break,
                homework: None,
                duration_minutes: duration,
                start,
                end: clock,
            });
        }
    }

    let plan = StudyPlan {
        sessions,
        assignment_count: homework.len(),
    };
    info!(
        assignments = plan.assignment_count,
        study_minutes = plan.total_study_minutes(),
        breaks = plan.break_count(),
        "study plan generated"
    );
    plan
}
