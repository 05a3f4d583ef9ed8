//! Application state and logic.

use crate::config::Config;
use crate::focus::{FocusTimer, Phase, TimerEvent};
use crate::form::HomeworkForm;
use crate::models::{format_minutes, Homework, HomeworkId};
use crate::plan::{self, StudyPlan};
use crate::store::HomeworkStore;
use chrono::{Local, NaiveDate, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tracing::warn;

pub struct App {
    pub config: Config,
    pub store: HomeworkStore,
    pub plan: StudyPlan,
    pub timer: FocusTimer,
    pub tab: Tab,
    pub selected_index: usize,
    pub plan_scroll: usize,
    pub focus_index: usize,
    pub show_add_dialog: bool,
    pub form: HomeworkForm,
    pub message: Option<String>,
    pub show_help: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Homework,
    Plan,
    Focus,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Homework, Tab::Plan, Tab::Focus];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Homework => "1:Homework",
            Tab::Plan => "2:Study Plan",
            Tab::Focus => "3:Focus Mode",
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

impl App {
    pub fn new(config: Config) -> Self {
        let timer = FocusTimer::new(config.focus.clone());
        Self {
            config,
            store: HomeworkStore::new(),
            plan: StudyPlan::default(),
            timer,
            tab: Tab::Homework,
            selected_index: 0,
            plan_scroll: 0,
            focus_index: 0,
            show_add_dialog: false,
            form: HomeworkForm::new(today()),
            message: None,
            show_help: false,
        }
    }

    pub fn can_quit(&self) -> bool {
        !self.show_add_dialog
    }

    /// Drive the focus countdown from the wall clock.
    pub fn tick(&mut self, now: Instant) {
        for event in self.timer.advance(now) {
            self.message = Some(match event {
                TimerEvent::StudyFinished { completed_sessions } => format!(
                    "Session {} complete! Apps unlocked for a break.",
                    completed_sessions
                ),
                TimerEvent::BreakFinished => "Break over. Ready for the next session.".to_string(),
            });
            if self.config.focus.bell {
                print!("\x07");
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.message = None;

        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.show_add_dialog {
            self.handle_form_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('1') => self.tab = Tab::Homework,
            KeyCode::Char('2') => self.tab = Tab::Plan,
            KeyCode::Char('3') => self.tab = Tab::Focus,
            KeyCode::Char('?') => self.show_help = true,
            _ => match self.tab {
                Tab::Homework => self.handle_homework_key(key),
                Tab::Plan => self.handle_plan_key(key),
                Tab::Focus => self.handle_focus_key(key),
            },
        }
    }

    fn handle_homework_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('a') => self.open_add_dialog(today()),
            KeyCode::Char(' ') | KeyCode::Char('x') => self.toggle_selected(),
            KeyCode::Char('d') => self.delete_selected(),
            _ => {}
        }
    }

    fn handle_plan_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('g') => self.generate_plan(now_local()),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.plan_scroll + 1 < self.plan.sessions.len() {
                    self.plan_scroll += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.plan_scroll = self.plan_scroll.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn handle_focus_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_focus_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_focus_selection(-1),
            KeyCode::Enter => self.bind_focus_selection(),
            KeyCode::Char('s') => self.toggle_focus(Instant::now()),
            KeyCode::Char('r') => {
                self.timer.reset();
                self.message = Some("Timer reset".to_string());
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.show_add_dialog = false,
            KeyCode::Enter => self.submit_form(today()),
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_previous(),
            KeyCode::Left if self.form.focused.is_choice() => self.form.cycle(false),
            KeyCode::Right if self.form.focused.is_choice() => self.form.cycle(true),
            KeyCode::Char(' ') if self.form.focused.is_choice() => self.form.cycle(true),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.push_char(c)
            }
            _ => {}
        }
    }

    pub fn open_add_dialog(&mut self, today: NaiveDate) {
        self.form.reset(today);
        self.show_add_dialog = true;
    }

    /// Validate the dialog and add the record. Rejected input keeps the
    /// dialog open with the error shown.
    pub fn submit_form(&mut self, today: NaiveDate) {
        match self.form.validate(today) {
            Ok(new) => {
                self.store.add(new);
                self.form.reset(today);
                self.show_add_dialog = false;
                self.message = Some("Homework added".to_string());
            }
            Err(err) => {
                warn!(error = %err, "homework rejected");
                self.form.error = Some(err);
            }
        }
    }

    fn selected_id(&self) -> Option<HomeworkId> {
        self.store.all().get(self.selected_index).map(|h| h.id.clone())
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.toggle(&id);
            self.clamp_focus_index();
        }
    }

    fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.store.delete(&id);
            self.message = Some("Homework deleted".to_string());
            let len = self.store.len();
            if self.selected_index >= len && len > 0 {
                self.selected_index = len - 1;
            }
            self.clamp_focus_index();
        }
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let new_idx = self.selected_index as i32 + delta;
        self.selected_index = new_idx.clamp(0, len as i32 - 1) as usize;
    }

    /// Replace the plan with one for the current incomplete homework.
    pub fn generate_plan(&mut self, now: NaiveDateTime) {
        let pending = self.store.incomplete();
        if pending.is_empty() {
            return;
        }
        self.plan = plan::generate(&pending, now, &self.config.plan);
        self.plan_scroll = 0;
    }

    /// Incomplete records offered on the focus tab.
    pub fn focus_candidates(&self) -> Vec<Homework> {
        self.store
            .incomplete()
            .into_iter()
            .take(self.config.focus.selection_limit)
            .collect()
    }

    fn clamp_focus_index(&mut self) {
        let len = self.focus_candidates().len();
        if self.focus_index >= len && len > 0 {
            self.focus_index = len - 1;
        }
    }

    fn move_focus_selection(&mut self, delta: i32) {
        let len = self.focus_candidates().len();
        if len == 0 {
            return;
        }
        let new_idx = self.focus_index as i32 + delta;
        self.focus_index = new_idx.clamp(0, len as i32 - 1) as usize;
    }

    fn bind_focus_selection(&mut self) {
        let Some(record) = self.focus_candidates().get(self.focus_index).cloned() else {
            return;
        };
        if self.timer.select(&record) {
            self.message = Some(format!("Focusing on {}", record.title));
        } else {
            self.message = Some("Reset the timer to switch assignments".to_string());
        }
    }

    /// Start, pause or resume the focus countdown.
    pub fn toggle_focus(&mut self, now: Instant) {
        if self.timer.is_running() {
            self.timer.pause();
            return;
        }
        if self.timer.phase() == Phase::Idle {
            let bound = self
                .timer
                .current()
                .and_then(|id| self.store.get(id))
                .cloned();
            if bound.is_none() && self.timer.current().is_some() {
                // Bound record was deleted.
                self.timer.reset();
            }
            self.timer.start(bound.as_ref(), now);
        } else {
            self.timer.start(None, now);
        }
    }

    pub fn remaining_label(&self) -> String {
        format!("{} remaining", format_minutes(self.store.remaining_minutes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ValidationError;
    use crate::models::{NewHomework, Priority};
    use crate::plan::SessionKind;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn app() -> App {
        App::new(Config::default())
    }

    #[test]
    fn test_tab_switching() {
        let mut app = app();
        assert_eq!(app.tab, Tab::Homework);
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.tab, Tab::Plan);
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.tab, Tab::Focus);
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.tab, Tab::Homework);
    }

    #[test]
    fn test_add_dialog_flow() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('a')));
        assert!(app.show_add_dialog);
        assert!(!app.can_quit());

        // Subject: Math, Priority: High
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "Ch.5");
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "60");

        app.handle_key(key(KeyCode::Enter));
        assert!(!app.show_add_dialog);
        assert_eq!(app.store.len(), 1);
        let hw = &app.store.all()[0];
        assert_eq!(hw.subject, "Math");
        assert_eq!(hw.title, "Ch.5");
        assert_eq!(hw.priority, Priority::High);
        assert_eq!(hw.estimated_minutes, 60);
        assert!(!hw.completed);
    }

    #[test]
    fn test_rejected_form_stays_open() {
        let mut app = app();
        app.open_add_dialog(day(17));
        app.form.subject = Some(0);
        app.form.estimate = "60".into();

        app.submit_form(day(17));
        assert!(app.show_add_dialog);
        assert!(app.store.is_empty());
        assert_eq!(app.form.error, Some(ValidationError::MissingField("Title")));

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_add_dialog);
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_toggle_and_delete_keys() {
        let mut app = app();
        app.store.add_at(NewHomework::new("Math", "A", 30, day(18)), 1);
        app.store.add_at(NewHomework::new("Math", "B", 45, day(18)), 2);
        assert_eq!(app.remaining_label(), "1h 15m remaining");

        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.store.all()[1].completed);
        assert_eq!(app.remaining_label(), "0h 30m remaining");

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.store.all()[0].title, "A");
    }

    #[test]
    fn test_generate_plan_uses_incomplete_only() {
        let mut app = app();
        app.store.add_at(
            NewHomework::new("Math", "Ch.5", 60, day(18)).with_priority(Priority::High),
            1,
        );
        app.store.add_at(
            NewHomework::new("English", "Essay", 30, day(18)).with_priority(Priority::Low),
            2,
        );
        let done = app.store.add_at(NewHomework::new("History", "Notes", 20, day(18)), 3);
        app.store.toggle(&done);

        let now = day(17).and_hms_opt(16, 5, 0).unwrap();
        app.generate_plan(now);

        let kinds: Vec<SessionKind> = app.plan.sessions.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SessionKind::Study, SessionKind::Break, SessionKind::Study]);
        assert_eq!(app.plan.total_study_minutes(), 90);
        assert_eq!(app.plan.assignment_count, 2);
    }

    #[test]
    fn test_generate_with_nothing_pending_keeps_plan() {
        let mut app = app();
        let id = app.store.add_at(NewHomework::new("Math", "A", 30, day(18)), 1);
        let now = day(17).and_hms_opt(9, 0, 0).unwrap();
        app.generate_plan(now);
        assert_eq!(app.plan.sessions.len(), 1);

        app.store.toggle(&id);
        app.generate_plan(now);
        assert_eq!(app.plan.sessions.len(), 1);
    }

    #[test]
    fn test_focus_bind_start_pause() {
        let mut app = app();
        app.store.add_at(NewHomework::new("Math", "A", 10, day(18)), 1);
        app.tab = Tab::Focus;

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.timer.current(), Some(&HomeworkId::from_millis(1)));
        assert!(!app.timer.is_running());

        let t0 = Instant::now();
        app.toggle_focus(t0);
        assert!(app.timer.blocking());
        assert_eq!(app.timer.format_remaining(), "10:00");

        app.tick(t0 + Duration::from_secs(5));
        assert_eq!(app.timer.format_remaining(), "09:55");

        app.toggle_focus(t0 + Duration::from_secs(5));
        assert!(!app.timer.is_running());
        assert!(!app.timer.blocking());
        assert_eq!(app.timer.phase(), Phase::Studying);

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.timer.phase(), Phase::Idle);
        assert_eq!(app.timer.format_remaining(), "25:00");
    }

    #[test]
    fn test_start_after_bound_record_deleted() {
        let mut app = app();
        app.store.add_at(NewHomework::new("Math", "A", 12, day(18)), 1);
        app.tab = Tab::Focus;
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.timer.format_remaining(), "12:00");

        app.tab = Tab::Homework;
        app.handle_key(key(KeyCode::Char('d')));
        assert!(app.store.is_empty());

        app.toggle_focus(Instant::now());
        assert_eq!(app.timer.phase(), Phase::Studying);
        assert!(app.timer.current().is_none());
        assert_eq!(app.timer.format_remaining(), "25:00");
    }

    #[test]
    fn test_focus_index_follows_shrinking_candidates() {
        let mut app = app();
        for i in 0..3 {
            app.store.add_at(NewHomework::new("Math", format!("hw{}", i), 10, day(18)), i);
        }
        app.tab = Tab::Focus;
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.focus_index, 2);

        app.tab = Tab::Homework;
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.focus_index, 1);
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.focus_candidates().len(), 1);
        assert_eq!(app.focus_index, 0);

        app.tab = Tab::Focus;
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.timer.current(), Some(&HomeworkId::from_millis(1)));
    }

    #[test]
    fn test_focus_candidates_limited() {
        let mut app = app();
        for i in 0..7 {
            app.store.add_at(NewHomework::new("Math", format!("hw{}", i), 10, day(18)), i);
        }
        assert_eq!(app.focus_candidates().len(), 5);
    }

    #[test]
    fn test_session_finish_message() {
        let mut config = Config::default();
        config.focus.bell = false;
        let mut app = App::new(config);
        app.store.add_at(NewHomework::new("Math", "A", 1, day(18)), 1);
        app.tab = Tab::Focus;
        app.handle_key(key(KeyCode::Enter));

        let t0 = Instant::now();
        app.toggle_focus(t0);
        app.tick(t0 + Duration::from_secs(60));

        assert_eq!(app.timer.phase(), Phase::Break);
        assert_eq!(app.timer.completed_sessions(), 1);
        assert!(app.message.as_deref().unwrap_or("").contains("Session 1 complete"));
    }
}
