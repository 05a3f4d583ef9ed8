//! Focus timer: a single study countdown with an automatic break.

use crate::config::FocusConfig;
use crate::models::{Homework, HomeworkId};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Timer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Studying,
    Break,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Focus Session",
            Self::Studying => "Studying",
            Self::Break => "Break Time",
        }
    }
}

/// Reported when a countdown runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A study phase finished and the break has started.
    StudyFinished { completed_sessions: u32 },
    /// The break finished and the timer is idle again.
    BreakFinished,
}

/// The one-second tick source. Arming replaces any pending deadline.
#[derive(Debug, Clone, Default)]
struct Ticker {
    next: Option<Instant>,
}

impl Ticker {
    fn arm(&mut self, now: Instant) {
        self.next = Some(now + ONE_SECOND);
    }

    fn disarm(&mut self) {
        self.next = None;
    }

    /// Consume one due tick, if any.
    fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now >= next => {
                self.next = Some(next + ONE_SECOND);
                true
            }
            _ => false,
        }
    }
}

/// Focus timer state.
#[derive(Debug, Clone)]
pub struct FocusTimer {
    config: FocusConfig,
    phase: Phase,
    remaining_secs: u32,
    /// Length of the current phase, fixed when it was entered.
    phase_total_secs: u32,
    current: Option<HomeworkId>,
    completed_sessions: u32,
    running: bool,
    /// Set by `start`, cleared by pause, reset and the switch to a break.
    blocking: bool,
    ticker: Ticker,
}

impl FocusTimer {
    pub fn new(config: FocusConfig) -> Self {
        let idle_secs = config.session_cap_mins * 60;
        Self {
            config,
            phase: Phase::Idle,
            remaining_secs: idle_secs,
            phase_total_secs: idle_secs,
            current: None,
            completed_sessions: 0,
            running: false,
            blocking: false,
            ticker: Ticker::default(),
        }
    }

    fn idle_secs(&self) -> u32 {
        self.config.session_cap_mins * 60
    }

    fn study_secs(&self, homework: &Homework) -> u32 {
        homework.estimated_minutes.min(self.config.session_cap_mins) * 60
    }

    fn enter(&mut self, phase: Phase, secs: u32) {
        self.phase = phase;
        self.remaining_secs = secs;
        self.phase_total_secs = secs;
    }

    /// Start a countdown.
    ///
    /// With a record, binds it and begins a fresh study phase capped at the
    /// session length. Without one, resumes the current phase, entering
    /// `Studying` from `Idle`.
    pub fn start(&mut self, record: Option<&Homework>, now: Instant) {
        match record {
            Some(homework) => {
                let secs = self.study_secs(homework);
                self.current = Some(homework.id.clone());
                self.enter(Phase::Studying, secs);
                info!(id = %homework.id, secs, "focus session started");
            }
            None => {
                if self.phase == Phase::Idle {
                    self.phase = Phase::Studying;
                    info!(secs = self.remaining_secs, "focus session started");
                } else {
                    debug!(phase = ?self.phase, secs = self.remaining_secs, "focus timer resumed");
                }
            }
        }
        self.running = true;
        self.blocking = true;
        self.ticker.arm(now);
    }

    /// Stop counting down, keeping the phase and remaining time.
    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            self.blocking = false;
            self.ticker.disarm();
            debug!(phase = ?self.phase, secs = self.remaining_secs, "focus timer paused");
        }
    }

    /// Back to an idle, unbound full-length session.
    pub fn reset(&mut self) {
        self.running = false;
        self.blocking = false;
        self.ticker.disarm();
        self.current = None;
        let secs = self.idle_secs();
        self.enter(Phase::Idle, secs);
        debug!("focus timer reset");
    }

    /// Bind a record without starting. Only allowed while idle.
    pub fn select(&mut self, record: &Homework) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        let secs = self.study_secs(record);
        self.current = Some(record.id.clone());
        self.enter(Phase::Idle, secs);
        true
    }

    /// Count down one second.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        match self.phase {
            Phase::Studying => {
                self.completed_sessions += 1;
                self.current = None;
                self.blocking = false;
                let secs = self.config.break_mins * 60;
                self.enter(Phase::Break, secs);
                info!(completed = self.completed_sessions, "study session finished, break started");
                Some(TimerEvent::StudyFinished {
                    completed_sessions: self.completed_sessions,
                })
            }
            Phase::Break => {
                self.running = false;
                self.blocking = false;
                self.ticker.disarm();
                let secs = self.idle_secs();
                self.enter(Phase::Idle, secs);
                info!("break finished");
                Some(TimerEvent::BreakFinished)
            }
            Phase::Idle => {
                self.running = false;
                self.blocking = false;
                self.ticker.disarm();
                None
            }
        }
    }

    /// Apply every whole second that has elapsed by `now`.
    pub fn advance(&mut self, now: Instant) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while self.running && self.ticker.poll(now) {
            if let Some(event) = self.tick() {
                events.push(event);
            }
        }
        events
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether distracting apps count as blocked.
    pub fn blocking(&self) -> bool {
        self.blocking
    }

    pub fn current(&self) -> Option<&HomeworkId> {
        self.current.as_ref()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    /// Fraction of the current phase elapsed (0.0 to 1.0).
    pub fn progress(&self) -> f64 {
        if self.phase_total_secs == 0 {
            return 0.0;
        }
        let total = f64::from(self.phase_total_secs);
        let done = f64::from(self.phase_total_secs.saturating_sub(self.remaining_secs));
        (done / total).clamp(0.0, 1.0)
    }

    /// Format remaining time as `MM:SS`.
    pub fn format_remaining(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}
