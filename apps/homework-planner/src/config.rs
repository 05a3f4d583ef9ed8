//! Configuration for homework planner.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub focus: FocusConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| Self::parse(&s))
            .unwrap_or_default()
    }

    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "homework-planner")
            .map(|d| d.config_dir().join("config.toml"))
    }

    pub fn log_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "homework-planner")
            .map(|d| d.data_dir().join("homework-planner.log"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Plans start on the next boundary of this many minutes.
    #[serde(default = "default_slot_mins")]
    pub slot_mins: u32,
    #[serde(default = "default_short_break")]
    pub short_break_mins: u32,
    #[serde(default = "default_long_break")]
    pub long_break_mins: u32,
    /// Study sessions at least this long are followed by a long break.
    #[serde(default = "default_long_session")]
    pub long_session_mins: u32,
}

fn default_slot_mins() -> u32 { 30 }
fn default_short_break() -> u32 { 10 }
fn default_long_break() -> u32 { 15 }
fn default_long_session() -> u32 { 60 }

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            slot_mins: 30,
            short_break_mins: 10,
            long_break_mins: 15,
            long_session_mins: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusConfig {
    #[serde(default = "default_session_cap")]
    pub session_cap_mins: u32,
    #[serde(default = "default_break_mins")]
    pub break_mins: u32,
    /// How many incomplete assignments the focus tab offers.
    #[serde(default = "default_selection_limit")]
    pub selection_limit: usize,
    #[serde(default = "default_true")]
    pub bell: bool,
}

fn default_session_cap() -> u32 { 25 }
fn default_break_mins() -> u32 { 5 }
fn default_selection_limit() -> usize { 5 }
fn default_true() -> bool { true }

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            session_cap_mins: 25,
            break_mins: 5,
            selection_limit: 5,
            bell: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub time_format: TimeFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "12h")]
    H12,
}

impl TimeFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::H24 => "%H:%M",
            Self::H12 => "%I:%M %p",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_level")]
    pub level: String,
    /// Log file; defaults to the data directory.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: default_level(),
            file: None,
        }
    }
}
