//! UI rendering for homework planner.

use crate::app::{App, Tab};
use crate::focus::Phase;
use crate::form::FormField;
use crate::models::{format_minutes, Priority};
use crate::plan::SessionKind;
use chrono::{Local, NaiveDateTime};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_footer(f, app, chunks[2]);

    if app.show_help {
        draw_help(f);
    }

    if app.show_add_dialog {
        draw_add_dialog(f, app);
    }

    if let Some(msg) = &app.message {
        draw_message(f, msg);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let mut tabs = Vec::new();
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            tabs.push(Span::raw(" "));
        }
        tabs.push(styled_tab(tab.label(), app.tab == *tab));
    }

    let header = Paragraph::new(Line::from(tabs))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Vision ")
                .title_bottom(Line::from(format!(" {} ", app.remaining_label())).right_aligned()),
        )
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

fn styled_tab(label: &str, active: bool) -> Span<'static> {
    if active {
        Span::styled(format!("[{}]", label), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    } else {
        Span::styled(format!(" {} ", label), Style::default().fg(Color::Gray))
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::DarkGray,
    }
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    match app.tab {
        Tab::Homework => draw_homework_view(f, app, area),
        Tab::Plan => draw_plan_view(f, app, area),
        Tab::Focus => draw_focus_view(f, app, area),
    }
}

fn draw_empty(f: &mut Frame, area: Rect, title: &str, heading: &str, hint: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(heading.to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::DarkGray))),
    ];
    let msg = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)))
        .alignment(Alignment::Center);
    f.render_widget(msg, area);
}

fn draw_homework_view(f: &mut Frame, app: &App, area: Rect) {
    if app.store.is_empty() {
        draw_empty(
            f,
            area,
            "Your Homework",
            "All caught up!",
            "Press 'a' to add homework and get started with your study plan.",
        );
        return;
    }

    let today = Local::now().date_naive();
    let items: Vec<ListItem> = app.store.all().iter().enumerate().map(|(i, hw)| {
        let check = if hw.completed { "☑" } else { "☐" };
        let title_style = if hw.completed {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let mut lines = vec![Line::from(vec![
            Span::raw(format!("{} ", check)),
            Span::styled(format!("[{}] ", hw.subject), Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("{} {} ", hw.priority.symbol(), hw.priority.label()),
                Style::default().fg(priority_color(hw.priority)),
            ),
            Span::styled(hw.title.clone(), title_style),
        ])];
        if !hw.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", hw.description),
                Style::default().fg(Color::DarkGray),
            )));
        }
        let due_style = if hw.is_overdue(today) {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("    {} min | Due: {}", hw.estimated_minutes, hw.due_date.format("%Y-%m-%d")),
            due_style,
        )));

        let style = if i == app.selected_index {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        ListItem::new(lines).style(style)
    }).collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Your Homework "));
    f.render_widget(list, area);
}

fn format_time(app: &App, time: NaiveDateTime) -> String {
    time.format(app.config.display.time_format.pattern()).to_string()
}

fn draw_plan_view(f: &mut Frame, app: &App, area: Rect) {
    if app.store.incomplete().is_empty() {
        draw_empty(
            f,
            area,
            "Smart Study Plan",
            "No homework to plan",
            "Add some homework first to generate your study plan.",
        );
        return;
    }

    if app.plan.is_empty() {
        draw_empty(
            f,
            area,
            "Smart Study Plan",
            "Optimized based on priority and due dates",
            "Press 'g' to generate a plan.",
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let end = app
        .plan
        .estimated_end()
        .map(|t| format_time(app, t))
        .unwrap_or_default();
    let summary = Paragraph::new(vec![
        Line::from(format!(
            "{} Assignments  |  {} Study Time  |  {} Estimated End",
            app.plan.assignment_count,
            format_minutes(app.plan.total_study_minutes()),
            end
        )),
        Line::from(Span::styled("Press 'g' to regenerate", Style::default().fg(Color::DarkGray))),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Smart Study Plan "))
    .alignment(Alignment::Center);
    f.render_widget(summary, chunks[0]);

    let items: Vec<ListItem> = app.plan.sessions.iter().enumerate().skip(app.plan_scroll).map(|(i, s)| {
        let window = format!("{} - {}", format_time(app, s.start), format_time(app, s.end));
        let line = match s.kind {
            SessionKind::Study => {
                let what = s
                    .homework
                    .as_ref()
                    .and_then(|id| app.store.get(id))
                    .map(|hw| format!("[{}] {}", hw.subject, hw.title))
                    .unwrap_or_else(|| "(removed)".to_string());
                Line::from(vec![
                    Span::styled("▌ ", Style::default().fg(Color::Blue)),
                    Span::styled(format!("{:<30}", what), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(format!(" {:>4} min  {}", s.duration_minutes, window)),
                    Span::styled(format!("  Session {}", i + 1), Style::default().fg(Color::DarkGray)),
                ])
            }
            SessionKind::Break => Line::from(vec![
                Span::styled("▌ ", Style::default().fg(Color::Green)),
                Span::styled(format!("{:<30}", "Take a Break"), Style::default().fg(Color::Green)),
                Span::raw(format!(" {:>4} min  {}", s.duration_minutes, window)),
                Span::styled(format!("  Session {}", i + 1), Style::default().fg(Color::DarkGray)),
            ]),
        };
        ListItem::new(line)
    }).collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Sessions "));
    f.render_widget(list, chunks[1]);
}

fn draw_focus_view(f: &mut Frame, app: &App, area: Rect) {
    let candidates = app.focus_candidates();
    if candidates.is_empty() && app.timer.phase() == Phase::Idle {
        draw_empty(
            f,
            area,
            "Lock In",
            "No homework to focus on",
            "Add some homework first to start focus sessions.",
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Timer
            Constraint::Length(3), // Blocking status
            Constraint::Min(0),    // Selection
        ])
        .split(area);

    // Timer display
    let heading = match app.timer.current().and_then(|id| app.store.get(id)) {
        Some(hw) => format!("[{}] {}", hw.subject, hw.title),
        None => app.timer.phase().name().to_string(),
    };
    let action = if app.timer.is_running() {
        "Press 's' to pause, 'r' to reset"
    } else if app.timer.current().is_some() || app.timer.phase() != Phase::Idle {
        "Press 's' to resume, 'r' to reset"
    } else {
        "Press 's' to start"
    };

    let timer_block = Block::default().borders(Borders::ALL).title(" Lock In ");
    let inner = timer_block.inner(chunks[0]);
    f.render_widget(timer_block, chunks[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(Paragraph::new(heading).alignment(Alignment::Center), rows[0]);
    f.render_widget(
        Paragraph::new(Span::styled(
            app.timer.format_remaining(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        rows[1],
    );
    let gauge = Gauge::default()
        .ratio(app.timer.progress())
        .gauge_style(Style::default().fg(match app.timer.phase() {
            Phase::Break => Color::Green,
            _ => Color::Red,
        }));
    f.render_widget(gauge, rows[2]);
    f.render_widget(
        Paragraph::new(Span::styled(action, Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center),
        rows[3],
    );

    // Blocking status
    let completed = app.timer.completed_sessions();
    let status = if app.timer.blocking() {
        Paragraph::new("Apps Blocked: social media and entertainment apps are blocked. Stay focused!")
            .style(Style::default().fg(Color::Red))
    } else if completed > 0 {
        Paragraph::new(format!(
            "Apps unlocked. Great work on completing {} session{}!",
            completed,
            if completed > 1 { "s" } else { "" }
        ))
        .style(Style::default().fg(Color::Green))
    } else {
        Paragraph::new("Apps unlocked").style(Style::default().fg(Color::DarkGray))
    };
    f.render_widget(status.block(Block::default().borders(Borders::ALL)), chunks[1]);

    // Selection
    let items: Vec<ListItem> = candidates.iter().enumerate().map(|(i, hw)| {
        let bound = app.timer.current() == Some(&hw.id);
        let marker = if bound { "▶ " } else { "  " };
        let mut style = if i == app.focus_index {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if bound {
            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
        ListItem::new(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("[{}] ", hw.subject), Style::default().fg(Color::Cyan)),
            Span::styled(format!("{} ", hw.priority.label()), Style::default().fg(priority_color(hw.priority))),
            Span::raw(format!("{} - {} min", hw.title, hw.estimated_minutes)),
        ]))
        .style(style)
    }).collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Select Homework to Focus On "));
    f.render_widget(list, chunks[2]);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let help = match app.tab {
        Tab::Homework => "j/k:Navigate  a:Add  Space:Toggle  d:Delete  1-3:Tabs  ?:Help  q:Quit",
        Tab::Plan => "g:Generate  j/k:Scroll  1-3:Tabs  ?:Help  q:Quit",
        Tab::Focus => "j/k:Navigate  Enter:Select  s:Start/Pause  r:Reset  1-3:Tabs  ?:Help  q:Quit",
    };

    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, area);

    let help = r#"
Homework Planner Keybindings

Tabs:
  1               Homework
  2               Study plan
  3               Focus mode

Homework:
  j/k, Up/Down    Navigate list
  a               Add homework
  Space, x        Toggle completed
  d               Delete homework

Study Plan:
  g               Generate plan
  j/k             Scroll sessions

Focus Mode:
  j/k             Navigate assignments
  Enter           Focus on assignment
  s               Start/pause/resume
  r               Reset timer

Add Dialog:
  Tab/Shift-Tab   Next/previous field
  Left/Right      Change subject/priority
  Enter           Log your work
  Esc             Cancel

General:
  ?               Show this help
  q               Quit

Press any key to close
"#;

    let popup = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn draw_add_dialog(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);

    let form = &app.form;
    let mut lines = Vec::new();
    for field in FormField::ORDER {
        let focused = form.focused == field;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value = if field.is_choice() {
            format!("< {} >", form.text(field))
        } else if focused {
            format!("{}_", form.text(field))
        } else {
            form.text(field).to_string()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<26}", field.label()), label_style),
            Span::raw(value),
        ]));
    }
    lines.push(Line::from(""));
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(Span::styled(
        "Enter: Log Your Work   Esc: Cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let dialog = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Add New Homework "))
        .wrap(Wrap { trim: false });
    f.render_widget(dialog, area);
}

fn draw_message(f: &mut Frame, msg: &str) {
    let area = Rect::new(
        f.area().x + 2,
        f.area().height.saturating_sub(5),
        f.area().width.saturating_sub(4),
        3,
    );
    f.render_widget(Clear, area);

    let message = Paragraph::new(msg)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::NewHomework;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Instant;

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app_with_homework() -> App {
        let mut app = App::new(Config::default());
        let due = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        app.store.add_at(
            NewHomework::new("Math", "Ch.5", 60, due).with_priority(Priority::High),
            1,
        );
        app.store.add_at(
            NewHomework::new("English", "Essay", 30, due).with_priority(Priority::Low),
            2,
        );
        app
    }

    #[test]
    fn test_empty_states() {
        let mut app = App::new(Config::default());
        assert!(render(&app).contains("All caught up!"));
        app.tab = Tab::Plan;
        assert!(render(&app).contains("No homework to plan"));
        app.tab = Tab::Focus;
        assert!(render(&app).contains("No homework to focus on"));
    }

    #[test]
    fn test_homework_tab_lists_records() {
        let app = app_with_homework();
        let screen = render(&app);
        assert!(screen.contains("Ch.5"));
        assert!(screen.contains("Essay"));
        assert!(screen.contains("1h 30m remaining"));
    }

    #[test]
    fn test_plan_tab_shows_sessions() {
        let mut app = app_with_homework();
        app.tab = Tab::Plan;
        assert!(render(&app).contains("Press 'g' to generate"));

        let now = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap().and_hms_opt(14, 10, 0).unwrap();
        app.generate_plan(now);
        let screen = render(&app);
        assert!(screen.contains("1h 30m Study Time"));
        assert!(screen.contains("16:15 Estimated End"));
        assert!(screen.contains("Take a Break"));
        assert!(screen.contains("14:30 - 15:30"));
    }

    #[test]
    fn test_focus_tab_blocking_banner() {
        let mut app = app_with_homework();
        app.tab = Tab::Focus;
        assert!(render(&app).contains("25:00"));

        app.toggle_focus(Instant::now());
        let screen = render(&app);
        assert!(screen.contains("Apps Blocked"));
    }

    #[test]
    fn test_add_dialog_shows_error() {
        let mut app = App::new(Config::default());
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        app.open_add_dialog(today);
        app.submit_form(today);

        let screen = render(&app);
        assert!(screen.contains("Add New Homework"));
        assert!(screen.contains("Subject is required"));
    }
}
