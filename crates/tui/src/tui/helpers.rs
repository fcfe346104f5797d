use std::cmp::min;

use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::NotificationKind;

pub const BG_BASE: Color = Color::Rgb(14, 17, 23);
pub const BG_PANEL: Color = Color::Rgb(22, 26, 34);
pub const BG_ACCENT: Color = Color::Rgb(32, 37, 47);
pub const FG_ACCENT: Color = Color::Rgb(120, 161, 255);

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

pub fn short_id(id: &str) -> String {
    let tail: Vec<char> = id.chars().rev().take(6).collect();
    tail.into_iter().rev().collect()
}

pub fn format_created(value: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = (*value).into();
    local.format("%Y-%m-%d %H:%M").to_string()
}

pub fn notification_style(kind: NotificationKind, leaving: bool) -> Style {
    let base = match kind {
        NotificationKind::Success => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        NotificationKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        NotificationKind::Info => Style::default().fg(Color::Cyan),
    };
    if leaving {
        base.add_modifier(Modifier::DIM).remove_modifier(Modifier::BOLD)
    } else {
        base
    }
}

pub fn notification_icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "✔",
        NotificationKind::Error => "⚠️ ",
        NotificationKind::Info => "ℹ️ ",
    }
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Ctrl+/ or a", "Focus the add input"),
        ("Enter (input)", "Add the typed task"),
        ("Esc (input)", "Leave the input for the list"),
        ("j / k or ↓ / ↑", "Move selection"),
        ("Space", "Toggle completed"),
        ("e", "Edit selected task"),
        ("x / Delete", "Delete task (with confirmation)"),
        ("1 / 2 / 3", "Show all / active / completed"),
        ("Tab / Shift+Tab", "Cycle filters"),
        ("C", "Clear completed tasks"),
        ("X", "Clear all tasks"),
        ("Esc (list)", "Dismiss the notification"),
        ("?", "Toggle this help overlay"),
        ("q", "Quit"),
    ]
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}
