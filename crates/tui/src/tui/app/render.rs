use std::cmp::min;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::block::Title;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;

use crate::core::{EmptyState, Interaction, TaskRow, MAX_TEXT_LEN};
use crate::tui::buffer::TextBuffer;
use crate::tui::constants::{
    APP_VERSION, HELP_CONFIRM, HELP_EDIT, HELP_INPUT, HELP_LIST, HELP_OVERLAY,
};
use crate::tui::helpers::{
    accent_title, build_help_lines, centered_rect, format_created, inset_rect,
    notification_icon, notification_style, short_id, BG_ACCENT, BG_BASE, BG_PANEL, FG_ACCENT,
};

use super::{App, ConfirmChoice, Focus};

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let size = f.size();
        f.render_widget(Clear, size);
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), size);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_tabs(f, chunks[1]);
        self.draw_add_input(f, chunks[2]);
        self.draw_tasks(f, chunks[3]);
        self.draw_footer(f, chunks[4]);

        if self.show_help {
            self.draw_help_overlay(f, size);
            return;
        }
        match self.controller.interaction() {
            Interaction::AwaitingConfirmation(action) => {
                let prompt = action.prompt();
                self.draw_confirm_overlay(f, size, &prompt);
            }
            Interaction::AwaitingEdit { .. } => self.draw_edit_overlay(f, size),
            Interaction::Idle => {}
        }
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let stats = self.controller.view().stats;
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let left = Line::from(vec![
            Span::styled(
                format!(" tasklet v{} ✅ ", APP_VERSION),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("Total: {}", stats.total)),
            Span::raw("  "),
            Span::raw(format!("Completed: {}", stats.completed)),
        ]);
        f.render_widget(
            Paragraph::new(left).style(Style::default().bg(BG_BASE)),
            cols[0],
        );

        let mut right_spans = Vec::new();
        if !self.controller.store().is_synced() {
            right_spans.push(Span::styled(
                "unsaved ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        right_spans.push(Span::styled(
            format!("💾 {}", self.config.data_dir().display()),
            Style::default().fg(Color::DarkGray),
        ));
        f.render_widget(
            Paragraph::new(Line::from(right_spans))
                .alignment(Alignment::Right)
                .style(Style::default().bg(BG_BASE)),
            cols[1],
        );
    }

    fn draw_tabs(&self, f: &mut Frame<'_>, area: Rect) {
        let view = self.controller.view();
        let titles: Vec<Line> = view
            .filters
            .iter()
            .map(|label| Line::from(label.label.clone()))
            .collect();
        let selected = view
            .filters
            .iter()
            .position(|label| label.active)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(accent_title("Filter"))
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    fn draw_add_input(&self, f: &mut Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Input && self.modal_closed();
        let border = if focused {
            Style::default().fg(FG_ACCENT)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("➕ Add Task"))
            .title(
                Title::from(counter_line(&self.input))
                    .alignment(Alignment::Right),
            )
            .border_style(border)
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let content = if self.input.is_empty() && !focused {
            Paragraph::new(Span::styled(
                "What needs to be done?",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Paragraph::new(self.input.as_str())
        };
        f.render_widget(content.style(Style::default().bg(BG_PANEL)), inner);

        if focused {
            place_cursor(f, inner, &self.input);
        }
    }

    fn draw_tasks(&mut self, f: &mut Frame<'_>, area: Rect) {
        let view = self.controller.view();
        if let Some(empty) = view.empty_state() {
            draw_empty_state(f, area, empty);
            return;
        }

        let header = Row::new(vec![
            Cell::from(""),
            Cell::from("📝 Task"),
            Cell::from("Actions"),
            Cell::from("🕒 Created"),
            Cell::from("#️⃣ ID"),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = view
            .rows()
            .iter()
            .map(|row| {
                let (check, text_style) = if row.completed {
                    (
                        "[x]",
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::CROSSED_OUT),
                    )
                } else {
                    ("[ ]", Style::default())
                };
                Row::new(vec![
                    Cell::from(check).style(Style::default().fg(Color::Green)),
                    Cell::from(row.text.as_str()).style(text_style),
                    actions_cell(row),
                    Cell::from(format_created(&row.created_at))
                        .style(Style::default().fg(Color::DarkGray)),
                    Cell::from(short_id(&row.id)).style(Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(16),
            Constraint::Length(6),
        ];

        let border = if self.focus == Focus::List {
            Style::default().fg(FG_ACCENT)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(accent_title("Tasks"))
                    .border_style(border)
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let status_line = match self.controller.notifier().current() {
            Some(note) => {
                let style = notification_style(note.kind, note.is_leaving());
                Line::from(vec![
                    Span::styled(notification_icon(note.kind), style),
                    Span::raw(" "),
                    Span::styled(note.message.clone(), style),
                ])
            }
            None => Line::from(Span::styled("Ready", Style::default().fg(Color::DarkGray))),
        };
        f.render_widget(Paragraph::new(status_line), lines[0]);

        let help = if self.show_help {
            HELP_OVERLAY
        } else {
            match self.controller.interaction() {
                Interaction::AwaitingConfirmation(_) => HELP_CONFIRM,
                Interaction::AwaitingEdit { .. } => HELP_EDIT,
                Interaction::Idle => match self.focus {
                    Focus::Input => HELP_INPUT,
                    Focus::List => HELP_LIST,
                },
            }
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                help,
                Style::default().fg(Color::DarkGray),
            ))),
            lines[1],
        );
    }

    fn draw_edit_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(10), 80);
        let popup_area = centered_rect(width, 3, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("✏️ Edit Task"))
            .title(
                Title::from(counter_line(&self.edit))
                    .alignment(Alignment::Right),
            )
            .border_style(Style::default().fg(FG_ACCENT))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);
        f.render_widget(
            Paragraph::new(self.edit.as_str()).style(Style::default().bg(BG_PANEL)),
            inner,
        );
        place_cursor(f, inner, &self.edit);
    }

    fn draw_help_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = build_help_lines();
        let width = min(area.width.saturating_sub(10), 80);
        let height = min(lines.len() as u16 + 4, area.height.saturating_sub(2)).max(8);
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("⌨️ Keyboard Reference"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);
        if inner.width < 3 || inner.height < 3 {
            return;
        }

        let rows: Vec<Row> = lines
            .into_iter()
            .map(|(combo, desc)| {
                Row::new(vec![
                    Cell::from(combo).style(Style::default().fg(Color::Cyan)),
                    Cell::from(desc),
                ])
            })
            .collect();
        let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(10)])
            .column_spacing(2)
            .style(Style::default().bg(BG_PANEL));
        f.render_widget(table, inset_rect(inner, 1));
    }

    fn draw_confirm_overlay(&self, f: &mut Frame<'_>, area: Rect, prompt: &str) {
        let width = min(area.width.saturating_sub(20), 60).max(40);
        let popup_area = centered_rect(width, 8, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("🗑 Confirm"))
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let yes_style = if self.confirm_choice == ConfirmChoice::Yes {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };
        let no_style = if self.confirm_choice == ConfirmChoice::No {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let lines = vec![
            Line::from(Span::styled(
                prompt.to_string(),
                Style::default().fg(Color::White),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("  Yes  ", yes_style),
                Span::raw("    "),
                Span::styled("  No  ", no_style),
            ]),
        ];
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }

    fn modal_closed(&self) -> bool {
        !self.show_help && *self.controller.interaction() == Interaction::Idle
    }
}

fn draw_empty_state(f: &mut Frame<'_>, area: Rect, empty: &EmptyState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .style(Style::default().bg(BG_PANEL));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let lines = vec![
        Line::from(empty.icon),
        Line::from(Span::styled(
            empty.title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            empty.message,
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let height = min(lines.len() as u16, inner.height);
    let content_area = centered_rect(inner.width.min(80), height, inner);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .style(Style::default().bg(BG_PANEL)),
        content_area,
    );
}

/// Per-row edit and delete hints. Completed rows dim the edit hint; `e` still works.
fn actions_cell(row: &TaskRow) -> Cell<'static> {
    let edit_style = if row.edit_muted {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Cell::from(Line::from(vec![
        Span::styled("✎ edit", edit_style),
        Span::raw("  "),
        Span::styled("✖ del", Style::default().fg(Color::Red)),
    ]))
}

/// Character counter shown on input borders; turns red past the limit.
fn counter_line(buffer: &TextBuffer) -> Line<'static> {
    let count = buffer.char_count();
    let style = if count > MAX_TEXT_LEN {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(Span::styled(format!(" {count}/{MAX_TEXT_LEN} "), style))
}

fn place_cursor(f: &mut Frame<'_>, area: Rect, buffer: &TextBuffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let col = min(buffer.cursor_col() as u16, area.width - 1);
    f.set_cursor(area.x + col, area.y);
}
